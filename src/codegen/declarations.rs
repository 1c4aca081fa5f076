//! Declaration artifact: the include-guarded header declaring both role
//! classes against the base connection contract.

use super::{argument_list, class_name, enum_member, Role};
use crate::model::Interface;

pub(super) fn render_header(interface: &Interface) -> String {
    let guard = format!("IPC_GEN_{}", interface.name.to_uppercase());
    let includes: String = interface
        .includes
        .iter()
        .map(|include| format!("#include <{include}>\n"))
        .collect();
    let (namespace_begin, namespace_end) = match &interface.namespace {
        Some(namespace) => (format!("namespace {namespace} {{\n"), "}\n".to_owned()),
        None => (String::new(), String::new()),
    };

    let server = render_class(interface, Role::Server);
    let client = render_class(interface, Role::Client);

    format!(
        "#ifndef {guard}\n#define {guard}\n{includes}{namespace_begin}\n{server}\n\n{client}\n\n{namespace_end}#endif\n"
    )
}

fn render_class(interface: &Interface, role: Role) -> String {
    let name = class_name(interface, role, false);
    let messages_enum = render_messages_enum(interface, role);

    let outbound: String = interface
        .channel(role.send_channel())
        .iter()
        .map(|message| {
            format!(
                "    void {}({});\n",
                message.name,
                argument_list(interface, message, true)
            )
        })
        .collect();

    let inbound: String = interface
        .channel(role.recv_channel())
        .iter()
        .map(|message| {
            format!(
                "    virtual void on_{}({}) = 0;\n",
                message.name,
                argument_list(interface, message, false)
            )
        })
        .collect();

    let mut out = format!("class {name}: public ipc::Connection {{\n");
    out.push_str("public:\n");
    out.push_str("    using Connection::Connection;\n");
    out.push_str(&messages_enum);
    out.push_str(&outbound);
    out.push_str(&inbound);
    out.push_str("protected:\n");
    out.push_str("    ErrorCode dispatch_message(u32 id, ipc::Message& buffer) override;\n");
    out.push_str("};");
    out
}

/// The role's receive-channel enumeration. Enumerator values are written
/// out explicitly: they are the wire identifiers and must match the
/// builder's sequence numbers exactly.
fn render_messages_enum(interface: &Interface, role: Role) -> String {
    let mut out = String::from("    enum class Messages: u32 {\n");
    for message in interface.channel(role.recv_channel()) {
        out.push_str(&format!(
            "        {} = {},\n",
            enum_member(message),
            message.number
        ));
    }
    out.push_str("        END_OF_MESSAGES\n    };\n");
    out
}
