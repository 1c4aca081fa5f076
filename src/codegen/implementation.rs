//! Implementation artifact: dispatch and send bodies for both role classes.

use super::{argument_list, class_name, enum_traits, enum_value, Role};
use crate::model::{Interface, Message, Passing};

pub(super) fn render_source(interface: &Interface) -> String {
    let mut out = format!("#include \"{}.gen.h\"\n", interface.name);
    for role in [Role::Server, Role::Client] {
        out.push('\n');
        out.push_str(&render_dispatch(interface, role));
        for message in interface.channel(role.send_channel()) {
            out.push_str(&render_send(interface, role, message));
        }
    }
    out
}

/// Dispatch body: convert the wire identifier through the role's own
/// enumeration (an unknown identifier, including the sentinel, fails as
/// `EINVAL`), then decode and invoke per matched case.
fn render_dispatch(interface: &Interface, role: Role) -> String {
    let function = format!("{}::dispatch_message", class_name(interface, role, true));
    let traits = enum_traits(interface, role);

    let cases: String = interface
        .channel(role.recv_channel())
        .iter()
        .map(|message| render_case(interface, role, message))
        .collect();

    format!(
        "ErrorCode {function}(u32 id, ipc::Message& buffer) {{\n    \
         auto message_id = EXPECTED_TRY(({traits}::to_enum(id)));\n    \
         switch (message_id) {{\n{cases}        default: return EINVAL;\n    }}\n}}\n"
    )
}

/// One dispatch case: arguments decode in declared order, since each decode
/// advances the buffer cursor the next one depends on. Any decode failure
/// short-circuits out through `EXPECTED_TRY`.
fn render_case(interface: &Interface, role: Role, message: &Message) -> String {
    let decodes: String = message
        .arguments
        .iter()
        .map(|arg| {
            format!(
                "            auto arg_{} = EXPECTED_TRY(buffer.decode<{}>());\n",
                arg.name, arg.ty
            )
        })
        .collect();

    let handler_args = message
        .arguments
        .iter()
        .map(|arg| match interface.passing(&arg.ty) {
            Passing::Move => format!("bek::move(arg_{})", arg.name),
            Passing::Value | Passing::Reference => format!("arg_{}", arg.name),
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "        case {}: {{\n{decodes}            on_{}({handler_args});\n            return ESUCCESS;\n        }}\n",
        enum_value(interface, role, message),
        message.name
    )
}

/// Send body: tag the message with its enumeration value (which lives in
/// the peer's receive-channel enumeration), encode arguments in declared
/// order, and hand the message to the transport.
fn render_send(interface: &Interface, role: Role, message: &Message) -> String {
    let class = class_name(interface, role, true);
    let peer = role.peer();

    let encodes: String = message
        .arguments
        .iter()
        .map(|arg| format!("    message.encode({});\n", arg.name))
        .collect();

    format!(
        "\nvoid {class}::{}({}) {{\n    ipc::Message message{{{}::from_enum({})}};\n{encodes}    send_message(message);\n}}\n",
        message.name,
        argument_list(interface, message, true),
        enum_traits(interface, peer),
        enum_value(interface, peer, message)
    )
}
