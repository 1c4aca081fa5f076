//! Stub generator: renders the declaration and implementation artifacts
//! from an interface model.
//!
//! Server and client are one generation routine parameterized by [`Role`]:
//! a role's send channel is its peer's receive channel, so every renderer
//! asks the role for a channel instead of branching on a flag. All output
//! is assembled with plain string building so regeneration from an
//! unchanged schema is byte-identical.

mod declarations;
mod implementation;

use crate::model::{Channel, Interface, Message, Passing};

/// The two generated artifacts of one compiler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    /// Include-guarded declarations of both role classes.
    pub header: String,
    /// Dispatch and send bodies for both role classes.
    pub source: String,
}

/// The server/client generation axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Server,
    Client,
}

impl Role {
    pub fn suffix(self) -> &'static str {
        match self {
            Role::Server => "Server",
            Role::Client => "Client",
        }
    }

    pub fn peer(self) -> Role {
        match self {
            Role::Server => Role::Client,
            Role::Client => Role::Server,
        }
    }

    /// The channel whose messages this role receives and dispatches. Its
    /// sequence numbers define the role's `Messages` enumeration.
    pub fn recv_channel(self) -> Channel {
        match self {
            Role::Server => Channel::Requests,
            Role::Client => Channel::Events,
        }
    }

    /// The channel whose messages this role sends: the peer's receive
    /// channel.
    pub fn send_channel(self) -> Channel {
        self.peer().recv_channel()
    }
}

/// Generate both artifacts for an interface.
pub fn generate(interface: &Interface) -> Artifacts {
    let artifacts = Artifacts {
        header: declarations::render_header(interface),
        source: implementation::render_source(interface),
    };
    tracing::debug!(
        name = %interface.name,
        header_bytes = artifacts.header.len(),
        source_bytes = artifacts.source.len(),
        "generated stub artifacts"
    );
    artifacts
}

/// Class name for a role: namespace qualifier (when requested and present)
/// + interface name + role suffix + the raw variant tag.
fn class_name(interface: &Interface, role: Role, qualified: bool) -> String {
    let namespace = match (&interface.namespace, qualified) {
        (Some(namespace), true) => format!("{namespace}::"),
        _ => String::new(),
    };
    format!("{namespace}{}{}Raw", interface.name, role.suffix())
}

/// Textual form of a message identifier: its name upper-cased.
fn enum_member(message: &Message) -> String {
    message.name.to_uppercase()
}

/// Fully qualified enumerator for a message within a role's enumeration.
fn enum_value(interface: &Interface, role: Role, message: &Message) -> String {
    format!(
        "{}::Messages::{}",
        class_name(interface, role, true),
        enum_member(message)
    )
}

/// The runtime's enum conversion helper, instantiated for a role's
/// enumeration with its end-of-messages sentinel.
fn enum_traits(interface: &Interface, role: Role) -> String {
    let class = class_name(interface, role, true);
    format!("ipc::enum_traits<{class}::Messages, {class}::Messages::END_OF_MESSAGES>")
}

/// Render a message's parameter list under the argument-passing rule:
/// by value if the type's policy is `value`, or when receiving with policy
/// `move`; otherwise by `const&`.
fn argument_list(interface: &Interface, message: &Message, sending: bool) -> String {
    message
        .arguments
        .iter()
        .map(|arg| {
            let passing = interface.passing(&arg.ty);
            if passing == Passing::Value || (!sending && passing == Passing::Move) {
                format!("{} {}", arg.ty, arg.name)
            } else {
                format!("const {}& {}", arg.ty, arg.name)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
