//! Interface model: the validated, immutable input to stub generation.
//!
//! The model decouples schema parsing from code generation. It is produced
//! once by the builder and never mutated afterwards.

use std::collections::BTreeMap;

/// Include identifier for the base connection contract. Always present in an
/// interface's include list, appended by the builder when unspecified.
pub const DEFAULT_INCLUDE: &str = "ipc/connection.h";

/// How arguments of a declared type cross an operation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Passing {
    /// Copied: taken by value on both the send and receive side.
    Value,
    /// Borrowed: taken by `const&` on both sides.
    Reference,
    /// Ownership transfer: `const&` when sending, by value when receiving.
    Move,
}

impl Passing {
    /// Interpret a `passing` attribute. Absent (and unrecognized) values
    /// fall back to `value`.
    pub fn from_attr(attr: Option<&str>) -> Self {
        match attr {
            Some("reference") => Passing::Reference,
            Some("move") => Passing::Move,
            _ => Passing::Value,
        }
    }
}

/// Message kind, determining response pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Fire-and-forget; never carries a response link.
    Async,
    /// Blocks the sender until the paired response arrives; carries exactly
    /// one response link.
    Sync,
    /// Synthesized reply to a sync message on the opposite channel.
    Response,
}

/// The two message channels of an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Client-to-server messages.
    Requests,
    /// Server-to-client messages.
    Events,
}

impl Channel {
    /// The channel a receiver of this channel's messages would send on.
    /// Responses are synthesized into the opposite channel.
    pub fn opposite(self) -> Channel {
        match self {
            Channel::Requests => Channel::Events,
            Channel::Events => Channel::Requests,
        }
    }
}

/// Location of a message within an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef {
    pub channel: Channel,
    pub index: usize,
}

/// A named, typed message argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub name: String,
    pub ty: String,
}

/// A single message of an interface, bound to exactly one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Message name, unique within its channel.
    pub name: String,
    /// Arguments in declared order. Decode order follows this exactly.
    pub arguments: Vec<Argument>,
    pub kind: MessageKind,
    /// The paired response message, for `Sync` messages only.
    pub response: Option<MessageRef>,
    /// Wire identifier: dense, zero-based, assigned per channel in
    /// declaration order. Stable for a given schema across regenerations.
    pub number: u32,
}

/// The root entity: one per compiled schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    /// Interface name, from the schema file's base name.
    pub name: String,
    pub namespace: Option<String>,
    /// Include identifiers in declaration order, [`DEFAULT_INCLUDE`] last
    /// unless already declared. User duplicates are preserved.
    pub includes: Vec<String>,
    pub requests: Vec<Message>,
    pub events: Vec<Message>,
    /// Declared type name to passing policy, fixed interface-wide.
    pub types: BTreeMap<String, Passing>,
}

impl Interface {
    /// Passing policy for a type name. Undeclared types default to `value`;
    /// this is a permissive default, not an error.
    pub fn passing(&self, ty: &str) -> Passing {
        self.types.get(ty).copied().unwrap_or(Passing::Value)
    }

    /// The messages of a channel, in numbered order.
    pub fn channel(&self, channel: Channel) -> &[Message] {
        match channel {
            Channel::Requests => &self.requests,
            Channel::Events => &self.events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passing_from_attr_defaults_to_value() {
        assert_eq!(Passing::from_attr(None), Passing::Value);
        assert_eq!(Passing::from_attr(Some("value")), Passing::Value);
        assert_eq!(Passing::from_attr(Some("reference")), Passing::Reference);
        assert_eq!(Passing::from_attr(Some("move")), Passing::Move);
    }

    #[test]
    fn channels_are_opposites() {
        assert_eq!(Channel::Requests.opposite(), Channel::Events);
        assert_eq!(Channel::Events.opposite(), Channel::Requests);
    }
}
