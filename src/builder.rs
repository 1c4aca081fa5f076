//! Interface builder: validates the raw element tree and constructs the
//! interface model.
//!
//! Building runs in two pure phases. The collect phase walks the tree,
//! validates structural rules, synthesizes implicit response messages into
//! the opposite channel, and produces an unnumbered draft. The numbering
//! phase then assigns each channel its dense, zero-based sequence numbers in
//! final order. Keeping the phases separate means a response message's
//! number depends only on how many prior messages already occupy its host
//! channel, never on mutation order during traversal.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::model::{
    Argument, Channel, Interface, Message, MessageKind, MessageRef, Passing, DEFAULT_INCLUDE,
};
use crate::schema::Element;

/// Structural validation failures. All are fatal for the run; no partial
/// output is ever written.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BuildError {
    #[error("`{tag}` element must have a name")]
    MissingMessageName { tag: String },

    #[error("argument of `{message}` must have a name")]
    MissingArgumentName { message: String },

    #[error("`type` element must have a name")]
    MissingTypeName,

    #[error("asynchronous message `{message}` cannot have a response")]
    AsyncHasResponse { message: String },

    #[error("unrecognised element `{tag}`")]
    UnrecognizedElement { tag: String },
}

/// A collected message awaiting its sequence number.
struct DraftMessage {
    name: String,
    arguments: Vec<Argument>,
    kind: MessageKind,
    response: Option<MessageRef>,
}

/// Output of the collect phase: the interface minus sequence numbers.
struct Draft {
    namespace: Option<String>,
    includes: Vec<String>,
    requests: Vec<DraftMessage>,
    events: Vec<DraftMessage>,
    types: BTreeMap<String, Passing>,
}

impl Draft {
    fn channel_mut(&mut self, channel: Channel) -> &mut Vec<DraftMessage> {
        match channel {
            Channel::Requests => &mut self.requests,
            Channel::Events => &mut self.events,
        }
    }
}

/// Build the interface model from a parsed schema tree.
///
/// `base_name` becomes the interface name; the driver passes the schema
/// file's stem rather than the builder reading filesystem state itself.
pub fn build(root: &Element, base_name: &str) -> Result<Interface, BuildError> {
    let draft = collect(root)?;
    let interface = number(draft, base_name);
    tracing::debug!(
        name = %interface.name,
        requests = interface.requests.len(),
        events = interface.events.len(),
        types = interface.types.len(),
        "built interface model"
    );
    Ok(interface)
}

fn collect(root: &Element) -> Result<Draft, BuildError> {
    let mut draft = Draft {
        namespace: root.attr("namespace").map(str::to_owned),
        includes: Vec::new(),
        requests: Vec::new(),
        events: Vec::new(),
        types: BTreeMap::new(),
    };

    for child in &root.children {
        match child.tag.as_str() {
            "request" => collect_message(child, Channel::Requests, &mut draft)?,
            "event" => collect_message(child, Channel::Events, &mut draft)?,
            "type" => {
                let name = child.attr("name").ok_or(BuildError::MissingTypeName)?;
                let passing = Passing::from_attr(child.attr("passing"));
                draft.types.insert(name.to_owned(), passing);
            }
            "include" => draft.includes.push(child.text.trim().to_owned()),
            other => {
                return Err(BuildError::UnrecognizedElement {
                    tag: other.to_owned(),
                })
            }
        }
    }

    // Duplicate user includes are kept verbatim; only the implicit default
    // is deduplicated.
    if !draft.includes.iter().any(|inc| inc == DEFAULT_INCLUDE) {
        draft.includes.push(DEFAULT_INCLUDE.to_owned());
    }

    Ok(draft)
}

fn collect_message(
    element: &Element,
    channel: Channel,
    draft: &mut Draft,
) -> Result<(), BuildError> {
    let name = element
        .attr("name")
        .ok_or_else(|| BuildError::MissingMessageName {
            tag: element.tag.clone(),
        })?
        .to_owned();
    let arguments = collect_arguments(element, &name)?;
    let kind = match element.attr("type") {
        None | Some("async") => MessageKind::Async,
        Some(_) => MessageKind::Sync,
    };

    let response = match element.find("response") {
        Some(reply) => {
            if kind == MessageKind::Async {
                return Err(BuildError::AsyncHasResponse { message: name });
            }
            // A sync call's reply travels over the channel the receiver
            // would use to talk back, so the response lands opposite.
            let response_name = format!("{name}_response");
            let response_args = collect_arguments(reply, &response_name)?;
            let host = channel.opposite();
            let messages = draft.channel_mut(host);
            messages.push(DraftMessage {
                name: response_name,
                arguments: response_args,
                kind: MessageKind::Response,
                response: None,
            });
            Some(MessageRef {
                channel: host,
                index: messages.len() - 1,
            })
        }
        None => None,
    };

    draft.channel_mut(channel).push(DraftMessage {
        name,
        arguments,
        kind,
        response,
    });
    Ok(())
}

fn collect_arguments(element: &Element, message: &str) -> Result<Vec<Argument>, BuildError> {
    element
        .children
        .iter()
        .filter(|child| child.tag == "arg")
        .map(|arg| {
            let name = arg
                .attr("name")
                .ok_or_else(|| BuildError::MissingArgumentName {
                    message: message.to_owned(),
                })?;
            Ok(Argument {
                name: name.to_owned(),
                ty: arg.attr("type").unwrap_or_default().to_owned(),
            })
        })
        .collect()
}

fn number(draft: Draft, base_name: &str) -> Interface {
    Interface {
        name: base_name.to_owned(),
        namespace: draft.namespace,
        includes: draft.includes,
        requests: number_channel(draft.requests),
        events: number_channel(draft.events),
        types: draft.types,
    }
}

fn number_channel(drafts: Vec<DraftMessage>) -> Vec<Message> {
    drafts
        .into_iter()
        .enumerate()
        .map(|(index, draft)| Message {
            name: draft.name,
            arguments: draft.arguments,
            kind: draft.kind,
            response: draft.response,
            number: index as u32,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::parse_document;

    fn build_str(input: &str) -> Result<Interface, BuildError> {
        let root = parse_document(input).expect("schema should parse");
        build(&root, "test")
    }

    #[test]
    fn default_include_is_appended_once() {
        let interface = build_str("<interface></interface>").unwrap();
        assert_eq!(interface.includes, vec![DEFAULT_INCLUDE.to_owned()]);

        let interface =
            build_str("<interface><include>ipc/connection.h</include></interface>").unwrap();
        assert_eq!(interface.includes, vec![DEFAULT_INCLUDE.to_owned()]);
    }

    #[test]
    fn user_include_duplicates_are_preserved() {
        let interface = build_str(
            "<interface><include>ipc/a.h</include><include>ipc/a.h</include></interface>",
        )
        .unwrap();
        assert_eq!(
            interface.includes,
            vec!["ipc/a.h", "ipc/a.h", DEFAULT_INCLUDE]
        );
    }

    #[test]
    fn sync_message_links_its_response() {
        let interface = build_str(
            r#"<interface>
                <request name="echo" type="sync">
                    <arg name="msg" type="String"/>
                    <response><arg name="reply" type="String"/></response>
                </request>
            </interface>"#,
        )
        .unwrap();
        let echo = &interface.requests[0];
        assert_eq!(echo.kind, MessageKind::Sync);
        let reply = echo.response.expect("sync message carries a response");
        assert_eq!(reply.channel, Channel::Events);
        let response = &interface.events[reply.index];
        assert_eq!(response.name, "echo_response");
        assert_eq!(response.kind, MessageKind::Response);
        assert!(response.response.is_none());
    }

    #[test]
    fn unnamed_message_is_rejected() {
        let err = build_str("<interface><request/></interface>").unwrap_err();
        assert_eq!(
            err,
            BuildError::MissingMessageName {
                tag: "request".to_owned()
            }
        );
    }

    #[test]
    fn unnamed_type_is_rejected() {
        let err = build_str(r#"<interface><type passing="move"/></interface>"#).unwrap_err();
        assert_eq!(err, BuildError::MissingTypeName);
    }
}
