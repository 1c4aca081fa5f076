//! IPC interface compiler.
//!
//! Reads a declarative schema describing a message-passing interface
//! (requests, events, argument lists, type-passing policies) and emits
//! paired client/server C++ stub code against a message-oriented connection
//! abstraction.
//!
//! # Pipeline
//!
//! ```text
//! schema document ──► Element tree ──► Interface model ──► Artifacts
//!                 loader           builder             generator
//! ```
//!
//! One invocation runs the pipeline once, front to back, with no feedback
//! loops: the [`schema`] loader parses the document without interpreting
//! tag semantics, the [`builder`] validates structure and assigns wire
//! sequence numbers, and [`codegen`] renders the declaration and
//! implementation artifacts for both roles. The runtime behavior of the
//! generated connection (framing, transport, blocking) belongs to the
//! external `ipc::Connection` contract, not to this crate.

pub mod builder;
pub mod codegen;
pub mod model;
pub mod schema;

pub use builder::{build, BuildError};
pub use codegen::{generate, Artifacts, Role};
pub use model::{
    Argument, Channel, Interface, Message, MessageKind, MessageRef, Passing, DEFAULT_INCLUDE,
};
pub use schema::{load_document, parse_document, Element, SchemaError};
