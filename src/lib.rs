#![deny(missing_docs)]
#![warn(clippy::unnecessary_to_owned)]
#![warn(clippy::redundant_clone)]
#![warn(clippy::inefficient_to_string)]
#![warn(clippy::manual_string_new)]
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

//! Surgical, formatting-preserving edits for YAML documents.
//!
//! Documents are held as lines of immutable text spans annotated with their
//! structural meaning. Selections resolve to nodes in a forest built from
//! those spans, and mutations only rewrite the spans a selection touches, so
//! every other byte of the input is reproduced exactly.

mod edit;
mod error;
mod lex;
mod mutation;
mod node;
mod operation;
mod parse;
mod scan;
mod select;
#[cfg(test)]
mod test_utils;
mod yaml;

pub use edit::{join, Edit, EditScript, RenderedLine};
pub use error::{IndentationError, IndentationErrorCategory, SurgeonError, SurgeonResult};
pub use lex::{lex, Token, TokenTag};
pub use mutation::Mutation;
pub use node::{Descendants, FlowStyle, NodeEdit, NodeId, NodeRole, SyntaxNode};
pub use operation::YamlOperation;
pub use parse::parse;
pub use rowan::{TextRange, TextSize};
pub use scan::{scan, scan_with_config, Line, LineEnding, ScanConfig};
pub use select::{IntoNames, Selector};
pub use yaml::Document;
