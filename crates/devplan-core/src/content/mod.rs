//! Structured view of free-form implementation prompts.
//!
//! [`parse`] splits prompt text into paragraphs, fenced code blocks and
//! numbered or lettered lists so renderers can emit real markup.

pub mod parser;

pub use parser::{ContentNode, ListItem, ListKind, parse};
