//! Document rendering: depth-first walks over a numbered [`Plan`].
//!
//! [`Plan`]: crate::plan::Plan

pub mod html;
pub mod markdown;

pub use html::{content_to_html, heading_level, render_html};
pub use markdown::render_markdown;
