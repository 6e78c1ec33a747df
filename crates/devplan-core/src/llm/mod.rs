//! Text-generation collaborator.
//!
//! The core only needs "prompt in, text out". [`TextGenerator`] is that
//! seam; [`OpenRouterClient`] implements it over the OpenRouter
//! chat-completions API.

pub mod openrouter;
pub mod trait_def;

pub use openrouter::{OpenRouterClient, OpenRouterConfig};
pub use trait_def::{GenerateError, TextGenerator};
