//! Core of `devplan`: the plan tree, tolerant extraction of generated plan
//! JSON, hierarchical numbering, prompt-text parsing and document rendering.

pub mod content;
pub mod llm;
pub mod plan;
pub mod render;
