//! Shared test utilities for devplan tests.
//!
//! Provides a scripted [`TextGenerator`] that replays canned responses and
//! records the prompts it receives, plus sample plans in the shapes the
//! generator is known to return.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use devplan_core::llm::{GenerateError, TextGenerator};

/// A canned reply: text, or a status failure.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Status(u16, String),
}

/// Replays [`Reply`] values in order. Once the script runs out every call
/// fails with a 500 status.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Reply>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A generator answering every call with the same text.
    pub fn repeating(text: &str, times: usize) -> Self {
        Self::new(std::iter::repeat_n(Reply::Text(text.to_owned()), times))
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        self.prompts.lock().unwrap().push(prompt.to_owned());
        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Status(status, body)) => Err(GenerateError::Status { status, body }),
            None => Err(GenerateError::Status {
                status: 500,
                body: "script exhausted".to_owned(),
            }),
        }
    }
}

/// A two-level plan without ids, as a generator would return it.
pub const SAMPLE_PLAN_JSON: &str = r#"{
  "title": "Recipe Recommender",
  "description": "Suggest recipes from the ingredients a user has at home.",
  "tasks": [
    {
      "name": "Data model",
      "description": "Define recipes, ingredients and users.",
      "tasks": [
        { "name": "Recipe schema", "description": "Tables for recipes." },
        { "name": "Pantry schema", "description": "Tables for pantry items.", "dependencies": ["1"] }
      ]
    },
    {
      "name": "Recommendation engine",
      "description": "Rank recipes by pantry overlap.",
      "dependencies": ["1"]
    }
  ]
}"#;

/// The plan JSON Schema as generators tend to echo it, compacted.
pub const ECHOED_SCHEMA: &str = r#"{"$schema": "http://json-schema.org/draft/2020-12/schema", "title": "Project Schema", "type": "object", "required": ["title", "description", "tasks"], "definitions": {"task": {"type": "object", "required": ["task_id", "name", "description"]}}}"#;

/// `SAMPLE_PLAN_JSON` wrapped in chatty prose and a fence.
pub fn fenced_sample_reply() -> String {
    format!("Here is your plan:\n\n```json\n{SAMPLE_PLAN_JSON}\n```\n\nGood luck!")
}

/// `SAMPLE_PLAN_JSON` preceded by an echoed schema.
pub fn schema_echo_sample_reply() -> String {
    format!("{ECHOED_SCHEMA}\n{SAMPLE_PLAN_JSON}")
}
