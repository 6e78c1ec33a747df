//! The `TextGenerator` trait -- the adapter interface for generation
//! services.
//!
//! The trait is object-safe so pipelines can take `&dyn TextGenerator` and
//! tests can substitute a scripted implementation.

use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by a text generator.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API request failed with status code: {status}\nDetails: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response format: {0}")]
    MalformedResponse(String),
}

/// Turns a prompt into generated text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Human-readable name for logs (e.g. "openrouter").
    fn name(&self) -> &str;

    /// Generate text for `prompt`. Implementations return the trimmed
    /// content of the first completion.
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

// Compile-time assertion: TextGenerator must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn TextGenerator) {}
};

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoGenerator;

    #[async_trait]
    impl TextGenerator for EchoGenerator {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
            Ok(prompt.trim().to_owned())
        }
    }

    #[tokio::test]
    async fn generator_is_usable_as_trait_object() {
        let generator: Box<dyn TextGenerator> = Box::new(EchoGenerator);
        assert_eq!(generator.name(), "echo");
        assert_eq!(generator.generate("  hi  ").await.unwrap(), "hi");
    }

    #[test]
    fn status_error_includes_details() {
        let err = GenerateError::Status {
            status: 429,
            body: "rate limited".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "API request failed with status code: 429\nDetails: rate limited"
        );
    }
}
