//! Provider trait and request/response types shared by every backend.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::LlmError;

/// A single-prompt completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// A completed text response with token usage.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub content: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Text-generation backend.
///
/// Implementations make exactly one backend call per `complete`; no retries,
/// no timeouts. Errors propagate to the caller.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Model identifier, for logging and cost lookup.
    fn model_name(&self) -> &str;

    /// Cost per input token and per output token, in USD.
    fn cost_per_token(&self) -> (Decimal, Decimal);

    /// Run a completion.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}

/// Send one prompt at the given temperature and return the response.
pub async fn generate(
    llm: &dyn LlmProvider,
    prompt: &str,
    temperature: f32,
) -> Result<CompletionResponse, LlmError> {
    llm.complete(CompletionRequest::new(prompt).with_temperature(temperature))
        .await
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Echoes the prompt and remembers the temperature it was sent.
    #[derive(Default)]
    struct EchoLlm {
        temperature: Mutex<Option<f32>>,
    }

    #[async_trait]
    impl LlmProvider for EchoLlm {
        fn model_name(&self) -> &str {
            "echo"
        }

        fn cost_per_token(&self) -> (Decimal, Decimal) {
            (Decimal::ZERO, Decimal::ZERO)
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            *self.temperature.lock().unwrap() = request.temperature;
            Ok(CompletionResponse {
                content: request.prompt,
                input_tokens: 1,
                output_tokens: 1,
            })
        }
    }

    #[test]
    fn new_request_has_no_temperature() {
        let request = CompletionRequest::new("x");
        assert_eq!(request.prompt, "x");
        assert_eq!(request.temperature, None);
        assert_eq!(request.with_temperature(0.2).temperature, Some(0.2));
    }

    #[tokio::test]
    async fn generate_passes_prompt_and_temperature() {
        let llm = EchoLlm::default();
        let response = generate(&llm, "write a tagline", 0.7).await.unwrap();
        assert_eq!(response.content, "write a tagline");
        assert_eq!(*llm.temperature.lock().unwrap(), Some(0.7));
    }
}
