//! Credential-free stand-in backend.
//!
//! Returns canned JSON chosen by substring match on the prompt so the whole
//! pipeline runs offline. Anything it does not recognise gets a passing
//! compliance record.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::json;
use tracing::debug;

use crate::error::LlmError;
use crate::llm::provider::{CompletionRequest, CompletionResponse, LlmProvider};

/// Email body returned for every email-copywriter prompt.
pub const DEMO_EMAIL_BODY: &str = "This is a mock email body generated for demonstration. \
It simulates how the system works end-to-end when a live LLM is connected.";

/// Variants returned for every variant-generation prompt.
///
/// Without these a variant prompt would fall through to the compliance
/// record, which holds no list, and an offline run would have nothing to
/// score or rank. All five score empty, so the first one is selected.
pub const DEMO_VARIANTS: [&str; 5] = [
    "Our latest launch is here, and it was built around you. Take a look today.",
    "Meet the newest addition to the lineup. Limited-time pricing for early readers.",
    "Something new just landed. Open to see what changed and why it matters.",
    "The launch you asked for is live. Get started in under a minute.",
    "New product, same promise: less effort, better results. Learn more inside.",
];

/// Stand-in provider used when no backend credential is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct CannedProvider;

impl CannedProvider {
    pub fn new() -> Self {
        Self
    }

    /// Pick the canned response for a prompt.
    pub fn respond(prompt: &str) -> String {
        let lower = prompt.to_lowercase();

        let value = if prompt.contains("persona builder") {
            json!({
                "persona": {
                    "age_range": "25-35",
                    "interests": ["technology", "marketing"],
                    "pain_points": ["time constraints", "low engagement"]
                },
                "voice": "clear, friendly, professional",
                "top_ctas": ["Try now", "Learn more", "Get started"]
            })
        } else if lower.contains("email copywriter") {
            json!({
                "subject_lines": [
                    "New Launch - 20% Off Inside",
                    "Dont Miss Our Limited-Time Offer",
                    "Introducing Our Latest Product"
                ],
                "preheader": "Exclusive launch offer just for you",
                "email_body": DEMO_EMAIL_BODY
            })
        } else if lower.contains("concise variants") {
            // Extra pattern beyond persona and email; see `DEMO_VARIANTS`.
            json!(DEMO_VARIANTS)
        } else {
            json!({
                "approved": true,
                "issues": [],
                "fix_suggestions": []
            })
        };

        value.to_string()
    }
}

#[async_trait]
impl LlmProvider for CannedProvider {
    fn model_name(&self) -> &str {
        "canned-demo"
    }

    fn cost_per_token(&self) -> (Decimal, Decimal) {
        (Decimal::ZERO, Decimal::ZERO)
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let prompt = request.prompt;
        let content = Self::respond(&prompt);
        debug!(
            prompt_chars = prompt.len(),
            response_chars = content.len(),
            "Canned provider responded"
        );
        Ok(CompletionResponse {
            content,
            input_tokens: 0,
            output_tokens: 0,
        })
    }
}
