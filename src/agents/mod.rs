//! Content agents: one prompt template per content type.
//!
//! Each agent formats a prompt, makes one generation call, parses the reply
//! and validates it into a typed record. Agents hold no state between calls;
//! the only side effect is accounting in the caller's `RunContext`.

pub mod prompts;

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::campaign::validate;
use crate::campaign::{
    AudienceProfile, CampaignBrief, ComplianceResult, EmailDraft, MessageDraft, Persona,
    QualityScore, parse_response,
};
use crate::context::{AgentKind, RunContext};
use crate::error::LlmError;
use crate::llm::costs;
use crate::llm::provider::{LlmProvider, generate};

pub use prompts::EmailRequest;

/// Default number of variants requested.
pub const DEFAULT_VARIANT_COUNT: usize = 5;

/// The set of content agents sharing one generation client.
#[derive(Clone)]
pub struct ContentAgents {
    llm: Arc<dyn LlmProvider>,
    temperature: f32,
}

impl ContentAgents {
    pub fn new(llm: Arc<dyn LlmProvider>, temperature: f32) -> Self {
        Self { llm, temperature }
    }

    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    /// One generation call: prompt in, parsed JSON out.
    async fn call(
        &self,
        agent: AgentKind,
        prompt: String,
        ctx: &mut RunContext,
    ) -> Result<Value, LlmError> {
        debug!(agent = %agent, prompt_chars = prompt.len(), "Calling model");
        let response = generate(self.llm.as_ref(), &prompt, self.temperature).await?;
        let cost = costs::call_cost(
            self.llm.cost_per_token(),
            response.input_tokens,
            response.output_tokens,
        );
        ctx.record(agent, response.input_tokens, response.output_tokens, cost);
        Ok(parse_response(&response.content))
    }

    /// Derive the target persona and brand voice from the brief.
    pub async fn persona(
        &self,
        brief: &CampaignBrief,
        ctx: &mut RunContext,
    ) -> Result<Persona, LlmError> {
        let value = self
            .call(AgentKind::Persona, prompts::persona(brief), ctx)
            .await?;
        Ok(validate::persona_from_value(&value))
    }

    /// Write an email draft.
    pub async fn email(
        &self,
        request: &EmailRequest,
        ctx: &mut RunContext,
    ) -> Result<EmailDraft, LlmError> {
        let value = self
            .call(AgentKind::Email, prompts::email(request), ctx)
            .await?;
        Ok(validate::email_from_value(&value))
    }

    /// Write SMS messages.
    pub async fn sms(
        &self,
        persona: &AudienceProfile,
        goal: &str,
        required_phrases: &str,
        ctx: &mut RunContext,
    ) -> Result<MessageDraft, LlmError> {
        let value = self
            .call(
                AgentKind::Sms,
                prompts::sms(persona, goal, required_phrases),
                ctx,
            )
            .await?;
        Ok(validate::sms_from_value(&value))
    }

    /// Write social posts for one platform.
    pub async fn social(
        &self,
        platform: &str,
        persona: &AudienceProfile,
        voice: &str,
        goal: &str,
        ctx: &mut RunContext,
    ) -> Result<MessageDraft, LlmError> {
        let value = self
            .call(
                AgentKind::Social,
                prompts::social(platform, persona, voice, goal),
                ctx,
            )
            .await?;
        Ok(validate::social_from_value(&value, platform))
    }

    /// Check content against the compliance rules.
    pub async fn compliance(
        &self,
        content: &str,
        rules: &[String],
        ctx: &mut RunContext,
    ) -> Result<ComplianceResult, LlmError> {
        let value = self
            .call(AgentKind::Compliance, prompts::compliance(content, rules), ctx)
            .await?;
        Ok(validate::compliance_from_value(&value))
    }

    /// Generate up to `n` variants of the content.
    pub async fn variants(
        &self,
        content: &str,
        n: usize,
        ctx: &mut RunContext,
    ) -> Result<Vec<String>, LlmError> {
        let value = self
            .call(AgentKind::Variants, prompts::variants(content, n), ctx)
            .await?;
        Ok(validate::variants_from_value(&value, n))
    }

    /// Score one piece of content.
    pub async fn score(
        &self,
        content: &str,
        ctx: &mut RunContext,
    ) -> Result<QualityScore, LlmError> {
        let value = self
            .call(AgentKind::Scorer, prompts::score(content), ctx)
            .await?;
        Ok(validate::score_from_value(&value))
    }
}
