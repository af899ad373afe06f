//! Campaign orchestrator. Runs the fixed agent sequence for one brief.
//!
//! Flow:
//! 1. Persona → email → SMS → social per requested channel
//! 2. Compliance check on the email body, with at most one rewrite
//! 3. Variants of the email body in use, each scored independently
//! 4. Rank, select, approval gate, persist
//!
//! Generation failures abort the run. Document-store failures are logged
//! and swallowed.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::agents::{ContentAgents, DEFAULT_VARIANT_COUNT, EmailRequest};
use crate::campaign::{CampaignBrief, CampaignResult, ContentBundle, ScoredVariant};
use crate::context::{AgentKind, RunContext};
use crate::error::PipelineError;
use crate::pipeline::approval::{ApprovalDecision, ApprovalGate, AutoApprove};
use crate::pipeline::ranking::{rank_variants, select_final};
use crate::store::{CampaignLog, DocumentStore};

/// Per-run options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Suspend on the approval gate before persisting.
    pub require_human_approval: bool,
    /// How many variants to request.
    pub variant_count: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            require_human_approval: false,
            variant_count: DEFAULT_VARIANT_COUNT,
        }
    }
}

/// A finished run: the result plus the reviewer's decision.
#[derive(Debug, Clone)]
pub struct CampaignOutcome {
    pub result: CampaignResult,
    pub decision: ApprovalDecision,
    /// Whether the result was appended to the campaign log.
    pub logged: bool,
}

/// Runs campaigns end to end.
pub struct CampaignOrchestrator {
    agents: ContentAgents,
    log: CampaignLog,
    documents: Option<Arc<dyn DocumentStore>>,
    approval: Arc<dyn ApprovalGate>,
}

impl CampaignOrchestrator {
    pub fn new(agents: ContentAgents, log: CampaignLog) -> Self {
        Self {
            agents,
            log,
            documents: None,
            approval: Arc::new(AutoApprove),
        }
    }

    /// Also write approved final choices to a document store.
    pub fn with_document_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.documents = Some(store);
        self
    }

    /// Gate consulted when a run requires human approval.
    pub fn with_approval_gate(mut self, gate: Arc<dyn ApprovalGate>) -> Self {
        self.approval = gate;
        self
    }

    /// Run one campaign from brief to persisted result.
    pub async fn run(
        &self,
        brief: &CampaignBrief,
        options: RunOptions,
    ) -> Result<CampaignOutcome, PipelineError> {
        if options.variant_count == 0 {
            return Err(PipelineError::InvalidOptions(
                "variant count must be at least 1".into(),
            ));
        }

        let mut ctx = RunContext::new(self.agents.model_name());
        info!(
            run_id = %ctx.run_id,
            brand = %brief.brand_name,
            channels = brief.channels.len(),
            rules = brief.rules.len(),
            "Starting campaign run"
        );

        // Step 1: persona
        let persona = self.agents.persona(brief, &mut ctx).await?;
        if persona.raw.is_some() {
            warn!(run_id = %ctx.run_id, "Persona reply was not JSON; continuing with empty persona");
        }

        // Step 2: email
        let email_request = EmailRequest {
            brand_name: brief.brand_name.clone(),
            voice: persona.voice.clone(),
            persona: persona.profile.clone(),
            goal: brief.goal.clone(),
            required_phrases: brief.required_phrases.clone(),
        };
        let email = self.agents.email(&email_request, &mut ctx).await?;

        // Step 3: SMS
        let sms = self
            .agents
            .sms(
                &persona.profile,
                &brief.goal,
                &brief.required_phrases,
                &mut ctx,
            )
            .await?;

        // Step 4: social, one draft per requested channel
        let mut social = BTreeMap::new();
        for channel in &brief.channels {
            let draft = self
                .agents
                .social(
                    channel.as_str(),
                    &persona.profile,
                    &persona.voice,
                    &brief.goal,
                    &mut ctx,
                )
                .await?;
            social.insert(*channel, draft);
        }

        let mut content = ContentBundle {
            email,
            email_rewrite: None,
            sms,
            social,
        };

        // Step 5: compliance on the email body
        let mut compliance = self
            .agents
            .compliance(&content.email.email_body, &brief.rules, &mut ctx)
            .await?;

        // Step 6: one rewrite pass, never more
        if !compliance.approved {
            info!(
                run_id = %ctx.run_id,
                issues = compliance.issues.len(),
                "Email failed compliance, rewriting once"
            );
            let rewrite_request = email_request.with_fix_issues(&compliance.issues);
            let rewrite = self.agents.email(&rewrite_request, &mut ctx).await?;
            compliance = self
                .agents
                .compliance(&rewrite.email_body, &brief.rules, &mut ctx)
                .await?;
            if !compliance.approved {
                warn!(run_id = %ctx.run_id, "Rewrite still not compliant; keeping it");
            }
            content.email_rewrite = Some(rewrite);
        }
        debug_assert!(ctx.calls(AgentKind::Email) <= 2);

        // Step 7: variants of the body in use
        let body = content.email_in_use().email_body.clone();
        let variants = self
            .agents
            .variants(&body, options.variant_count, &mut ctx)
            .await?;

        // Step 8: score each variant on its own
        let mut scored = Vec::with_capacity(variants.len());
        for variant in variants {
            let score = self.agents.score(&variant, &mut ctx).await?;
            scored.push(ScoredVariant { variant, score });
        }

        // Step 9: rank and select
        let variants_scored = rank_variants(scored);
        let final_choice = select_final(&variants_scored, &body);
        if variants_scored.is_empty() {
            warn!(run_id = %ctx.run_id, "No variants generated; final choice is the email body");
        }

        // Step 10: assemble, review, persist
        let started_at = ctx.started_at;
        let mut result = CampaignResult {
            id: ctx.run_id,
            created_at: Utc::now(),
            brief: brief.clone(),
            persona,
            content,
            compliance,
            variants_scored,
            final_choice,
            human_approved: false,
            usage: ctx.into_usage(),
        };

        let decision = if options.require_human_approval {
            info!(run_id = %result.id, "Awaiting human approval");
            self.approval.review(&result).await?
        } else {
            ApprovalDecision::Approved
        };
        result.human_approved = decision.is_approved();

        let logged = if result.human_approved {
            self.store_document(&result).await;
            self.log.append(&result).await?;
            true
        } else {
            info!(run_id = %result.id, ?decision, "Campaign rejected; not persisted");
            false
        };

        info!(
            run_id = %result.id,
            calls = result.usage.total_calls(),
            tokens = result.usage.total_tokens(),
            cost = %result.usage.estimated_cost,
            approved = result.human_approved,
            elapsed_ms = (Utc::now() - started_at).num_milliseconds(),
            "Campaign run complete"
        );

        Ok(CampaignOutcome {
            result,
            decision,
            logged,
        })
    }

    async fn store_document(&self, result: &CampaignResult) {
        let Some(store) = &self.documents else {
            return;
        };

        let mut metadata = BTreeMap::new();
        metadata.insert("brand".to_string(), result.brief.brand_name.clone());
        metadata.insert("goal".to_string(), result.brief.goal.clone());
        metadata.insert("campaign_id".to_string(), result.id.to_string());

        match store.store(&result.final_choice.variant, metadata).await {
            Ok(id) => info!(run_id = %result.id, document_id = %id, "Stored final choice"),
            Err(e) => warn!(run_id = %result.id, error = %e, "Document store write failed"),
        }
    }
}
