//! Run context: per-campaign accounting of agent calls, tokens and cost.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which agent made a generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Persona,
    Email,
    Sms,
    Social,
    Compliance,
    Variants,
    Scorer,
}

impl AgentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Persona => "persona",
            Self::Email => "email",
            Self::Sms => "sms",
            Self::Social => "social",
            Self::Compliance => "compliance",
            Self::Variants => "variants",
            Self::Scorer => "scorer",
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Usage totals for one campaign run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunUsage {
    pub model: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub estimated_cost: Decimal,
    pub calls: BTreeMap<AgentKind, u32>,
}

impl RunUsage {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }

    pub fn total_calls(&self) -> u32 {
        self.calls.values().sum()
    }
}

/// Mutable state threaded through one campaign run.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Unique run ID; becomes the campaign result ID.
    pub run_id: Uuid,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    usage: RunUsage,
}

impl RunContext {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            usage: RunUsage {
                model: model.into(),
                ..Default::default()
            },
        }
    }

    /// Record one generation call.
    pub fn record(&mut self, agent: AgentKind, input_tokens: u32, output_tokens: u32, cost: Decimal) {
        self.usage.input_tokens += u64::from(input_tokens);
        self.usage.output_tokens += u64::from(output_tokens);
        self.usage.estimated_cost += cost;
        *self.usage.calls.entry(agent).or_insert(0) += 1;
    }

    /// Calls made so far by one agent.
    pub fn calls(&self, agent: AgentKind) -> u32 {
        self.usage.calls.get(&agent).copied().unwrap_or(0)
    }

    pub fn into_usage(self) -> RunUsage {
        self.usage
    }
}
