//! Records passed between pipeline stages.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::context::RunUsage;

// ── Brief ───────────────────────────────────────────────────────────

/// Distribution channel a campaign can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Sms,
    Twitter,
    Linkedin,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Sms => "sms",
            Self::Twitter => "twitter",
            Self::Linkedin => "linkedin",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Channel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "email" => Ok(Self::Email),
            "sms" => Ok(Self::Sms),
            "twitter" => Ok(Self::Twitter),
            "linkedin" => Ok(Self::Linkedin),
            other => Err(format!("Unknown channel: {}", other)),
        }
    }
}

/// User-supplied campaign request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignBrief {
    pub brand_name: String,
    pub goal: String,
    pub channels: Vec<Channel>,
    pub required_phrases: String,
    pub rules: Vec<String>,
}

impl CampaignBrief {
    pub fn new(brand_name: impl Into<String>, goal: impl Into<String>) -> Self {
        Self {
            brand_name: brand_name.into(),
            goal: goal.into(),
            channels: Vec::new(),
            required_phrases: String::new(),
            rules: Vec::new(),
        }
    }

    /// Set channels, dropping repeats but keeping first-seen order.
    pub fn with_channels(mut self, channels: impl IntoIterator<Item = Channel>) -> Self {
        self.channels.clear();
        for channel in channels {
            if !self.channels.contains(&channel) {
                self.channels.push(channel);
            }
        }
        self
    }

    pub fn with_required_phrases(mut self, phrases: impl Into<String>) -> Self {
        self.required_phrases = phrases.into();
        self
    }

    pub fn with_rules(mut self, rules: Vec<String>) -> Self {
        self.rules = rules;
        self
    }
}

/// Split newline-separated rule text into trimmed, non-empty rules.
pub fn parse_rules(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

// ── Persona ─────────────────────────────────────────────────────────

/// Audience profile part of the persona.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudienceProfile {
    pub age_range: String,
    pub interests: Vec<String>,
    pub pain_points: Vec<String>,
}

/// Target persona and brand voice, derived once per run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub profile: AudienceProfile,
    pub voice: String,
    pub top_ctas: Vec<String>,
    /// Unparsed model output when the reply was not JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

// ── Content drafts ──────────────────────────────────────────────────

/// Email copy: subject lines, preheader and body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDraft {
    pub subject_lines: Vec<String>,
    pub preheader: String,
    pub email_body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

/// A list of short posts or messages for one channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDraft {
    pub messages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

/// Everything the content agents produced in one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBundle {
    pub email: EmailDraft,
    /// Present only when the compliance check forced a rewrite.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_rewrite: Option<EmailDraft>,
    pub sms: MessageDraft,
    pub social: BTreeMap<Channel, MessageDraft>,
}

impl ContentBundle {
    /// The email that downstream stages work from.
    pub fn email_in_use(&self) -> &EmailDraft {
        self.email_rewrite.as_ref().unwrap_or(&self.email)
    }
}

// ── Compliance ──────────────────────────────────────────────────────

/// Outcome of checking copy against the brief's rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceResult {
    pub approved: bool,
    pub issues: Vec<String>,
    pub fix_suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

// ── Scoring ─────────────────────────────────────────────────────────

/// Quality score for one variant. Every field is optional because the
/// scorer's reply is advisory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityScore {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readability: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spamminess: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_strength: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pass: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl QualityScore {
    /// The empty score used when there is nothing to score.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Ranking metric: `readability - spamminess + cta_strength`, missing as 0.
    pub fn metric(&self) -> i32 {
        let get = |v: Option<u8>| i32::from(v.unwrap_or(0));
        get(self.readability) - get(self.spamminess) + get(self.cta_strength)
    }
}

/// A variant together with its score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredVariant {
    pub variant: String,
    pub score: QualityScore,
}

// ── Result ──────────────────────────────────────────────────────────

/// Everything one campaign run produced. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignResult {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub brief: CampaignBrief,
    pub persona: Persona,
    pub content: ContentBundle,
    pub compliance: ComplianceResult,
    /// Ranked best-first.
    pub variants_scored: Vec<ScoredVariant>,
    pub final_choice: ScoredVariant,
    pub human_approved: bool,
    pub usage: RunUsage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_round_trips_through_str() {
        for channel in [Channel::Email, Channel::Sms, Channel::Twitter, Channel::Linkedin] {
            assert_eq!(channel.as_str().parse::<Channel>().unwrap(), channel);
        }
        assert_eq!("LinkedIn".parse::<Channel>().unwrap(), Channel::Linkedin);
        assert!("fax".parse::<Channel>().is_err());
    }

    #[test]
    fn brief_dedupes_channels_in_order() {
        let brief = CampaignBrief::new("Acme", "Launch X").with_channels([
            Channel::Twitter,
            Channel::Email,
            Channel::Twitter,
        ]);
        assert_eq!(brief.channels, vec![Channel::Twitter, Channel::Email]);
    }

    #[test]
    fn parse_rules_drops_blank_lines() {
        let rules = parse_rules("include unsubscribe link\n\n  no medical claims  \n");
        assert_eq!(rules, vec!["include unsubscribe link", "no medical claims"]);
    }

    #[test]
    fn metric_treats_missing_as_zero() {
        assert_eq!(QualityScore::empty().metric(), 0);
        let score = QualityScore {
            readability: Some(8),
            spamminess: Some(3),
            cta_strength: Some(6),
            ..Default::default()
        };
        assert_eq!(score.metric(), 11);
        let partial = QualityScore {
            spamminess: Some(9),
            ..Default::default()
        };
        assert_eq!(partial.metric(), -9);
    }

    #[test]
    fn empty_score_serializes_as_empty_object() {
        let json = serde_json::to_value(QualityScore::empty()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn social_map_keys_are_channel_names() {
        let mut bundle = ContentBundle::default();
        bundle.social.insert(Channel::Linkedin, MessageDraft::default());
        let json = serde_json::to_value(&bundle).unwrap();
        assert!(json["social"].get("linkedin").is_some());
    }

    #[test]
    fn email_in_use_prefers_rewrite() {
        let mut bundle = ContentBundle::default();
        bundle.email.email_body = "first".into();
        assert_eq!(bundle.email_in_use().email_body, "first");
        bundle.email_rewrite = Some(EmailDraft {
            email_body: "second".into(),
            ..Default::default()
        });
        assert_eq!(bundle.email_in_use().email_body, "second");
    }
}
