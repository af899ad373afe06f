//! Prompt templates for the content agents.
//!
//! The persona and email prompts carry the phrases "persona builder" and
//! "email copywriter"; the offline stand-in keys its canned replies on them,
//! and on "concise variants" for variant generation.

use crate::campaign::{AudienceProfile, CampaignBrief};

/// Inputs shared by the email prompt and its compliance rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailRequest {
    pub brand_name: String,
    pub voice: String,
    pub persona: AudienceProfile,
    pub goal: String,
    pub required_phrases: String,
}

impl EmailRequest {
    /// Copy of this request with compliance issues appended to the phrases.
    pub fn with_fix_issues(&self, issues: &[String]) -> Self {
        Self {
            required_phrases: format!(
                "{} FIX_ISSUES: {}",
                self.required_phrases,
                issues.join(", ")
            ),
            ..self.clone()
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
}

pub fn persona(brief: &CampaignBrief) -> String {
    format!(
        "You are a persona builder for marketing campaigns.\n\
         Campaign brief: {brief}\n\n\
         Respond with ONLY a JSON object with keys persona, voice, top_ctas.\n\
         - persona: object with age_range (string), interests (array), pain_points (array)\n\
         - voice: three short adjectives describing the brand voice\n\
         - top_ctas: array of exactly 3 short calls to action",
        brief = to_json(brief)
    )
}

pub fn email(request: &EmailRequest) -> String {
    format!(
        "You are an expert email copywriter for the brand {brand}.\n\
         Voice: {voice}\n\
         Audience: {persona}\n\
         Goal: {goal}\n\
         Required phrases: {phrases}\n\n\
         Respond with ONLY a JSON object:\n\
         {{\"subject_lines\": [\"\", \"\", \"\"], \"preheader\": \"\", \"email_body\": \"\"}}\n\
         Write exactly 3 subject lines. The email body should be 150-180 words.",
        brand = request.brand_name,
        voice = request.voice,
        persona = to_json(&request.persona),
        goal = request.goal,
        phrases = request.required_phrases,
    )
}

pub fn sms(persona: &AudienceProfile, goal: &str, required_phrases: &str) -> String {
    format!(
        "Write 3 SMS messages, each at most 160 characters, for this audience: {persona}\n\
         Goal: {goal}\n\
         Required phrases: {required_phrases}\n\n\
         Respond with ONLY a JSON array of strings.",
        persona = to_json(persona),
    )
}

pub fn social(platform: &str, persona: &AudienceProfile, voice: &str, goal: &str) -> String {
    format!(
        "Write 6 social posts for {platform} in a {voice} voice.\n\
         Audience: {persona}\n\
         Goal: {goal}\n\
         Each post must be at most 280 characters and include one call to action \
         and 1-2 hashtags.\n\n\
         Respond with ONLY a JSON array of strings.",
        persona = to_json(persona),
    )
}

pub fn compliance(content: &str, rules: &[String]) -> String {
    let rule_list = rules
        .iter()
        .enumerate()
        .map(|(i, rule)| format!("{}. {}", i + 1, rule))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Check the following content against these compliance rules:\n{rule_list}\n\n\
         Content:\n{content}\n\n\
         Respond with ONLY a JSON object:\n\
         {{\"approved\": true, \"issues\": [\"...\"], \"fix_suggestions\": [\"...\"]}}"
    )
}

pub fn variants(content: &str, n: usize) -> String {
    format!(
        "Create {n} concise variants of the following content. \
         Respond with ONLY a JSON array of strings.\n\n{content}"
    )
}

pub fn score(content: &str) -> String {
    format!(
        "Score the content from 1-10 for readability, spamminess and cta_strength.\n\
         Respond with ONLY a JSON object:\n\
         {{\"readability\": 0, \"spamminess\": 0, \"cta_strength\": 0, \"pass\": true}}\n\n\
         Content:\n{content}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::Channel;

    fn request() -> EmailRequest {
        EmailRequest {
            brand_name: "Acme".into(),
            voice: "bold".into(),
            persona: AudienceProfile {
                age_range: "25-35".into(),
                interests: vec!["hiking".into()],
                pain_points: vec![],
            },
            goal: "Launch X".into(),
            required_phrases: "10% off".into(),
        }
    }

    #[test]
    fn persona_prompt_embeds_brief_as_json() {
        let brief = CampaignBrief::new("Acme", "Launch X").with_channels([Channel::Email]);
        let prompt = persona(&brief);
        assert!(prompt.contains("persona builder"));
        assert!(prompt.contains("\"brand_name\":\"Acme\""));
        assert!(prompt.contains("\"channels\":[\"email\"]"));
    }

    #[test]
    fn email_prompt_contains_inputs() {
        let prompt = email(&request());
        assert!(prompt.to_lowercase().contains("email copywriter"));
        assert!(prompt.contains("Acme"));
        assert!(prompt.contains("10% off"));
        assert!(prompt.contains("hiking"));
        assert!(prompt.contains("150-180 words"));
    }

    #[test]
    fn fix_issues_appends_joined_issues() {
        let rewritten = request().with_fix_issues(&[
            "missing unsubscribe link".into(),
            "claims unverified".into(),
        ]);
        assert_eq!(
            rewritten.required_phrases,
            "10% off FIX_ISSUES: missing unsubscribe link, claims unverified"
        );
        assert_eq!(rewritten.brand_name, "Acme");
    }

    #[test]
    fn compliance_prompt_numbers_rules() {
        let prompt = compliance(
            "Buy now",
            &["include unsubscribe link".into(), "no medical claims".into()],
        );
        assert!(prompt.contains("1. include unsubscribe link"));
        assert!(prompt.contains("2. no medical claims"));
        assert!(prompt.contains("Buy now"));
    }

    #[test]
    fn variant_prompt_uses_stand_in_marker() {
        let prompt = variants("body text", 5);
        assert!(prompt.contains("Create 5 concise variants"));
        assert!(prompt.ends_with("body text"));
    }

    #[test]
    fn only_intended_prompts_hit_stand_in_markers() {
        let persona = AudienceProfile::default();
        for prompt in [
            sms(&persona, "goal", ""),
            social("twitter", &persona, "bold", "goal"),
            compliance("c", &[]),
            score("c"),
        ] {
            let lower = prompt.to_lowercase();
            assert!(!prompt.contains("persona builder"));
            assert!(!lower.contains("email copywriter"));
            assert!(!lower.contains("concise variants"));
        }
    }
}
