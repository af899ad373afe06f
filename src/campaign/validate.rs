//! Post-parse validation: turn advisory JSON into typed records.
//!
//! Policy: lists longer than requested are truncated, over-long messages are
//! cut at a character boundary, scores are clamped to 1-10, and anything
//! missing falls back to an empty value. Nothing is padded or invented.
//! Every correction is logged at `warn`.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::warn;

use super::parse::{extract_json_array, raw_text};
use super::types::{
    AudienceProfile, ComplianceResult, EmailDraft, MessageDraft, Persona, QualityScore,
};

pub const SUBJECT_LINE_COUNT: usize = 3;
pub const CTA_COUNT: usize = 3;
pub const SMS_MAX_CHARS: usize = 160;
pub const SOCIAL_MAX_CHARS: usize = 280;
pub const EMAIL_BODY_WORDS: (usize, usize) = (150, 180);
pub const SCORE_RANGE: (u8, u8) = (1, 10);

static HASHTAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#\w+").unwrap());
static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").unwrap());

// ── Field accessors ─────────────────────────────────────────────────

fn string_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn str_field(value: &Value, key: &str) -> String {
    value.get(key).and_then(string_of).unwrap_or_default()
}

/// A list of strings; a single string is treated as a one-item list.
fn str_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(list_item_text)
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

/// Text of a list element: a string, or an object carrying the text.
fn list_item_text(item: &Value) -> Option<String> {
    match item {
        Value::Object(map) => ["text", "content", "variant", "message", "post"]
            .iter()
            .find_map(|key| map.get(*key).and_then(string_of)),
        other => string_of(other),
    }
}

fn truncate_list(mut items: Vec<String>, max: usize, what: &str) -> Vec<String> {
    if items.len() > max {
        warn!(what, got = items.len(), max, "Truncating list to requested size");
        items.truncate(max);
    }
    items
}

fn truncate_chars(text: String, max: usize, what: &str) -> String {
    if text.chars().count() <= max {
        return text;
    }
    warn!(what, max, "Truncating over-long message");
    text.chars().take(max).collect()
}

fn owned_raw(value: &Value) -> Option<String> {
    raw_text(value).map(str::to_string)
}

// ── Records ─────────────────────────────────────────────────────────

/// Persona from `{"persona": {...}, "voice": ..., "top_ctas": [...]}`.
pub fn persona_from_value(value: &Value) -> Persona {
    let profile = value.get("persona").unwrap_or(&Value::Null);
    let voice = match value.get("voice") {
        Some(Value::Array(_)) => str_list(value.get("voice")).join(", "),
        _ => str_field(value, "voice"),
    };

    Persona {
        profile: AudienceProfile {
            age_range: str_field(profile, "age_range"),
            interests: str_list(profile.get("interests")),
            pain_points: str_list(profile.get("pain_points")),
        },
        voice,
        top_ctas: truncate_list(str_list(value.get("top_ctas")), CTA_COUNT, "top_ctas"),
        raw: owned_raw(value),
    }
}

/// Email draft from `{"subject_lines": [...], "preheader": ..., "email_body": ...}`.
pub fn email_from_value(value: &Value) -> EmailDraft {
    let subject_lines = str_list(value.get("subject_lines"));
    if subject_lines.len() < SUBJECT_LINE_COUNT {
        warn!(
            got = subject_lines.len(),
            wanted = SUBJECT_LINE_COUNT,
            "Email draft has fewer subject lines than requested"
        );
    }

    let email_body = str_field(value, "email_body");
    let words = word_count(&email_body);
    if words < EMAIL_BODY_WORDS.0 || words > EMAIL_BODY_WORDS.1 {
        warn!(
            words,
            min = EMAIL_BODY_WORDS.0,
            max = EMAIL_BODY_WORDS.1,
            "Email body length outside target range"
        );
    }

    EmailDraft {
        subject_lines: truncate_list(subject_lines, SUBJECT_LINE_COUNT, "subject_lines"),
        preheader: str_field(value, "preheader"),
        email_body,
        raw: owned_raw(value),
    }
}

/// Short messages capped at `max_chars` each.
///
/// Accepts a bare array, an object wrapping the array under `key`, or a raw
/// fallback record whose text contains an array.
pub fn messages_from_value(value: &Value, key: &str, max_chars: usize) -> MessageDraft {
    let raw = owned_raw(value);
    let items = match list_source(value, key) {
        Some(list) => str_list(Some(&list)),
        None => {
            warn!(key, "Expected a list of messages, got none");
            Vec::new()
        }
    };

    MessageDraft {
        messages: items
            .into_iter()
            .map(|m| truncate_chars(m, max_chars, key))
            .collect(),
        raw,
    }
}

/// SMS messages (160 characters each).
pub fn sms_from_value(value: &Value) -> MessageDraft {
    messages_from_value(value, "messages", SMS_MAX_CHARS)
}

/// Social posts (280 characters each). Posts without a hashtag are logged.
pub fn social_from_value(value: &Value, platform: &str) -> MessageDraft {
    let draft = messages_from_value(value, "posts", SOCIAL_MAX_CHARS);
    let untagged = draft
        .messages
        .iter()
        .filter(|p| !HASHTAG.is_match(p))
        .count();
    if untagged > 0 {
        warn!(platform, untagged, "Social posts missing hashtags");
    }
    draft
}

/// Variants, at most `n`.
pub fn variants_from_value(value: &Value, n: usize) -> Vec<String> {
    match list_source(value, "variants") {
        Some(list) => truncate_list(str_list(Some(&list)), n, "variants"),
        None => {
            warn!("Variant generation returned no list");
            Vec::new()
        }
    }
}

/// Compliance verdict; a missing or unreadable `approved` counts as not approved.
pub fn compliance_from_value(value: &Value) -> ComplianceResult {
    let approved = match value.get("approved") {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    };

    ComplianceResult {
        approved,
        issues: str_list(value.get("issues")),
        fix_suggestions: str_list(value.get("fix_suggestions")),
        raw: owned_raw(value),
    }
}

/// Quality score; numbers are clamped to 1-10, absent keys stay absent.
pub fn score_from_value(value: &Value) -> QualityScore {
    let pass = match value.get("pass") {
        Some(Value::Bool(b)) => Some(*b),
        Some(Value::String(s)) => s.trim().parse::<bool>().ok(),
        _ => None,
    };

    QualityScore {
        readability: score_field(value, "readability"),
        spamminess: score_field(value, "spamminess"),
        cta_strength: score_field(value, "cta_strength"),
        pass,
        raw: owned_raw(value),
    }
}

fn score_field(value: &Value, key: &str) -> Option<u8> {
    let n = match value.get(key)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !n.is_finite() {
        warn!(key, value = n, "Score is not a finite number, dropped");
        return None;
    }
    let rounded = n.round();
    let clamped = rounded.clamp(f64::from(SCORE_RANGE.0), f64::from(SCORE_RANGE.1));
    if clamped != rounded {
        warn!(key, value = n, clamped, "Score outside 1-10, clamped");
    }
    Some(clamped as u8)
}

fn list_source(value: &Value, key: &str) -> Option<Value> {
    match value {
        Value::Array(_) => Some(value.clone()),
        Value::Object(map) => {
            if let Some(list @ Value::Array(_)) = map.get(key) {
                return Some(list.clone());
            }
            raw_text(value).and_then(extract_json_array)
        }
        _ => None,
    }
}

fn word_count(text: &str) -> usize {
    WORD.find_iter(text).count()
}
