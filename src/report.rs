//! Plain-text rendering of campaign results for the terminal.

use std::fmt;

use crate::campaign::{CampaignResult, QualityScore};

fn score_cell(value: Option<u8>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// One-line summary of a score, e.g. `readability 8 · spamminess 2 · cta 7 · pass`.
pub fn score_summary(score: &QualityScore) -> String {
    if score.is_empty() {
        return "unscored".to_string();
    }
    let mut line = format!(
        "readability {} · spamminess {} · cta {} · metric {}",
        score_cell(score.readability),
        score_cell(score.spamminess),
        score_cell(score.cta_strength),
        score.metric(),
    );
    match score.pass {
        Some(true) => line.push_str(" · pass"),
        Some(false) => line.push_str(" · fail"),
        None => {}
    }
    line
}

/// Full report: final choice, compliance, every variant, then usage.
pub struct CampaignReport<'a>(pub &'a CampaignResult);

impl fmt::Display for CampaignReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;

        writeln!(
            f,
            "Campaign {} · {} · {}",
            result.id,
            result.brief.brand_name,
            result.created_at.format("%Y-%m-%d %H:%M UTC")
        )?;
        writeln!(f, "Goal: {}", result.brief.goal)?;
        if !result.human_approved {
            writeln!(f, "Status: NOT approved (not persisted)")?;
        }

        writeln!(f, "\n== Final Selected Content ==")?;
        writeln!(f, "{}", result.final_choice.variant)?;
        writeln!(f, "({})", score_summary(&result.final_choice.score))?;

        let email = result.content.email_in_use();
        if !email.subject_lines.is_empty() {
            writeln!(f, "\nSubject lines:")?;
            for subject in &email.subject_lines {
                writeln!(f, "  - {}", subject)?;
            }
        }
        if result.content.email_rewrite.is_some() {
            writeln!(f, "(email was rewritten after a failed compliance check)")?;
        }

        writeln!(f, "\n== Compliance Check ==")?;
        writeln!(
            f,
            "Approved: {}",
            if result.compliance.approved { "yes" } else { "no" }
        )?;
        for issue in &result.compliance.issues {
            writeln!(f, "  issue: {}", issue)?;
        }
        for fix in &result.compliance.fix_suggestions {
            writeln!(f, "  fix: {}", fix)?;
        }

        writeln!(f, "\n== All Variants & Scores ==")?;
        if result.variants_scored.is_empty() {
            writeln!(f, "(no variants generated)")?;
        }
        for (rank, scored) in result.variants_scored.iter().enumerate() {
            writeln!(f, "{}. {}", rank + 1, scored.variant)?;
            writeln!(f, "   {}", score_summary(&scored.score))?;
        }

        if !result.content.sms.messages.is_empty() {
            writeln!(f, "\n== SMS ==")?;
            for message in &result.content.sms.messages {
                writeln!(f, "  - {}", message)?;
            }
        }
        for (channel, draft) in &result.content.social {
            if draft.messages.is_empty() {
                continue;
            }
            writeln!(f, "\n== Social: {} ==", channel)?;
            for post in &draft.messages {
                writeln!(f, "  - {}", post)?;
            }
        }

        let usage = &result.usage;
        writeln!(
            f,
            "\nModel {} · {} calls · {} tokens · ${}",
            usage.model,
            usage.total_calls(),
            usage.total_tokens(),
            usage.estimated_cost.round_dp(6)
        )
    }
}

/// Render the full report as a string.
pub fn render_campaign(result: &CampaignResult) -> String {
    CampaignReport(result).to_string()
}

/// One line per logged campaign, for `history`.
pub fn render_history_line(result: &CampaignResult) -> String {
    let mut preview: String = result.final_choice.variant.chars().take(60).collect();
    if result.final_choice.variant.chars().count() > 60 {
        preview.push('…');
    }
    format!(
        "{}  {}  {:<16}  {}",
        result.created_at.format("%Y-%m-%d %H:%M"),
        result.id,
        result.brief.brand_name,
        preview.replace('\n', " ")
    )
}
