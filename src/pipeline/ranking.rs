//! Variant ranking and final selection.

use std::cmp::Reverse;

use crate::campaign::{QualityScore, ScoredVariant};

/// Sort best-first by `readability - spamminess + cta_strength`.
///
/// The sort is stable, so equal metrics keep generation order.
pub fn rank_variants(mut scored: Vec<ScoredVariant>) -> Vec<ScoredVariant> {
    scored.sort_by_key(|s| Reverse(s.score.metric()));
    scored
}

/// Rank 0, or the fallback body with an empty score when nothing was ranked.
pub fn select_final(ranked: &[ScoredVariant], fallback_body: &str) -> ScoredVariant {
    ranked.first().cloned().unwrap_or_else(|| ScoredVariant {
        variant: fallback_body.to_string(),
        score: QualityScore::empty(),
    })
}
