//! Per-token pricing for known models (USD).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// (input, output) cost per token for a model name. Unknown models cost zero.
pub fn model_cost(model: &str) -> (Decimal, Decimal) {
    // Longest prefixes first so "gpt-4o-mini" is not priced as "gpt-4o".
    const TABLE: &[(&str, Decimal, Decimal)] = &[
        ("gpt-4o-mini", dec!(0.00000015), dec!(0.0000006)),
        ("gpt-4o", dec!(0.0000025), dec!(0.00001)),
        ("gpt-4.1-mini", dec!(0.0000004), dec!(0.0000016)),
        ("claude-3-5-haiku", dec!(0.0000008), dec!(0.000004)),
        ("claude-3-5-sonnet", dec!(0.000003), dec!(0.000015)),
        ("claude-sonnet-4", dec!(0.000003), dec!(0.000015)),
    ];

    TABLE
        .iter()
        .find(|(prefix, _, _)| model.starts_with(prefix))
        .map(|(_, input, output)| (*input, *output))
        .unwrap_or((Decimal::ZERO, Decimal::ZERO))
}

/// Cost of a single call given token counts.
pub fn call_cost(pricing: (Decimal, Decimal), input_tokens: u32, output_tokens: u32) -> Decimal {
    pricing.0 * Decimal::from(input_tokens) + pricing.1 * Decimal::from(output_tokens)
}
