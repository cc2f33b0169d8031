//! Numeric normalizer for locale-formatted amount cells.
//!
//! Missing and malformed amounts both become 0: amounts only ever feed sums,
//! and there is no "unknown amount" in the ledger.

/// Currency code token removed from amount text (Norwegian krone).
const CURRENCY_CODE: &str = "kr";

/// Lowercase and strip thousands separators, `$`, the `kr` token and all whitespace.
/// Sign characters are kept.
pub fn clean_amount_text(raw: &str) -> String {
    raw.to_lowercase()
        .replace(CURRENCY_CODE, "")
        .chars()
        .filter(|c| !matches!(c, ',' | '$') && !c.is_whitespace())
        .collect()
}

/// Parse a cleaned amount; `None` for empty, non-numeric or non-finite text.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned = clean_amount_text(raw);
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Explicit null/malformed-to-zero conversion used everywhere an amount is read.
pub fn amount_or_zero(raw: Option<&str>) -> f64 {
    raw.and_then(parse_amount).unwrap_or(0.0)
}
