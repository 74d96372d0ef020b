//! Currency amount normalization

/// Parse an amount string, stripping grouping commas
///
/// Handles both western (`123,456.28`) and Indian (`1,23,456.28`) grouping.
/// Returns None for anything that is not a non-negative finite decimal.
pub fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();

    // f64::from_str also accepts "inf", "NaN" and exponents
    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
}
