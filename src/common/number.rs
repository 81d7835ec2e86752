//! Lenient numeric parsing and rendering for spreadsheet cell text.
//!
//! Spreadsheet exports carry numbers as display text ("150", "12.5", "210mm").
//! Dimension fields must never fail a row, so parsing takes the longest numeric
//! prefix and falls back to zero.

/// Parse the leading number of `text`, keeping infinities.
///
/// Leading whitespace is skipped and trailing garbage ignored, so `" 12mm"`
/// parses as `12.0`. Empty, unparsable, and NaN input yield `0.0`;
/// `"Infinity"` and `"-inf"` stay infinite so callers can reject them.
pub fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim_start();
    if trimmed.is_empty() {
        return 0.0;
    }
    match fast_float2::parse_partial::<f64, _>(trimmed) {
        Ok((value, _consumed)) if !value.is_nan() => value,
        _ => 0.0,
    }
}

/// Like [`parse_number`], but infinite values also yield `0.0`.
pub fn parse_lenient(text: &str) -> f64 {
    let value = parse_number(text);
    if value.is_finite() { value } else { 0.0 }
}

/// Render `value` the way it is written back into a cell.
///
/// Integral values print without a fractional part (`160.0` becomes `"160"`);
/// everything else uses the shortest round-trip representation.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        let mut buffer = itoa::Buffer::new();
        return buffer.format(value as i64).to_string();
    }
    if !value.is_finite() {
        return if value.is_nan() {
            "NaN".to_string()
        } else if value > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };
    }
    let mut buffer = ryu::Buffer::new();
    buffer.format_finite(value).to_string()
}
