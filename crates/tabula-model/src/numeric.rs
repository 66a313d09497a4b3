//! Numeric parsing and formatting shared by the pipeline stages.

/// Parse a string value to `f64`.
///
/// Handles common spreadsheet formats:
/// - Standard numbers: "123", "-45.67"
/// - Thousands separators: "1,234,567"
/// - Whitespace, including non-breaking spaces: "  123  "
/// - Scientific notation: "1.23e5"
///
/// Returns `None` for empty input, unparseable input, and non-finite values.
pub fn parse_numeric(value: &str) -> Option<f64> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return None;
    }

    // Remove thousands separators and whitespace
    let cleaned = trimmed
        .replace(',', "")
        .replace(' ', "")
        .replace('\u{a0}', "");

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Formats a floating-point number without trailing zeros after the decimal.
///
/// Integer-valued floats like 40.0 are formatted as "40", not "4".
///
/// # Examples
///
/// ```
/// use tabula_model::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(1.50), "1.5");
/// assert_eq!(format_numeric(0.0), "0");
/// assert_eq!(format_numeric(40.0), "40");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    // Only trim trailing zeros if there's a decimal point
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    } else {
        s
    }
}
