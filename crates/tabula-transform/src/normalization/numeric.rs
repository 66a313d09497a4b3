//! Numeric coercion for price, rating, and count cells.
//!
//! Source spreadsheets carry currency symbols, thousands separators and
//! stray text in numeric columns. Each helper returns `None` only for a
//! missing cell; a present cell that cannot be read becomes 0.

use tabula_model::{RawValue, parse_numeric};

/// Upper bound of the rating scale.
pub const MAX_RATING: f64 = 5.0;

/// Coerces an amount (price, count, percentage) to a non-negative number.
///
/// Every character other than ASCII digits and `.` is dropped before
/// parsing, so "₹1,099" reads as 1099 and "-5" as 5.
pub fn parse_amount(value: &RawValue) -> Option<f64> {
    match value {
        RawValue::Null => None,
        RawValue::Number(v) => Some(v.abs()),
        RawValue::Text(s) if s.trim().is_empty() => None,
        RawValue::Text(s) => {
            let digits: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            Some(
                digits
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .unwrap_or(0.0),
            )
        }
    }
}

/// Coerces a rating and clamps it to `[0, 5]`.
pub fn parse_rating(value: &RawValue) -> Option<f64> {
    let rating = match value {
        RawValue::Null => return None,
        RawValue::Number(v) => *v,
        RawValue::Text(s) if s.trim().is_empty() => return None,
        RawValue::Text(s) => parse_numeric(s).unwrap_or(0.0),
    };
    Some(rating.clamp(0.0, MAX_RATING))
}
