//! Per-record cleaning and price repair.

use tabula_model::{CanonicalField, RawValue};

use crate::normalization::{clean_text, clean_verbatim, parse_amount, parse_rating};
use crate::types::{CleanOutcome, MappedRecord, PartialRecord, TransformOptions};

/// Cleans each mapped record independently.
///
/// Rows without a product name, and (with `validate_prices`) rows carrying a
/// non-positive price, are dropped with a message in `errors`. Inverted
/// price pairs are swapped instead of rejected.
pub fn clean_records(mapped: &[MappedRecord], options: &TransformOptions) -> CleanOutcome {
    let mut outcome = CleanOutcome::default();

    for record in mapped {
        match clean_record(record, options) {
            Ok((cleaned, swapped)) => {
                if swapped {
                    outcome.swapped += 1;
                }
                outcome.records.push(cleaned);
            }
            Err(message) => outcome.errors.push(message),
        }
    }

    if !outcome.errors.is_empty() {
        tracing::warn!(rejected = outcome.errors.len(), "Rejected rows while cleaning");
    }
    tracing::debug!(
        cleaned = outcome.records.len(),
        swapped = outcome.swapped,
        "Cleaned records"
    );
    outcome
}

fn text_field(record: &MappedRecord, field: CanonicalField, max_len: usize) -> Option<String> {
    let value = record.get(field);
    if value.is_missing() {
        return None;
    }
    let raw = value.to_display_string();
    if field.is_url() {
        clean_verbatim(&raw)
    } else {
        clean_text(&raw, max_len)
    }
}

fn verbatim_field(record: &MappedRecord, field: CanonicalField) -> Option<String> {
    match record.get(field) {
        RawValue::Null => None,
        value => clean_verbatim(&value.to_display_string()),
    }
}

/// Cleans one record; returns whether its prices were swapped.
fn clean_record(
    record: &MappedRecord,
    options: &TransformOptions,
) -> Result<(PartialRecord, bool), String> {
    let row = record.index + 1;
    let max_len = options.max_text_len;

    let Some(product_name) = text_field(record, CanonicalField::ProductName, max_len) else {
        return Err(format!("Row {row}: missing product name"));
    };

    let mut discounted_price = parse_amount(record.get(CanonicalField::DiscountedPrice));
    let mut actual_price = parse_amount(record.get(CanonicalField::ActualPrice));
    let mut swapped = false;

    if options.validate_prices {
        let non_positive = |price: Option<f64>| price.is_some_and(|p| p <= 0.0);
        if non_positive(discounted_price) || non_positive(actual_price) {
            return Err(format!(
                "Row {row}: invalid price (discounted {}, actual {})",
                describe_price(discounted_price),
                describe_price(actual_price)
            ));
        }
        if let (Some(discounted), Some(actual)) = (discounted_price, actual_price)
            && discounted > actual
        {
            discounted_price = Some(actual);
            actual_price = Some(discounted);
            swapped = true;
        }
    }

    let mut cleaned = PartialRecord {
        index: record.index,
        product_id: verbatim_field(record, CanonicalField::ProductId)
            .unwrap_or_else(|| format!("product_{row}")),
        product_name,
        category: text_field(record, CanonicalField::Category, max_len),
        discounted_price,
        actual_price,
        discount_percentage: parse_amount(record.get(CanonicalField::DiscountPercentage)),
        rating: parse_rating(record.get(CanonicalField::Rating)),
        rating_count: parse_amount(record.get(CanonicalField::RatingCount)),
        about: text_field(record, CanonicalField::About, max_len),
        user_id: verbatim_field(record, CanonicalField::UserId),
        user_name: text_field(record, CanonicalField::UserName, max_len),
        user_review: text_field(record, CanonicalField::UserReview, max_len),
        review_title: text_field(record, CanonicalField::ReviewTitle, max_len),
        img_link: text_field(record, CanonicalField::ImgLink, max_len),
        product_link: text_field(record, CanonicalField::ProductLink, max_len),
        extra: record.extra.clone(),
        ..PartialRecord::default()
    };
    cleaned.refresh_discount();

    Ok((cleaned, swapped))
}

fn describe_price(price: Option<f64>) -> String {
    price.map_or_else(|| "missing".to_string(), tabula_model::format_numeric)
}
