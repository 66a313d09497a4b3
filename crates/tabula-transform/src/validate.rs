//! Final validation into persisted-record shape.

use tabula_model::{CleanedRecord, UNKNOWN_CATEGORY};

use crate::normalization::MAX_RATING;
use crate::types::PartialRecord;

/// Keeps only records that satisfy every persisted-record invariant.
///
/// A record passes with a non-empty name and category, both prices present
/// and positive, `discounted <= actual`, and a rating in `[0, 5]`. A missing
/// category becomes `"Unknown"`; a missing rating count becomes 0.
///
/// Returns the valid records and one message per rejected record.
pub fn final_validation(records: Vec<PartialRecord>) -> (Vec<CleanedRecord>, Vec<String>) {
    let mut valid = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();

    for record in records {
        match finalize(record) {
            Ok(cleaned) => valid.push(cleaned),
            Err(message) => rejected.push(message),
        }
    }

    if !rejected.is_empty() {
        tracing::warn!(rejected = rejected.len(), "Records failed final validation");
    }
    (valid, rejected)
}

fn finalize(record: PartialRecord) -> Result<CleanedRecord, String> {
    let row = record.index + 1;

    let (Some(discounted), Some(actual)) = (record.discounted_price, record.actual_price) else {
        return Err(format!("Row {row}: missing price"));
    };
    if discounted <= 0.0 || actual <= 0.0 {
        return Err(format!("Row {row}: prices must be positive"));
    }
    if discounted > actual {
        return Err(format!(
            "Row {row}: discounted price exceeds actual price"
        ));
    }
    let Some(rating) = record.rating.filter(|r| (0.0..=MAX_RATING).contains(r)) else {
        return Err(format!("Row {row}: missing or out-of-range rating"));
    };
    if record.product_name.trim().is_empty() {
        return Err(format!("Row {row}: missing product name"));
    }
    let category = record
        .category
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string());

    let rating_count = record.rating_count.unwrap_or(0.0).max(0.0).round() as u64;

    let mut cleaned = CleanedRecord::new(
        record.product_id,
        record.product_name,
        category,
        discounted,
        actual,
        rating,
        rating_count,
    );
    cleaned.about = record.about;
    cleaned.user_id = record.user_id;
    cleaned.user_name = record.user_name;
    cleaned.user_review = record.user_review;
    cleaned.review_title = record.review_title;
    cleaned.img_link = record.img_link;
    cleaned.product_link = record.product_link;
    cleaned.price_range = record.price_range;
    if let Some(mean_rating) = record.mean_rating {
        cleaned.mean_rating = mean_rating;
    }
    if let Some(product_count) = record.product_count {
        cleaned.product_count = product_count;
    }
    if let Some(average_rating_count) = record.average_rating_count {
        cleaned.average_rating_count = average_rating_count;
    }
    cleaned.extra = record.extra;
    Ok(cleaned)
}
