//! Derived feature columns.

use tabula_model::PriceRange;

use crate::types::PartialRecord;

/// Assigns the price bucket and seeds the per-product aggregates.
///
/// `mean_rating`, `product_count` and `average_rating_count` are
/// placeholders equal to the record's own values; category aggregation
/// replaces them later. Records without a discounted price get no bucket.
pub fn calculate_features(mut records: Vec<PartialRecord>) -> Vec<PartialRecord> {
    for record in &mut records {
        record.price_range = record.discounted_price.map(PriceRange::from_price);
        record.mean_rating = record.rating;
        record.product_count = Some(1);
        record.average_rating_count = record.rating_count;
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buckets_and_placeholders() {
        let records = vec![
            PartialRecord {
                discounted_price: Some(499.0),
                rating: Some(4.2),
                rating_count: Some(12.0),
                ..PartialRecord::default()
            },
            PartialRecord {
                discounted_price: Some(7999.0),
                ..PartialRecord::default()
            },
            PartialRecord::default(),
        ];
        let records = calculate_features(records);

        assert_eq!(records[0].price_range, Some(PriceRange::Low));
        assert_eq!(records[0].mean_rating, Some(4.2));
        assert_eq!(records[0].average_rating_count, Some(12.0));
        assert_eq!(records[0].product_count, Some(1));
        assert_eq!(records[1].price_range, Some(PriceRange::Premium));
        assert_eq!(records[2].price_range, None);
    }
}
