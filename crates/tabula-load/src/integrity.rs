//! Post-hoc consistency sweep over stored products.

use std::collections::BTreeMap;

use tabula_model::{CleanedRecord, IntegrityReport};

/// Counts invariant violations; nothing is corrected.
pub fn check_integrity(products: &[CleanedRecord]) -> IntegrityReport {
    let invalid_prices = products.iter().filter(|p| !p.has_valid_prices()).count() as u64;
    let invalid_ratings = products.iter().filter(|p| !p.has_valid_rating()).count() as u64;

    let mut id_counts: BTreeMap<&str, u64> = BTreeMap::new();
    for product in products {
        *id_counts.entry(product.product_id.as_str()).or_insert(0) += 1;
    }
    let duplicate_ids: u64 = id_counts.values().map(|count| count - 1).sum();

    let mut issues = Vec::new();
    if invalid_prices > 0 {
        issues.push(format!("{invalid_prices} products with invalid prices"));
    }
    if invalid_ratings > 0 {
        issues.push(format!("{invalid_ratings} products with ratings outside 0-5"));
    }
    if duplicate_ids > 0 {
        issues.push(format!("{duplicate_ids} duplicate product ids"));
    }

    IntegrityReport {
        total_products: products.len() as u64,
        invalid_prices,
        invalid_ratings,
        duplicate_ids,
        is_valid: issues.is_empty(),
        issues,
    }
}
