use std::collections::BTreeMap;

use tabula_model::CleanedRecord;

use crate::types::DedupResult;

/// Key identifying one product: its id, else `name|category`.
pub fn product_key(record: &CleanedRecord) -> String {
    let id = record.product_id.trim();
    if id.is_empty() {
        format!("{}|{}", record.product_name.trim(), record.category.trim())
    } else {
        id.to_string()
    }
}

/// True when `candidate` should replace `kept` for the same key.
fn is_better(candidate: &CleanedRecord, kept: &CleanedRecord) -> bool {
    candidate.rating > kept.rating
        || (candidate.rating == kept.rating && candidate.rating_count > kept.rating_count)
}

/// Collapses records sharing a product key.
///
/// The record with the higher rating wins, then the higher rating count,
/// then the first seen. Output keeps the order in which keys first appear.
pub fn remove_duplicates(data: Vec<CleanedRecord>) -> DedupResult {
    let input_len = data.len();
    let mut positions: BTreeMap<String, usize> = BTreeMap::new();
    let mut kept: Vec<CleanedRecord> = Vec::with_capacity(input_len);

    for record in data {
        let key = product_key(&record);
        match positions.get(&key) {
            Some(&pos) => {
                if is_better(&record, &kept[pos]) {
                    kept[pos] = record;
                }
            }
            None => {
                positions.insert(key, kept.len());
                kept.push(record);
            }
        }
    }

    let duplicates_count = input_len - kept.len();
    if duplicates_count > 0 {
        tracing::debug!(duplicates = duplicates_count, "Removed duplicate records");
    }
    DedupResult {
        data: kept,
        duplicates_count,
    }
}
