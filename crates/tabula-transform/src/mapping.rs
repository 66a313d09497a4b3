//! Projection of raw records onto the canonical schema.

use tabula_model::{ColumnMapping, RawRecord};

use crate::types::MappedRecord;

/// Projects every raw record through the mapping.
///
/// Mapped headers land under their canonical field; every other header is
/// carried in `extra` unchanged.
pub fn apply_mapping(raw: &[RawRecord], mapping: &ColumnMapping) -> Vec<MappedRecord> {
    raw.iter()
        .enumerate()
        .map(|(index, record)| {
            let mut mapped = MappedRecord {
                index,
                ..MappedRecord::default()
            };
            for (header, value) in record.iter() {
                match mapping.field_for(header) {
                    Some(field) => {
                        mapped.fields.insert(field, value.clone());
                    }
                    None => {
                        mapped.extra.insert(header.clone(), value.clone());
                    }
                }
            }
            mapped
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_model::{CanonicalField, RawValue};

    #[test]
    fn test_mapped_and_extra_columns() {
        let mut mapping = ColumnMapping::new();
        mapping.assign(CanonicalField::ProductName, "Title");
        mapping.assign(CanonicalField::Rating, "Stars");

        let raw: RawRecord = [
            ("Title", RawValue::from("Cable")),
            ("Stars", RawValue::Number(4.5)),
            ("Warehouse", RawValue::from("B-12")),
        ]
        .into_iter()
        .collect();

        let mapped = apply_mapping(&[raw], &mapping);
        assert_eq!(mapped.len(), 1);
        assert_eq!(
            mapped[0].get(CanonicalField::ProductName),
            &RawValue::Text("Cable".to_string())
        );
        assert_eq!(mapped[0].get(CanonicalField::Rating), &RawValue::Number(4.5));
        assert_eq!(mapped[0].get(CanonicalField::Category), &RawValue::Null);
        assert_eq!(
            mapped[0].extra.get("Warehouse"),
            Some(&RawValue::Text("B-12".to_string()))
        );
    }

    #[test]
    fn test_indices_follow_input_order() {
        let mapping = ColumnMapping::new();
        let raw = vec![RawRecord::new(), RawRecord::new(), RawRecord::new()];
        let indices: Vec<usize> = apply_mapping(&raw, &mapping)
            .iter()
            .map(|m| m.index)
            .collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }
}
