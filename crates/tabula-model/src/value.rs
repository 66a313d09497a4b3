//! Loosely typed cells and rows produced by extraction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::numeric::format_numeric;

/// A single spreadsheet cell before any cleaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// A cell that parsed as a finite number.
    Number(f64),
    /// Any other non-empty cell, untrimmed.
    Text(String),
    /// An empty or whitespace-only cell.
    Null,
}

impl RawValue {
    /// Classifies a raw cell.
    ///
    /// Whitespace-only cells become `Null`. Cells that parse directly as a
    /// finite `f64` become `Number`; everything else (including "1,099" or
    /// "₹499") stays `Text` so that field-specific cleaning sees the original.
    pub fn from_cell(cell: &str) -> Self {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            return Self::Null;
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Self::Number(v),
            _ => Self::Text(cell.to_string()),
        }
    }

    /// Returns true for `Null` and for text that is blank.
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(_) => false,
        }
    }

    /// Returns the numeric value when the cell is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Converts the cell to its display string; `Null` becomes empty.
    pub fn to_display_string(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Number(v) => format_numeric(*v),
            Self::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::from_cell(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// One input row keyed by its original column header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    fields: BTreeMap<String, RawValue>,
}

impl RawRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a cell, replacing any previous value for the header.
    pub fn insert(&mut self, header: impl Into<String>, value: RawValue) {
        self.fields.insert(header.into(), value);
    }

    /// Returns the cell for a header.
    pub fn get(&self, header: &str) -> Option<&RawValue> {
        self.fields.get(header)
    }

    /// Iterates over `(header, value)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &RawValue)> {
        self.fields.iter()
    }

    /// Returns the number of cells.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if there are no cells.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns true when every cell is missing.
    pub fn is_blank(&self) -> bool {
        self.fields.values().all(RawValue::is_missing)
    }
}

impl<K: Into<String>> FromIterator<(K, RawValue)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, RawValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cell_classification() {
        assert_eq!(RawValue::from_cell("  "), RawValue::Null);
        assert_eq!(RawValue::from_cell("4.5"), RawValue::Number(4.5));
        assert_eq!(
            RawValue::from_cell("₹1,099"),
            RawValue::Text("₹1,099".to_string())
        );
    }

    #[test]
    fn test_display_string() {
        assert_eq!(RawValue::Number(100.0).to_display_string(), "100");
        assert_eq!(RawValue::Null.to_display_string(), "");
    }

    #[test]
    fn test_record_blank() {
        let record: RawRecord = [("a", RawValue::Null), ("b", RawValue::from_cell(" "))]
            .into_iter()
            .collect();
        assert!(record.is_blank());
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_untagged_json() {
        let record: RawRecord = [
            ("price", RawValue::Number(10.0)),
            ("name", RawValue::Text("Cable".to_string())),
            ("note", RawValue::Null),
        ]
        .into_iter()
        .collect();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"name":"Cable","note":null,"price":10.0}"#);
        let back: RawRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
