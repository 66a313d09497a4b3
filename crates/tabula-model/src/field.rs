//! Canonical product fields and the header mapping built during extraction.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// The canonical fields of a product row.
///
/// Declaration order is the order used by column detection and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CanonicalField {
    ProductId,
    ProductName,
    Category,
    DiscountedPrice,
    ActualPrice,
    DiscountPercentage,
    Rating,
    RatingCount,
    About,
    UserId,
    UserName,
    UserReview,
    ReviewTitle,
    ImgLink,
    ProductLink,
}

impl CanonicalField {
    /// All canonical fields in detection order.
    pub const ALL: [CanonicalField; 15] = [
        Self::ProductId,
        Self::ProductName,
        Self::Category,
        Self::DiscountedPrice,
        Self::ActualPrice,
        Self::DiscountPercentage,
        Self::Rating,
        Self::RatingCount,
        Self::About,
        Self::UserId,
        Self::UserName,
        Self::UserReview,
        Self::ReviewTitle,
        Self::ImgLink,
        Self::ProductLink,
    ];

    /// Fields filled with the column mean when missing.
    pub const NUMERIC: [CanonicalField; 5] = [
        Self::DiscountedPrice,
        Self::ActualPrice,
        Self::Rating,
        Self::RatingCount,
        Self::DiscountPercentage,
    ];

    /// Returns the camelCase field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProductId => "productId",
            Self::ProductName => "productName",
            Self::Category => "category",
            Self::DiscountedPrice => "discountedPrice",
            Self::ActualPrice => "actualPrice",
            Self::DiscountPercentage => "discountPercentage",
            Self::Rating => "rating",
            Self::RatingCount => "ratingCount",
            Self::About => "about",
            Self::UserId => "userId",
            Self::UserName => "userName",
            Self::UserReview => "userReview",
            Self::ReviewTitle => "reviewTitle",
            Self::ImgLink => "imgLink",
            Self::ProductLink => "productLink",
        }
    }

    /// Returns true for fields holding numbers.
    pub fn is_numeric(&self) -> bool {
        Self::NUMERIC.contains(self)
    }

    /// Returns true for fields holding URLs, which are never character-stripped.
    pub fn is_url(&self) -> bool {
        matches!(self, Self::ImgLink | Self::ProductLink)
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalField {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::UnknownField(s.to_string()))
    }
}

/// Canonical field → original header, built once per extraction.
///
/// A header is claimed by at most one field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    entries: BTreeMap<CanonicalField, String>,
}

impl ColumnMapping {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a header to a field.
    ///
    /// Returns false (and leaves the mapping unchanged) when the field is
    /// already mapped or the header is already claimed by another field.
    pub fn assign(&mut self, field: CanonicalField, header: impl Into<String>) -> bool {
        let header = header.into();
        if self.entries.contains_key(&field) || self.is_claimed(&header) {
            return false;
        }
        self.entries.insert(field, header);
        true
    }

    /// Returns the header mapped to a field.
    pub fn header_for(&self, field: CanonicalField) -> Option<&str> {
        self.entries.get(&field).map(String::as_str)
    }

    /// Returns the field a header is mapped to.
    pub fn field_for(&self, header: &str) -> Option<CanonicalField> {
        self.entries
            .iter()
            .find(|(_, h)| h.as_str() == header)
            .map(|(field, _)| *field)
    }

    /// Returns true if any field already uses the header.
    pub fn is_claimed(&self, header: &str) -> bool {
        self.entries.values().any(|h| h == header)
    }

    /// Iterates over mapped fields in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &str)> {
        self.entries.iter().map(|(f, h)| (*f, h.as_str()))
    }

    /// Canonical fields with no header.
    pub fn unmapped_fields(&self) -> Vec<CanonicalField> {
        CanonicalField::ALL
            .into_iter()
            .filter(|f| !self.entries.contains_key(f))
            .collect()
    }

    /// Returns the number of mapped fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is mapped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_round_trip_names() {
        for field in CanonicalField::ALL {
            assert_eq!(field.as_str().parse::<CanonicalField>(), Ok(field));
        }
        assert!("sku_code".parse::<CanonicalField>().is_err());
    }

    #[test]
    fn test_numeric_classification() {
        assert!(CanonicalField::RatingCount.is_numeric());
        assert!(!CanonicalField::Category.is_numeric());
        assert!(CanonicalField::ImgLink.is_url());
    }

    #[test]
    fn test_assign_rejects_claimed_header() {
        let mut mapping = ColumnMapping::new();
        assert!(mapping.assign(CanonicalField::ProductName, "name"));
        assert!(!mapping.assign(CanonicalField::UserName, "name"));
        assert!(!mapping.assign(CanonicalField::ProductName, "title"));
        assert_eq!(mapping.header_for(CanonicalField::ProductName), Some("name"));
        assert_eq!(mapping.field_for("name"), Some(CanonicalField::ProductName));
        assert_eq!(mapping.unmapped_fields().len(), 14);
    }

    #[test]
    fn test_mapping_serializes_camel_case_keys() {
        let mut mapping = ColumnMapping::new();
        mapping.assign(CanonicalField::DiscountedPrice, "Sale Price");
        let json = serde_json::to_string(&mapping).unwrap();
        assert_eq!(json, r#"{"discountedPrice":"Sale Price"}"#);
    }
}
