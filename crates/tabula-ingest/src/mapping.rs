//! Header → canonical field detection.
//!
//! The alias table is versioned configuration: the order of fields and of
//! aliases within a field decides which header wins, so changing it changes
//! the mapping produced for existing uploads.

use tabula_model::{CanonicalField, ColumnMapping};

/// Version of [`COLUMN_ALIASES`].
pub const ALIAS_TABLE_VERSION: u32 = 1;

/// Accepted header variants per canonical field, in priority order.
pub const COLUMN_ALIASES: &[(CanonicalField, &[&str])] = &[
    (
        CanonicalField::ProductId,
        &["product_id", "productid", "id", "asin", "sku"],
    ),
    (
        CanonicalField::ProductName,
        &["product_name", "productname", "name", "title", "product"],
    ),
    (
        CanonicalField::Category,
        &["category", "categories", "type", "product_category"],
    ),
    (
        CanonicalField::DiscountedPrice,
        &[
            "discounted_price",
            "discountedprice",
            "sale_price",
            "price",
            "current_price",
        ],
    ),
    (
        CanonicalField::ActualPrice,
        &[
            "actual_price",
            "actualprice",
            "original_price",
            "mrp",
            "list_price",
        ],
    ),
    (
        CanonicalField::DiscountPercentage,
        &[
            "discount_percentage",
            "discountpercentage",
            "discount",
            "discount_percent",
        ],
    ),
    (
        CanonicalField::Rating,
        &["rating", "ratings", "score", "stars"],
    ),
    (
        CanonicalField::RatingCount,
        &[
            "rating_count",
            "ratingcount",
            "reviews_count",
            "num_ratings",
            "review_count",
        ],
    ),
    (
        CanonicalField::About,
        &["about_product", "about", "description", "details"],
    ),
    (
        CanonicalField::UserId,
        &["user_id", "userid", "reviewer_id"],
    ),
    (
        CanonicalField::UserName,
        &["user_name", "username", "reviewer_name"],
    ),
    (
        CanonicalField::UserReview,
        &["review_content", "user_review", "review", "comment"],
    ),
    (
        CanonicalField::ReviewTitle,
        &["review_title", "reviewtitle", "title_review"],
    ),
    (
        CanonicalField::ImgLink,
        &["img_link", "image_link", "image_url", "image"],
    ),
    (
        CanonicalField::ProductLink,
        &["product_link", "link", "url", "product_url"],
    ),
];

/// Returns the alias list for a field.
pub fn aliases_for(field: CanonicalField) -> &'static [&'static str] {
    match COLUMN_ALIASES.iter().find(|(f, _)| *f == field) {
        Some((_, aliases)) => *aliases,
        None => &[],
    }
}

/// Normalizes text for comparison: trimmed and lowercased.
fn normalize_text(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Detects which header feeds each canonical field.
///
/// Fields are visited in table order and aliases in priority order. For each
/// alias, headers are scanned in input order and the first unclaimed header
/// that equals, contains, or is contained by the alias wins. An exact match
/// later in the header list does not outrank an earlier substring match. A
/// header feeds at most one field.
pub fn detect_column_mapping<S: AsRef<str>>(headers: &[S]) -> ColumnMapping {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_text(h.as_ref())).collect();
    let mut mapping = ColumnMapping::new();

    for (field, aliases) in COLUMN_ALIASES {
        let found = aliases
            .iter()
            .find_map(|alias| find_header(headers, &normalized, alias, &mapping));
        if let Some(header) = found {
            tracing::debug!(field = %field, header = %header, "Mapped column");
            mapping.assign(*field, header);
        }
    }

    tracing::info!(
        mapped = mapping.len(),
        headers = headers.len(),
        "Detected column mapping"
    );
    mapping
}

fn find_header<S: AsRef<str>>(
    headers: &[S],
    normalized: &[String],
    alias: &str,
    mapping: &ColumnMapping,
) -> Option<String> {
    // Equality is the degenerate case of containment.
    (0..headers.len())
        .find(|&idx| {
            let norm = normalized[idx].as_str();
            !norm.is_empty()
                && !mapping.is_claimed(headers[idx].as_ref())
                && (norm.contains(alias) || alias.contains(norm))
        })
        .map(|idx| headers[idx].as_ref().to_string())
}
