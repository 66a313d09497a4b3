//! Header row normalization.

use std::collections::BTreeSet;

/// Normalizes a header value by trimming whitespace.
fn normalize_header(value: &str) -> String {
    value.trim().to_string()
}

/// Normalizes a raw header row.
///
/// - Cells are trimmed.
/// - Blank cells become `column_{n}` (1-based position).
/// - Repeated names get a `_{k}` suffix so every header is unique.
pub fn normalize_headers<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut headers = Vec::with_capacity(raw.len());

    for (idx, cell) in raw.iter().enumerate() {
        let mut name = normalize_header(cell.as_ref());
        if name.is_empty() {
            name = format!("column_{}", idx + 1);
        }
        if seen.contains(&name) {
            let mut k = 2;
            while seen.contains(&format!("{name}_{k}")) {
                k += 1;
            }
            name = format!("{name}_{k}");
        }
        seen.insert(name.clone());
        headers.push(name);
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims() {
        assert_eq!(normalize_headers(&["  a ", "b"]), vec!["a", "b"]);
    }

    #[test]
    fn test_blank_headers_get_positional_names() {
        assert_eq!(
            normalize_headers(&["name", "", " "]),
            vec!["name", "column_2", "column_3"]
        );
    }

    #[test]
    fn test_duplicate_headers_are_suffixed() {
        assert_eq!(
            normalize_headers(&["price", "price", "price"]),
            vec!["price", "price_2", "price_3"]
        );
    }
}
