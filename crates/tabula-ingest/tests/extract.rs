//! Integration tests for extraction, column detection and the pre-report.

use tabula_ingest::{
    ExtractOptions, data_quality_report, detect_column_mapping, extract,
};
use tabula_model::{CanonicalField, ColumnType, RawValue};

const CATALOG: &str = "\
product_id,product_name,category,discounted_price,actual_price,rating,rating_count
B001,USB Cable,Electronics,\"₹1,099\",\"₹1,999\",4.2,\"24,269\"
B002,Phone Stand,Electronics,₹199,₹499,3.9,1200
B003,Desk Lamp,Home,₹650,₹900,4.4,310

B004,Ceramic Mug,Home,₹150,₹100,4.0,55
B005,Notebook,Office,₹80,₹120,,12
B001,USB Cable v2,Electronics,₹999,₹1999,4.6,30
B006,Short Row,Office
";

#[test]
fn test_extract_catalog() {
    let result = extract(CATALOG.as_bytes(), &ExtractOptions::default()).unwrap();

    assert_eq!(result.delimiter, b',');
    assert_eq!(result.headers.len(), 7);
    assert_eq!(result.total_records, 7);
    assert_eq!(result.records.len(), 6);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].row, 9);

    let first = &result.records[0];
    assert_eq!(
        first.get("discounted_price"),
        Some(&RawValue::Text("₹1,099".to_string()))
    );
    assert_eq!(first.get("rating"), Some(&RawValue::Number(4.2)));
    assert_eq!(result.records[4].get("rating"), Some(&RawValue::Null));
}

#[test]
fn test_mapping_from_extracted_headers() {
    let result = extract(CATALOG.as_bytes(), &ExtractOptions::default()).unwrap();
    let mapping = detect_column_mapping(&result.headers);

    assert_eq!(mapping.header_for(CanonicalField::ProductId), Some("product_id"));
    assert_eq!(
        mapping.header_for(CanonicalField::ProductName),
        Some("product_name")
    );
    assert_eq!(
        mapping.header_for(CanonicalField::DiscountedPrice),
        Some("discounted_price")
    );
    assert_eq!(mapping.header_for(CanonicalField::Rating), Some("rating"));
    assert_eq!(
        mapping.header_for(CanonicalField::RatingCount),
        Some("rating_count")
    );
    assert!(mapping.header_for(CanonicalField::About).is_none());
}

#[test]
fn test_quality_report_on_catalog() {
    let result = extract(CATALOG.as_bytes(), &ExtractOptions::default()).unwrap();
    let report = data_quality_report(&result.records);

    assert_eq!(report.total_records, 6);
    assert_eq!(report.duplicate_records, 1);
    assert_eq!(report.missing_values["rating"], 1);
    assert_eq!(report.empty_records, 0);
    assert_eq!(report.column_stats["rating"].column_type, ColumnType::Numeric);
    assert_eq!(report.column_stats["product_name"].column_type, ColumnType::Text);
}

#[test]
fn test_semicolon_export() {
    let input = "name;price;rating\nCable;\"1,5\";4\nLamp;20;3,5\n";
    let result = extract(input.as_bytes(), &ExtractOptions::default()).unwrap();

    assert_eq!(result.delimiter, b';');
    assert_eq!(result.records.len(), 2);
    assert_eq!(
        result.records[1].get("rating"),
        Some(&RawValue::Text("3,5".to_string()))
    );
}
