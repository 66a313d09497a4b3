//! End-to-end transform scenarios over extracted CSV input.

use tabula_ingest::{ExtractOptions, detect_column_mapping, extract};
use tabula_model::PriceRange;
use tabula_transform::{TransformOptions, remove_duplicates, transform};

const KITCHEN: &str = "\
product_id,product_name,category,discounted_price,actual_price,rating,rating_count
P01,Steel Bottle,Kitchen,120,180,4.1,230
P02,Glass Jar,Kitchen,110,160,4.0,120
P03,Tea Kettle,Kitchen,140,200,4.3,560
P04,Spice Rack,Kitchen,130,170,3.9,75
P05,Cutting Board,Kitchen,150,100,4.2,310
P06,Chef Knife,Kitchen,160,210,4.4,890
P07,Apron,Kitchen,100,150,4.0,45
P08,Oven Mitt,Kitchen,115,165,3.8,60
P09,Measuring Cup,Kitchen,125,175,4.1,150
P10,Whisk,Kitchen,135,185,4.2,95
";

fn run(csv: &str, options: &TransformOptions) -> tabula_transform::TransformResult {
    let extracted = extract(csv.as_bytes(), &ExtractOptions::default()).unwrap();
    let mapping = detect_column_mapping(&extracted.headers);
    transform(&extracted.records, &mapping, options)
}

#[test]
fn test_inverted_prices_are_swapped_not_dropped() {
    let result = run(KITCHEN, &TransformOptions::default());

    assert_eq!(result.data.len(), 10);
    assert!(result.errors.is_empty());

    let board = result
        .data
        .iter()
        .find(|r| r.product_id == "P05")
        .expect("swapped row kept");
    assert_eq!(board.discounted_price, 100.0);
    assert_eq!(board.actual_price, 150.0);
    assert_eq!(board.discount_percentage, 33.0);
    assert!(result.warnings.iter().any(|w| w.contains("Swapped")));
}

#[test]
fn test_missing_product_name_goes_to_errors() {
    let csv = "\
product_id,product_name,category,discounted_price,actual_price,rating
A1,Lamp,Home,100,200,4.0
A2,,Home,100,200,4.0
A3,Desk,Home,300,400,4.5
";
    let result = run(csv, &TransformOptions::default());

    assert_eq!(result.data.len(), 2);
    assert!(result.data.iter().all(|r| r.product_id != "A2"));
    assert_eq!(result.errors, vec!["Row 2: missing product name".to_string()]);
}

#[test]
fn test_currency_formatted_prices() {
    let csv = "\
product_id,product_name,category,discounted_price,actual_price,rating,rating_count
B1,USB Cable,Computers&Accessories|Cables,\"₹1,099\",\"₹1,999\",4.2,\"24,269\"
";
    let result = run(csv, &TransformOptions::default());
    let cable = &result.data[0];

    assert_eq!(cable.discounted_price, 1099.0);
    assert_eq!(cable.actual_price, 1999.0);
    assert_eq!(cable.discount_percentage, 45.0);
    assert_eq!(cable.rating_count, 24269);
    assert_eq!(cable.category, "ComputersAccessoriesCables");
    assert_eq!(cable.price_range, Some(PriceRange::High));
}

#[test]
fn test_fill_uses_survivor_means() {
    let csv = "\
product_id,product_name,category,discounted_price,actual_price,rating
C1,Pen,Office,10,20,4.0
C2,Pencil,,20,40,
C3,Eraser,Office,30,60,5.0
";
    let result = run(csv, &TransformOptions::default());
    let pencil = result.data.iter().find(|r| r.product_id == "C2").unwrap();

    assert_eq!(pencil.rating, 4.5);
    assert_eq!(pencil.category, "Office");
}

#[test]
fn test_without_fill_missing_rating_is_rejected() {
    let csv = "\
product_id,product_name,category,discounted_price,actual_price,rating
C1,Pen,Office,10,20,4.0
C2,Pencil,,20,40,
";
    let options = TransformOptions {
        fill_missing: false,
        ..TransformOptions::default()
    };
    let result = run(csv, &options);

    assert_eq!(result.data.len(), 1);
    assert_eq!(result.statistics.invalid_records, 1);
}

#[test]
fn test_duplicate_product_keeps_higher_rating() {
    let csv = "\
product_id,product_name,category,discounted_price,actual_price,rating
X,Speaker,Audio,100,200,4.0
X,Speaker,Audio,100,200,4.8
";
    let options = TransformOptions {
        remove_duplicates: false,
        ..TransformOptions::default()
    };
    let result = run(csv, &options);
    assert_eq!(result.data.len(), 2);

    let deduped = remove_duplicates(result.data);
    assert_eq!(deduped.duplicates_count, 1);
    assert_eq!(deduped.data.len(), 1);
    assert_eq!(deduped.data[0].product_id, "X");
    assert_eq!(deduped.data[0].rating, 4.8);
}

#[test]
fn test_file_without_name_column_rejects_rows() {
    let csv = "\
sku,category,price,mrp,rating
S1,Home,80,100,4.0
S2,Home,90,120,3.5
";
    let result = run(csv, &TransformOptions::default());

    assert!(result.data.is_empty());
    assert_eq!(
        result.errors,
        ["Row 1: missing product name", "Row 2: missing product name"]
    );
}
