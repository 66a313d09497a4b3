use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use tabula_ingest::ExtractResult;
use tabula_load::CleanupReport;
use tabula_model::{
    CanonicalField, CategoryInsight, ColumnMapping, DataQualityReport, EtlJob, IntegrityReport,
    JobStatus, LoadResult, format_numeric,
};
use tabula_transform::TransformResult;

/// Rejected-row messages printed before the list is cut short.
const MAX_PRINTED_ERRORS: usize = 20;

pub fn print_extract_summary(file: &str, extracted: &ExtractResult) {
    println!("File: {file}");
    println!(
        "Rows: {} read, {} kept, {} unreadable (delimiter {:?})",
        extracted.total_records,
        extracted.records.len(),
        extracted.errors.len(),
        char::from(extracted.delimiter)
    );
    for issue in extracted.errors.iter().take(MAX_PRINTED_ERRORS) {
        eprintln!("- line {}: {}", issue.row, issue.message);
    }
}

pub fn print_mapping(mapping: &ColumnMapping) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Source column")]);
    apply_table_style(&mut table);
    for field in CanonicalField::ALL {
        let source = match mapping.header_for(field) {
            Some(header) => Cell::new(header),
            None => dim_cell("-"),
        };
        table.add_row(vec![field_cell(field), source]);
    }
    println!();
    println!("Column mapping:");
    println!("{table}");
}

pub fn print_quality_report(report: &DataQualityReport) {
    println!();
    println!(
        "Quality: {} records, {} duplicates, {} empty",
        report.total_records, report.duplicate_records, report.empty_records
    );
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Type"),
        header_cell("Missing"),
        header_cell("Unique"),
        header_cell("Min"),
        header_cell("Max"),
        header_cell("Mean"),
    ]);
    apply_table_style(&mut table);
    for index in 2..=6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for (column, stats) in &report.column_stats {
        let missing = report.missing_values.get(column).copied().unwrap_or(0);
        table.add_row(vec![
            Cell::new(column),
            Cell::new(stats.column_type.as_str()),
            count_cell(missing as u64, Color::Yellow),
            Cell::new(stats.unique_count),
            number_cell(stats.min),
            number_cell(stats.max),
            number_cell(stats.mean),
        ]);
    }
    println!("{table}");
}

pub fn print_transform_summary(result: &TransformResult) {
    let stats = &result.statistics;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Step"), header_cell("Records")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Input"), Cell::new(stats.input_records)]);
    table.add_row(vec![
        Cell::new("Rejected while cleaning"),
        count_cell(stats.rejected_records as u64, Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("Values imputed"),
        count_cell(stats.filled_values as u64, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Outliers removed"),
        count_cell(stats.outliers_removed as u64, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Failed validation"),
        count_cell(stats.invalid_records as u64, Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("Duplicates removed"),
        count_cell(stats.duplicates_removed as u64, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Output").add_attribute(Attribute::Bold),
        Cell::new(stats.output_records).add_attribute(Attribute::Bold),
    ]);
    println!();
    println!("Transform:");
    println!("{table}");

    let quality = &stats.quality;
    println!(
        "Quality score {:.1} (completeness {:.1}, accuracy {:.1}, consistency {:.1}, uniqueness {:.1})",
        quality.overall,
        quality.completeness,
        quality.accuracy,
        quality.consistency,
        quality.uniqueness
    );
    print_error_list("Rejected rows", &result.errors);
}

pub fn print_load_result(result: &LoadResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Job"),
        header_cell("Status"),
        header_cell("Total"),
        header_cell("Loaded"),
        header_cell("Skipped"),
        header_cell("Errors"),
        header_cell("Batches"),
        header_cell("Duration"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 2..=7 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(&result.job_id),
        status_cell(result.status),
        Cell::new(result.total_records),
        Cell::new(result.records_success).fg(Color::Green),
        count_cell(result.records_skipped, Color::Yellow),
        count_cell(result.records_error, Color::Red),
        Cell::new(result.batches),
        Cell::new(format!("{} ms", result.duration_ms)),
    ]);
    println!();
    println!("Load:");
    println!("{table}");
    print_error_list("Load errors", &result.errors);
}

pub fn print_jobs(jobs: &[EtlJob]) {
    if jobs.is_empty() {
        println!("No jobs recorded.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Job"),
        header_cell("File"),
        header_cell("Status"),
        header_cell("Started"),
        header_cell("Processed"),
        header_cell("Errors"),
        header_cell("Duration"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    align_column(&mut table, 6, CellAlignment::Right);
    for job in jobs {
        table.add_row(vec![
            Cell::new(&job.id),
            Cell::new(&job.file_name),
            status_cell(job.status),
            Cell::new(job.start_time.format("%Y-%m-%d %H:%M:%S")),
            Cell::new(job.records_processed),
            count_cell(job.records_error, Color::Red),
            duration_cell(job.duration_ms),
        ]);
    }
    println!("{table}");
}

pub fn print_job(job: &EtlJob) {
    print_jobs(std::slice::from_ref(job));
    print_error_list("Job errors", &job.error_messages);
}

pub fn print_integrity(report: &IntegrityReport) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Check"), header_cell("Count")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Products"), Cell::new(report.total_products)]);
    table.add_row(vec![
        Cell::new("Invalid prices"),
        count_cell(report.invalid_prices, Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("Invalid ratings"),
        count_cell(report.invalid_ratings, Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("Duplicate ids"),
        count_cell(report.duplicate_ids, Color::Red),
    ]);
    println!("{table}");
    if report.is_valid {
        println!("Integrity: OK");
    } else {
        print_error_list("Integrity issues", &report.issues);
    }
}

pub fn print_insights(insights: &[CategoryInsight]) {
    if insights.is_empty() {
        println!("No insights yet; load some products first.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Category"),
        header_cell("Products"),
        header_cell("Avg rating"),
        header_cell("Avg price"),
        header_cell("Avg discount %"),
        header_cell("Top rated"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for insight in insights {
        table.add_row(vec![
            Cell::new(&insight.category)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(insight.total_products),
            Cell::new(format!("{:.2}", insight.average_rating)),
            Cell::new(format!("{:.2}", insight.average_price)),
            Cell::new(format!("{:.1}", insight.average_discount)),
            match &insight.top_rated_product {
                Some(name) => Cell::new(name),
                None => dim_cell("-"),
            },
        ]);
    }
    println!("{table}");
}

pub fn print_cleanup(report: &CleanupReport, retention_days: u32) {
    println!(
        "Removed {} jobs and {} trend snapshots older than {retention_days} days.",
        report.jobs_removed, report.trends_removed
    );
}

fn print_error_list(title: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    eprintln!("{title}:");
    for error in errors.iter().take(MAX_PRINTED_ERRORS) {
        eprintln!("- {error}");
    }
    if errors.len() > MAX_PRINTED_ERRORS {
        eprintln!("  ... and {} more", errors.len() - MAX_PRINTED_ERRORS);
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn field_cell(field: CanonicalField) -> Cell {
    if field.is_numeric() {
        Cell::new(field.as_str()).fg(Color::Blue)
    } else {
        Cell::new(field.as_str())
    }
}

fn status_cell(status: JobStatus) -> Cell {
    let cell = Cell::new(status.as_str());
    match status {
        JobStatus::Completed => cell.fg(Color::Green),
        JobStatus::CompletedWithErrors => cell.fg(Color::Yellow),
        JobStatus::Failed => cell.fg(Color::Red).add_attribute(Attribute::Bold),
        JobStatus::Started | JobStatus::Processing => cell.fg(Color::Cyan),
    }
}

fn count_cell(count: u64, color: Color) -> Cell {
    match count {
        0 => dim_cell(0),
        value => Cell::new(value).fg(color).add_attribute(Attribute::Bold),
    }
}

fn number_cell(value: Option<f64>) -> Cell {
    match value {
        Some(v) => Cell::new(format_numeric(v)),
        None => dim_cell("-"),
    }
}

fn duration_cell(duration_ms: Option<u64>) -> Cell {
    match duration_ms {
        Some(ms) => Cell::new(format!("{ms} ms")),
        None => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
