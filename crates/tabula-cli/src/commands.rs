use std::io::IsTerminal;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info, info_span, trace, warn};

use tabula_ingest::{
    ExtractOptions, ExtractResult, data_quality_report, detect_column_mapping, extract_file,
};
use tabula_load::{LoadOptions, Loader};
use tabula_model::{IntegrityReport, LoadResult};
use tabula_store::{JsonFileRepository, Repository};
use tabula_transform::{TransformOptions, transform};

use crate::cli::{InspectArgs, RunArgs};
use crate::summary::{
    print_cleanup, print_extract_summary, print_insights, print_integrity, print_job, print_jobs,
    print_load_result, print_mapping, print_quality_report, print_transform_summary,
};
use tabula_cli::config::{Settings, delimiter_byte};
use tabula_cli::logging::redact_value;
use tabula_cli::progress::LoadProgress;

/// What `run` produced; `load` is `None` for a dry run.
pub struct RunOutcome {
    pub output_records: usize,
    pub load: Option<LoadResult>,
}

impl RunOutcome {
    pub fn succeeded(&self) -> bool {
        self.load.as_ref().is_none_or(|load| load.success)
    }
}

pub fn open_store(settings: &Settings) -> Result<JsonFileRepository> {
    let path = settings.store_path();
    debug!(path = %path.display(), "Opening store");
    JsonFileRepository::open(&path).with_context(|| format!("open store {}", path.display()))
}

pub fn run_inspect(args: &InspectArgs, settings: &Settings) -> Result<()> {
    let extracted = extract_input(args, settings)?;
    let mapping = detect_column_mapping(&extracted.headers);
    print_mapping(&mapping);
    print_quality_report(&data_quality_report(&extracted.records));
    Ok(())
}

pub fn run_etl(args: &RunArgs, settings: &Settings) -> Result<RunOutcome> {
    let file = &args.input.file;
    let run_span = info_span!("run", file = %file.display());
    let _run_guard = run_span.enter();
    let started = Instant::now();

    // =========================================================================
    // Extract
    // =========================================================================
    let extracted = extract_input(&args.input, settings)?;
    let mapping = detect_column_mapping(&extracted.headers);
    print_mapping(&mapping);
    info!(
        mapped = mapping.len(),
        unmapped = mapping.unmapped_fields().len(),
        "Detected column mapping"
    );

    // =========================================================================
    // Transform
    // =========================================================================
    let transform_options = transform_options(args, &settings.transform);
    let transformed = info_span!("transform")
        .in_scope(|| transform(&extracted.records, &mapping, &transform_options));
    for warning in &transformed.warnings {
        warn!("{warning}");
    }
    for record in &transformed.data {
        trace!(
            product_id = %record.product_id,
            name = redact_value(&record.product_name),
            "Cleaned product"
        );
    }
    print_transform_summary(&transformed);

    if args.dry_run {
        info!(
            records = transformed.data.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Dry run, skipping load"
        );
        return Ok(RunOutcome {
            output_records: transformed.data.len(),
            load: None,
        });
    }

    // =========================================================================
    // Load
    // =========================================================================
    let repo = open_store(settings)?;
    let load_options = load_options(args, &settings.load);
    let progress = LoadProgress::new(
        transformed.data.len() as u64,
        std::io::stderr().is_terminal(),
    );
    let file_name = file
        .file_name()
        .map_or_else(|| file.display().to_string(), |name| name.to_string_lossy().into_owned());
    let loaded = Loader::new(&repo)
        .with_observer(&progress)
        .load(&transformed.data, &file_name, &load_options);
    progress.finish();
    let loaded = loaded.context("load records")?;
    print_load_result(&loaded);

    info!(
        job_id = %loaded.job_id,
        loaded = loaded.records_success,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Run complete"
    );
    Ok(RunOutcome {
        output_records: transformed.data.len(),
        load: Some(loaded),
    })
}

pub fn run_jobs(settings: &Settings, limit: usize) -> Result<()> {
    let repo = open_store(settings)?;
    let jobs = Loader::new(&repo).recent_jobs(limit).context("list jobs")?;
    print_jobs(&jobs);
    Ok(())
}

pub fn run_job(settings: &Settings, id: &str) -> Result<()> {
    let repo = open_store(settings)?;
    let job = Loader::new(&repo)
        .job_status(id)
        .context("read job")?
        .ok_or_else(|| anyhow!("no job with id {id}"))?;
    print_job(&job);
    Ok(())
}

pub fn run_integrity(settings: &Settings) -> Result<IntegrityReport> {
    let repo = open_store(settings)?;
    let report = Loader::new(&repo)
        .validate_data_integrity()
        .context("check integrity")?;
    print_integrity(&report);
    Ok(report)
}

pub fn run_cleanup(settings: &Settings, days: Option<u32>) -> Result<()> {
    let days = days.unwrap_or(settings.retention.days);
    let repo = open_store(settings)?;
    let report = Loader::new(&repo)
        .cleanup_old_data(days)
        .context("clean up old data")?;
    print_cleanup(&report, days);
    Ok(())
}

pub fn run_insights(settings: &Settings, refresh: bool) -> Result<()> {
    let repo = open_store(settings)?;
    if refresh {
        Loader::new(&repo)
            .regenerate_insights()
            .context("regenerate insights")?;
    }
    let insights = repo.category_insights().context("read insights")?;
    print_insights(&insights);
    Ok(())
}

fn extract_input(args: &InspectArgs, settings: &Settings) -> Result<ExtractResult> {
    let mut options: ExtractOptions = settings.extract_options()?;
    if let Some(delimiter) = args.delimiter {
        options.delimiter = Some(delimiter_byte(delimiter)?);
    }
    let extracted = extract_file(&args.file, &options)
        .with_context(|| format!("extract {}", args.file.display()))?;
    print_extract_summary(&args.file.display().to_string(), &extracted);
    Ok(extracted)
}

fn transform_options(args: &RunArgs, base: &TransformOptions) -> TransformOptions {
    let mut options = base.clone();
    if args.no_outliers {
        options.remove_outliers = false;
    }
    if args.no_fill {
        options.fill_missing = false;
    }
    if args.no_dedupe {
        options.remove_duplicates = false;
    }
    options
}

fn load_options(args: &RunArgs, base: &LoadOptions) -> LoadOptions {
    let mut options = base.clone();
    if let Some(batch_size) = args.batch_size {
        options.batch_size = batch_size;
    }
    if args.no_upsert {
        options.upsert = false;
    }
    if args.no_insights {
        options.generate_insights = false;
    }
    options
}
