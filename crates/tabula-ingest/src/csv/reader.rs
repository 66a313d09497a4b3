//! Delimited-text extraction into loosely typed records.

use std::path::Path;

use encoding_rs::{Encoding, UTF_8};
use serde::{Deserialize, Serialize};
use tabula_model::{ParseIssue, RawRecord, RawValue};

use crate::error::{IngestError, Result};

use super::delimiter::detect_delimiter;
use super::header::normalize_headers;

/// Maximum input size accepted by default (50 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Options controlling extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Explicit delimiter; probed from the input when `None`.
    pub delimiter: Option<u8>,
    /// Files larger than this are rejected before reading.
    pub max_file_size: u64,
    /// Stop after this many data rows.
    pub max_rows: Option<usize>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_rows: None,
        }
    }
}

impl ExtractOptions {
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    #[must_use]
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }
}

/// Output of an extraction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractResult {
    /// Normalized headers in input order.
    pub headers: Vec<String>,
    /// One record per well-formed data row.
    pub records: Vec<RawRecord>,
    /// Rows excluded from `records`.
    pub errors: Vec<ParseIssue>,
    /// Data rows seen, kept and rejected.
    pub total_records: usize,
    /// Delimiter used for parsing.
    pub delimiter: u8,
}

/// Check a file's size against a limit.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }

    Ok(())
}

/// Reads and extracts a delimited-text file.
pub fn extract_file(path: &Path, options: &ExtractOptions) -> Result<ExtractResult> {
    check_file_size_with_limit(path, options.max_file_size)?;

    let bytes = std::fs::read(path).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), "Read input file");
    extract(&bytes, options)
}

/// Parses delimited text into raw records.
///
/// Fatal only when the input as a whole is unusable (foreign byte-order
/// mark, no content, unreadable header). Rows with invalid UTF-8 or the
/// wrong number of fields are reported in `errors` and skipped.
pub fn extract(input: &[u8], options: &ExtractOptions) -> Result<ExtractResult> {
    let body = strip_bom(input)?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(IngestError::EmptyInput);
    }

    let delimiter = match options.delimiter {
        Some(d) => d,
        None => detect_delimiter(&String::from_utf8_lossy(probe_window(body))),
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(body);

    let mut rows = reader.byte_records();

    let header_record = match rows.next() {
        Some(Ok(record)) => record,
        Some(Err(e)) => {
            return Err(IngestError::NoHeaderDetected {
                reason: e.to_string(),
            });
        }
        None => return Err(IngestError::EmptyInput),
    };
    let raw_headers = decode_fields(&header_record).map_err(|_| IngestError::NoHeaderDetected {
        reason: "header row is not valid UTF-8".to_string(),
    })?;
    let headers = normalize_headers(&raw_headers);

    let mut result = ExtractResult {
        headers,
        delimiter,
        ..ExtractResult::default()
    };

    for (idx, row) in rows.enumerate() {
        if options.max_rows.is_some_and(|max| result.total_records >= max) {
            tracing::debug!(max_rows = result.total_records, "Row limit reached");
            break;
        }
        // Line numbers are 1-based and include the header row.
        let fallback_line = idx + 2;
        result.total_records += 1;

        let record = match row {
            Ok(record) => record,
            Err(e) => {
                let line = e
                    .position()
                    .map_or(fallback_line, |p| p.line() as usize);
                result.errors.push(ParseIssue {
                    row: line,
                    message: format!("malformed row: {e}"),
                });
                continue;
            }
        };
        let line = record
            .position()
            .map_or(fallback_line, |p| p.line() as usize);

        if record.len() != result.headers.len() {
            result.errors.push(ParseIssue {
                row: line,
                message: format!(
                    "expected {} fields, found {}",
                    result.headers.len(),
                    record.len()
                ),
            });
            continue;
        }

        let Ok(fields) = decode_fields(&record) else {
            result.errors.push(ParseIssue {
                row: line,
                message: "row is not valid UTF-8".to_string(),
            });
            continue;
        };

        let raw: RawRecord = result
            .headers
            .iter()
            .zip(fields)
            .map(|(header, cell)| (header.clone(), RawValue::from_cell(&cell)))
            .collect();
        result.records.push(raw);
    }

    tracing::info!(
        records = result.records.len(),
        rejected = result.errors.len(),
        columns = result.headers.len(),
        "Extracted records"
    );
    Ok(result)
}

/// Strips a UTF-8 byte-order mark and rejects any other one.
fn strip_bom(input: &[u8]) -> Result<&[u8]> {
    match Encoding::for_bom(input) {
        Some((encoding, bom_len)) if encoding == UTF_8 => Ok(&input[bom_len..]),
        Some((encoding, _)) => Err(IngestError::UnsupportedEncoding {
            encoding: encoding.name(),
        }),
        None => Ok(input),
    }
}

/// Leading slice of the input used for delimiter probing.
fn probe_window(body: &[u8]) -> &[u8] {
    const PROBE_BYTES: usize = 64 * 1024;
    &body[..body.len().min(PROBE_BYTES)]
}

fn decode_fields(record: &csv::ByteRecord) -> std::result::Result<Vec<String>, std::str::Utf8Error> {
    record
        .iter()
        .map(|field| std::str::from_utf8(field).map(str::to_string))
        .collect()
}
