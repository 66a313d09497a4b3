//! Delimited-text reading utilities.

mod delimiter;
mod header;
mod reader;

pub use delimiter::{CANDIDATE_DELIMITERS, detect_delimiter};
pub use header::normalize_headers;
pub use reader::{
    DEFAULT_MAX_FILE_SIZE, ExtractOptions, ExtractResult, check_file_size_with_limit, extract,
    extract_file,
};
