//! Cell-level normalization helpers.

mod numeric;
mod text;

pub use numeric::{MAX_RATING, parse_amount, parse_rating};
pub use text::{DEFAULT_MAX_TEXT_LEN, clean_text, clean_verbatim};
