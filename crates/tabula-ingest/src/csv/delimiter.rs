//! Delimiter probing for inputs that do not declare one.

/// Delimiters probed, in priority order.
pub const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Number of non-empty lines sampled when probing.
const SAMPLE_LINES: usize = 10;

/// Picks the delimiter that splits the sample most consistently.
///
/// Each candidate is scored by how many sampled lines have the same field
/// count as the first line, then by that field count. Candidates that never
/// split the first line into more than one field are ignored. Ties keep
/// probe order, and `,` is the fallback.
pub fn detect_delimiter(text: &str) -> u8 {
    let sample: Vec<&str> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(SAMPLE_LINES)
        .collect();
    if sample.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = (0usize, 0usize);

    for candidate in CANDIDATE_DELIMITERS {
        let counts: Vec<usize> = sample
            .iter()
            .map(|line| count_fields(line, candidate))
            .collect();
        let header_fields = counts[0];
        if header_fields < 2 {
            continue;
        }
        let consistent = counts.iter().filter(|&&c| c == header_fields).count();
        let score = (consistent, header_fields);
        if score > best_score {
            best_score = score;
            best = candidate;
        }
    }

    tracing::debug!(
        delimiter = %char::from(best).escape_default(),
        sampled = sample.len(),
        "Detected delimiter"
    );
    best
}

/// Counts fields on one line, ignoring delimiters inside double quotes.
fn count_fields(line: &str, delimiter: u8) -> usize {
    let delimiter = char::from(delimiter);
    let mut fields = 1;
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                // Escaped quote ("")
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => fields += 1,
            _ => {}
        }
    }

    fields
}
