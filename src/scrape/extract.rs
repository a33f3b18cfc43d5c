use std::io::BufRead;

use regex::Regex;
use tracing::debug;

use crate::error::ScrapeError;

/// Compiles a caller supplied pattern.
pub fn compile_pattern(pattern: &str) -> Result<Regex, ScrapeError> {
    Regex::new(pattern).map_err(|source| ScrapeError::InvalidPattern {
        pattern: pattern.to_owned(),
        source,
    })
}

/// Scans `reader` line by line and returns every non-overlapping match of
/// `pattern`, in line order and then in the order they occur on the line.
///
/// Lines are split on `\n` with a trailing `\r` dropped, and decoded lossily so
/// stray binary in a listing does not abort the scan. A read error discards
/// whatever was matched so far.
pub fn extract_matches<R: BufRead>(pattern: &Regex, reader: R) -> Result<Vec<String>, ScrapeError> {
    let mut matches = Vec::new();

    for line in reader.split(b'\n') {
        let mut line = line?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        let text = String::from_utf8_lossy(&line);

        let found: Vec<String> = pattern
            .find_iter(&text)
            .map(|m| m.as_str())
            .filter(|m| !m.is_empty())
            .map(str::to_owned)
            .collect();

        if !found.is_empty() {
            debug!("Matches found: {found:?}");
            matches.extend(found);
        }
    }

    Ok(matches)
}
