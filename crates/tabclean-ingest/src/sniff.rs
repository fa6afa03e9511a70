//! Delimiter detection from a byte sample.
//!
//! For every candidate the sample is split into records on line breaks
//! outside quoted fields, and the per-record delimiter count (again outside
//! quotes) is tallied. A field is quoted only when `"` is its first
//! character, matching how the csv reader parses the file afterwards. A
//! candidate qualifies when its modal count is positive and a large enough
//! share of records hit that mode. The share threshold starts at 100% and
//! relaxes in 1% steps down to 90%. Ties between qualifiers go to the
//! earlier entry of [`Delimiter::ALL`].

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tabclean_model::Delimiter;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Bytes read from the head of a file for detection.
pub const DEFAULT_SNIFF_BYTES: usize = 4096;

const START_CONSISTENCY: u32 = 100;
const MIN_CONSISTENCY: u32 = 90;

/// Reads up to `max_bytes` from `path` and infers its delimiter.
///
/// Undecodable bytes are skipped. Returns `Ok(None)` when the sample is
/// empty or ambiguous.
///
/// # Errors
///
/// Returns an error only if the file cannot be opened or read.
pub fn sniff_delimiter(path: &Path, max_bytes: usize) -> Result<Option<Delimiter>> {
    let file = File::open(path).map_err(|e| IngestError::from_io(path, e))?;
    let mut bytes = Vec::with_capacity(max_bytes);
    file.take(max_bytes as u64)
        .read_to_end(&mut bytes)
        .map_err(|e| IngestError::from_io(path, e))?;

    let truncated = bytes.len() >= max_bytes;
    let sample: String = String::from_utf8_lossy(&bytes)
        .chars()
        .filter(|ch| *ch != char::REPLACEMENT_CHARACTER)
        .collect();
    let detected = sniff_text(&sample, truncated);
    debug!(
        path = %path.display(),
        sample_bytes = bytes.len(),
        delimiter = ?detected,
        "sniffed delimiter"
    );
    Ok(detected)
}

/// Infers the delimiter of an in-memory sample that is known to be complete.
pub fn sniff_sample(sample: &str) -> Option<Delimiter> {
    sniff_text(sample, false)
}

/// Consistency profile of one candidate: modal count, records hitting it,
/// and records considered.
struct Profile {
    delimiter: Delimiter,
    mode: usize,
    hits: usize,
    total: usize,
}

fn sniff_text(sample: &str, truncated: bool) -> Option<Delimiter> {
    let profiles: Vec<Profile> = Delimiter::ALL
        .into_iter()
        .filter_map(|delimiter| {
            let mut counts = record_counts(sample, delimiter.as_char());
            // The last record of a cut-off sample may be partial.
            if truncated && counts.len() > 1 {
                counts.pop();
            }
            let (mode, hits) = modal_count(&counts)?;
            Some(Profile {
                delimiter,
                mode,
                hits,
                total: counts.len(),
            })
        })
        .collect();

    for threshold in (MIN_CONSISTENCY..=START_CONSISTENCY).rev() {
        // hits / total >= threshold / 100, kept in integers
        let winner = profiles
            .iter()
            .find(|p| p.hits * 100 >= p.total * threshold as usize);
        if let Some(profile) = winner {
            debug!(
                delimiter = %profile.delimiter,
                per_record = profile.mode,
                consistent_records = profile.hits,
                records = profile.total,
                threshold,
                "delimiter candidate accepted"
            );
            return Some(profile.delimiter);
        }
    }
    None
}

/// Most frequent positive count and how many records share it.
///
/// Equal frequencies resolve to the larger count.
fn modal_count(counts: &[usize]) -> Option<(usize, usize)> {
    let mut frequency: BTreeMap<usize, usize> = BTreeMap::new();
    for &count in counts {
        if count > 0 {
            *frequency.entry(count).or_insert(0) += 1;
        }
    }
    frequency
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)))
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum FieldState {
    /// Nothing read yet in the current field.
    Start,
    Unquoted,
    Quoted,
    /// A `"` inside a quoted field: closes it unless another `"` follows.
    QuoteInQuoted,
}

/// Delimiter count of every non-empty record in `sample`.
///
/// Record boundaries are line feeds outside quoted fields; a trailing `\r`
/// belongs to the line break.
fn record_counts(sample: &str, delimiter: char) -> Vec<usize> {
    let mut counts = Vec::new();
    let mut state = FieldState::Start;
    let mut count = 0;
    let mut empty = true;
    for ch in sample.chars() {
        match (state, ch) {
            (FieldState::Quoted, '"') => state = FieldState::QuoteInQuoted,
            (FieldState::Quoted, _) => {}
            (FieldState::QuoteInQuoted, '"') => state = FieldState::Quoted,
            (_, '\n') => {
                if !empty {
                    counts.push(count);
                }
                count = 0;
                empty = true;
                state = FieldState::Start;
                continue;
            }
            (_, '\r') => continue,
            (_, c) if c == delimiter => {
                count += 1;
                state = FieldState::Start;
            }
            (FieldState::Start, '"') => state = FieldState::Quoted,
            _ => state = FieldState::Unquoted,
        }
        empty = false;
    }
    if !empty {
        counts.push(count);
    }
    counts
}
