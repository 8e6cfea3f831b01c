//! Text codec for the candidate stream.
//!
//! The stream is the only artifact connecting detection to grouping. It is
//! line oriented: one record per candidate pair, six fields joined by four
//! spaces, with intensities truncated to integers. Each scan's records are
//! terminated by a delimiter line of ten hyphens, the absolute scan number,
//! and thirteen hyphens:
//!
//! ```text
//! 500.000000    200000    502.000398    150000    2.000398    0.75
//! ----------12-------------
//! ```
//!
//! Readers here are tolerant: records that do not parse are skipped with a
//! warning. The writer side can never produce such records.

use std::io::{
    BufRead,
    Write,
};

use tracing::warn;

use crate::errors::{
    DataProcessingError,
    Result,
};
use crate::models::{
    CandidatePair,
    ScanStamped,
};

const FIELD_SEPARATOR: &str = "    ";
const DELIMITER_PREFIX: &str = "----------";

/// Render one candidate pair as a stream data line (no trailing newline).
pub fn format_pair_line(pair: &CandidatePair) -> String {
    [
        pair.mz1.to_string(),
        (pair.intensity1 as i64).to_string(),
        pair.mz2.to_string(),
        (pair.intensity2 as i64).to_string(),
        pair.mass_delta.to_string(),
        pair.intensity_ratio.to_string(),
    ]
    .join(FIELD_SEPARATOR)
}

pub fn write_pair_line<W: Write>(out: &mut W, pair: &CandidatePair) -> Result<()> {
    writeln!(out, "{}", format_pair_line(pair))?;
    Ok(())
}

/// Write the delimiter that closes one scan's records.
pub fn write_scan_delimiter<W: Write>(out: &mut W, scan: u32) -> Result<()> {
    writeln!(out, "----------{}-------------", scan)?;
    Ok(())
}

fn parse_pair_fields(fields: &[&str]) -> Option<CandidatePair> {
    if fields.len() != 6 {
        return None;
    }
    let mut values = [0f64; 6];
    for (slot, field) in values.iter_mut().zip(fields.iter()) {
        *slot = field.parse().ok()?;
    }
    // The writer can only ever emit finite numbers; nan/inf here means a
    // corrupt record, and letting one through would poison the grouping
    // arithmetic downstream.
    if !values.iter().all(|x| x.is_finite()) {
        return None;
    }
    Some(CandidatePair {
        mz1: values[0],
        intensity1: values[1],
        mz2: values[2],
        intensity2: values[3],
        mass_delta: values[4],
        intensity_ratio: values[5],
    })
}

/// Parse a whole candidate stream into scan-stamped records.
///
/// Records accumulate until a delimiter line stamps them with its scan
/// number. Records after the final delimiter carry no scan and are dropped,
/// matching the writer's contract that every scan ends in a delimiter.
/// Malformed lines are skipped with a warning.
pub fn parse_stream<R: BufRead>(input: R) -> Result<Vec<ScanStamped>> {
    let mut records = Vec::new();
    let mut pending: Vec<CandidatePair> = Vec::new();

    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with(DELIMITER_PREFIX) {
            let scan: u32 = match line.trim_matches('-').parse() {
                Ok(x) => x,
                Err(_) => {
                    warn!("Skipping malformed delimiter at line {}: {:?}", idx + 1, line);
                    continue;
                }
            };
            for pair in pending.drain(..) {
                records.push(ScanStamped { scan, pair });
            }
        } else {
            let fields: Vec<&str> = line.split_whitespace().collect();
            match parse_pair_fields(&fields) {
                Some(pair) => pending.push(pair),
                None => {
                    warn!(
                        "Skipping: {}",
                        DataProcessingError::MalformedRecord {
                            line_number: idx + 1,
                            line: line.to_string(),
                        }
                    );
                }
            }
        }
    }

    if !pending.is_empty() {
        warn!(
            "Dropping {} records after the final scan delimiter",
            pending.len()
        );
    }
    Ok(records)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefilterSummary {
    pub kept: usize,
    pub dropped: usize,
    pub malformed: usize,
}

/// Second-pass deviation screen over a serialized candidate stream.
///
/// Delimiter lines pass through unchanged. A data line survives when its
/// mass delta (fifth field) is within `deviation` of `reference_delta`.
/// The historical reference is the charge-1 shift no matter what charge the
/// detection ran at; that charge-agnostic behavior is intentional and
/// callers that disagree can pass a scaled reference instead.
///
/// Retained lines are copied byte for byte, so running the filter twice
/// with the same tolerance is a no-op the second time.
pub fn refilter_stream<R: BufRead, W: Write>(
    input: R,
    output: &mut W,
    reference_delta: f64,
    deviation: f64,
) -> Result<RefilterSummary> {
    let mut summary = RefilterSummary::default();

    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        if line.starts_with(DELIMITER_PREFIX) {
            writeln!(output, "{}", line)?;
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        let mass_delta = match parse_pair_fields(&fields) {
            Some(pair) => pair.mass_delta,
            None => {
                warn!(
                    "Skipping: {}",
                    DataProcessingError::MalformedRecord {
                        line_number: idx + 1,
                        line: line.clone(),
                    }
                );
                summary.malformed += 1;
                continue;
            }
        };
        if (reference_delta - mass_delta).abs() <= deviation {
            writeln!(output, "{}", line)?;
            summary.kept += 1;
        } else {
            summary.dropped += 1;
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::ISOTOPE_SHIFT_DELTA;
    use std::io::Cursor;

    fn pair(mz1: f64, i1: f64, mz2: f64, i2: f64, delta: f64, ratio: f64) -> CandidatePair {
        CandidatePair {
            mz1,
            intensity1: i1,
            mz2,
            intensity2: i2,
            mass_delta: delta,
            intensity_ratio: ratio,
        }
    }

    #[test]
    fn test_format_pair_line_truncates_intensities() {
        let p = pair(500.000001, 200000.9, 502.000398, 150000.7, 2.000398, 0.75);
        assert_eq!(
            format_pair_line(&p),
            "500.000001    200000    502.000398    150000    2.000398    0.75"
        );
    }

    #[test]
    fn test_round_trip() {
        let pairs = [
            pair(500.000001, 200000.0, 502.000398, 150000.0, 2.000398, 0.75),
            pair(601.345678, 300000.0, 603.346076, 240000.0, 2.000398, 0.8),
        ];
        let mut buf = Vec::new();
        write_pair_line(&mut buf, &pairs[0]).unwrap();
        write_scan_delimiter(&mut buf, 3).unwrap();
        write_pair_line(&mut buf, &pairs[1]).unwrap();
        write_scan_delimiter(&mut buf, 4).unwrap();

        let records = parse_stream(Cursor::new(buf)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].scan, 3);
        assert_eq!(records[0].pair, pairs[0]);
        assert_eq!(records[1].scan, 4);
        assert_eq!(records[1].pair, pairs[1]);
    }

    #[test]
    fn test_parse_drops_trailing_records() {
        let text = "500.0    200000    502.000398    150000    2.000398    0.75\n\
                    ----------1-------------\n\
                    600.0    200000    602.000398    150000    2.000398    0.75\n";
        let records = parse_stream(Cursor::new(text)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].scan, 1);
    }

    #[test]
    fn test_parse_skips_malformed_records() {
        let text = "not a record at all\n\
                    500.0    200000    502.000398    150000    2.000398    0.75\n\
                    500.0    200000    502.000398\n\
                    ----------7-------------\n";
        let records = parse_stream(Cursor::new(text)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].pair.mz1, 500.0);
    }

    #[test]
    fn test_non_finite_fields_are_malformed() {
        // Corrupt streams can carry nan/inf tokens that parse as f64 but
        // must never reach the grouping arithmetic.
        let text = "500.0    nan    502.000398    150000    2.000398    0.75\n\
                    500.0    200000    inf    150000    2.000398    0.75\n\
                    600.0    200000    602.000398    150000    2.000398    0.75\n\
                    ----------1-------------\n";
        let records = parse_stream(Cursor::new(text)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].pair.mz1, 600.0);

        let mut out = Vec::new();
        let summary = refilter_stream(
            Cursor::new(text),
            &mut out,
            ISOTOPE_SHIFT_DELTA,
            0.0001,
        )
        .unwrap();
        assert_eq!(summary.malformed, 2);
        assert_eq!(summary.kept, 1);
    }

    #[test]
    fn test_short_hyphen_line_is_not_a_delimiter() {
        // Only the full ten-hyphen prefix opens a delimiter; a stray line
        // starting with a lone hyphen is just a malformed record.
        let text = "-foo\n\
                    500.0    200000    502.000398    150000    2.000398    0.75\n\
                    ----------4-------------\n";
        let records = parse_stream(Cursor::new(text)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].scan, 4);

        let mut out = Vec::new();
        let summary = refilter_stream(
            Cursor::new(text),
            &mut out,
            ISOTOPE_SHIFT_DELTA,
            0.0001,
        )
        .unwrap();
        assert_eq!(summary.malformed, 1);
        assert_eq!(summary.kept, 1);
        assert!(!String::from_utf8(out).unwrap().contains("-foo"));
    }

    #[test]
    fn test_refilter_keeps_delimiters_and_screens_deltas() {
        let text = "500.0    200000    502.000398    150000    2.000398    0.75\n\
                    600.0    200000    602.0006    150000    2.0006    0.75\n\
                    ----------1-------------\n";
        let mut out = Vec::new();
        let summary = refilter_stream(
            Cursor::new(text),
            &mut out,
            ISOTOPE_SHIFT_DELTA,
            0.0001,
        )
        .unwrap();
        assert_eq!(summary.kept, 1);
        assert_eq!(summary.dropped, 1);
        assert_eq!(summary.malformed, 0);
        let out = String::from_utf8(out).unwrap();
        assert_eq!(
            out,
            "500.0    200000    502.000398    150000    2.000398    0.75\n\
             ----------1-------------\n"
        );
    }

    #[test]
    fn test_refilter_is_idempotent() {
        let text = "500.0    200000    502.000398    150000    2.000398    0.75\n\
                    600.0    200000    602.0006    150000    2.0006    0.75\n\
                    bogus line\n\
                    ----------1-------------\n";
        let mut once = Vec::new();
        refilter_stream(Cursor::new(text), &mut once, ISOTOPE_SHIFT_DELTA, 0.0001).unwrap();
        let mut twice = Vec::new();
        let summary = refilter_stream(
            Cursor::new(once.clone()),
            &mut twice,
            ISOTOPE_SHIFT_DELTA,
            0.0001,
        )
        .unwrap();
        assert_eq!(once, twice);
        assert_eq!(summary.dropped, 0);
        assert_eq!(summary.malformed, 0);
    }
}
