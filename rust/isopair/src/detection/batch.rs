use std::io::Write;

use tracing::debug;

use super::detector::{
    PairConstraints,
    detect_pairs,
};
use crate::errors::{
    DataProcessingError,
    Result,
};
use crate::models::PeakTable;
use crate::stream::{
    write_pair_line,
    write_scan_delimiter,
};

/// Half-open slice of the spectrum sequence to process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanRange {
    pub start: usize,
    /// Exclusive end; `None` means the full length.
    pub end: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub spectra_processed: usize,
    pub pairs_written: usize,
}

/// Run the detector over a sequence of spectra and serialize the results.
///
/// Every spectrum contributes its data lines followed by one delimiter line
/// carrying the absolute scan number, i.e. the 1-based index within the
/// slice plus the start offset. A spectrum without matches still gets its
/// delimiter. The progress callback fires after each spectrum with
/// (completed, total).
///
/// The sink is any `Write`; the caller decides the open mode. The
/// historical tooling opens the stream file in append mode, so repeated
/// runs accumulate.
pub fn process_tables<W: Write, F: FnMut(usize, usize)>(
    tables: &[PeakTable],
    range: ScanRange,
    constraints: &PairConstraints,
    out: &mut W,
    mut progress: F,
) -> Result<BatchSummary> {
    if tables.is_empty() {
        return Err(DataProcessingError::EmptyInput {
            context: Some("no spectra to process".to_string()),
        }
        .into());
    }
    let start = range.start;
    let end = range.end.unwrap_or(tables.len()).min(tables.len());
    if start > tables.len() || end <= start {
        return Err(DataProcessingError::ScanRange {
            start,
            end: range.end.unwrap_or(tables.len()),
            len: tables.len(),
        }
        .into());
    }

    let slice = &tables[start..end];
    let total = slice.len();
    let mut summary = BatchSummary::default();
    for (i, table) in slice.iter().enumerate() {
        let scan = (i + 1 + start) as u32;
        let pairs = detect_pairs(table, constraints)
            .map_err(|e| e.append_to_context(&format!(" (scan {})", scan)))?;
        for pair in &pairs {
            write_pair_line(out, pair)?;
        }
        write_scan_delimiter(out, scan)?;
        debug!("Scan {}: {} candidate pairs", scan, pairs.len());

        summary.spectra_processed += 1;
        summary.pairs_written += pairs.len();
        progress(i + 1, total);
    }
    Ok(summary)
}

/// Flat-table variant: one spectrum, data lines only, no scan delimiter.
/// The historical tool truncates its output file for this path instead of
/// appending; again the caller owns the open mode.
pub fn write_table_candidates<W: Write>(
    table: &PeakTable,
    constraints: &PairConstraints,
    out: &mut W,
) -> Result<usize> {
    if table.is_empty() {
        return Err(DataProcessingError::EmptyInput {
            context: Some("empty peak table".to_string()),
        }
        .into());
    }
    let pairs = detect_pairs(table, constraints)?;
    for pair in &pairs {
        write_pair_line(out, pair)?;
    }
    Ok(pairs.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::IsopairError;
    use crate::models::Peak;

    fn matching_table(base_mz: f64) -> PeakTable {
        PeakTable::new(vec![
            Peak::new(base_mz, 200_000.0),
            Peak::new(base_mz + 2.000398, 150_000.0),
        ])
    }

    #[test]
    fn test_empty_input_writes_nothing() {
        let mut out = Vec::new();
        let err = process_tables(
            &[],
            ScanRange::default(),
            &PairConstraints::streaming(1, 0.000005),
            &mut out,
            |_, _| {},
        )
        .unwrap_err();
        match err {
            IsopairError::DataProcessingError(DataProcessingError::EmptyInput { .. }) => {}
            other => panic!("Unexpected error: {:?}", other),
        }
        assert!(out.is_empty());
    }

    #[test]
    fn test_range_validation() {
        let tables = vec![matching_table(500.0)];
        let mut out = Vec::new();
        let constraints = PairConstraints::streaming(1, 0.000005);

        let err = process_tables(
            &tables,
            ScanRange {
                start: 5,
                end: None,
            },
            &constraints,
            &mut out,
            |_, _| {},
        )
        .unwrap_err();
        match err {
            IsopairError::DataProcessingError(DataProcessingError::ScanRange {
                start, len, ..
            }) => {
                assert_eq!(start, 5);
                assert_eq!(len, 1);
            }
            other => panic!("Unexpected error: {:?}", other),
        }

        let err = process_tables(
            &tables,
            ScanRange {
                start: 1,
                end: Some(1),
            },
            &constraints,
            &mut out,
            |_, _| {},
        )
        .unwrap_err();
        assert!(matches!(
            err,
            IsopairError::DataProcessingError(DataProcessingError::ScanRange { .. })
        ));
    }

    #[test]
    fn test_absolute_scan_numbers_with_offset() {
        let tables = vec![
            matching_table(500.0),
            matching_table(600.0),
            matching_table(700.0),
        ];
        let mut out = Vec::new();
        let summary = process_tables(
            &tables,
            ScanRange {
                start: 1,
                end: None,
            },
            &PairConstraints::streaming(1, 0.000005),
            &mut out,
            |_, _| {},
        )
        .unwrap();
        assert_eq!(summary.spectra_processed, 2);
        assert_eq!(summary.pairs_written, 2);

        let text = String::from_utf8(out).unwrap();
        let delimiters: Vec<&str> = text
            .lines()
            .filter(|l| l.starts_with('-'))
            .collect();
        // Slice-local 1-based index plus the start offset of 1.
        assert_eq!(
            delimiters,
            vec!["----------2-------------", "----------3-------------"]
        );
    }

    #[test]
    fn test_progress_callback_counts() {
        let tables = vec![matching_table(500.0), matching_table(600.0)];
        let mut seen = Vec::new();
        let mut out = Vec::new();
        process_tables(
            &tables,
            ScanRange::default(),
            &PairConstraints::streaming(1, 0.000005),
            &mut out,
            |done, total| seen.push((done, total)),
        )
        .unwrap();
        assert_eq!(seen, vec![(1, 2), (2, 2)]);
    }

    #[test]
    fn test_spectrum_without_matches_still_delimited() {
        let tables = vec![PeakTable::new(vec![Peak::new(500.0, 200_000.0)])];
        let mut out = Vec::new();
        process_tables(
            &tables,
            ScanRange::default(),
            &PairConstraints::streaming(1, 0.000005),
            &mut out,
            |_, _| {},
        )
        .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "----------1-------------\n");
    }

    #[test]
    fn test_flat_table_variant_has_no_delimiter() {
        let mut out = Vec::new();
        let n = write_table_candidates(
            &matching_table(500.0),
            &PairConstraints::flat_table(1, 0.000005),
            &mut out,
        )
        .unwrap();
        assert_eq!(n, 1);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "500    200000    502.000398    150000    2.000398    0.75\n"
        );
    }
}
