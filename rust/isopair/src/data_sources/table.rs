use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::errors::{
    IsopairError,
    Result,
};
use crate::models::{
    Peak,
    PeakTable,
};

/// Read a two-column tab-separated peak table (m/z, intensity) with one
/// header row, the export format of the flat-table workflow.
pub fn read_flat_table<R: Read>(input: R) -> Result<PeakTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_reader(input);

    let mut peaks = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() < 2 {
            return Err(IsopairError::ParseError {
                msg: format!("Expected two columns, got {}", record.len()),
            });
        }
        let mz: f64 = record[0].trim().parse()?;
        let intensity: f64 = record[1].trim().parse()?;
        peaks.push(Peak::new(mz, intensity));
    }
    Ok(PeakTable::new(peaks))
}

pub fn read_flat_table_path<P: AsRef<Path>>(path: P) -> Result<PeakTable> {
    let file = File::open(path.as_ref()).map_err(|e| IsopairError::Io {
        source: e,
        path: Some(path.as_ref().to_path_buf()),
    })?;
    read_flat_table(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_flat_table() {
        let text = "mz\tintensity\n500.0\t200000\n502.000398\t150000\n";
        let table = read_flat_table(Cursor::new(text)).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.peaks()[0].mz, 500.0);
        assert_eq!(table.peaks()[1].intensity, 150000.0);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let text = "mz\tintensity\n500.0\n";
        assert!(read_flat_table(Cursor::new(text)).is_err());
    }

    #[test]
    fn test_bad_number_is_an_error() {
        let text = "mz\tintensity\n500.0\tlots\n";
        let err = read_flat_table(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, IsopairError::ParseError { .. }));
    }
}
