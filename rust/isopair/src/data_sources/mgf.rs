use std::fs::File;
use std::io::{
    BufRead,
    BufReader,
};
use std::path::Path;

use tracing::warn;

use crate::errors::{
    IsopairError,
    Result,
};
use crate::models::{
    Peak,
    PeakTable,
};

/// Read all scans of an MGF file into peak tables, in acquisition order.
///
/// Each `BEGIN IONS`/`END IONS` block becomes one table. Header lines
/// (`KEY=value`) are ignored; only the two leading numeric columns of each
/// data line are kept. Peak order within a block is file order.
pub fn read_mgf<R: BufRead>(input: R) -> Result<Vec<PeakTable>> {
    let mut tables = Vec::new();
    let mut peaks: Vec<Peak> = Vec::new();
    let mut in_block = false;

    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line == "BEGIN IONS" {
            if in_block {
                warn!("BEGIN IONS at line {} inside an open block", idx + 1);
                peaks.clear();
            }
            in_block = true;
        } else if line == "END IONS" {
            if !in_block {
                warn!("END IONS at line {} without a matching BEGIN IONS", idx + 1);
                continue;
            }
            tables.push(PeakTable::new(std::mem::take(&mut peaks)));
            in_block = false;
        } else if in_block && !line.is_empty() && !line.contains('=') {
            let mut fields = line.split_whitespace();
            let mz = fields.next().and_then(|x| x.parse::<f64>().ok());
            let intensity = fields.next().and_then(|x| x.parse::<f64>().ok());
            match (mz, intensity) {
                (Some(mz), Some(intensity)) => peaks.push(Peak::new(mz, intensity)),
                _ => {
                    return Err(IsopairError::ParseError {
                        msg: format!("Bad MGF peak line {}: {:?}", idx + 1, line),
                    });
                }
            }
        }
    }

    if in_block {
        warn!("Dropping unterminated MGF block with {} peaks", peaks.len());
    }
    Ok(tables)
}

pub fn read_mgf_path<P: AsRef<Path>>(path: P) -> Result<Vec<PeakTable>> {
    let file = File::open(path.as_ref()).map_err(|e| IsopairError::Io {
        source: e,
        path: Some(path.as_ref().to_path_buf()),
    })?;
    read_mgf(BufReader::new(file))
}
