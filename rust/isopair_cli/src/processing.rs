use std::fs::{
    File,
    OpenOptions,
};
use std::io::{
    BufReader,
    BufWriter,
};
use std::path::Path;
use std::time::Instant;

use indicatif::{
    ProgressBar,
    ProgressStyle,
};
use tracing::{
    debug,
    info,
};

use isopair::data_sources::{
    read_flat_table_path,
    read_mgf_path,
};
use isopair::grouping::{
    TrackFilter,
    filter_tracks,
    group_by_mz,
    sn_ratio,
};
use isopair::stream::{
    parse_stream,
    refilter_stream,
};
use isopair::{
    PairConstraints,
    ScanRange,
};

use crate::errors::CliError;

fn open_append(path: &Path) -> Result<File, CliError> {
    OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(|e| CliError::Io {
            source: e.to_string(),
            path: Some(path.to_string_lossy().to_string()),
        })
}

fn open_truncate(path: &Path) -> Result<File, CliError> {
    File::create(path).map_err(|e| CliError::Io {
        source: e.to_string(),
        path: Some(path.to_string_lossy().to_string()),
    })
}

fn open_read(path: &Path) -> Result<BufReader<File>, CliError> {
    let file = File::open(path).map_err(|e| CliError::Io {
        source: e.to_string(),
        path: Some(path.to_string_lossy().to_string()),
    })?;
    Ok(BufReader::new(file))
}

/// Flat-table variant: one spectrum in, candidate lines out. The output is
/// truncated on every run, unlike the stream-producing commands.
pub fn run_detect_table(
    input: &Path,
    output: &Path,
    constraints: &PairConstraints,
) -> Result<(), CliError> {
    info!("Using detection constraints: {:#?}", constraints);
    let table = read_flat_table_path(input)?;
    info!("Read {} peaks from {}", table.len(), input.display());

    let mut out = BufWriter::new(open_truncate(output)?);
    let written = isopair::detection::write_table_candidates(&table, constraints, &mut out)?;
    info!("Wrote {} candidate pairs to {}", written, output.display());
    Ok(())
}

/// Streaming variant: every scan of an MGF file, serialized with scan
/// delimiters. The output opens in append mode, so repeated runs against
/// the same path accumulate; that matches the historical tooling.
pub fn run_detect(
    input: &Path,
    output: &Path,
    constraints: &PairConstraints,
    range: ScanRange,
) -> Result<(), CliError> {
    info!("Using detection constraints: {:#?}", constraints);
    let start = Instant::now();
    let tables = read_mgf_path(input)?;
    info!(
        "Read {} spectra from {} in {:?}",
        tables.len(),
        input.display(),
        start.elapsed()
    );
    info!("Appending candidate stream to {}", output.display());

    let expected = range
        .end
        .unwrap_or(tables.len())
        .min(tables.len())
        .saturating_sub(range.start);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
    )
    .unwrap();
    let bar = ProgressBar::new(expected as u64).with_style(style);

    let mut out = BufWriter::new(open_append(output)?);
    let summary = isopair::process_tables(&tables, range, constraints, &mut out, |done, _| {
        bar.set_position(done as u64)
    })?;
    bar.finish();

    info!(
        "Processed {} spectra, wrote {} candidate pairs in {:?}",
        summary.spectra_processed,
        summary.pairs_written,
        start.elapsed()
    );
    Ok(())
}

/// Second-pass deviation screen over an existing stream. Appends, same as
/// the detection stage.
pub fn run_refilter(
    input: &Path,
    output: &Path,
    reference_delta: f64,
    deviation: f64,
) -> Result<(), CliError> {
    let reader = open_read(input)?;
    let mut out = BufWriter::new(open_append(output)?);
    info!("Appending refiltered stream to {}", output.display());

    let summary = refilter_stream(reader, &mut out, reference_delta, deviation)?;
    info!(
        "Kept {} records, dropped {}, skipped {} malformed",
        summary.kept, summary.dropped, summary.malformed
    );
    Ok(())
}

/// Group a stream into tracks, gate them, and write the retained keys as a
/// single-column CSV.
pub fn run_group(
    input: &Path,
    output: &Path,
    mz_tolerance: f64,
    filter: &TrackFilter,
) -> Result<(), CliError> {
    let reader = open_read(input)?;
    let records = parse_stream(reader)?;
    info!("Parsed {} candidate records from {}", records.len(), input.display());

    let tracks = group_by_mz(&records, mz_tolerance).map_err(isopair::IsopairError::from)?;
    info!(
        "Grouped into {} tracks, max scan {}",
        tracks.len(),
        tracks.max_scan
    );

    let retained = filter_tracks(tracks, filter);
    for group in &retained.groups {
        debug!(
            "Track {:.6}: {} members, S/N {:.3}",
            group.key,
            group.members.len(),
            sn_ratio(&group.members)
        );
    }

    let mut writer = csv::Writer::from_writer(open_truncate(output)?);
    writer.write_record(["m/z"])?;
    for group in &retained.groups {
        writer.write_record([group.key.to_string()])?;
    }
    writer.flush().map_err(|e| CliError::Io {
        source: e.to_string(),
        path: Some(output.to_string_lossy().to_string()),
    })?;

    info!(
        "Retained {} of the grouped tracks, keys written to {}",
        retained.len(),
        output.display()
    );
    Ok(())
}
