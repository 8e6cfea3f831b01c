//! Cross-scan grouping of candidate pairs into tracks.
//!
//! Grouping is greedy and order dependent on purpose: groups live in an
//! ordered list keyed by the first member's mz1, each incoming record joins
//! the first key within tolerance in insertion order, and keys never merge.
//! Downstream tolerance calibration depends on exactly this first-fit
//! behavior, so no sorted or globally optimal clustering is substituted.

use crate::errors::DataProcessingError;
use crate::models::ScanStamped;

/// Gate applied to the grouped tracks.
#[derive(Debug, Clone, Copy)]
pub struct TrackFilter {
    pub min_group_size: usize,
    pub sn_threshold: f64,
}

impl TrackFilter {
    pub fn new(sn_threshold: f64) -> Self {
        Self {
            min_group_size: 5,
            sn_threshold,
        }
    }
}

/// One track: all candidate pairs judged to belong to the same chemical
/// feature. The key is the mz1 of the first member and never changes.
#[derive(Debug, Clone)]
pub struct TrackGroup {
    pub key: f64,
    pub members: Vec<ScanStamped>,
}

/// The grouped stream plus the maximum scan number over all input records
/// (kept for consistent plot axis scaling by external visualization).
#[derive(Debug, Clone)]
pub struct GroupedTracks {
    pub groups: Vec<TrackGroup>,
    pub max_scan: u32,
}

impl GroupedTracks {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Cluster records by mz1 proximity, greedy first-fit in stream order.
///
/// Zero input records are an error, distinct from a run whose groups all
/// get filtered away later.
pub fn group_by_mz(
    records: &[ScanStamped],
    mz_tolerance: f64,
) -> std::result::Result<GroupedTracks, DataProcessingError> {
    if records.is_empty() {
        return Err(DataProcessingError::EmptyInput {
            context: Some("no candidate pairs to group".to_string()),
        });
    }

    let mut groups: Vec<TrackGroup> = Vec::new();
    for record in records {
        let found = groups
            .iter_mut()
            .find(|g| (record.pair.mz1 - g.key).abs() <= mz_tolerance);
        match found {
            Some(group) => group.members.push(*record),
            None => groups.push(TrackGroup {
                key: record.pair.mz1,
                members: vec![*record],
            }),
        }
    }

    let max_scan = records.iter().map(|r| r.scan).max().unwrap_or(0);
    Ok(GroupedTracks { groups, max_scan })
}

/// Local noise floor of one track: the mean of intensity1 over the first
/// two and last two members in group order. Groups smaller than four use
/// all available members at each end, overlapping, so the estimate is
/// defined for any non-empty group.
pub fn noise_floor(members: &[ScanStamped]) -> f64 {
    let head = &members[..members.len().min(2)];
    let tail = &members[members.len().saturating_sub(2)..];
    let sum: f64 = head
        .iter()
        .chain(tail.iter())
        .map(|m| m.pair.intensity1)
        .sum();
    sum / (head.len() + tail.len()) as f64
}

/// Signal-to-noise of one track: the mean of the two largest intensity1
/// values over the noise floor. A single-member group uses its one value.
pub fn sn_ratio(members: &[ScanStamped]) -> f64 {
    let mut intensities: Vec<f64> = members.iter().map(|m| m.pair.intensity1).collect();
    intensities.sort_unstable_by(|a, b| b.total_cmp(a));
    let top = &intensities[..intensities.len().min(2)];
    let max_intensity = top.iter().sum::<f64>() / top.len() as f64;
    max_intensity / noise_floor(members)
}

/// Keep only tracks with enough members and a S/N above the threshold.
/// The max scan of the unfiltered input is carried through.
pub fn filter_tracks(tracks: GroupedTracks, filter: &TrackFilter) -> GroupedTracks {
    let groups = tracks
        .groups
        .into_iter()
        .filter(|g| {
            g.members.len() >= filter.min_group_size
                && sn_ratio(&g.members) > filter.sn_threshold
        })
        .collect();
    GroupedTracks {
        groups,
        max_scan: tracks.max_scan,
    }
}
