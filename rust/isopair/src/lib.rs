//! Detection and cross-scan filtering of isotope-labeled peak pairs.
//!
//! The pipeline has three numeric stages, connected by a line-oriented
//! candidate stream file:
//!
//! 1. [`detection`] — per-spectrum pairwise matching against the isotope
//!    mass shift, plus the batch driver that serializes per-scan results.
//! 2. [`stream`] — the candidate stream codec and the second-pass
//!    deviation refilter.
//! 3. [`grouping`] — greedy clustering of matched m/z values across scans,
//!    noise-floor estimation and S/N gating.
//!
//! Everything runs synchronously on the caller's thread; the batch stage
//! exposes a progress callback for UI liveness and nothing else.

pub mod data_sources;
pub mod detection;
pub mod errors;
pub mod grouping;
pub mod models;
pub mod stream;

pub use detection::{
    ISOTOPE_SHIFT_DELTA,
    PairConstraints,
    ScanRange,
    detect_pairs,
    process_tables,
};
pub use errors::{
    DataProcessingError,
    IsopairError,
    Result,
};
pub use grouping::{
    GroupedTracks,
    TrackFilter,
    filter_tracks,
    group_by_mz,
};
pub use models::{
    CandidatePair,
    Peak,
    PeakTable,
    ScanStamped,
};
