mod batch;
mod detector;

pub use batch::{
    BatchSummary,
    ScanRange,
    process_tables,
    write_table_candidates,
};
pub use detector::{
    ISOTOPE_SHIFT_DELTA,
    MINIMUM_MASS,
    PairConstraints,
    detect_pairs,
};
