mod candidate;
mod peak;

pub use candidate::{
    CandidatePair,
    ScanStamped,
};
pub use peak::{
    Peak,
    PeakTable,
};
