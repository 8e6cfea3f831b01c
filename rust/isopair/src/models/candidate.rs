/// One detected isotope peak pair.
///
/// `mz1` is the peak at the lower loop index of the detection pass, which is
/// not necessarily the lower m/z of the two. Intensities stay as f64 in
/// memory; they only get truncated to integers when a record is written to
/// the candidate stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidatePair {
    pub mz1: f64,
    pub intensity1: f64,
    pub mz2: f64,
    pub intensity2: f64,
    pub mass_delta: f64,
    pub intensity_ratio: f64,
}

/// A candidate pair parsed back from the stream, stamped with the scan
/// number of the delimiter line that followed it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanStamped {
    pub scan: u32,
    pub pair: CandidatePair,
}
