use std::collections::HashMap;

use serde::{
    Deserialize,
    Serialize,
};

use crate::errors::DataProcessingError;
use crate::models::{
    CandidatePair,
    PeakTable,
};

/// Neutral-mass shift of the isotope label, for charge 1.
pub const ISOTOPE_SHIFT_DELTA: f64 = 2.000398;

/// Lowest plausible first-peak m/z at charge 1. Scaled by charge before use.
pub const MINIMUM_MASS: f64 = 121.0;

/// Constraint set for one detection pass.
///
/// Two calibrated variants exist historically and are kept as distinct
/// configurations: the streaming variant (wider ratio band, absolute
/// intensity floor) and the flat-table variant (narrower band, no floor).
/// Every constant is a field so callers can tune them, but the named
/// constructors carry the original values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairConstraints {
    /// Ion charge, positive.
    pub charge: u32,
    /// Allowed absolute deviation of the observed mass delta from
    /// `reference_delta / charge`.
    pub mass_deviation: f64,
    /// Isotope-label neutral-mass difference, divided by charge at match time.
    pub reference_delta: f64,
    /// First-peak m/z floor constant, divided by charge at match time.
    pub minimum_mass: f64,
    /// Center of the accepted intensity2/intensity1 band.
    pub ratio_center: f64,
    /// Half-width of the accepted intensity ratio band.
    pub ratio_width: f64,
    /// Maximum distance of the first peak's m/z from the nearest integer.
    pub mass_defect_limit: f64,
    /// Absolute intensity floor on the first peak, if any.
    pub min_intensity: Option<f64>,
}

impl PairConstraints {
    /// Variant used when walking a whole acquisition spectrum by spectrum.
    pub fn streaming(charge: u32, mass_deviation: f64) -> Self {
        Self {
            charge,
            mass_deviation,
            reference_delta: ISOTOPE_SHIFT_DELTA,
            minimum_mass: MINIMUM_MASS,
            ratio_center: 0.75,
            ratio_width: 0.35,
            mass_defect_limit: 0.20,
            min_intensity: Some(100_000.0),
        }
    }

    /// Variant used on a single pre-exported two-column peak table.
    pub fn flat_table(charge: u32, mass_deviation: f64) -> Self {
        Self {
            charge,
            mass_deviation,
            reference_delta: ISOTOPE_SHIFT_DELTA,
            minimum_mass: MINIMUM_MASS,
            ratio_center: 0.75,
            ratio_width: 0.25,
            mass_defect_limit: 0.20,
            min_intensity: None,
        }
    }

    fn target_delta(&self) -> f64 {
        round_to(self.reference_delta / self.charge as f64, 6)
    }

    fn mass_floor(&self) -> f64 {
        self.minimum_mass / self.charge as f64
    }
}

fn round_to(x: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (x * factor).round() / factor
}

/// Find all isotope pairs in one spectrum.
///
/// Index pairs (i, j) with i <= j are enumerated in table order. A pair is
/// kept when all of the following hold at once:
///
/// 1. the mass delta (rounded to 6 decimals) is within `mass_deviation` of
///    `reference_delta / charge`,
/// 2. mz_i is above `minimum_mass / charge`,
/// 3. the intensity ratio intensity_j / intensity_i (rounded to 3 decimals)
///    falls inside the band `ratio_center +- ratio_width`,
/// 4. mz_i is within `mass_defect_limit` of an integer,
/// 5. intensity_i clears `min_intensity`, when the variant has one.
///
/// Results are keyed by mz_i with last-write-wins semantics: when one mz_i
/// matches several j, the last j in iteration order replaces the earlier
/// ones. Downstream tolerances are calibrated against that behavior, so it
/// is kept rather than "fixed". The surviving pairs come back sorted
/// ascending by mz1.
///
/// Any peak with a non-positive intensity makes the ratio division
/// undefined and rejects the whole spectrum before pairing starts.
pub fn detect_pairs(
    table: &PeakTable,
    constraints: &PairConstraints,
) -> std::result::Result<Vec<CandidatePair>, DataProcessingError> {
    let peaks = table.peaks();
    for (index, peak) in peaks.iter().enumerate() {
        if peak.intensity <= 0.0 {
            return Err(DataProcessingError::InvalidPeak {
                index,
                mz: peak.mz,
                intensity: peak.intensity,
                context: "non-positive intensity would make the ratio undefined".to_string(),
            });
        }
    }

    let target_delta = constraints.target_delta();
    let mass_floor = constraints.mass_floor();

    // Keyed by the bit pattern of mz1, which collides exactly for
    // value-identical m/z entries. Last write wins per key.
    let mut candidates: HashMap<u64, CandidatePair> = HashMap::new();
    for i in 0..peaks.len() {
        let first = peaks[i];
        for j in i..peaks.len() {
            let second = peaks[j];
            let mass_delta = round_to(second.mz - first.mz, 6);
            let intensity_ratio = round_to(second.intensity / first.intensity, 3);

            let delta_ok = (mass_delta - target_delta).abs() <= constraints.mass_deviation;
            let mass_ok = first.mz > mass_floor;
            let ratio_ok =
                (intensity_ratio - constraints.ratio_center).abs() <= constraints.ratio_width;
            let defect_ok = (first.mz.round() - first.mz).abs() <= constraints.mass_defect_limit;
            let floor_ok = match constraints.min_intensity {
                Some(floor) => first.intensity > floor,
                None => true,
            };

            if delta_ok && mass_ok && ratio_ok && defect_ok && floor_ok {
                candidates.insert(
                    first.mz.to_bits(),
                    CandidatePair {
                        mz1: first.mz,
                        intensity1: first.intensity,
                        mz2: second.mz,
                        intensity2: second.intensity,
                        mass_delta,
                        intensity_ratio,
                    },
                );
            }
        }
    }

    let mut out: Vec<CandidatePair> = candidates.into_values().collect();
    out.sort_unstable_by(|a, b| a.mz1.total_cmp(&b.mz1));
    Ok(out)
}
