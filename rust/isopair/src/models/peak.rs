use crate::errors::DataProcessingError;

/// One centroided peak. Intensity has to be positive wherever a ratio
/// division happens; the detector enforces that, not this struct.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub mz: f64,
    pub intensity: f64,
}

impl Peak {
    pub fn new(mz: f64, intensity: f64) -> Self {
        Self { mz, intensity }
    }
}

/// The centroided peak list of one spectrum/scan.
///
/// Peaks keep the insertion order of the source file. They are NOT sorted
/// by m/z and no deduplication happens; the pairing algorithm is defined
/// over loop indices, not over m/z order.
#[derive(Debug, Clone, Default)]
pub struct PeakTable {
    peaks: Vec<Peak>,
}

impl PeakTable {
    pub fn new(peaks: Vec<Peak>) -> Self {
        Self { peaks }
    }

    /// Build a table from the parallel arrays an external spectrum reader
    /// hands over.
    pub fn from_arrays(
        mz: &[f64],
        intensity: &[f64],
    ) -> std::result::Result<Self, DataProcessingError> {
        if mz.len() != intensity.len() {
            return Err(DataProcessingError::ExpectedSlicesSameLength {
                expected: mz.len(),
                other: intensity.len(),
                context: "PeakTable::from_arrays".to_string(),
            });
        }
        let peaks = mz
            .iter()
            .zip(intensity.iter())
            .map(|(m, i)| Peak::new(*m, *i))
            .collect();
        Ok(Self { peaks })
    }

    pub fn peaks(&self) -> &[Peak] {
        &self.peaks
    }

    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }
}
