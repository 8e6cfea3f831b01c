use serde::{
    Deserialize,
    Serialize,
};
use std::path::Path;

use isopair::PairConstraints;

use crate::errors::CliError;

/// Optional JSON tuning file. The detection constants are calibrated per
/// variant and inconsistent between the historical tools, so they stay
/// overridable instead of being unified.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    pub detection: Option<DetectionTuning>,
    pub refilter: Option<RefilterTuning>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct DetectionTuning {
    pub reference_delta: Option<f64>,
    pub minimum_mass: Option<f64>,
    pub ratio_center: Option<f64>,
    pub ratio_width: Option<f64>,
    pub mass_defect_limit: Option<f64>,
    /// Absolute first-peak intensity floor; explicit null disables it,
    /// a missing field keeps the variant default.
    #[serde(default, deserialize_with = "double_option")]
    pub min_intensity: Option<Option<f64>>,
}

fn double_option<'de, D>(de: D) -> Result<Option<Option<f64>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<f64>::deserialize(de).map(Some)
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct RefilterTuning {
    pub reference_delta: Option<f64>,
}

impl Config {
    pub fn from_path(path: &Path) -> Result<Self, CliError> {
        let file = std::fs::File::open(path).map_err(|e| CliError::Io {
            source: e.to_string(),
            path: Some(path.to_string_lossy().to_string()),
        })?;
        serde_json::from_reader(file).map_err(|e| CliError::ParseError { msg: e.to_string() })
    }

    /// Overlay the tuning values on top of a variant's defaults.
    pub fn apply_detection(&self, constraints: &mut PairConstraints) {
        let Some(tuning) = &self.detection else {
            return;
        };
        if let Some(x) = tuning.reference_delta {
            constraints.reference_delta = x;
        }
        if let Some(x) = tuning.minimum_mass {
            constraints.minimum_mass = x;
        }
        if let Some(x) = tuning.ratio_center {
            constraints.ratio_center = x;
        }
        if let Some(x) = tuning.ratio_width {
            constraints.ratio_width = x;
        }
        if let Some(x) = tuning.mass_defect_limit {
            constraints.mass_defect_limit = x;
        }
        if let Some(x) = tuning.min_intensity {
            constraints.min_intensity = x;
        }
    }

    pub fn refilter_reference(&self) -> f64 {
        self.refilter
            .as_ref()
            .and_then(|x| x.reference_delta)
            .unwrap_or(isopair::ISOTOPE_SHIFT_DELTA)
    }
}
