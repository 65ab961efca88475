//! File-backed configuration for sampling and correction.

use std::collections::BTreeMap;
use std::path::Path;

use common::SerdeFormat;
use serde::{Deserialize, Serialize};

use crate::correction::CorrectionParams;
use crate::error::{Error, Result};
use crate::sampling::DEFAULT_RESOLUTION;

/// How the surrogate is sampled before correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Samples per axis.
    pub resolution: usize,
    /// Values for features that are not on either grid axis.
    pub constants: BTreeMap<String, f64>,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            constants: BTreeMap::new(),
        }
    }
}

impl SamplingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.resolution == 0 {
            return Err(Error::InvalidParameter {
                name: "resolution",
                value: 0.0,
            });
        }
        if let Some(&value) = self.constants.values().find(|v| !v.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "constant",
                value,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridTuneConfig {
    pub correction: CorrectionParams,
    pub sampling: SamplingConfig,
}

impl GridTuneConfig {
    pub fn validate(&self) -> Result<()> {
        self.correction.validate()?;
        self.sampling.validate()
    }

    /// Reads a `.yaml`/`.yml`/`.json` file, filling absent keys with defaults,
    /// and validates the result.
    pub fn load(path: &Path) -> Result<Self> {
        let format = SerdeFormat::from_file_name(path).map_err(|e| config_error(path, e))?;
        let text = std::fs::read_to_string(path).map_err(|e| config_error(path, e))?;
        let config: Self =
            common::serde::deserialize(&text, format).map_err(|e| config_error(path, e))?;
        config.validate()?;

        tracing::debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Writes the config in the format implied by the file extension.
    pub fn save(&self, path: &Path) -> Result<()> {
        let format = SerdeFormat::from_file_name(path).map_err(|e| config_error(path, e))?;
        let text = common::serde::serialize(self, format).map_err(|e| config_error(path, e))?;
        std::fs::write(path, text).map_err(|e| config_error(path, e))
    }
}

fn config_error(path: &Path, reason: impl std::fmt::Display) -> Error {
    Error::Config {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
