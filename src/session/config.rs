use std::num::NonZeroU32;
use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{MoshError, MoshResult};
use crate::mosh::select::SelectParams;

/// Mosh parameters consumed by [`crate::MoshSession`].
///
/// Deserializable from JSON; missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MoshConfig {
    /// Edge length in pixels of the finest blocks that get composited.
    pub division_size: u32,
    /// Target fraction of the frame refreshed per frame, nominally in `(0, 1]`.
    pub budget: f64,
    /// Start from a black canvas instead of the first decoded frame.
    pub start_blank: bool,
    /// Number of coarse-to-fine refinement passes (`>= 1`).
    pub fractal_level: u32,
    /// Blank the canvas every `refresh_rate` processed frames.
    pub refresh_rate: Option<u32>,
}

impl Default for MoshConfig {
    fn default() -> Self {
        Self {
            division_size: 4,
            budget: 0.15,
            start_blank: false,
            fractal_level: 1,
            refresh_rate: None,
        }
    }
}

impl MoshConfig {
    /// Load a config from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> MoshResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Parse a config from JSON text.
    pub fn from_json_str(json: &str) -> MoshResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| MoshError::configuration(format!("invalid config json: {e}")))
    }

    /// Check every parameter. Runs before any frame is read.
    pub fn validate(&self) -> MoshResult<()> {
        self.select_params().validate()?;
        if self.refresh_rate == Some(0) {
            return Err(MoshError::configuration("refresh_rate must be > 0 when set"));
        }
        Ok(())
    }

    /// Selector parameters derived from this config.
    pub fn select_params(&self) -> SelectParams {
        SelectParams {
            division_size: self.division_size,
            fractal_level: self.fractal_level,
            budget: self.budget,
        }
    }

    /// Refresh rate as a non-zero value; `None` when unset (or zero, which `validate` rejects).
    pub fn refresh_every(&self) -> Option<NonZeroU32> {
        self.refresh_rate.and_then(NonZeroU32::new)
    }
}

/// Execution options for [`crate::MoshSession`].
#[derive(Clone, Debug, Default)]
pub struct MoshSessionOpts {
    /// Score candidates and composite stripes on a dedicated rayon pool.
    pub parallel: bool,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
}

#[cfg(test)]
#[path = "../../tests/unit/session/config.rs"]
mod tests;
