//! Reproducible description of a sketch run.
//!
//! A [`Seed`] captures everything needed to re-render a piece: engine name,
//! canvas dimensions, parameters, PRNG seed, and the number of frames.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Reproducible specification for a sketch run.
///
/// Two identical `Seed` values fed to the same binary produce bit-identical
/// output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seed {
    pub engine: String,
    pub width: usize,
    pub height: usize,
    pub params: serde_json::Value,
    pub seed: u64,
    #[serde(default)]
    pub frames: usize,
}

impl Seed {
    /// Creates a new Seed with default params (`{}`) and zero frames.
    pub fn new(engine: &str, width: usize, height: usize, seed: u64) -> Self {
        Self {
            engine: engine.to_string(),
            width,
            height,
            params: serde_json::Value::Object(serde_json::Map::new()),
            seed,
            frames: 0,
        }
    }

    /// Validates that the seed has non-zero dimensions and that
    /// `width * height` does not overflow.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.width == 0 || self.height == 0 {
            return Err(EngineError::InvalidDimensions);
        }
        self.width
            .checked_mul(self.height)
            .ok_or(EngineError::InvalidDimensions)?;
        Ok(())
    }

    /// Writes the seed as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), EngineError> {
        let json =
            serde_json::to_string_pretty(self).map_err(|e| EngineError::Io(e.to_string()))?;
        std::fs::write(path, json)
            .map_err(|e| EngineError::Io(format!("{}: {e}", path.display())))
    }

    /// Reads and validates a seed file.
    ///
    /// Returns `EngineError::Io` if the file cannot be read and
    /// `EngineError::InvalidSeed` if its contents are not a seed.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Io(format!("{}: {e}", path.display())))?;
        let seed: Seed = serde_json::from_str(&text)
            .map_err(|e| EngineError::InvalidSeed(format!("{}: {e}", path.display())))?;
        seed.validate()?;
        Ok(seed)
    }
}
