#![deny(unsafe_code)]
//! Engine registry: maps engine names to implementations and provides the
//! CPU frame driver and PNG snapshots.
//!
//! This crate sits between `flowfield-core` (which defines the `Engine` trait)
//! and the sketch crates (`flowfield-particles`). The CLI depends on it so
//! name-based dispatch lives in one place.

pub mod render;

#[cfg(feature = "png")]
pub mod snapshot;

use flowfield_core::draw::RenderCommands;
use flowfield_core::error::EngineError;
use flowfield_core::seed::Seed;
use flowfield_core::Engine;
use flowfield_particles::FlowFieldSketch;
use serde_json::Value;

/// All available engine names.
const ENGINE_NAMES: &[&str] = &["flow-field"];

/// Enumeration of all available sketches.
///
/// Wraps each implementation and delegates `Engine` trait methods.
/// Use [`EngineKind::from_name`] for string-based construction.
pub enum EngineKind {
    /// Perlin flow field traced by particles.
    FlowField(FlowFieldSketch),
}

impl EngineKind {
    /// Constructs an engine by name.
    ///
    /// Returns `EngineError::UnknownEngine` if the name is not recognized.
    pub fn from_name(
        name: &str,
        width: usize,
        height: usize,
        seed: u64,
        params: &Value,
    ) -> Result<Self, EngineError> {
        match name {
            "flow-field" => Ok(EngineKind::FlowField(FlowFieldSketch::from_json(
                width, height, seed, params,
            )?)),
            _ => Err(EngineError::UnknownEngine(name.to_string())),
        }
    }

    /// Rebuilds the engine a [`Seed`] describes.
    pub fn from_seed(seed: &Seed) -> Result<Self, EngineError> {
        seed.validate()?;
        Self::from_name(&seed.engine, seed.width, seed.height, seed.seed, &seed.params)
    }

    /// Returns a slice of all recognized engine names.
    pub fn list_engines() -> &'static [&'static str] {
        ENGINE_NAMES
    }

    /// Parameter schema of a named engine, without constructing it.
    pub fn schema_for(name: &str) -> Result<Value, EngineError> {
        match name {
            "flow-field" => Ok(flowfield_particles::schema()),
            _ => Err(EngineError::UnknownEngine(name.to_string())),
        }
    }
}

impl Engine for EngineKind {
    fn advance_frame(&mut self) -> RenderCommands {
        match self {
            EngineKind::FlowField(e) => e.advance_frame(),
        }
    }

    fn frame_count(&self) -> u64 {
        match self {
            EngineKind::FlowField(e) => e.frame_count(),
        }
    }

    fn canvas_size(&self) -> (f64, f64) {
        match self {
            EngineKind::FlowField(e) => e.canvas_size(),
        }
    }

    fn params(&self) -> Value {
        match self {
            EngineKind::FlowField(e) => e.params(),
        }
    }

    fn param_schema(&self) -> Value {
        match self {
            EngineKind::FlowField(e) => e.param_schema(),
        }
    }
}
