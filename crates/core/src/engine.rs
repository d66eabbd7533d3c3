//! The `Engine` trait every animated sketch implements.
//!
//! The trait is object-safe so a host can drive `Box<dyn Engine>` without
//! knowing which sketch it is running.

use crate::draw::RenderCommands;
use serde_json::Value;

/// A frame-driven sketch.
///
/// The engine owns all simulation state. A host calls [`Engine::advance_frame`]
/// at whatever cadence it likes and replays the returned commands onto a
/// surface that is never cleared between frames. Engines contain no loop or
/// scheduler of their own.
pub trait Engine {
    /// Advance the simulation by one frame and return what to draw.
    ///
    /// Total: every frame either completes or the host stops calling.
    fn advance_frame(&mut self) -> RenderCommands;

    /// Number of frames advanced so far.
    fn frame_count(&self) -> u64;

    /// Canvas size in logical units as `(width, height)`.
    fn canvas_size(&self) -> (f64, f64);

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing all available parameters, their types, ranges, and defaults.
    fn param_schema(&self) -> Value;
}
