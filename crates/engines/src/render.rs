//! CPU frame driver: runs an engine and composites every frame onto one canvas.
//!
//! This is the host loop. The engine never sees the canvas; it returns
//! commands per frame and the driver replays them without clearing.

use flowfield_core::canvas::{BlendMode, Canvas};
use flowfield_core::color::Srgb;
use flowfield_core::error::EngineError;
use flowfield_core::Engine;

/// Canvas sized to the engine, filled with `background`.
///
/// Fractional canvas sizes round up so every drawn point has a pixel.
pub fn canvas_for(
    engine: &dyn Engine,
    background: Srgb,
    blend: BlendMode,
) -> Result<Canvas, EngineError> {
    let (w, h) = engine.canvas_size();
    if !(w.is_finite() && h.is_finite()) || w > usize::MAX as f64 || h > usize::MAX as f64 {
        return Err(EngineError::InvalidDimensions);
    }
    Ok(Canvas::new(w.ceil() as usize, h.ceil() as usize, background)?.with_blend_mode(blend))
}

/// Advances `engine` by `frames` frames, drawing each frame's commands onto
/// `canvas` in order.
pub fn run_frames(engine: &mut dyn Engine, canvas: &mut Canvas, frames: usize) {
    for _ in 0..frames {
        let commands = engine.advance_frame();
        canvas.draw(&commands);
    }
}

/// Builds a canvas for `engine` and runs it for `frames` frames.
pub fn render(
    engine: &mut dyn Engine,
    frames: usize,
    background: Srgb,
    blend: BlendMode,
) -> Result<Canvas, EngineError> {
    let mut canvas = canvas_for(engine, background, blend)?;
    run_frames(engine, &mut canvas, frames);
    Ok(canvas)
}
