//! PNG export of a [`Canvas`].
//!
//! Feature-gated behind `png` (default on) so a host that only needs the
//! frame driver does not pull in the `image` crate.

use flowfield_core::canvas::Canvas;
use flowfield_core::error::EngineError;
use std::path::Path;

/// Writes the canvas as an RGBA8 PNG.
///
/// Returns `EngineError::InvalidDimensions` if the canvas dimensions overflow
/// `u32`, or `EngineError::Io` on write failure.
pub fn write_png(canvas: &Canvas, path: &Path) -> Result<(), EngineError> {
    let w = u32::try_from(canvas.width()).map_err(|_| EngineError::InvalidDimensions)?;
    let h = u32::try_from(canvas.height()).map_err(|_| EngineError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, canvas.to_rgba8())
        .ok_or_else(|| EngineError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path)
        .map_err(|e| EngineError::Io(format!("{}: {e}", path.display())))
}
