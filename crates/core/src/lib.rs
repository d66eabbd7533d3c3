#![deny(unsafe_code)]
//! Core types and traits for the flow-field sketch.
//!
//! Provides the `Engine` trait, the `VectorField` grid, `NoiseSource`/`PerlinNoise`,
//! HSB and sRGB color types, per-frame `RenderCommands`, a raster `Canvas`,
//! the `Xorshift64` PRNG, `Seed`, and parameter helpers.

pub mod canvas;
pub mod color;
pub mod draw;
pub mod engine;
pub mod error;
pub mod field;
pub mod noise_source;
pub mod params;
pub mod prng;
pub mod seed;

pub use canvas::{BlendMode, Canvas};
pub use color::{Hsba, Srgb};
pub use draw::{RenderCommands, StrokePoint};
pub use engine::Engine;
pub use error::EngineError;
pub use field::VectorField;
pub use noise_source::{NoiseSource, PerlinNoise};
pub use prng::Xorshift64;
pub use seed::Seed;
