#![deny(unsafe_code)]
//! Perlin flow-field particle sketch.
//!
//! A grid of unit vectors is rebuilt every frame from 3D Perlin noise, the
//! third coordinate being a slowly advancing clock. A fixed population of
//! particles follows the cell under it, accelerates up to a speed limit and
//! wraps around the canvas edges. Every frame each particle leaves a faint
//! dot whose hue follows its heading and whose size follows its speed;
//! drawn onto a surface that is never cleared, the dots build up into
//! flowing trails.

pub mod flow_field;
pub mod particle;
pub mod system;

pub use flow_field::{angle_for_noise, FlowField};
pub use particle::{Particle, StrokeStyle};
pub use system::{map_range, Appearance, ParticleSystem};

use flowfield_core::draw::RenderCommands;
use flowfield_core::error::EngineError;
use flowfield_core::noise_source::{NoiseSource, PerlinNoise, DEFAULT_FALLOFF, DEFAULT_OCTAVES};
use flowfield_core::params::{param_f64, param_u32, param_usize};
use flowfield_core::prng::Xorshift64;
use flowfield_core::Engine;
use serde_json::{json, Value};

const DEFAULT_CELL_SCALE: f64 = 20.0;
/// Noise-space distance between neighbouring cells.
const DEFAULT_INCREMENT: f64 = 0.1;
/// Clock advance per frame.
const DEFAULT_Z_STEP: f64 = 0.01;
/// Full turns covered as the noise goes from 0 to 1.
const DEFAULT_ANGLE_TURNS: f64 = 4.0;
const DEFAULT_PARTICLE_COUNT: usize = 1000;
const DEFAULT_MAX_SPEED: f64 = 2.0;
const DEFAULT_SATURATION: f64 = 50.0;
const DEFAULT_BRIGHTNESS: f64 = 255.0;
const DEFAULT_ALPHA: f64 = 25.0;
const DEFAULT_SPEED_FOR_MAX_WEIGHT: f64 = 5.0;
const DEFAULT_MIN_WEIGHT: f64 = 0.5;
const DEFAULT_MAX_WEIGHT: f64 = 4.0;

// Accepted ranges, inclusive. `validate` enforces them and `schema` reports them.
const CELL_SCALE_RANGE: (f64, f64) = (1.0, 200.0);
const INCREMENT_RANGE: (f64, f64) = (0.001, 1.0);
const Z_STEP_RANGE: (f64, f64) = (0.0, 0.1);
const ANGLE_TURNS_RANGE: (f64, f64) = (0.25, 16.0);
const PARTICLE_COUNT_MAX: usize = 100_000;
const MAX_SPEED_RANGE: (f64, f64) = (0.1, 20.0);
const NOISE_OCTAVES_RANGE: (u32, u32) = (1, 8);
const NOISE_FALLOFF_RANGE: (f64, f64) = (0.05, 1.0);
const CHANNEL_RANGE: (f64, f64) = (0.0, 255.0);
const SPEED_FOR_MAX_WEIGHT_RANGE: (f64, f64) = (0.1, 20.0);
const WEIGHT_RANGE: (f64, f64) = (0.0, 20.0);

/// Tunable constants of the sketch.
///
/// Use [`Default`] for the classic look: 1000 particles on a 20-unit grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowFieldParams {
    /// Size of one grid cell in canvas units.
    pub cell_scale: f64,
    pub increment: f64,
    pub z_step: f64,
    pub angle_turns: f64,
    pub particle_count: usize,
    pub max_speed: f64,
    pub noise_octaves: u32,
    pub noise_falloff: f64,
    pub saturation: f64,
    pub brightness: f64,
    pub alpha: f64,
    pub speed_for_max_weight: f64,
    pub min_weight: f64,
    pub max_weight: f64,
}

impl Default for FlowFieldParams {
    fn default() -> Self {
        Self {
            cell_scale: DEFAULT_CELL_SCALE,
            increment: DEFAULT_INCREMENT,
            z_step: DEFAULT_Z_STEP,
            angle_turns: DEFAULT_ANGLE_TURNS,
            particle_count: DEFAULT_PARTICLE_COUNT,
            max_speed: DEFAULT_MAX_SPEED,
            noise_octaves: DEFAULT_OCTAVES,
            noise_falloff: DEFAULT_FALLOFF,
            saturation: DEFAULT_SATURATION,
            brightness: DEFAULT_BRIGHTNESS,
            alpha: DEFAULT_ALPHA,
            speed_for_max_weight: DEFAULT_SPEED_FOR_MAX_WEIGHT,
            min_weight: DEFAULT_MIN_WEIGHT,
            max_weight: DEFAULT_MAX_WEIGHT,
        }
    }
}

impl FlowFieldParams {
    /// Extracts parameters from a JSON object, falling back to defaults.
    pub fn from_json(params: &Value) -> Self {
        Self {
            cell_scale: param_f64(params, "cell_scale", DEFAULT_CELL_SCALE),
            increment: param_f64(params, "increment", DEFAULT_INCREMENT),
            z_step: param_f64(params, "z_step", DEFAULT_Z_STEP),
            angle_turns: param_f64(params, "angle_turns", DEFAULT_ANGLE_TURNS),
            particle_count: param_usize(params, "particle_count", DEFAULT_PARTICLE_COUNT),
            max_speed: param_f64(params, "max_speed", DEFAULT_MAX_SPEED),
            noise_octaves: param_u32(params, "noise_octaves", DEFAULT_OCTAVES),
            noise_falloff: param_f64(params, "noise_falloff", DEFAULT_FALLOFF),
            saturation: param_f64(params, "saturation", DEFAULT_SATURATION),
            brightness: param_f64(params, "brightness", DEFAULT_BRIGHTNESS),
            alpha: param_f64(params, "alpha", DEFAULT_ALPHA),
            speed_for_max_weight: param_f64(
                params,
                "speed_for_max_weight",
                DEFAULT_SPEED_FOR_MAX_WEIGHT,
            ),
            min_weight: param_f64(params, "min_weight", DEFAULT_MIN_WEIGHT),
            max_weight: param_f64(params, "max_weight", DEFAULT_MAX_WEIGHT),
        }
    }

    /// Rejects values outside the ranges [`schema`] advertises.
    ///
    /// NaN and infinities are always out of range.
    pub fn validate(&self) -> Result<(), EngineError> {
        range("cell_scale", self.cell_scale, CELL_SCALE_RANGE)?;
        range("increment", self.increment, INCREMENT_RANGE)?;
        range("z_step", self.z_step, Z_STEP_RANGE)?;
        range("angle_turns", self.angle_turns, ANGLE_TURNS_RANGE)?;
        if self.particle_count > PARTICLE_COUNT_MAX {
            return Err(EngineError::invalid_param(
                "particle_count",
                format!(
                    "must be at most {PARTICLE_COUNT_MAX}, got {}",
                    self.particle_count
                ),
            ));
        }
        range("max_speed", self.max_speed, MAX_SPEED_RANGE)?;
        let (lo, hi) = NOISE_OCTAVES_RANGE;
        if !(lo..=hi).contains(&self.noise_octaves) {
            return Err(EngineError::invalid_param(
                "noise_octaves",
                format!("must be within [{lo}, {hi}], got {}", self.noise_octaves),
            ));
        }
        range("noise_falloff", self.noise_falloff, NOISE_FALLOFF_RANGE)?;
        range("saturation", self.saturation, CHANNEL_RANGE)?;
        range("brightness", self.brightness, CHANNEL_RANGE)?;
        range("alpha", self.alpha, CHANNEL_RANGE)?;
        range(
            "speed_for_max_weight",
            self.speed_for_max_weight,
            SPEED_FOR_MAX_WEIGHT_RANGE,
        )?;
        range("min_weight", self.min_weight, WEIGHT_RANGE)?;
        range("max_weight", self.max_weight, WEIGHT_RANGE)?;
        Ok(())
    }

    fn appearance(&self) -> Appearance {
        Appearance {
            style: StrokeStyle {
                saturation: self.saturation,
                brightness: self.brightness,
                alpha: self.alpha,
            },
            speed_for_max_weight: self.speed_for_max_weight,
            min_weight: self.min_weight,
            max_weight: self.max_weight,
        }
    }
}

fn range(name: &str, value: f64, (min, max): (f64, f64)) -> Result<(), EngineError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(EngineError::invalid_param(
            name,
            format!("must be within [{min}, {max}], got {value}"),
        ))
    }
}

/// The whole sketch: noise, flow field, particles and the clock.
///
/// Owns every piece of simulation state. Each [`Engine::advance_frame`]
/// rebuilds the field at the current z-offset, advances the clock, then
/// steps the particles.
pub struct FlowFieldSketch {
    width: f64,
    height: f64,
    noise: Box<dyn NoiseSource>,
    field: FlowField,
    system: ParticleSystem,
    z_offset: f64,
    frame: u64,
    params: FlowFieldParams,
}

impl FlowFieldSketch {
    /// Creates a sketch on a `width × height` canvas.
    ///
    /// Particle positions come from `seed` and the Perlin permutation table is
    /// derived from the same seed, so equal inputs replay identically.
    ///
    /// Returns `EngineError::InvalidDimensions` if either side is zero or the
    /// canvas is smaller than one cell, and `EngineError::InvalidParameter`
    /// for out-of-range params.
    pub fn new(
        width: usize,
        height: usize,
        seed: u64,
        params: FlowFieldParams,
    ) -> Result<Self, EngineError> {
        params.validate()?;
        let noise = PerlinNoise::new(
            PerlinNoise::fold_seed(seed),
            params.noise_octaves,
            params.noise_falloff,
        );
        Self::with_noise(width, height, seed, params, Box::new(noise))
    }

    /// Creates a sketch that samples a caller-supplied noise source.
    pub fn with_noise(
        width: usize,
        height: usize,
        seed: u64,
        params: FlowFieldParams,
        noise: Box<dyn NoiseSource>,
    ) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions);
        }
        params.validate()?;
        let (w, h) = (width as f64, height as f64);
        let field = FlowField::new(w, h, params.cell_scale, params.increment, params.angle_turns)?;
        let mut rng = Xorshift64::new(seed);
        let system = ParticleSystem::new(
            params.particle_count,
            w,
            h,
            params.max_speed,
            params.appearance(),
            &mut rng,
        );
        Ok(Self {
            width: w,
            height: h,
            noise,
            field,
            system,
            z_offset: 0.0,
            frame: 0,
            params,
        })
    }

    /// Creates a sketch from a JSON params object, falling back to defaults
    /// for missing keys.
    pub fn from_json(
        width: usize,
        height: usize,
        seed: u64,
        json_params: &Value,
    ) -> Result<Self, EngineError> {
        Self::new(width, height, seed, FlowFieldParams::from_json(json_params))
    }

    pub fn field(&self) -> &FlowField {
        &self.field
    }

    pub fn particles(&self) -> &[Particle] {
        self.system.particles()
    }

    /// Third noise coordinate used by the next frame.
    pub fn z_offset(&self) -> f64 {
        self.z_offset
    }

    pub fn flow_params(&self) -> &FlowFieldParams {
        &self.params
    }
}

impl Engine for FlowFieldSketch {
    fn advance_frame(&mut self) -> RenderCommands {
        self.field.recompute(self.noise.as_ref(), self.z_offset);
        self.z_offset += self.params.z_step;
        let commands = self.system.step(&self.field);
        self.frame += 1;
        commands
    }

    fn frame_count(&self) -> u64 {
        self.frame
    }

    fn canvas_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn params(&self) -> Value {
        let p = &self.params;
        json!({
            "cell_scale": p.cell_scale,
            "increment": p.increment,
            "z_step": p.z_step,
            "angle_turns": p.angle_turns,
            "particle_count": p.particle_count,
            "max_speed": p.max_speed,
            "noise_octaves": p.noise_octaves,
            "noise_falloff": p.noise_falloff,
            "saturation": p.saturation,
            "brightness": p.brightness,
            "alpha": p.alpha,
            "speed_for_max_weight": p.speed_for_max_weight,
            "min_weight": p.min_weight,
            "max_weight": p.max_weight,
        })
    }

    fn param_schema(&self) -> Value {
        schema()
    }
}

/// Parameter schema shared by every flow-field sketch.
pub fn schema() -> Value {
    json!({
        "cell_scale": {
            "type": "number",
            "default": DEFAULT_CELL_SCALE,
            "min": CELL_SCALE_RANGE.0,
            "max": CELL_SCALE_RANGE.1,
            "description": "Grid cell size in canvas units"
        },
        "increment": {
            "type": "number",
            "default": DEFAULT_INCREMENT,
            "min": INCREMENT_RANGE.0,
            "max": INCREMENT_RANGE.1,
            "description": "Noise-space step between neighbouring cells"
        },
        "z_step": {
            "type": "number",
            "default": DEFAULT_Z_STEP,
            "min": Z_STEP_RANGE.0,
            "max": Z_STEP_RANGE.1,
            "description": "Noise clock advance per frame"
        },
        "angle_turns": {
            "type": "number",
            "default": DEFAULT_ANGLE_TURNS,
            "min": ANGLE_TURNS_RANGE.0,
            "max": ANGLE_TURNS_RANGE.1,
            "description": "Full turns spanned as noise goes from 0 to 1"
        },
        "particle_count": {
            "type": "integer",
            "default": DEFAULT_PARTICLE_COUNT,
            "min": 0,
            "max": PARTICLE_COUNT_MAX,
            "description": "Number of particles"
        },
        "max_speed": {
            "type": "number",
            "default": DEFAULT_MAX_SPEED,
            "min": MAX_SPEED_RANGE.0,
            "max": MAX_SPEED_RANGE.1,
            "description": "Particle speed limit in canvas units per frame"
        },
        "noise_octaves": {
            "type": "integer",
            "default": DEFAULT_OCTAVES,
            "min": NOISE_OCTAVES_RANGE.0,
            "max": NOISE_OCTAVES_RANGE.1,
            "description": "Layered Perlin octaves"
        },
        "noise_falloff": {
            "type": "number",
            "default": DEFAULT_FALLOFF,
            "min": NOISE_FALLOFF_RANGE.0,
            "max": NOISE_FALLOFF_RANGE.1,
            "description": "Amplitude multiplier between octaves"
        },
        "saturation": {
            "type": "number",
            "default": DEFAULT_SATURATION,
            "min": CHANNEL_RANGE.0,
            "max": CHANNEL_RANGE.1,
            "description": "Stroke saturation"
        },
        "brightness": {
            "type": "number",
            "default": DEFAULT_BRIGHTNESS,
            "min": CHANNEL_RANGE.0,
            "max": CHANNEL_RANGE.1,
            "description": "Stroke brightness"
        },
        "alpha": {
            "type": "number",
            "default": DEFAULT_ALPHA,
            "min": CHANNEL_RANGE.0,
            "max": CHANNEL_RANGE.1,
            "description": "Stroke opacity"
        },
        "speed_for_max_weight": {
            "type": "number",
            "default": DEFAULT_SPEED_FOR_MAX_WEIGHT,
            "min": SPEED_FOR_MAX_WEIGHT_RANGE.0,
            "max": SPEED_FOR_MAX_WEIGHT_RANGE.1,
            "description": "Speed that maps to max_weight"
        },
        "min_weight": {
            "type": "number",
            "default": DEFAULT_MIN_WEIGHT,
            "min": WEIGHT_RANGE.0,
            "max": WEIGHT_RANGE.1,
            "description": "Stroke diameter of a particle at rest"
        },
        "max_weight": {
            "type": "number",
            "default": DEFAULT_MAX_WEIGHT,
            "min": WEIGHT_RANGE.0,
            "max": WEIGHT_RANGE.1,
            "description": "Stroke diameter at speed_for_max_weight"
        }
    })
}
