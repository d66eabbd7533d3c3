//! The particle collection and its per-frame update order.

use crate::flow_field::FlowField;
use crate::particle::{Particle, StrokeStyle};
use flowfield_core::color::CHANNEL_MAX;
use flowfield_core::draw::RenderCommands;
use flowfield_core::prng::Xorshift64;
use std::f64::consts::PI;

/// Linearly re-maps `value` from `[start1, stop1]` to `[start2, stop2]`.
///
/// Not clamped: values outside the source range extrapolate.
pub fn map_range(value: f64, start1: f64, stop1: f64, start2: f64, stop2: f64) -> f64 {
    start2 + (stop2 - start2) * ((value - start1) / (stop1 - start1))
}

/// How a particle's velocity turns into stroke color and thickness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appearance {
    pub style: StrokeStyle,
    /// Speed that maps to `max_weight`.
    pub speed_for_max_weight: f64,
    pub min_weight: f64,
    pub max_weight: f64,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            style: StrokeStyle::default(),
            speed_for_max_weight: 5.0,
            min_weight: 0.5,
            max_weight: 4.0,
        }
    }
}

impl Appearance {
    /// Heading in `[-π, π]` spread across the full hue circle.
    pub fn hue_for(&self, heading: f64) -> f64 {
        map_range(heading, -PI, PI, 0.0, CHANNEL_MAX)
    }

    pub fn weight_for(&self, speed: f64) -> f64 {
        map_range(
            speed,
            0.0,
            self.speed_for_max_weight,
            self.min_weight,
            self.max_weight,
        )
    }
}

/// Fixed set of particles, all living for the whole run.
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    width: f64,
    height: f64,
    appearance: Appearance,
}

impl ParticleSystem {
    /// Scatters `count` resting particles uniformly over the canvas.
    pub fn new(
        count: usize,
        width: f64,
        height: f64,
        max_speed: f64,
        appearance: Appearance,
        rng: &mut Xorshift64,
    ) -> Self {
        let particles = (0..count)
            .map(|_| Particle::new(rng.next_point(width, height), max_speed))
            .collect();
        Self {
            particles,
            width,
            height,
            appearance,
        }
    }

    /// Runs one frame over every particle in order.
    ///
    /// Each particle is drawn with the color and weight of the velocity it
    /// ended the previous frame with, and only then follows the field, moves
    /// and wraps.
    pub fn step(&mut self, field: &FlowField) -> RenderCommands {
        let mut commands = RenderCommands::with_capacity(self.particles.len());
        let appearance = self.appearance;
        for particle in &mut self.particles {
            let hue = appearance.hue_for(particle.heading());
            let weight = appearance.weight_for(particle.speed());
            commands.push(particle.display(hue, weight, appearance.style));
            particle.follow(field);
            particle.update();
            particle.edges(self.width, self.height);
        }
        commands
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn appearance(&self) -> Appearance {
        self.appearance
    }
}
