//! A single point mass steered by the flow field.

use crate::flow_field::FlowField;
use flowfield_core::color::Hsba;
use flowfield_core::draw::StrokePoint;
use glam::DVec2;

/// Saturation, brightness and alpha shared by every stroke, on the 0..255 scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub saturation: f64,
    pub brightness: f64,
    pub alpha: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            saturation: 50.0,
            brightness: 255.0,
            alpha: 25.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: DVec2,
    pub velocity: DVec2,
    pub acceleration: DVec2,
    pub max_speed: f64,
}

impl Particle {
    /// A particle at rest at `position`.
    pub fn new(position: DVec2, max_speed: f64) -> Self {
        Self {
            position,
            velocity: DVec2::ZERO,
            acceleration: DVec2::ZERO,
            max_speed,
        }
    }

    /// Adds the flow vector of the cell under the particle to its acceleration.
    pub fn follow(&mut self, field: &FlowField) {
        let force = field.lookup(self.position);
        self.apply_force(force);
    }

    pub fn apply_force(&mut self, force: DVec2) {
        self.acceleration += force;
    }

    /// Integrates one step: accelerate, cap speed, move, then drop the
    /// accumulated acceleration.
    pub fn update(&mut self) {
        self.velocity += self.acceleration;
        self.velocity = self.velocity.clamp_length_max(self.max_speed);
        self.position += self.velocity;
        self.acceleration = DVec2::ZERO;
    }

    /// Wraps the particle to the opposite edge once it leaves the canvas.
    ///
    /// The bounds are inclusive: a particle sitting exactly on `width` or
    /// `height` stays put.
    pub fn edges(&mut self, width: f64, height: f64) {
        if self.position.x > width {
            self.position.x = 0.0;
        }
        if self.position.x < 0.0 {
            self.position.x = width;
        }
        if self.position.y > height {
            self.position.y = 0.0;
        }
        if self.position.y < 0.0 {
            self.position.y = height;
        }
    }

    /// Stroke for the particle's current position.
    pub fn display(&self, hue: f64, weight: f64, style: StrokeStyle) -> StrokePoint {
        StrokePoint {
            position: self.position,
            color: Hsba::new(hue, style.saturation, style.brightness, style.alpha),
            weight,
        }
    }

    /// Direction of travel in `(-π, π]`. Zero for a particle at rest.
    pub fn heading(&self) -> f64 {
        self.velocity.y.atan2(self.velocity.x)
    }

    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }
}
