//! Per-frame drawing output.
//!
//! The simulation never touches a surface directly. Each frame it returns a
//! [`RenderCommands`] list that a host replays onto whatever it draws with
//! (the CPU [`Canvas`](crate::canvas::Canvas), a GPU surface, a browser).

use crate::color::Hsba;
use glam::DVec2;

/// One colored point, drawn as a round dot of diameter `weight`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokePoint {
    pub position: DVec2,
    pub color: Hsba,
    pub weight: f64,
}

/// Ordered list of points produced by one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderCommands {
    points: Vec<StrokePoint>,
}

impl RenderCommands {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, point: StrokePoint) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[StrokePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StrokePoint> {
        self.points.iter()
    }
}

impl<'a> IntoIterator for &'a RenderCommands {
    type Item = &'a StrokePoint;
    type IntoIter = std::slice::Iter<'a, StrokePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
