use serde::{Serialize, Deserialize};

use crate::vecmath::Point;

/// The moving emitter. A plain coordinate holder: the driver moves it and
/// decides when it sheds new disturbances; it has no kinematics of its own.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Source {
    position: Point,
}

impl Source {
    pub fn new(position: Point) -> Self {
        Self { position }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Replaces the position outright. Dimensionality is not pinned here —
    /// the driver owns the regime and validates any switch before calling.
    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }
}
