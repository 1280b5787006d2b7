//! Vehicle state, derivative and control input types

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::{Point2, Vector3};
use serde::{Deserialize, Serialize};
use util::maths::wrap_2pi;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Planar position and heading of the vehicle.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    /// Position along the X axis.
    ///
    /// Units: meters
    pub x_m: f64,

    /// Position along the Y axis.
    ///
    /// Units: meters
    pub y_m: f64,

    /// Heading, the angle from the +ve X axis, counter-clockwise positive.
    ///
    /// Units: radians
    pub heading_rad: f64,
}

/// Time derivative of a [`VehicleState`].
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDerivative {
    /// Units: meters/second
    pub x_rate_ms: f64,

    /// Units: meters/second
    pub y_rate_ms: f64,

    /// Units: radians/second
    pub heading_rate_rads: f64,
}

/// Control demand for a unicycle vehicle.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlInput {
    /// Forward speed along the current heading.
    ///
    /// Units: meters/second
    pub speed_ms: f64,

    /// Rate of change of heading.
    ///
    /// Units: radians/second
    pub ang_rate_rads: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl VehicleState {
    pub fn new(x_m: f64, y_m: f64, heading_rad: f64) -> Self {
        Self { x_m, y_m, heading_rad }
    }

    /// The position of the vehicle.
    pub fn position_m(&self) -> Point2<f64> {
        Point2::new(self.x_m, self.y_m)
    }

    /// The state as an `(x, y, heading)` vector.
    pub fn to_vector(&self) -> Vector3<f64> {
        Vector3::new(self.x_m, self.y_m, self.heading_rad)
    }

    pub fn from_vector(v: &Vector3<f64>) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    pub fn is_finite(&self) -> bool {
        self.x_m.is_finite() && self.y_m.is_finite() && self.heading_rad.is_finite()
    }

    /// The heading wrapped into [0, 2pi).
    ///
    /// Integration does not wrap the heading, so it grows without bound while turning.
    pub fn wrapped_heading_rad(&self) -> f64 {
        wrap_2pi(self.heading_rad)
    }
}

impl StateDerivative {
    pub fn new(x_rate_ms: f64, y_rate_ms: f64, heading_rate_rads: f64) -> Self {
        Self {
            x_rate_ms,
            y_rate_ms,
            heading_rate_rads,
        }
    }

    pub fn to_vector(&self) -> Vector3<f64> {
        Vector3::new(self.x_rate_ms, self.y_rate_ms, self.heading_rate_rads)
    }

    pub fn from_vector(v: &Vector3<f64>) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    pub fn is_finite(&self) -> bool {
        self.x_rate_ms.is_finite()
            && self.y_rate_ms.is_finite()
            && self.heading_rate_rads.is_finite()
    }
}

impl ControlInput {
    pub fn new(speed_ms: f64, ang_rate_rads: f64) -> Self {
        Self {
            speed_ms,
            ang_rate_rads,
        }
    }

    /// Radius of the circle driven under this input, or `None` when not turning.
    pub fn turn_radius_m(&self) -> Option<f64> {
        if self.ang_rate_rads == 0.0 {
            None
        } else {
            Some(self.speed_ms / self.ang_rate_rads)
        }
    }
}
