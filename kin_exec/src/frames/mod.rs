//! # Frames module
//!
//! Rotations and homogeneous rigid-body transforms in the plane, and named frames for keeping
//! track of which coordinate system a point is expressed in.
//!
//! A transform named `T_OA` maps coordinates in frame A into frame O, i.e. it is constructed from
//! the rotation of A relative to O and the origin of A expressed in O.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod point;
mod rotation;
mod transform;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::fmt;

pub use point::*;
pub use rotation::*;
pub use transform::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Tolerance used when checking the structure of homogeneous points and transforms.
pub const STRUCTURE_TOL: f64 = 1e-9;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The name of a 2D coordinate frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameId(String);

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors that can occur while working with frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("The transform matrix is singular and cannot be inverted")]
    Singular,

    #[error("Expected a homogeneous point with a third component of 1, found {0}")]
    NotHomogeneous(f64),

    #[error("The matrix is not a rigid homogeneous transform: {0}")]
    MalformedTransform(String),

    #[error("Expected a value in frame {expected}, found frame {found}")]
    FrameMismatch {
        expected: FrameId,
        found: FrameId
    },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl FrameId {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FrameId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
