//! Points tagged with the frame they are expressed in

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::{Point2, Vector3};
use serde::{Deserialize, Serialize};

use super::{FrameError, FrameId, STRUCTURE_TOL};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A 2D point expressed in a named frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FramedPoint {
    /// The frame the position is expressed in
    pub frame: FrameId,

    /// The position in `frame`
    pub position_m: Point2<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl FramedPoint {
    pub fn new<F: Into<FrameId>>(frame: F, x_m: f64, y_m: f64) -> Self {
        Self {
            frame: frame.into(),
            position_m: Point2::new(x_m, y_m),
        }
    }

    /// The homogeneous form `(x, y, 1)` of the point.
    pub fn homogeneous(&self) -> Vector3<f64> {
        Vector3::new(self.position_m.x, self.position_m.y, 1.0)
    }

    /// Build a point from its homogeneous form.
    ///
    /// The third component must be 1 to within [`STRUCTURE_TOL`].
    pub fn from_homogeneous<F: Into<FrameId>>(
        frame: F,
        coords: &Vector3<f64>,
    ) -> Result<Self, FrameError> {
        if !((coords[2] - 1.0).abs() <= STRUCTURE_TOL) {
            return Err(FrameError::NotHomogeneous(coords[2]));
        }

        Ok(Self::new(frame, coords[0], coords[1]))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_homogeneous() {
        let p = FramedPoint::new("A", 1.5, -2.0);
        assert_eq!(p.homogeneous(), Vector3::new(1.5, -2.0, 1.0));

        let q = FramedPoint::from_homogeneous("A", &p.homogeneous()).unwrap();
        assert_eq!(p, q);

        match FramedPoint::from_homogeneous("A", &Vector3::new(1.0, 1.0, 2.0)) {
            Err(FrameError::NotHomogeneous(w)) => assert_eq!(w, 2.0),
            r => panic!("Expected a homogeneous error, got {:?}", r),
        }

        assert!(FramedPoint::from_homogeneous("A", &Vector3::new(0.0, 0.0, f64::NAN)).is_err());
    }
}
