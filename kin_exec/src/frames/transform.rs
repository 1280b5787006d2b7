//! Homogeneous rigid-body transforms

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{Matrix2, Matrix3, Vector2, Vector3};
use serde::Serialize;

// Internal
use super::{build_rotation, FrameError, FrameId, FramedPoint, STRUCTURE_TOL};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A homogeneous transform between two named frames.
///
/// `T_OA` has `from = A` and `to = O`, and maps a point known in A into O.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameTransform {
    /// The frame points are expressed in before the transform is applied
    from: FrameId,

    /// The frame points are expressed in after the transform is applied
    to: FrameId,

    /// The homogeneous matrix `[[R, xi], [0, 0, 1]]`
    matrix: Matrix3<f64>,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Build the homogeneous transform for a frame rotated by `theta_rad` whose origin is at `xi_m`.
///
/// `xi_m` is the origin of the source frame expressed in the destination frame.
pub fn build_rigid_transform(theta_rad: f64, xi_m: &Vector2<f64>) -> Matrix3<f64> {
    let r = build_rotation(theta_rad);

    Matrix3::new(
        r[(0, 0)], r[(0, 1)], xi_m[0],
        r[(1, 0)], r[(1, 1)], xi_m[1],
        0.0,       0.0,       1.0
    )
}

/// Apply a transform to a point in homogeneous form.
pub fn apply_transform(transform: &Matrix3<f64>, point: &Vector3<f64>) -> Vector3<f64> {
    transform * point
}

/// Invert a transform, giving the transform for the reverse frame relationship.
///
/// Transforms built by [`build_rigid_transform`] are always invertible, the `Singular` error
/// only occurs for hand-built degenerate matrices.
pub fn invert_transform(transform: &Matrix3<f64>) -> Result<Matrix3<f64>, FrameError> {
    transform.try_inverse().ok_or(FrameError::Singular)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl FrameTransform {
    /// Create the transform from `from` to `to`, where `from` is rotated by `theta_rad` relative to
    /// `to` and has its origin at `xi_m` in `to`'s coordinates.
    pub fn new<F, T>(from: F, to: T, theta_rad: f64, xi_m: Vector2<f64>) -> Self
    where
        F: Into<FrameId>,
        T: Into<FrameId>,
    {
        Self {
            from: from.into(),
            to: to.into(),
            matrix: build_rigid_transform(theta_rad, &xi_m),
        }
    }

    /// Create a transform from an existing matrix, checking that it is a rigid homogeneous
    /// transform.
    pub fn from_matrix<F, T>(from: F, to: T, matrix: Matrix3<f64>) -> Result<Self, FrameError>
    where
        F: Into<FrameId>,
        T: Into<FrameId>,
    {
        if !matrix.iter().all(|v| v.is_finite()) {
            return Err(FrameError::MalformedTransform(String::from(
                "matrix contains non-finite values",
            )));
        }

        if !(matrix[(2, 0)].abs() <= STRUCTURE_TOL)
            || !(matrix[(2, 1)].abs() <= STRUCTURE_TOL)
            || !((matrix[(2, 2)] - 1.0).abs() <= STRUCTURE_TOL)
        {
            return Err(FrameError::MalformedTransform(format!(
                "bottom row is [{}, {}, {}]",
                matrix[(2, 0)],
                matrix[(2, 1)],
                matrix[(2, 2)]
            )));
        }

        let r = Matrix2::new(
            matrix[(0, 0)], matrix[(0, 1)],
            matrix[(1, 0)], matrix[(1, 1)]
        );
        if !((r.transpose() * r - Matrix2::identity()).norm() <= STRUCTURE_TOL)
            || !((r.determinant() - 1.0).abs() <= STRUCTURE_TOL)
        {
            return Err(FrameError::MalformedTransform(String::from(
                "rotation block is not a proper rotation",
            )));
        }

        Ok(Self {
            from: from.into(),
            to: to.into(),
            matrix,
        })
    }

    /// The identity transform of a frame onto itself.
    pub fn identity<F: Into<FrameId>>(frame: F) -> Self {
        let frame = frame.into();

        Self {
            from: frame.clone(),
            to: frame,
            matrix: Matrix3::identity(),
        }
    }

    pub fn from_frame(&self) -> &FrameId {
        &self.from
    }

    pub fn to_frame(&self) -> &FrameId {
        &self.to
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    /// The rotation of the source frame relative to the destination frame, in (-pi, pi].
    pub fn rotation_rad(&self) -> f64 {
        self.matrix[(1, 0)].atan2(self.matrix[(0, 0)])
    }

    /// The origin of the source frame expressed in the destination frame.
    pub fn translation_m(&self) -> Vector2<f64> {
        Vector2::new(self.matrix[(0, 2)], self.matrix[(1, 2)])
    }

    /// Map a point expressed in the source frame into the destination frame.
    pub fn apply(&self, point: &FramedPoint) -> Result<FramedPoint, FrameError> {
        if point.frame != self.from {
            return Err(FrameError::FrameMismatch {
                expected: self.from.clone(),
                found: point.frame.clone(),
            });
        }

        FramedPoint::from_homogeneous(
            self.to.clone(),
            &apply_transform(&self.matrix, &point.homogeneous()),
        )
    }

    /// Get the transform for the reverse relationship, i.e. `T_AO` from `T_OA`.
    pub fn inverse(&self) -> Result<Self, FrameError> {
        Ok(Self {
            from: self.to.clone(),
            to: self.from.clone(),
            matrix: invert_transform(&self.matrix)?,
        })
    }

    /// Chain this transform after `inner`, so `T_OA.compose(&T_AB)` gives `T_OB`.
    pub fn compose(&self, inner: &FrameTransform) -> Result<Self, FrameError> {
        if inner.to != self.from {
            return Err(FrameError::FrameMismatch {
                expected: self.from.clone(),
                found: inner.to.clone(),
            });
        }

        Ok(Self {
            from: inner.from.clone(),
            to: self.to.clone(),
            matrix: self.matrix * inner.matrix,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::PI;

    const TOL: f64 = 1e-9;

    fn t_oa() -> FrameTransform {
        FrameTransform::new("A", "O", PI / 2.0, Vector2::new(1.0, 1.0))
    }

    #[test]
    fn test_structure() {
        let t = build_rigid_transform(0.7, &Vector2::new(-2.0, 3.5));

        assert_eq!(t[(2, 0)], 0.0);
        assert_eq!(t[(2, 1)], 0.0);
        assert_eq!(t[(2, 2)], 1.0);
        assert_eq!(t[(0, 2)], -2.0);
        assert_eq!(t[(1, 2)], 3.5);
    }

    #[test]
    fn test_apply_raw() {
        let t = build_rigid_transform(PI / 2.0, &Vector2::new(1.0, 1.0));
        let p_o = apply_transform(&t, &Vector3::new(1.0, 2.0, 1.0));

        assert!((p_o - Vector3::new(-1.0, 2.0, 1.0)).norm() < TOL);
    }

    #[test]
    fn test_invert_raw() {
        let t = build_rigid_transform(PI / 2.0, &Vector2::new(1.0, 1.0));
        let t_inv = invert_transform(&t).unwrap();

        let p_a = apply_transform(&t_inv, &Vector3::new(1.0, 0.0, 1.0));
        assert!((p_a - Vector3::new(-1.0, 0.0, 1.0)).norm() < TOL);

        // Round trips
        assert!((t * t_inv - Matrix3::identity()).norm() < TOL);
        assert!((invert_transform(&t_inv).unwrap() - t).norm() < TOL);

        // Inverse is the transform built from the reversed relationship
        let r_t = build_rotation(PI / 2.0).transpose();
        let xi_inv = -(r_t * Vector2::new(1.0, 1.0));
        assert!((t_inv - build_rigid_transform(-PI / 2.0, &xi_inv)).norm() < TOL);
    }

    #[test]
    fn test_invert_singular() {
        let m = Matrix3::new(
            1.0, 2.0, 0.0,
            2.0, 4.0, 0.0,
            0.0, 0.0, 1.0
        );

        assert!(matches!(invert_transform(&m), Err(FrameError::Singular)));
    }

    #[test]
    fn test_named_apply() {
        let t = t_oa();

        let p_o = t.apply(&FramedPoint::new("A", 1.0, 2.0)).unwrap();
        assert_eq!(p_o.frame, FrameId::new("O"));
        assert!((p_o.position_m.x + 1.0).abs() < TOL);
        assert!((p_o.position_m.y - 2.0).abs() < TOL);

        let p_a = t.inverse().unwrap().apply(&FramedPoint::new("O", 1.0, 0.0)).unwrap();
        assert_eq!(p_a.frame, FrameId::new("A"));
        assert!((p_a.position_m.x + 1.0).abs() < TOL);
        assert!(p_a.position_m.y.abs() < TOL);

        // Applying to a point in the wrong frame is rejected
        match t.apply(&FramedPoint::new("O", 0.0, 0.0)) {
            Err(FrameError::FrameMismatch { expected, found }) => {
                assert_eq!(expected, FrameId::new("A"));
                assert_eq!(found, FrameId::new("O"));
            }
            r => panic!("Expected a frame mismatch, got {:?}", r),
        }
    }

    #[test]
    fn test_compose() {
        let t_oa = t_oa();
        let t_ab = FrameTransform::new("B", "A", -PI / 4.0, Vector2::new(2.0, 0.0));

        let t_ob = t_oa.compose(&t_ab).unwrap();
        assert_eq!(t_ob.from_frame(), &FrameId::new("B"));
        assert_eq!(t_ob.to_frame(), &FrameId::new("O"));
        assert!((t_ob.rotation_rad() - PI / 4.0).abs() < TOL);

        // Chaining point by point matches the composed transform
        let p_b = FramedPoint::new("B", 0.5, -1.5);
        let direct = t_ob.apply(&p_b).unwrap();
        let chained = t_oa.apply(&t_ab.apply(&p_b).unwrap()).unwrap();
        assert!((direct.position_m - chained.position_m).norm() < TOL);

        // Composing with the inverse gives the identity
        let t_oo = t_oa.compose(&t_oa.inverse().unwrap()).unwrap();
        assert!((t_oo.matrix() - Matrix3::identity()).norm() < TOL);

        assert!(matches!(
            t_ab.compose(&t_ab),
            Err(FrameError::FrameMismatch { .. })
        ));
    }

    #[test]
    fn test_rotation_and_translation() {
        let t = FrameTransform::new("A", "O", -2.0, Vector2::new(4.0, -1.0));

        assert!((t.rotation_rad() + 2.0).abs() < TOL);
        assert_eq!(t.translation_m(), Vector2::new(4.0, -1.0));

        let inv = t.inverse().unwrap();
        assert!((inv.rotation_rad() - 2.0).abs() < TOL);
    }

    #[test]
    fn test_from_matrix() {
        let m = build_rigid_transform(1.0, &Vector2::new(0.5, 0.5));
        let t = FrameTransform::from_matrix("A", "O", m).unwrap();
        assert_eq!(t.matrix(), &m);

        let mut bad_row = m;
        bad_row[(2, 0)] = 0.1;
        assert!(matches!(
            FrameTransform::from_matrix("A", "O", bad_row),
            Err(FrameError::MalformedTransform(_))
        ));

        // Non-finite entries anywhere are rejected
        let mut nan_row = m;
        nan_row[(2, 0)] = f64::NAN;
        nan_row[(2, 2)] = f64::NAN;
        assert!(matches!(
            FrameTransform::from_matrix("A", "O", nan_row),
            Err(FrameError::MalformedTransform(_))
        ));

        let mut nan_rot = m;
        nan_rot[(0, 1)] = f64::NAN;
        assert!(matches!(
            FrameTransform::from_matrix("A", "O", nan_rot),
            Err(FrameError::MalformedTransform(_))
        ));

        let mut inf_xi = m;
        inf_xi[(0, 2)] = f64::INFINITY;
        assert!(matches!(
            FrameTransform::from_matrix("A", "O", inf_xi),
            Err(FrameError::MalformedTransform(_))
        ));

        let mut scaled = m;
        scaled[(0, 0)] *= 2.0;
        assert!(matches!(
            FrameTransform::from_matrix("A", "O", scaled),
            Err(FrameError::MalformedTransform(_))
        ));

        let ident = FrameTransform::identity("O");
        let p = ident.apply(&FramedPoint::new("O", 3.0, 4.0)).unwrap();
        assert_eq!(p, FramedPoint::new("O", 3.0, 4.0));
    }
}
