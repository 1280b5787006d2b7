//! 2D rotation matrices

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Matrix2;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Build the rotation matrix for a counter-clockwise rotation of `theta_rad`.
///
/// The matrix maps coordinates in a frame rotated by `theta_rad` into the reference frame:
///
/// ```text
/// R = | cos -sin |
///     | sin  cos |
/// ```
pub fn build_rotation(theta_rad: f64) -> Matrix2<f64> {
    let (s, c) = theta_rad.sin_cos();

    Matrix2::new(
        c, -s,
        s, c
    )
}
