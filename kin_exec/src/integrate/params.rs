//! Integration parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::warn;
use serde::{Deserialize, Serialize};

use super::IntegrationError;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Smallest relative tolerance honoured, tighter requests are raised to this.
pub const MIN_RTOL: f64 = 100.0 * f64::EPSILON;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Error control parameters for the adaptive integrators.
///
/// A step is accepted when the RMS of `error / (atol + rtol * |y|)` is below one.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationParams {
    /// Relative tolerance
    pub rtol: f64,

    /// Absolute tolerance
    pub atol: f64,

    /// Largest step the integrator may take.
    ///
    /// Units: seconds
    pub max_step_s: f64,

    /// Size of the first step, chosen automatically when `None`.
    ///
    /// Units: seconds
    pub first_step_s: Option<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for IntegrationParams {
    fn default() -> Self {
        Self {
            rtol: 1e-3,
            atol: 1e-6,
            max_step_s: f64::INFINITY,
            first_step_s: None,
        }
    }
}

impl IntegrationParams {
    /// Check the parameters against an integration interval, returning the parameters to use.
    pub(crate) fn validated(&self, interval_s: f64) -> Result<Self, IntegrationError> {
        let mut params = *self;

        if !(params.rtol > 0.0) || !params.rtol.is_finite() {
            return Err(IntegrationError::InvalidParams(format!(
                "rtol must be positive and finite, found {}",
                params.rtol
            )));
        }
        if params.rtol < MIN_RTOL {
            warn!("rtol {} is too small, using {}", params.rtol, MIN_RTOL);
            params.rtol = MIN_RTOL;
        }

        if !(params.atol > 0.0) || !params.atol.is_finite() {
            return Err(IntegrationError::InvalidParams(format!(
                "atol must be positive and finite, found {}",
                params.atol
            )));
        }

        if !(params.max_step_s > 0.0) {
            return Err(IntegrationError::InvalidParams(format!(
                "max_step_s must be positive, found {}",
                params.max_step_s
            )));
        }

        if let Some(h) = params.first_step_s {
            if !(h > 0.0) || h > interval_s {
                return Err(IntegrationError::InvalidParams(format!(
                    "first_step_s must be in (0, {}], found {}",
                    interval_s, h
                )));
            }
        }

        Ok(params)
    }
}
