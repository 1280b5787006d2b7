//! Parameters for the kinematics executable

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// Internal
use crate::{
    integrate::{IntegrationParams, Method},
    kinematics::{ControlInput, VehicleState},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the kinematics executable, loaded from `kin_exec.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecParams {
    /// Integrator selection and error control.
    pub integration: IntegrationConfig,

    /// The trajectory to integrate.
    pub trajectory: TrajectoryParams,

    /// The frame transform exercise.
    pub frames: FramesParams,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntegrationConfig {
    /// The integration method, `"RK23"` or `"RK45"`.
    #[serde(default)]
    pub method: Method,

    #[serde(flatten)]
    pub params: IntegrationParams,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrajectoryParams {
    /// State of the vehicle at the start time.
    pub initial_state: VehicleState,

    /// Units: seconds
    pub start_time_s: f64,

    /// Units: seconds
    pub end_time_s: f64,

    /// Constant control demand applied over the whole span.
    pub control: ControlInput,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FramesParams {
    /// Rotation of frame A relative to frame O.
    ///
    /// Units: radians
    pub rotation_rad: f64,

    /// Origin of frame A expressed in frame O.
    ///
    /// Units: meters,
    /// Frame: O
    pub translation_m: [f64; 2],

    /// A point known in frame A, to be expressed in frame O.
    ///
    /// Units: meters,
    /// Frame: A
    pub point_m_a: [f64; 2],

    /// A point known in frame O, to be expressed in frame A.
    ///
    /// Units: meters,
    /// Frame: O
    pub point_m_o: [f64; 2],
}
