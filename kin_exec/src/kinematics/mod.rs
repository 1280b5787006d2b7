//! # Kinematics module
//!
//! The nonlinear unicycle (differential drive) kinematic model. Forward speed is applied along the
//! current heading and angular speed sets the heading rate:
//!
//! ```text
//! x' = v cos(theta)
//! y' = v sin(theta)
//! theta' = w
//! ```

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod control;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use control::*;
pub use state::*;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A unicycle model bound to a control policy.
#[derive(Debug, Clone, Copy)]
pub struct UnicycleModel<C = ControlFn> {
    control: C,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the derivative of the state at time `time_s` under the given control policy.
pub fn unicycle_derivative<C>(time_s: f64, state: &VehicleState, control: C) -> StateDerivative
where
    C: Fn(f64, &VehicleState) -> ControlInput,
{
    let input = control(time_s, state);
    let (sin, cos) = state.heading_rad.sin_cos();

    StateDerivative {
        x_rate_ms: input.speed_ms * cos,
        y_rate_ms: input.speed_ms * sin,
        heading_rate_rads: input.ang_rate_rads,
    }
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for UnicycleModel<ControlFn> {
    fn default() -> Self {
        Self {
            control: no_control,
        }
    }
}

impl<C> UnicycleModel<C>
where
    C: Fn(f64, &VehicleState) -> ControlInput,
{
    pub fn new(control: C) -> Self {
        Self { control }
    }

    /// The control demand at the given time and state.
    pub fn control(&self, time_s: f64, state: &VehicleState) -> ControlInput {
        (self.control)(time_s, state)
    }

    /// The state derivative at the given time and state.
    pub fn derivative(&self, time_s: f64, state: &VehicleState) -> StateDerivative {
        unicycle_derivative(time_s, state, &self.control)
    }
}
