//! # Integration module
//!
//! Adaptive step explicit Runge-Kutta integration of the vehicle state. The step size is chosen
//! by comparing each step against an embedded lower order solution, so the samples in the
//! resulting trajectory are not evenly spaced in time.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod solver;
mod tableau;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use serde::{Deserialize, Serialize};

// Internal
pub use params::*;
pub use tableau::*;
use crate::kinematics::{StateDerivative, VehicleState};
use crate::trajectory::Trajectory;
use solver::RkSolver;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Statistics on an integration run.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationReport {
    /// The method used
    pub method: Method,

    /// Number of accepted steps
    pub num_steps: usize,

    /// Number of steps rejected for exceeding the tolerance
    pub num_rejected: usize,

    /// Number of derivative evaluations
    pub num_evals: usize,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Available integration methods.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    /// Bogacki-Shampine 3(2)
    #[serde(rename = "RK23")]
    Rk23,

    /// Dormand-Prince 5(4)
    #[serde(rename = "RK45")]
    Rk45,
}

/// Errors that can occur during integration.
///
/// On any error no trajectory is produced.
#[derive(Debug, thiserror::Error)]
pub enum IntegrationError {
    #[error("Invalid time span ({start_s}, {end_s}), expected finite bounds with start < end")]
    InvalidTimeSpan {
        start_s: f64,
        end_s: f64
    },

    #[error("Invalid integration parameters: {0}")]
    InvalidParams(String),

    #[error("The state or its derivative became non-finite at t = {time_s} s")]
    NonFiniteState {
        time_s: f64
    },

    #[error("Required step size {step_s:e} s at t = {time_s} s is below the minimum step")]
    StepSizeTooSmall {
        time_s: f64,
        step_s: f64
    },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Method {
    pub fn tableau(&self) -> &'static ButcherTableau {
        match self {
            Method::Rk23 => &RK23,
            Method::Rk45 => &RK45,
        }
    }
}

impl Default for Method {
    fn default() -> Self {
        Method::Rk23
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Integrate the state derivative over `t_span_s` from `initial_state`.
///
/// The trajectory starts with the initial state at `t_span_s.0` and ends with a sample at exactly
/// `t_span_s.1`. The intermediate samples are the accepted steps of the integrator.
pub fn integrate_trajectory<F>(
    derivative: F,
    t_span_s: (f64, f64),
    initial_state: VehicleState,
    method: Method,
    params: &IntegrationParams,
) -> Result<Trajectory, IntegrationError>
where
    F: FnMut(f64, &VehicleState) -> StateDerivative,
{
    let (start_s, end_s) = t_span_s;
    if !start_s.is_finite() || !end_s.is_finite() || start_s >= end_s {
        return Err(IntegrationError::InvalidTimeSpan { start_s, end_s });
    }

    let params = params.validated(end_s - start_s)?;

    let report = IntegrationReport {
        method,
        num_steps: 0,
        num_rejected: 0,
        num_evals: 0,
    };

    let mut solver = RkSolver::new(
        derivative,
        t_span_s,
        &initial_state,
        method.tableau(),
        params,
        report,
    )?;

    let mut samples = vec![solver.sample()];

    while !solver.finished() {
        solver.step()?;
        samples.push(solver.sample());
    }

    debug!(
        "Integrated ({}, {}) s with {:?}: {} steps, {} rejected, {} evaluations",
        start_s,
        end_s,
        method,
        solver.report.num_steps,
        solver.report.num_rejected,
        solver.report.num_evals
    );

    Ok(Trajectory::new(samples, solver.report))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::kinematics::{constant_control, ControlInput, UnicycleModel};
    use std::f64::consts::PI;
    use util::maths::get_ang_dist_2pi;

    fn tight() -> IntegrationParams {
        IntegrationParams {
            rtol: 1e-9,
            atol: 1e-12,
            ..Default::default()
        }
    }

    fn turn_model() -> UnicycleModel<impl Fn(f64, &VehicleState) -> ControlInput + Copy> {
        UnicycleModel::new(constant_control(ControlInput::new(0.5, PI / 6.0)))
    }

    #[test]
    fn test_zero_control_is_constant() {
        let model: UnicycleModel = UnicycleModel::default();
        let initial = VehicleState::new(1.5, -2.0, 0.7);

        for &method in [Method::Rk23, Method::Rk45].iter() {
            let traj = integrate_trajectory(
                |t, s: &VehicleState| model.derivative(t, s),
                (2.0, 12.0),
                initial,
                method,
                &IntegrationParams::default(),
            )
            .unwrap();

            assert!(traj.len() >= 2);
            assert_eq!(traj.initial().time_s, 2.0);
            assert_eq!(traj.last().time_s, 12.0);
            for sample in traj.samples() {
                assert_eq!(sample.state, initial);
            }
        }
    }

    #[test]
    fn test_constant_turn() {
        let model = turn_model();
        let radius = 3.0 / PI;

        let traj = integrate_trajectory(
            |t, s: &VehicleState| model.derivative(t, s),
            (0.0, 10.0),
            VehicleState::default(),
            Method::Rk45,
            &tight(),
        )
        .unwrap();

        let last = traj.last();
        assert_eq!(last.time_s, 10.0);
        assert!(get_ang_dist_2pi(last.state.heading_rad, 5.0 * PI / 3.0).abs() < 1e-9);

        // Every sample lies on the circle of radius v/w centred on (0, r)
        for sample in traj.samples() {
            let dx = sample.state.x_m;
            let dy = sample.state.y_m - radius;
            assert!(((dx * dx + dy * dy).sqrt() - radius).abs() < 1e-6);
        }

        // Final position after turning through 5pi/3
        assert!((last.state.x_m + radius * 3f64.sqrt() / 2.0).abs() < 1e-6);
        assert!((last.state.y_m - radius / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_constant_turn_default_tolerances() {
        let model = turn_model();
        let radius = 3.0 / PI;

        let traj = integrate_trajectory(
            |t, s: &VehicleState| model.derivative(t, s),
            (0.0, 10.0),
            VehicleState::default(),
            Method::Rk23,
            &IntegrationParams::default(),
        )
        .unwrap();

        let last = traj.last();
        assert!(get_ang_dist_2pi(last.state.heading_rad, 5.0 * PI / 3.0).abs() < 1e-6);
        assert!((last.state.x_m + radius * 3f64.sqrt() / 2.0).abs() < 5e-2);
        assert!((last.state.y_m - radius / 2.0).abs() < 5e-2);

        // Samples are ordered and not evenly spaced
        let times = traj.times_s();
        assert!(times.windows(2).all(|w| w[1] > w[0]));
        assert_eq!(traj.report().num_steps, traj.len() - 1);
        assert_eq!(traj.report().method, Method::Rk23);
    }

    #[test]
    fn test_higher_order_takes_fewer_steps() {
        let model = turn_model();

        let run = |method| {
            integrate_trajectory(
                |t, s: &VehicleState| model.derivative(t, s),
                (0.0, 10.0),
                VehicleState::default(),
                method,
                &tight(),
            )
            .unwrap()
        };

        let rk23 = run(Method::Rk23);
        let rk45 = run(Method::Rk45);

        assert!(rk45.report().num_steps < rk23.report().num_steps);
    }

    #[test]
    fn test_max_step() {
        let model = turn_model();
        let params = IntegrationParams {
            max_step_s: 0.25,
            ..Default::default()
        };

        let traj = integrate_trajectory(
            |t, s: &VehicleState| model.derivative(t, s),
            (0.0, 10.0),
            VehicleState::default(),
            Method::Rk45,
            &params,
        )
        .unwrap();

        let times = traj.times_s();
        assert!(times.windows(2).all(|w| w[1] - w[0] <= 0.25 + 1e-12));
        assert!(traj.len() >= 41);
    }

    #[test]
    fn test_first_step() {
        let model = turn_model();
        let params = IntegrationParams {
            first_step_s: Some(0.01),
            ..Default::default()
        };

        let traj = integrate_trajectory(
            |t, s: &VehicleState| model.derivative(t, s),
            (0.0, 1.0),
            VehicleState::default(),
            Method::Rk23,
            &params,
        )
        .unwrap();

        assert!((traj.samples()[1].time_s - 0.01).abs() < 1e-15);
    }

    #[test]
    fn test_invalid_time_span() {
        let model: UnicycleModel = UnicycleModel::default();

        for &span in [(1.0, 1.0), (2.0, 1.0), (0.0, f64::NAN), (f64::NEG_INFINITY, 0.0)].iter() {
            let r = integrate_trajectory(
                |t, s: &VehicleState| model.derivative(t, s),
                span,
                VehicleState::default(),
                Method::Rk23,
                &IntegrationParams::default(),
            );

            assert!(matches!(r, Err(IntegrationError::InvalidTimeSpan { .. })));
        }
    }

    #[test]
    fn test_non_finite_derivative() {
        let model = UnicycleModel::new(|t: f64, _: &VehicleState| {
            if t < 1.0 {
                ControlInput::new(1.0, 0.0)
            } else {
                ControlInput::new(f64::NAN, 0.0)
            }
        });

        let r = integrate_trajectory(
            |t, s: &VehicleState| model.derivative(t, s),
            (0.0, 5.0),
            VehicleState::default(),
            Method::Rk23,
            &IntegrationParams::default(),
        );

        match r {
            Err(IntegrationError::NonFiniteState { time_s }) => assert!(time_s >= 1.0),
            r => panic!("Expected a non-finite state error, got {:?}", r),
        }

        let r = integrate_trajectory(
            |t, s: &VehicleState| model.derivative(t, s),
            (0.0, 5.0),
            VehicleState::new(f64::INFINITY, 0.0, 0.0),
            Method::Rk23,
            &IntegrationParams::default(),
        );
        assert!(matches!(r, Err(IntegrationError::NonFiniteState { .. })));
    }

    #[test]
    fn test_finite_time_blow_up() {
        // Heading is 1/(1 - t), which escapes to infinity at t = 1
        let r = integrate_trajectory(
            |_, s: &VehicleState| StateDerivative::new(0.0, 0.0, s.heading_rad * s.heading_rad),
            (0.0, 2.0),
            VehicleState::new(0.0, 0.0, 1.0),
            Method::Rk45,
            &IntegrationParams::default(),
        );

        assert!(matches!(
            r,
            Err(IntegrationError::StepSizeTooSmall { .. })
                | Err(IntegrationError::NonFiniteState { .. })
        ));
    }
}
