//! Adaptive step Runge-Kutta stepper

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use nalgebra::Vector3;
use util::maths::rms;

// Internal
use super::{ButcherTableau, IntegrationError, IntegrationParams, IntegrationReport};
use crate::kinematics::{StateDerivative, VehicleState};
use crate::trajectory::TrajSample;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Multiplier applied to the optimal step factor.
const SAFETY: f64 = 0.9;

/// Smallest factor a step can shrink by in one go.
const MIN_FACTOR: f64 = 0.2;

/// Largest factor a step can grow by in one go.
const MAX_FACTOR: f64 = 10.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Integrates the state forward one accepted step at a time.
pub(crate) struct RkSolver<F> {
    fun: F,

    tableau: &'static ButcherTableau,

    params: IntegrationParams,

    /// Time at which the integration stops
    t_bound_s: f64,

    /// Time of the current state
    time_s: f64,

    /// Current state
    y: Vector3<f64>,

    /// Derivative at the current state
    f: Vector3<f64>,

    /// Magnitude of the next step to attempt
    h_abs: f64,

    pub(crate) report: IntegrationReport,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<F> RkSolver<F>
where
    F: FnMut(f64, &VehicleState) -> StateDerivative,
{
    /// Create a new solver, evaluating the initial derivative and choosing the first step.
    ///
    /// `params` must already have been validated against the interval.
    pub fn new(
        fun: F,
        t_span_s: (f64, f64),
        initial_state: &VehicleState,
        tableau: &'static ButcherTableau,
        params: IntegrationParams,
        report: IntegrationReport,
    ) -> Result<Self, IntegrationError> {
        if !initial_state.is_finite() {
            return Err(IntegrationError::NonFiniteState { time_s: t_span_s.0 });
        }

        let mut solver = Self {
            fun,
            tableau,
            params,
            t_bound_s: t_span_s.1,
            time_s: t_span_s.0,
            y: initial_state.to_vector(),
            f: Vector3::zeros(),
            h_abs: 0.0,
            report,
        };

        let y0 = solver.y;
        solver.f = solver.eval(solver.time_s, &y0)?;
        solver.h_abs = match params.first_step_s {
            Some(h) => h,
            None => solver.select_initial_step()?,
        };

        Ok(solver)
    }

    /// True once the state has reached the end of the interval.
    pub fn finished(&self) -> bool {
        self.time_s >= self.t_bound_s
    }

    /// The current time and state.
    pub fn sample(&self) -> TrajSample {
        TrajSample {
            time_s: self.time_s,
            state: VehicleState::from_vector(&self.y),
        }
    }

    /// Take one accepted step, retrying with smaller steps until the error is within tolerance.
    pub fn step(&mut self) -> Result<(), IntegrationError> {
        let min_step = step_floor(self.time_s);
        let exponent = self.tableau.error_exponent();

        let mut h_abs = if self.h_abs > self.params.max_step_s {
            self.params.max_step_s
        } else if self.h_abs < min_step {
            min_step
        } else {
            self.h_abs
        };

        let mut rejected = false;

        loop {
            if h_abs < min_step {
                return Err(IntegrationError::StepSizeTooSmall {
                    time_s: self.time_s,
                    step_s: h_abs,
                });
            }

            // Never step past the end of the interval
            let t_new = (self.time_s + h_abs).min(self.t_bound_s);
            let h = t_new - self.time_s;
            h_abs = h;

            let (y_new, f_new, error) = self.rk_step(h)?;

            let (rtol, atol) = (self.params.rtol, self.params.atol);
            let scale = self
                .y
                .zip_map(&y_new, |a, b| atol + a.abs().max(b.abs()) * rtol);
            let error_norm = rms(error.component_div(&scale).as_slice());

            if !error_norm.is_finite() {
                return Err(IntegrationError::NonFiniteState { time_s: t_new });
            }

            if error_norm < 1.0 {
                let mut factor = if error_norm == 0.0 {
                    MAX_FACTOR
                } else {
                    MAX_FACTOR.min(SAFETY * error_norm.powf(exponent))
                };

                if rejected {
                    factor = factor.min(1.0);
                }

                self.h_abs = h_abs * factor;
                self.time_s = t_new;
                self.y = y_new;
                self.f = f_new;
                self.report.num_steps += 1;

                return Ok(());
            }

            self.report.num_rejected += 1;
            trace!(
                "Rejected step of {:.3e} s at t = {:.6} s (error norm {:.3})",
                h_abs,
                self.time_s,
                error_norm
            );

            h_abs *= MIN_FACTOR.max(SAFETY * error_norm.powf(exponent));
            rejected = true;
        }
    }

    /// Evaluate the derivative, rejecting non-finite values.
    fn eval(&mut self, time_s: f64, y: &Vector3<f64>) -> Result<Vector3<f64>, IntegrationError> {
        self.report.num_evals += 1;

        let deriv = (self.fun)(time_s, &VehicleState::from_vector(y));

        if !deriv.is_finite() {
            return Err(IntegrationError::NonFiniteState { time_s });
        }

        Ok(deriv.to_vector())
    }

    /// Perform a single Runge-Kutta step of size `h` without error control.
    ///
    /// Returns the new state, the derivative at the new state and the local error estimate.
    fn rk_step(
        &mut self,
        h: f64,
    ) -> Result<(Vector3<f64>, Vector3<f64>, Vector3<f64>), IntegrationError> {
        let tab = self.tableau;
        let mut k: Vec<Vector3<f64>> = Vec::with_capacity(tab.num_stages() + 1);
        k.push(self.f);

        for s in 1..tab.num_stages() {
            let mut dy: Vector3<f64> = Vector3::zeros();
            for (k_j, a) in k.iter().zip(tab.a[s].iter()) {
                dy += k_j * *a;
            }

            let y_s = self.y + dy * h;
            let k_s = self.eval(self.time_s + tab.c[s] * h, &y_s)?;
            k.push(k_s);
        }

        let mut incr: Vector3<f64> = Vector3::zeros();
        for (k_j, b) in k.iter().zip(tab.b.iter()) {
            incr += k_j * *b;
        }
        let y_new = self.y + incr * h;

        if !y_new.iter().all(|v| v.is_finite()) {
            return Err(IntegrationError::NonFiniteState {
                time_s: self.time_s + h,
            });
        }

        let f_new = self.eval(self.time_s + h, &y_new)?;
        k.push(f_new);

        let mut error: Vector3<f64> = Vector3::zeros();
        for (k_j, e) in k.iter().zip(tab.e.iter()) {
            error += k_j * *e;
        }

        Ok((y_new, f_new, error * h))
    }

    /// Choose the size of the first step from the initial state and derivative.
    ///
    /// See Hairer, Norsett and Wanner, "Solving Ordinary Differential Equations I", section II.4.
    fn select_initial_step(&mut self) -> Result<f64, IntegrationError> {
        let interval_s = self.t_bound_s - self.time_s;
        let (rtol, atol) = (self.params.rtol, self.params.atol);

        let scale = self.y.map(|v| atol + v.abs() * rtol);
        let d0 = rms(self.y.component_div(&scale).as_slice());
        let d1 = rms(self.f.component_div(&scale).as_slice());

        let h0: f64 = if d0 < 1e-5 || d1 < 1e-5 {
            1e-6
        } else {
            0.01 * d0 / d1
        };
        let h0 = h0.min(interval_s);

        // Explicit Euler step to estimate the second derivative
        let y1 = self.y + self.f * h0;
        let f1 = self.eval(self.time_s + h0, &y1)?;
        let d2 = rms((f1 - self.f).component_div(&scale).as_slice()) / h0;

        let h1 = if d1 <= 1e-15 && d2 <= 1e-15 {
            (1e-6f64).max(h0 * 1e-3)
        } else {
            (0.01 / d1.max(d2)).powf(1.0 / (self.tableau.order as f64 + 1.0))
        };

        Ok((100.0 * h0).min(h1).min(interval_s))
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Smallest meaningful step at `time_s`, ten times the distance to the next representable time.
fn step_floor(time_s: f64) -> f64 {
    let next = if time_s == 0.0 {
        f64::from_bits(1)
    } else if time_s > 0.0 {
        f64::from_bits(time_s.to_bits() + 1)
    } else {
        f64::from_bits(time_s.to_bits() - 1)
    };

    10.0 * (next - time_s).abs()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_step_floor() {
        assert!(step_floor(0.0) > 0.0);
        assert_eq!(step_floor(1.0), 10.0 * f64::EPSILON);
        assert_eq!(step_floor(-1.0), 10.0 * f64::EPSILON / 2.0);
        assert!(step_floor(1e6) > step_floor(1.0));
    }
}
