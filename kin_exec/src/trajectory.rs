//! # Trajectory
//!
//! The ordered `(time, state)` samples produced by one integration run.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{Point2, Vector3};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

// Internal
use crate::{
    frames::{apply_transform, FrameTransform},
    integrate::IntegrationReport,
    kinematics::VehicleState,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A single sample of a trajectory.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajSample {
    /// Units: seconds
    pub time_s: f64,

    pub state: VehicleState,
}

/// Flat form of a [`TrajSample`] used for CSV archives.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajRecord {
    pub time_s: f64,
    pub x_m: f64,
    pub y_m: f64,
    pub heading_rad: f64,
}

/// A trajectory produced by integrating the vehicle state.
///
/// Always holds at least the initial sample, and samples are strictly increasing in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "TrajectoryData")]
pub struct Trajectory {
    samples: Vec<TrajSample>,

    report: IntegrationReport,
}

/// Unchecked form of a [`Trajectory`] read from a file, converted with `TryFrom`.
#[derive(Debug, Deserialize)]
pub struct TrajectoryData {
    samples: Vec<TrajSample>,

    report: IntegrationReport,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors raised when building a trajectory from existing samples.
#[derive(Debug, thiserror::Error)]
pub enum TrajectoryError {
    #[error("A trajectory must contain at least one sample")]
    NoSamples,

    #[error("Sample times must be strictly increasing, found {prev_s} s followed by {next_s} s")]
    NotIncreasing {
        prev_s: f64,
        next_s: f64
    },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TryFrom<TrajectoryData> for Trajectory {
    type Error = TrajectoryError;

    fn try_from(data: TrajectoryData) -> Result<Self, Self::Error> {
        if data.samples.is_empty() {
            return Err(TrajectoryError::NoSamples);
        }

        for w in data.samples.windows(2) {
            if !(w[1].time_s > w[0].time_s) {
                return Err(TrajectoryError::NotIncreasing {
                    prev_s: w[0].time_s,
                    next_s: w[1].time_s,
                });
            }
        }

        Ok(Self::new(data.samples, data.report))
    }
}

impl Trajectory {
    pub(crate) fn new(samples: Vec<TrajSample>, report: IntegrationReport) -> Self {
        Self { samples, report }
    }

    pub fn samples(&self) -> &[TrajSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The sample at the start of the interval.
    pub fn initial(&self) -> &TrajSample {
        &self.samples[0]
    }

    /// The sample at the end of the interval.
    pub fn last(&self) -> &TrajSample {
        &self.samples[self.samples.len() - 1]
    }

    pub fn report(&self) -> &IntegrationReport {
        &self.report
    }

    pub fn times_s(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.time_s).collect()
    }

    /// The `(x, y)` positions of each sample, for plotting.
    pub fn positions(&self) -> Vec<Point2<f64>> {
        self.samples.iter().map(|s| s.state.position_m()).collect()
    }

    /// Length of the polyline through the sampled positions.
    ///
    /// This underestimates the length of curved paths, more so the sparser the samples.
    pub fn arc_length_m(&self) -> f64 {
        self.samples
            .windows(2)
            .map(|w| (w[1].state.position_m() - w[0].state.position_m()).norm())
            .sum()
    }

    /// Flat records for archiving.
    pub fn records(&self) -> impl Iterator<Item = TrajRecord> + '_ {
        self.samples.iter().map(|s| TrajRecord {
            time_s: s.time_s,
            x_m: s.state.x_m,
            y_m: s.state.y_m,
            heading_rad: s.state.heading_rad,
        })
    }

    /// Express the trajectory in another frame.
    ///
    /// The states are taken to be in the transform's source frame. Positions are mapped through
    /// the transform and headings are offset by its rotation.
    pub fn transformed(&self, transform: &FrameTransform) -> Self {
        let rotation_rad = transform.rotation_rad();

        let samples = self
            .samples
            .iter()
            .map(|s| {
                let p = apply_transform(
                    transform.matrix(),
                    &Vector3::new(s.state.x_m, s.state.y_m, 1.0),
                );

                TrajSample {
                    time_s: s.time_s,
                    state: VehicleState::new(p[0], p[1], s.state.heading_rad + rotation_rad),
                }
            })
            .collect();

        Self {
            samples,
            report: self.report,
        }
    }
}
