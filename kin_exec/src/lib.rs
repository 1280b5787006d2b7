//! # Frames and kinematics library.
//!
//! This library provides 2D rigid-body frame transforms and a unicycle kinematic model with an
//! adaptive-step integrator for producing trajectories.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Frame transforms - rotations and homogeneous rigid transforms between named frames
pub mod frames;

/// Integration - adaptive-step explicit Runge-Kutta solvers
pub mod integrate;

/// Kinematics - the unicycle model and its control policies
pub mod kinematics;

/// Executable parameters
pub mod params;

/// Trajectory - the samples produced by an integration
pub mod trajectory;
