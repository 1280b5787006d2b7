//! Kinematics executable entry point.
//!
//! # Architecture
//!
//! The executable runs the two exercises the library supports:
//!
//!     - Frame transforms:
//!         - Build `T_OA` from the rotation and translation of frame A in frame O
//!         - Express a point known in A in frame O
//!         - Invert `T_OA` and express a point known in O in frame A
//!     - Kinematics:
//!         - Integrate the unicycle model under a constant control demand
//!         - Archive the trajectory, and the same trajectory expressed in frame A
//!
//! Parameters are loaded from `params/kin_exec.toml` in the software root (`KIN_SW_ROOT`).

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::info;
use nalgebra::Vector2;
use serde::Serialize;

// Internal
use kin_lib::{
    frames::{FrameTransform, FramedPoint},
    integrate::{integrate_trajectory, IntegrationReport},
    kinematics::{constant_control, UnicycleModel, VehicleState},
    params::ExecParams,
    trajectory::Trajectory,
};
use util::{
    archive::Archiver,
    logger::{logger_init, LevelFilter},
    maths::get_ang_dist_2pi,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Summary of the run, saved into the session directory.
#[derive(Serialize)]
struct RunSummary {
    t_oa: FrameTransform,
    point_in_o: FramedPoint,
    point_in_a: FramedPoint,
    final_state: VehicleState,
    arc_length_m: f64,
    report: IntegrationReport,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("kin_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    info!("Frames and Kinematics Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let params: ExecParams =
        util::params::load("kin_exec.toml").wrap_err("Could not load exec params")?;

    info!("Exec parameters loaded");

    // ---- FRAME TRANSFORMS ----

    let t_oa = FrameTransform::new(
        "A",
        "O",
        params.frames.rotation_rad,
        Vector2::from(params.frames.translation_m),
    );
    info!("T_OA = {}", t_oa.matrix());

    let p_a = FramedPoint::new("A", params.frames.point_m_a[0], params.frames.point_m_a[1]);
    let point_in_o = t_oa
        .apply(&p_a)
        .wrap_err("Could not express the point in frame O")?;
    info!("{:?} in A is {:?} in O", p_a.position_m, point_in_o.position_m);

    let t_ao = t_oa.inverse().wrap_err("Could not invert T_OA")?;
    let p_o = FramedPoint::new("O", params.frames.point_m_o[0], params.frames.point_m_o[1]);
    let point_in_a = t_ao
        .apply(&p_o)
        .wrap_err("Could not express the point in frame A")?;
    info!("{:?} in O is {:?} in A", p_o.position_m, point_in_a.position_m);

    // ---- KINEMATICS ----

    let traj_params = &params.trajectory;
    let model = UnicycleModel::new(constant_control(traj_params.control));

    info!(
        "Integrating from {:?} over ({}, {}) s with {:?}",
        traj_params.initial_state,
        traj_params.start_time_s,
        traj_params.end_time_s,
        params.integration.method
    );

    let traj = integrate_trajectory(
        |t, s: &VehicleState| model.derivative(t, s),
        (traj_params.start_time_s, traj_params.end_time_s),
        traj_params.initial_state,
        params.integration.method,
        &params.integration.params,
    )
    .wrap_err("Failed to integrate the trajectory")?;

    let last = traj.last();
    info!(
        "Final state at {} s: {:?} (heading {:.6} rad in [0, 2pi))",
        last.time_s,
        last.state,
        last.state.wrapped_heading_rad()
    );
    if let Some(r) = traj_params.control.turn_radius_m() {
        info!("Expected turn radius: {:.6} m", r);
    }

    // Heading rate is constant, so the final heading is known exactly
    let expected_heading_rad = traj_params.initial_state.heading_rad
        + traj_params.control.ang_rate_rads * (traj_params.end_time_s - traj_params.start_time_s);
    info!(
        "Final heading error: {:.3e} rad",
        get_ang_dist_2pi(expected_heading_rad, last.state.heading_rad)
    );
    info!(
        "{} samples, path length {:.6} m",
        traj.len(),
        traj.arc_length_m()
    );

    // ---- ARCHIVE ----

    archive_trajectory(&session, "traj_o.csv", &traj)?;
    archive_trajectory(&session, "traj_a.csv", &traj.transformed(&t_ao))?;

    session
        .save(
            "summary.json",
            &RunSummary {
                t_oa,
                point_in_o,
                point_in_a,
                final_state: last.state,
                arc_length_m: traj.arc_length_m(),
                report: *traj.report(),
            },
        )
        .wrap_err("Failed to save the run summary")?;

    info!("End of execution");

    Ok(())
}

/// Write every sample of a trajectory to a CSV file in the session archive.
fn archive_trajectory(session: &Session, path: &str, traj: &Trajectory) -> Result<(), Report> {
    let mut arch = Archiver::from_path(session, path)
        .wrap_err_with(|| format!("Could not create archive {}", path))?;

    arch.serialise_all(traj.records())
        .wrap_err_with(|| format!("Could not archive the trajectory to {}", path))?;

    info!("Archived {} samples to {:?}", arch.num_records(), arch.path());

    Ok(())
}
