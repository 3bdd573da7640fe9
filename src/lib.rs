//! Decay curve generator
//!
//! Solves the impulse-response equation
//! `dy/dt = -y/tau + exp(-(t - t0)^2 / sigma^2)` on a fixed time grid,
//! shapes the trajectory into a noisy normalized series, and renders it as
//! an annotated PNG figure.

pub mod curve;
pub mod ode;
pub mod params;
pub mod plot;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

pub use curve::Curve;
pub use ode::{integrate_at, Tolerances};
pub use params::CurveParams;

/// File name of the rendered figure
pub const OUTPUT_FILE_NAME: &str = "decay_curve.png";

#[derive(Debug, Error)]
pub enum CurveError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
    #[error("integration failed at t = {t}: {reason}")]
    Integration { t: f64, reason: String },
    #[error("cannot normalize a trajectory containing or peaking at {max}")]
    Normalization { max: f64 },
    #[error("plot error: {0}")]
    Plot(String),
}

/// Compute the full curve for `params` without touching the filesystem.
pub fn generate(params: &CurveParams) -> Result<Curve, CurveError> {
    params.validate()?;

    let time = params.time_grid();
    let solution = integrate_at(
        |t, y| params.rhs(t, y),
        0.0,
        &time,
        Tolerances::default(),
    )?;
    debug!(
        accepted = solution.stats.accepted_steps,
        rejected = solution.stats.rejected_steps,
        rhs_evals = solution.stats.rhs_evals,
        "integration finished"
    );

    let trajectory = solution.values;
    let normalized = curve::normalize(&trajectory)?;
    let lifted = curve::rescale(&normalized, params.y0);
    let rendered = curve::add_noise(&lifted, params.noise_std(), params.seed)?;

    Ok(Curve {
        time,
        trajectory,
        normalized,
        rendered,
        annotation: params.annotation_point(),
    })
}

/// Generate the curve and write the figure to `output`.
pub fn run(params: &CurveParams, output: &Path) -> Result<Curve, CurveError> {
    let curve = generate(params)?;
    if let Some((t_peak, y_peak)) = curve.peak() {
        debug!(t_peak, y_peak, samples = curve.len(), "trajectory peak");
    }

    plot::render_png(&curve, params, output)?;
    info!(path = %output.display(), "figure written");
    Ok(curve)
}

/// Directory holding the generator's sources
pub fn crate_root_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Where the binary writes the figure
pub fn default_output_path() -> PathBuf {
    crate_root_dir().join(OUTPUT_FILE_NAME)
}
