use anyhow::Context;
use decay_curve::{default_output_path, run, CurveParams};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let params = CurveParams::default();
    let output = default_output_path();
    tracing::info!(
        tau = params.tau,
        t0 = params.t0,
        sigma = params.sigma,
        y0 = params.y0,
        samples = params.samples,
        seed = params.seed,
        "generating decay curve"
    );

    let curve = run(&params, &output)
        .with_context(|| format!("failed to generate {}", output.display()))?;

    if let Some((lo, hi)) = curve.rendered_range() {
        tracing::info!(samples = curve.len(), lo, hi, "rendered series");
    }
    Ok(())
}
