//! Curve parameters
//!
//! Constants of the decay/impulse-response model and of the rendered figure

use crate::CurveError;

/// Parameters for the decay curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveParams {
    /// Decay time constant
    pub tau: f64,
    /// Center of the forcing pulse
    pub t0: f64,
    /// Width of the forcing pulse
    pub sigma: f64,
    /// Floor of the rendered series and y of the annotation point
    pub y0: f64,
    /// Number of time samples
    pub samples: usize,
    /// First sample time
    pub t_start: f64,
    /// Last sample time
    pub t_end: f64,
    /// Noise standard deviation as a fraction of the rendered span (1 - y0)
    pub noise_fraction: f64,
    /// RNG seed for reproducibility
    pub seed: u64,
}

impl CurveParams {
    /// Parameters of the published figure
    pub fn default_params() -> Self {
        Self {
            tau: 0.1,
            t0: 0.2,
            sigma: 0.01,
            y0: 0.1,
            samples: 480,
            t_start: 0.0,
            t_end: 1.0,
            noise_fraction: 1e-2,
            seed: 321,
        }
    }

    pub fn validate(&self) -> Result<(), CurveError> {
        if !(self.tau.is_finite() && self.tau > 0.0) {
            return Err(CurveError::InvalidParams(
                "tau must be finite and > 0".to_string(),
            ));
        }

        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return Err(CurveError::InvalidParams(
                "sigma must be finite and > 0".to_string(),
            ));
        }

        if !self.t0.is_finite() {
            return Err(CurveError::InvalidParams("t0 must be finite".to_string()));
        }

        if self.samples < 2 {
            return Err(CurveError::InvalidParams(
                "samples must be at least 2".to_string(),
            ));
        }

        if !self.t_start.is_finite() || !self.t_end.is_finite() {
            return Err(CurveError::InvalidParams(
                "t_start and t_end must be finite".to_string(),
            ));
        }

        if self.t_end <= self.t_start {
            return Err(CurveError::InvalidParams(
                "t_end must be greater than t_start".to_string(),
            ));
        }

        if !(self.y0 >= 0.0 && self.y0 < 1.0) {
            return Err(CurveError::InvalidParams(
                "y0 must be in [0, 1)".to_string(),
            ));
        }

        if !(self.noise_fraction.is_finite() && self.noise_fraction >= 0.0) {
            return Err(CurveError::InvalidParams(
                "noise_fraction must be finite and >= 0".to_string(),
            ));
        }

        let x = self.annotation_x();
        if x < self.t_start || x > self.t_end {
            return Err(CurveError::InvalidParams(format!(
                "annotation x = {x} lies outside [{}, {}]",
                self.t_start, self.t_end
            )));
        }

        Ok(())
    }

    /// Evenly spaced sample times over `[t_start, t_end]`, endpoints exact.
    pub fn time_grid(&self) -> Vec<f64> {
        let span = self.t_end - self.t_start;
        let last = self.samples.saturating_sub(1);
        let denom = last.max(1) as f64;

        (0..self.samples)
            .map(|idx| {
                if idx == last {
                    self.t_end
                } else {
                    self.t_start + span * idx as f64 / denom
                }
            })
            .collect()
    }

    /// Standard deviation of the additive noise
    pub fn noise_std(&self) -> f64 {
        (1.0 - self.y0) * self.noise_fraction
    }

    /// x of the annotation point, two pulse widths ahead of the pulse center
    pub fn annotation_x(&self) -> f64 {
        self.t0 - 2.0 * self.sigma
    }

    /// The annotation point `(t0 - 2 sigma, y0)`
    pub fn annotation_point(&self) -> (f64, f64) {
        (self.annotation_x(), self.y0)
    }

    /// Right-hand side `dy/dt = -y/tau + exp(-(t - t0)^2 / sigma^2)`
    pub fn rhs(&self, t: f64, y: f64) -> f64 {
        let d = t - self.t0;
        -y / self.tau + (-(d * d) / (self.sigma * self.sigma)).exp()
    }
}

impl Default for CurveParams {
    fn default() -> Self {
        Self::default_params()
    }
}
