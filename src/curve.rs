//! Series shaping
//!
//! Turns the raw ODE trajectory into the rendered series: normalize to a
//! unit peak, lift onto `[y0, 1]`, then add seeded Gaussian noise.

use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::CurveError;

/// Everything needed to draw one figure
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    /// Sample times
    pub time: Vec<f64>,
    /// ODE solution at each sample time
    pub trajectory: Vec<f64>,
    /// Trajectory divided by its maximum
    pub normalized: Vec<f64>,
    /// Rescaled and noisy series that is plotted
    pub rendered: Vec<f64>,
    /// Marker position `(t0 - 2 sigma, y0)`
    pub annotation: (f64, f64),
}

impl Curve {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Time and value of the largest raw trajectory sample
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.time
            .iter()
            .zip(&self.trajectory)
            .fold(None, |best: Option<(f64, f64)>, (&t, &y)| match best {
                Some((_, y_best)) if y_best >= y => best,
                _ => Some((t, y)),
            })
    }

    /// Smallest and largest rendered value
    pub fn rendered_range(&self) -> Option<(f64, f64)> {
        if self.rendered.is_empty() {
            return None;
        }
        let lo = self.rendered.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = self.rendered.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some((lo, hi))
    }
}

/// Divide every value by the maximum so the peak becomes exactly 1.0.
pub fn normalize(values: &[f64]) -> Result<Vec<f64>, CurveError> {
    if let Some(&bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(CurveError::Normalization { max: bad });
    }
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !(max.is_finite() && max > 0.0) {
        return Err(CurveError::Normalization { max });
    }
    Ok(values.iter().map(|&v| v / max).collect())
}

/// Map `[0, 1]` onto `[floor, 1]`.
pub fn rescale(values: &[f64], floor: f64) -> Vec<f64> {
    values.iter().map(|&v| v * (1.0 - floor) + floor).collect()
}

/// Perturb each value with independent N(0, std) noise from a generator
/// seeded with `seed`.
pub fn add_noise(values: &[f64], std: f64, seed: u64) -> Result<Vec<f64>, CurveError> {
    let noise = Normal::new(0.0, std)
        .map_err(|e| CurveError::InvalidParams(format!("noise std {std}: {e}")))?;
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    Ok(values.iter().map(|&v| v + noise.sample(&mut rng)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_peak_is_one() {
        let out = normalize(&[0.0, 0.25, 2.0, 1.0]).unwrap();
        assert_eq!(out, vec![0.0, 0.125, 1.0, 0.5]);
    }

    #[test]
    fn normalize_rejects_flat_zero() {
        let result = normalize(&[0.0, 0.0]);
        assert!(matches!(result, Err(CurveError::Normalization { .. })));
        assert!(normalize(&[]).is_err());
        assert!(normalize(&[1.0, f64::NAN, f64::INFINITY]).is_err());
    }

    #[test]
    fn normalize_rejects_nan_sample() {
        let result = normalize(&[1.0, f64::NAN]);
        assert!(matches!(result, Err(CurveError::Normalization { .. })));
        assert!(normalize(&[f64::NAN, 0.5, 2.0]).is_err());
    }

    #[test]
    fn rescale_lifts_onto_floor() {
        let out = rescale(&[0.0, 0.5, 1.0], 0.1);
        assert!((out[0] - 0.1).abs() < 1e-15);
        assert!((out[1] - 0.55).abs() < 1e-15);
        assert!((out[2] - 1.0).abs() < 1e-15);
    }

    #[test]
    fn noise_is_reproducible_per_seed() {
        let base = vec![0.5; 64];
        let a = add_noise(&base, 0.01, 321).unwrap();
        let b = add_noise(&base, 0.01, 321).unwrap();
        let c = add_noise(&base, 0.01, 322).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn zero_std_leaves_values_untouched() {
        let base = vec![0.2, 0.4];
        assert_eq!(add_noise(&base, 0.0, 7).unwrap(), base);
    }

    #[test]
    fn peak_picks_largest_sample() {
        let curve = Curve {
            time: vec![0.0, 0.1, 0.2],
            trajectory: vec![0.0, 3.0, 1.0],
            normalized: vec![],
            rendered: vec![0.3, 0.9, 0.1],
            annotation: (0.0, 0.0),
        };
        assert_eq!(curve.peak(), Some((0.1, 3.0)));
        assert_eq!(curve.rendered_range(), Some((0.1, 0.9)));
    }
}
