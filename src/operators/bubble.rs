//! Bubble area correction.
//!
//! GLL quadrature of the local Jacobian only approximates a face's true
//! area. A bubble correction redistributes the discrepancy so the discrete
//! face area matches the geometric area exactly:
//!
//! - **Uniform**: every weight is scaled by `geometric / discrete`.
//! - **Interior**: only interior nodes (0 < i, j < n-1) absorb the difference,
//!   each in proportion to its weight. Edge and corner weights are shared
//!   with neighbouring faces and stay untouched.

use std::fmt;
use std::str::FromStr;

/// Area correction mode applied to each face's weights.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BubbleCorrection {
    /// Raw quadrature weights.
    #[default]
    None,
    /// Scale all weights of a face.
    Uniform,
    /// Adjust interior weights only; needs at least 3 points per direction.
    Interior,
}

impl BubbleCorrection {
    /// Smallest number of GLL points per direction the mode works with.
    pub fn min_points(self) -> usize {
        match self {
            BubbleCorrection::None | BubbleCorrection::Uniform => 2,
            BubbleCorrection::Interior => 3,
        }
    }

    /// Return corrected weights for one face.
    ///
    /// `weights` holds the `n_points²` raw weights in local order `j * n + i`.
    /// The input is not modified.
    ///
    /// # Panics
    /// Panics if `weights.len() != n_points²`, or for `Interior` with fewer
    /// than 3 points (callers validate with [`min_points`](Self::min_points)).
    pub fn apply(self, weights: &[f64], n_points: usize, geometric_area: f64) -> Vec<f64> {
        assert_eq!(weights.len(), n_points * n_points, "weight count mismatch");

        let discrete_area: f64 = weights.iter().sum();

        match self {
            BubbleCorrection::None => weights.to_vec(),
            BubbleCorrection::Uniform => {
                let ratio = geometric_area / discrete_area;
                weights.iter().map(|&w| w * ratio).collect()
            }
            BubbleCorrection::Interior => {
                assert!(n_points >= 3, "interior bubble needs interior nodes");

                let is_interior =
                    |i: usize, j: usize| i > 0 && j > 0 && i + 1 < n_points && j + 1 < n_points;

                let interior_sum: f64 = weights
                    .iter()
                    .enumerate()
                    .filter(|&(local, _)| is_interior(local % n_points, local / n_points))
                    .map(|(_, &w)| w)
                    .sum();
                let difference = geometric_area - discrete_area;

                weights
                    .iter()
                    .enumerate()
                    .map(|(local, &w)| {
                        if is_interior(local % n_points, local / n_points) {
                            w + difference * w / interior_sum
                        } else {
                            w
                        }
                    })
                    .collect()
            }
        }
    }
}

impl fmt::Display for BubbleCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BubbleCorrection::None => "none",
            BubbleCorrection::Uniform => "uniform",
            BubbleCorrection::Interior => "interior",
        };
        f.write_str(name)
    }
}

impl FromStr for BubbleCorrection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(BubbleCorrection::None),
            "uniform" => Ok(BubbleCorrection::Uniform),
            "interior" => Ok(BubbleCorrection::Interior),
            other => Err(format!(
                "unknown bubble correction '{other}' (expected none, uniform or interior)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 4×4 weights with a slight non-uniformity.
    fn sample_weights() -> Vec<f64> {
        (0..16).map(|k| 0.01 + 0.001 * k as f64).collect()
    }

    #[test]
    fn test_none_is_passthrough() {
        let w = sample_weights();
        assert_eq!(BubbleCorrection::None.apply(&w, 4, 123.0), w);
    }

    #[test]
    fn test_uniform_matches_area_and_preserves_ratios() {
        let w = sample_weights();
        let target = 0.5;
        let corrected = BubbleCorrection::Uniform.apply(&w, 4, target);

        let sum: f64 = corrected.iter().sum();
        assert!((sum - target).abs() < 1e-15);
        for (a, b) in w.iter().zip(&corrected) {
            assert!((b / a - corrected[0] / w[0]).abs() < 1e-13);
        }
    }

    #[test]
    fn test_interior_leaves_boundary_untouched() {
        let w = sample_weights();
        let target = 0.5;
        let corrected = BubbleCorrection::Interior.apply(&w, 4, target);

        let sum: f64 = corrected.iter().sum();
        assert!((sum - target).abs() < 1e-15);

        for j in 0..4 {
            for i in 0..4 {
                let local = j * 4 + i;
                let interior = (1..3).contains(&i) && (1..3).contains(&j);
                if interior {
                    assert_ne!(corrected[local], w[local]);
                } else {
                    assert_eq!(corrected[local], w[local]);
                }
            }
        }
    }

    #[test]
    fn test_input_not_mutated() {
        let w = sample_weights();
        let before = w.clone();
        let _ = BubbleCorrection::Uniform.apply(&w, 4, 1.0);
        let _ = BubbleCorrection::Interior.apply(&w, 4, 1.0);
        assert_eq!(w, before);
    }

    #[test]
    fn test_min_points() {
        assert_eq!(BubbleCorrection::None.min_points(), 2);
        assert_eq!(BubbleCorrection::Uniform.min_points(), 2);
        assert_eq!(BubbleCorrection::Interior.min_points(), 3);
    }

    #[test]
    fn test_parse_and_display() {
        for mode in [
            BubbleCorrection::None,
            BubbleCorrection::Uniform,
            BubbleCorrection::Interior,
        ] {
            assert_eq!(mode.to_string().parse::<BubbleCorrection>(), Ok(mode));
        }
        assert_eq!("Interior".parse(), Ok(BubbleCorrection::Interior));
        assert!("both".parse::<BubbleCorrection>().is_err());
    }
}
