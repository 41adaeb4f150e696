//! Parametric path curves. The ornament pipeline sweeps its tube along a
//! hypotrochoid lifted out of the plane by a sinusoidal z term.

use crate::errors::{PipelineError, PipelineResult};
use crate::float_types::Real;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// A hypotrochoid traced by a pen at distance `dist` from the center of a
/// circle of radius `small_r` rolling inside a fixed circle of radius
/// `big_r`, with `z = 3 sin t` giving the curve its out-of-plane wobble.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hypotrochoid {
    /// Radius of the fixed circle.
    pub big_r: Real,
    /// Radius of the rolling circle.
    pub small_r: Real,
    /// Distance of the tracing point from the rolling circle's center.
    pub dist: Real,
}

impl Hypotrochoid {
    pub const fn new(big_r: Real, small_r: Real, dist: Real) -> Self {
        Hypotrochoid {
            big_r,
            small_r,
            dist,
        }
    }

    /// Evaluate the curve at parameter `t`.
    pub fn point_at(&self, t: Real) -> Point3<Real> {
        let k = (self.big_r - self.small_r) / self.small_r;
        let x = (self.big_r - self.small_r) * t.cos() + self.dist * (k * t).cos();
        let y = (self.big_r - self.small_r) * t.sin() - self.dist * (k * t).sin();
        let z = 3.0 * t.sin();
        Point3::new(x, y, z)
    }

    /// Sample `n` points over `t` in `[0, span]`, endpoints included.
    ///
    /// With the default parameters (R = 5, r = 3, d = 5) a span of `6π`
    /// closes the curve exactly, so the first and last samples coincide.
    pub fn sample(&self, span: Real, n: usize) -> PipelineResult<Vec<Point3<Real>>> {
        if self.small_r == 0.0 {
            return Err(PipelineError::InvalidParameter {
                parameter: "small_r",
                reason: "rolling circle radius must be nonzero".into(),
            });
        }
        if n < 2 {
            return Err(PipelineError::InvalidParameter {
                parameter: "samples",
                reason: format!("need at least 2 path samples, got {}", n),
            });
        }
        let step = span / ((n - 1) as Real);
        Ok((0..n).map(|k| self.point_at((k as Real) * step)).collect())
    }
}

impl Default for Hypotrochoid {
    fn default() -> Self {
        Hypotrochoid::new(5.0, 3.0, 5.0)
    }
}
