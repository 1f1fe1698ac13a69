//! Cubic bezier timing curves
//!
//! Same semantics as CSS `cubic-bezier(x1, y1, x2, y2)`: the curve runs from
//! (0, 0) to (1, 1), progress is read off the x axis and the eased value off
//! the y axis. y control points outside [0, 1] overshoot ("elastic" curves).

use serde::{Deserialize, Serialize};

/// Number of precomputed x samples used to seed the solver
const SAMPLE_TABLE_SIZE: usize = 11;
const SAMPLE_STEP: f64 = 1.0 / (SAMPLE_TABLE_SIZE - 1) as f64;

const NEWTON_ITERATIONS: usize = 4;
const NEWTON_MIN_SLOPE: f64 = 0.001;
const NEWTON_TOLERANCE: f64 = 1e-5;
const SUBDIVISION_PRECISION: f64 = 1e-7;
const SUBDIVISION_MAX_ITERATIONS: usize = 30;

/// Easing definition: the two inner control points `[x1, y1, x2, y2]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Easing(pub [f32; 4]);

impl Easing {
    pub const LINEAR: Easing = Easing([0.0, 0.0, 1.0, 1.0]);
    /// Dips below zero before overshooting the end
    pub const ANTICIPATE_OVERSHOOT: Easing = Easing([0.25, -0.75, 0.8, 1.2]);
    /// Overshoots the end slightly
    pub const OVERSHOOT: Easing = Easing([0.25, 0.0, 0.8, 1.2]);

    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self([x1, y1, x2, y2])
    }

    /// Check the control points describe a valid timing function
    pub fn check(&self) -> Result<(), &'static str> {
        let [x1, y1, x2, y2] = self.0;
        if ![x1, y1, x2, y2].iter().all(|v| v.is_finite()) {
            return Err("control points must be finite");
        }
        if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
            return Err("x control points must lie in [0, 1]");
        }
        Ok(())
    }

    /// Build the evaluator for this definition
    pub fn curve(&self) -> BezierCurve {
        BezierCurve::new(*self)
    }

    /// One-off evaluation. Prefer [`Easing::curve`] for anything evaluated per frame.
    pub fn evaluate(&self, progress: f32) -> f32 {
        self.curve().evaluate(progress)
    }
}

impl Default for Easing {
    fn default() -> Self {
        Self::ANTICIPATE_OVERSHOOT
    }
}

/// Precomputed evaluator for one [`Easing`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BezierCurve {
    easing: Easing,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    samples: [f64; SAMPLE_TABLE_SIZE],
}

impl BezierCurve {
    pub fn new(easing: Easing) -> Self {
        let [x1, y1, x2, y2] = easing.0.map(f64::from);
        let mut samples = [0.0; SAMPLE_TABLE_SIZE];
        for (i, sample) in samples.iter_mut().enumerate() {
            *sample = bezier_sample(i as f64 * SAMPLE_STEP, x1, x2);
        }
        Self {
            easing,
            x1,
            y1,
            x2,
            y2,
            samples,
        }
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    fn is_linear(&self) -> bool {
        self.x1 == self.y1 && self.x2 == self.y2
    }

    /// Map linear progress in [0, 1] to eased progress
    ///
    /// Input is clamped to [0, 1]; the endpoints are exact.
    pub fn evaluate(&self, progress: f32) -> f32 {
        if progress <= 0.0 {
            return 0.0;
        }
        if progress >= 1.0 {
            return 1.0;
        }
        if self.is_linear() {
            return progress;
        }
        let t = self.solve_t(progress as f64);
        bezier_sample(t, self.y1, self.y2) as f32
    }

    /// Find the curve parameter whose x coordinate equals `x`
    fn solve_t(&self, x: f64) -> f64 {
        // Locate the sample interval containing x
        let mut interval_start = 0.0;
        let mut current = 1;
        let last = SAMPLE_TABLE_SIZE - 1;
        while current != last && self.samples[current] <= x {
            interval_start += SAMPLE_STEP;
            current += 1;
        }
        current -= 1;

        let span = self.samples[current + 1] - self.samples[current];
        let dist = if span > 0.0 {
            (x - self.samples[current]) / span
        } else {
            0.0
        };
        let guess = interval_start + dist * SAMPLE_STEP;

        let slope = bezier_slope(guess, self.x1, self.x2);
        if slope >= NEWTON_MIN_SLOPE {
            let t = self.newton_raphson(x, guess);
            let err = (bezier_sample(t, self.x1, self.x2) - x).abs();
            if (0.0..=1.0).contains(&t) && err <= NEWTON_TOLERANCE {
                return t;
            }
            self.binary_subdivide(x, 0.0, 1.0)
        } else if slope == 0.0 {
            guess
        } else {
            self.binary_subdivide(x, interval_start, interval_start + SAMPLE_STEP)
        }
    }

    fn newton_raphson(&self, x: f64, mut t: f64) -> f64 {
        for _ in 0..NEWTON_ITERATIONS {
            let slope = bezier_slope(t, self.x1, self.x2);
            if slope == 0.0 {
                return t;
            }
            let err = bezier_sample(t, self.x1, self.x2) - x;
            t -= err / slope;
        }
        t
    }

    fn binary_subdivide(&self, x: f64, mut lo: f64, mut hi: f64) -> f64 {
        let mut t = lo;
        for _ in 0..SUBDIVISION_MAX_ITERATIONS {
            t = lo + (hi - lo) / 2.0;
            let err = bezier_sample(t, self.x1, self.x2) - x;
            if err.abs() <= SUBDIVISION_PRECISION {
                break;
            }
            if err > 0.0 {
                hi = t;
            } else {
                lo = t;
            }
        }
        t
    }
}

impl From<Easing> for BezierCurve {
    fn from(easing: Easing) -> Self {
        Self::new(easing)
    }
}

/// Evaluate one axis of the bezier at parameter t (P0 = 0, P3 = 1)
#[inline]
fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

/// Derivative of [`bezier_sample`] with respect to t
#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}

/// Linear interpolation between `from` and `to`
#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}
