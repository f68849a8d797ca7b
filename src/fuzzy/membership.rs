//! Membership functions over the [0, 1] feature domain.

use serde::{Deserialize, Serialize};

/// A trapezoidal membership set in corner notation `[a, b, c, d]`:
/// zero below `a`, rising on `[a, b]`, one on `[b, c]`, falling on `[c, d]`,
/// zero above `d`. A triangle is the degenerate case `b == c`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MembershipSet {
    corners: [f64; 4],
}

impl MembershipSet {
    /// Trapezoid from its four corners.
    ///
    /// # Panics
    /// Panics if the corners are not non-decreasing.
    pub fn trapezoid(a: f64, b: f64, c: f64, d: f64) -> Self {
        assert!(
            a <= b && b <= c && c <= d,
            "membership corners must be non-decreasing: [{a}, {b}, {c}, {d}]"
        );
        Self {
            corners: [a, b, c, d],
        }
    }

    /// Triangle with peak `b`.
    pub fn triangle(a: f64, b: f64, c: f64) -> Self {
        Self::trapezoid(a, b, b, c)
    }

    /// Degree of membership of `x`, in [0, 1].
    ///
    /// Plateaus at the domain edges are handled so that e.g.
    /// `trapezoid(0, 0, 0.4, 0.6)` yields 1.0 at `x = 0`.
    pub fn degree(&self, x: f64) -> f64 {
        let [a, b, c, d] = self.corners;
        if x < a {
            0.0
        } else if x <= b {
            if b > a {
                (x - a) / (b - a)
            } else {
                1.0
            }
        } else if x <= c {
            1.0
        } else if x < d {
            (d - x) / (d - c)
        } else {
            0.0
        }
    }

    /// The corner array.
    pub fn corners(&self) -> [f64; 4] {
        self.corners
    }
}

/// A three-level {low, medium, high} partition of one linguistic variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinguisticPartition {
    /// "Low" boundary set.
    pub low: MembershipSet,
    /// "Medium" interior set.
    pub medium: MembershipSet,
    /// "High" boundary set.
    pub high: MembershipSet,
}

impl Default for LinguisticPartition {
    /// Default breakpoints: low = [0, 0, 0.4, 0.6], medium = triangle
    /// (0.3, 0.5, 0.7), high = [0.5, 0.7, 1, 1]. Every point of [0, 1]
    /// belongs to at least one set, so a complete rule base always fires.
    fn default() -> Self {
        Self {
            low: MembershipSet::trapezoid(0.0, 0.0, 0.4, 0.6),
            medium: MembershipSet::triangle(0.3, 0.5, 0.7),
            high: MembershipSet::trapezoid(0.5, 0.7, 1.0, 1.0),
        }
    }
}

impl LinguisticPartition {
    /// Degrees of membership `[low, medium, high]` for `x`.
    pub fn degrees(&self, x: f64) -> [f64; 3] {
        [
            self.low.degree(x),
            self.medium.degree(x),
            self.high.degree(x),
        ]
    }
}
