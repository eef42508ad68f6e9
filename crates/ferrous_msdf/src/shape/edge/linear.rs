use glam::DVec2;

use crate::math::{cross, non_zero_sign, normalize, orthonormal};
use crate::shape::{EdgeColor, SignedDistance};

/// Straight segment from `p[0]` to `p[1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearSegment {
    pub p: [DVec2; 2],
    pub color: EdgeColor,
}

impl LinearSegment {
    pub fn new(p0: DVec2, p1: DVec2, color: EdgeColor) -> Self {
        Self { p: [p0, p1], color }
    }

    pub fn point(&self, t: f64) -> DVec2 {
        self.p[0].lerp(self.p[1], t)
    }

    pub fn direction(&self, _t: f64) -> DVec2 {
        self.p[1] - self.p[0]
    }

    pub fn signed_distance(&self, origin: DVec2) -> (SignedDistance, f64) {
        let aq = origin - self.p[0];
        let ab = self.p[1] - self.p[0];
        let len_sq = ab.length_squared();
        let param = if len_sq == 0.0 { 0.0 } else { aq.dot(ab) / len_sq };
        let eq = if param > 0.5 { self.p[1] } else { self.p[0] } - origin;
        let endpoint_distance = eq.length();
        if param > 0.0 && param < 1.0 {
            let ortho_distance = orthonormal(ab, false).dot(aq);
            if ortho_distance.abs() < endpoint_distance {
                return (SignedDistance::new(ortho_distance, 0.0), param);
            }
        }
        let distance = SignedDistance::new(
            non_zero_sign(cross(aq, ab)) * endpoint_distance,
            normalize(ab).dot(normalize(eq)).abs(),
        );
        (distance, param)
    }

    pub fn split_at(&self, t: f64) -> (Self, Self) {
        let mid = self.point(t);
        (
            Self::new(self.p[0], mid, self.color),
            Self::new(mid, self.p[1], self.color),
        )
    }
}
