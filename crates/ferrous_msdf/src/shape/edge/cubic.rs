use glam::DVec2;

use crate::math::{cross, non_zero_sign, normalize, solve_quadratic};
use crate::shape::{EdgeColor, SignedDistance};

const SEARCH_STARTS: usize = 4;
const SEARCH_STEPS: usize = 4;

/// Cubic Bézier with control points `p[1]` and `p[2]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicSegment {
    pub p: [DVec2; 4],
    pub color: EdgeColor,
}

impl CubicSegment {
    pub fn point(&self, t: f64) -> DVec2 {
        let [p0, p1, p2, p3] = self.p;
        let p12 = p1.lerp(p2, t);
        p0.lerp(p1, t)
            .lerp(p12, t)
            .lerp(p12.lerp(p2.lerp(p3, t), t), t)
    }

    pub fn direction(&self, t: f64) -> DVec2 {
        let [p0, p1, p2, p3] = self.p;
        let tangent = (p1 - p0)
            .lerp(p2 - p1, t)
            .lerp((p2 - p1).lerp(p3 - p2, t), t);
        if tangent == DVec2::ZERO {
            if t == 0.0 {
                return p2 - p0;
            }
            if t == 1.0 {
                return p3 - p1;
            }
        }
        tangent
    }

    /// Closest point by Newton iteration from evenly spaced starting
    /// parameters; cubic distance has no closed form worth the trouble.
    pub fn signed_distance(&self, origin: DVec2) -> (SignedDistance, f64) {
        let [p0, p1, p2, p3] = self.p;
        let qa = p0 - origin;
        let ab = p1 - p0;
        let br = p2 - p1 - ab;
        let as_ = (p3 - p2) - (p2 - p1) - br;

        let mut ep_dir = self.direction(0.0);
        let mut min_distance = non_zero_sign(cross(ep_dir, qa)) * qa.length();
        let mut param = -qa.dot(ep_dir) / ep_dir.dot(ep_dir);
        {
            ep_dir = self.direction(1.0);
            let bq = p3 - origin;
            let distance = bq.length();
            if distance < min_distance.abs() {
                min_distance = non_zero_sign(cross(ep_dir, bq)) * distance;
                param = (ep_dir - bq).dot(ep_dir) / ep_dir.dot(ep_dir);
            }
        }

        for i in 0..=SEARCH_STARTS {
            let mut t = i as f64 / SEARCH_STARTS as f64;
            let mut qe = qa + 3.0 * t * ab + 3.0 * t * t * br + t * t * t * as_;
            for _ in 0..SEARCH_STEPS {
                let d1 = 3.0 * ab + 6.0 * t * br + 3.0 * t * t * as_;
                let d2 = 6.0 * br + 6.0 * t * as_;
                t -= qe.dot(d1) / (d1.dot(d1) + qe.dot(d2));
                if t <= 0.0 || t >= 1.0 {
                    break;
                }
                qe = qa + 3.0 * t * ab + 3.0 * t * t * br + t * t * t * as_;
                let distance = qe.length();
                if distance < min_distance.abs() {
                    min_distance = non_zero_sign(cross(self.direction(t), qe)) * distance;
                    param = t;
                }
            }
        }

        let distance = if (0.0..=1.0).contains(&param) {
            SignedDistance::new(min_distance, 0.0)
        } else if param < 0.5 {
            SignedDistance::new(
                min_distance,
                normalize(self.direction(0.0)).dot(normalize(qa)).abs(),
            )
        } else {
            SignedDistance::new(
                min_distance,
                normalize(self.direction(1.0)).dot(normalize(p3 - origin)).abs(),
            )
        };
        (distance, param)
    }

    pub fn split_at(&self, t: f64) -> (Self, Self) {
        let [p0, p1, p2, p3] = self.p;
        let p01 = p0.lerp(p1, t);
        let p12 = p1.lerp(p2, t);
        let p23 = p2.lerp(p3, t);
        let p012 = p01.lerp(p12, t);
        let p123 = p12.lerp(p23, t);
        let mid = p012.lerp(p123, t);
        (
            Self { p: [p0, p01, p012, mid], color: self.color },
            Self { p: [mid, p123, p23, p3], color: self.color },
        )
    }

    /// Parameters in `(0, 1)` where the curve's y derivative vanishes.
    pub fn y_extrema(&self) -> Vec<f64> {
        let [p0, p1, p2, p3] = self.p;
        let (d0, d1, d2) = (p1.y - p0.y, p2.y - p1.y, p3.y - p2.y);
        let mut extrema: Vec<f64> = solve_quadratic(d0 - 2.0 * d1 + d2, 2.0 * (d1 - d0), d0)
            .iter()
            .filter(|t| *t > 0.0 && *t < 1.0)
            .collect();
        extrema.sort_by(f64::total_cmp);
        extrema.dedup();
        extrema
    }
}
