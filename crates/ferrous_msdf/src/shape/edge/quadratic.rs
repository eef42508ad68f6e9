use glam::DVec2;

use crate::math::{cross, non_zero_sign, normalize, solve_cubic};
use crate::shape::{EdgeColor, SignedDistance};

/// Quadratic Bézier with control point `p[1]`.
///
/// Never built directly from user geometry: [`super::EdgeSegment::quadratic`]
/// degrades a collinear control point to a [`super::LinearSegment`] first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticSegment {
    pub p: [DVec2; 3],
    pub color: EdgeColor,
}

impl QuadraticSegment {
    pub fn point(&self, t: f64) -> DVec2 {
        let [p0, p1, p2] = self.p;
        p0.lerp(p1, t).lerp(p1.lerp(p2, t), t)
    }

    pub fn direction(&self, t: f64) -> DVec2 {
        let [p0, p1, p2] = self.p;
        let tangent = (p1 - p0).lerp(p2 - p1, t);
        if tangent == DVec2::ZERO {
            p2 - p0
        } else {
            tangent
        }
    }

    pub fn signed_distance(&self, origin: DVec2) -> (SignedDistance, f64) {
        let [p0, p1, p2] = self.p;
        let qa = p0 - origin;
        let ab = p1 - p0;
        let br = p2 - p1 - ab;
        let a = br.dot(br);
        let b = 3.0 * ab.dot(br);
        let c = 2.0 * ab.dot(ab) + qa.dot(br);
        let d = qa.dot(ab);
        let roots = solve_cubic(a, b, c, d);

        // endpoint A
        let mut ep_dir = self.direction(0.0);
        let mut min_distance = non_zero_sign(cross(ep_dir, qa)) * qa.length();
        let mut param = -qa.dot(ep_dir) / ep_dir.dot(ep_dir);
        // endpoint B
        {
            ep_dir = self.direction(1.0);
            let bq = p2 - origin;
            let distance = bq.length();
            if distance < min_distance.abs() {
                min_distance = non_zero_sign(cross(ep_dir, bq)) * distance;
                param = (origin - p1).dot(ep_dir) / ep_dir.dot(ep_dir);
            }
        }
        for t in roots.iter() {
            if t > 0.0 && t < 1.0 {
                let qe = qa + 2.0 * t * ab + t * t * br;
                let distance = qe.length();
                if distance <= min_distance.abs() {
                    min_distance = non_zero_sign(cross(ab + t * br, qe)) * distance;
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
                normalize(self.direction(1.0)).dot(normalize(p2 - origin)).abs(),
            )
        };
        (distance, param)
    }

    pub fn split_at(&self, t: f64) -> (Self, Self) {
        let [p0, p1, p2] = self.p;
        let p01 = p0.lerp(p1, t);
        let p12 = p1.lerp(p2, t);
        let mid = p01.lerp(p12, t);
        (
            Self { p: [p0, p01, mid], color: self.color },
            Self { p: [mid, p12, p2], color: self.color },
        )
    }

    /// Parameters in `(0, 1)` where the curve's y derivative vanishes.
    pub fn y_extrema(&self) -> Vec<f64> {
        let [p0, p1, p2] = self.p;
        let denom = p0.y - 2.0 * p1.y + p2.y;
        if denom == 0.0 {
            return Vec::new();
        }
        let t = (p0.y - p1.y) / denom;
        if t > 0.0 && t < 1.0 {
            vec![t]
        } else {
            Vec::new()
        }
    }
}
