//! Edge segments: the tagged union every per-pixel query dispatches on.
//!
//! Dispatch happens once per edge per sample through a `match`, not through a
//! trait object, so the innermost loops stay free of virtual calls.

mod cubic;
mod linear;
mod quadratic;

pub use cubic::CubicSegment;
pub use linear::LinearSegment;
pub use quadratic::QuadraticSegment;

use glam::DVec2;

use crate::math::{cross, normalize};
use crate::scanline::Crossing;
use crate::shape::{Bounds, EdgeColor, SignedDistance};

/// Relative tolerance under which a quadratic control point counts as
/// collinear with its endpoints.
const COLLINEAR_EPSILON: f64 = 1e-12;

/// Iterations used to locate a scanline crossing on a monotone curve piece.
const BISECTION_STEPS: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeSegment {
    Linear(LinearSegment),
    Quadratic(QuadraticSegment),
    Cubic(CubicSegment),
}

impl EdgeSegment {
    // ── Construction ────────────────────────────────────────────────────────

    pub fn linear(p0: DVec2, p1: DVec2, color: EdgeColor) -> Self {
        Self::Linear(LinearSegment::new(p0, p1, color))
    }

    /// Quadratic segment, or a linear one when the control point is
    /// numerically collinear with the endpoints.  Near-collinear curvature is
    /// ill-conditioned in the closest-point cubic.
    pub fn quadratic(p0: DVec2, p1: DVec2, p2: DVec2, color: EdgeColor) -> Self {
        let (a, b) = (p1 - p0, p2 - p1);
        if cross(a, b).abs() <= COLLINEAR_EPSILON * a.length() * b.length() {
            return Self::linear(p0, p2, color);
        }
        Self::Quadratic(QuadraticSegment { p: [p0, p1, p2], color })
    }

    /// Cubic segment, or a linear one when both control points sit on the
    /// endpoints.
    pub fn cubic(p0: DVec2, p1: DVec2, p2: DVec2, p3: DVec2, color: EdgeColor) -> Self {
        if (p1 == p0 || p1 == p3) && (p2 == p0 || p2 == p3) {
            return Self::linear(p0, p3, color);
        }
        Self::Cubic(CubicSegment { p: [p0, p1, p2, p3], color })
    }

    // ── Accessors ───────────────────────────────────────────────────────────

    pub fn color(&self) -> EdgeColor {
        match self {
            Self::Linear(e) => e.color,
            Self::Quadratic(e) => e.color,
            Self::Cubic(e) => e.color,
        }
    }

    pub fn set_color(&mut self, color: EdgeColor) {
        match self {
            Self::Linear(e) => e.color = color,
            Self::Quadratic(e) => e.color = color,
            Self::Cubic(e) => e.color = color,
        }
    }

    pub fn with_color(mut self, color: EdgeColor) -> Self {
        self.set_color(color);
        self
    }

    pub fn control_points(&self) -> &[DVec2] {
        match self {
            Self::Linear(e) => &e.p,
            Self::Quadratic(e) => &e.p,
            Self::Cubic(e) => &e.p,
        }
    }

    fn control_points_mut(&mut self) -> &mut [DVec2] {
        match self {
            Self::Linear(e) => &mut e.p,
            Self::Quadratic(e) => &mut e.p,
            Self::Cubic(e) => &mut e.p,
        }
    }

    pub fn start(&self) -> DVec2 {
        self.control_points()[0]
    }

    pub fn end(&self) -> DVec2 {
        let points = self.control_points();
        points[points.len() - 1]
    }

    // ── Geometry ────────────────────────────────────────────────────────────

    /// Point at parameter `t` in `[0, 1]`.
    pub fn point(&self, t: f64) -> DVec2 {
        match self {
            Self::Linear(e) => e.point(t),
            Self::Quadratic(e) => e.point(t),
            Self::Cubic(e) => e.point(t),
        }
    }

    /// Unnormalised tangent at parameter `t`.
    pub fn direction(&self, t: f64) -> DVec2 {
        match self {
            Self::Linear(e) => e.direction(t),
            Self::Quadratic(e) => e.direction(t),
            Self::Cubic(e) => e.direction(t),
        }
    }

    /// Signed distance from `origin` to the edge and the parameter of the
    /// closest point.  The parameter falls outside `[0, 1]` when the closest
    /// point is an endpoint and the sample lies beyond it.
    pub fn signed_distance(&self, origin: DVec2) -> (SignedDistance, f64) {
        match self {
            Self::Linear(e) => e.signed_distance(origin),
            Self::Quadratic(e) => e.signed_distance(origin),
            Self::Cubic(e) => e.signed_distance(origin),
        }
    }

    /// Replaces an endpoint distance by the perpendicular distance to the
    /// edge's tangent line extended past that endpoint, when the sample lies
    /// beyond it and the perpendicular distance is not larger.
    pub fn distance_to_perpendicular(&self, distance: &mut SignedDistance, origin: DVec2, param: f64) {
        if param < 0.0 {
            let dir = normalize(self.direction(0.0));
            let aq = origin - self.point(0.0);
            if aq.dot(dir) < 0.0 {
                let perpendicular = cross(aq, dir);
                if perpendicular.abs() <= distance.distance.abs() {
                    *distance = SignedDistance::new(perpendicular, 0.0);
                }
            }
        } else if param > 1.0 {
            let dir = normalize(self.direction(1.0));
            let bq = origin - self.point(1.0);
            if bq.dot(dir) > 0.0 {
                let perpendicular = cross(bq, dir);
                if perpendicular.abs() <= distance.distance.abs() {
                    *distance = SignedDistance::new(perpendicular, 0.0);
                }
            }
        }
    }

    /// Appends every crossing of the horizontal line at `y`.
    ///
    /// Each monotone piece counts `y` in the half-open interval from its lower
    /// to its upper end, so shared vertices and tangent extrema are counted
    /// consistently across neighbouring pieces and edges.
    pub fn scanline_crossings(&self, y: f64, out: &mut Vec<Crossing>) {
        let breaks = match self {
            Self::Linear(e) => {
                let [a, b] = e.p;
                if (y >= a.y && y < b.y) || (y >= b.y && y < a.y) {
                    let t = (y - a.y) / (b.y - a.y);
                    out.push(Crossing {
                        x: a.x + t * (b.x - a.x),
                        direction: if b.y > a.y { 1 } else { -1 },
                    });
                }
                return;
            }
            Self::Quadratic(e) => e.y_extrema(),
            Self::Cubic(e) => e.y_extrema(),
        };

        let mut lo_t = 0.0;
        for hi_t in breaks.into_iter().chain(std::iter::once(1.0)) {
            self.monotone_crossing(lo_t, hi_t, y, out);
            lo_t = hi_t;
        }
    }

    fn monotone_crossing(&self, t0: f64, t1: f64, y: f64, out: &mut Vec<Crossing>) {
        let y0 = self.point(t0).y;
        let y1 = self.point(t1).y;
        if !((y >= y0 && y < y1) || (y >= y1 && y < y0)) {
            return;
        }
        let rising = y1 > y0;
        let (mut lo, mut hi) = (t0, t1);
        for _ in 0..BISECTION_STEPS {
            let mid = 0.5 * (lo + hi);
            if (self.point(mid).y < y) == rising {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        out.push(Crossing {
            x: self.point(0.5 * (lo + hi)).x,
            direction: if rising { 1 } else { -1 },
        });
    }

    /// Grows `bounds` by the edge's control polygon.
    pub fn extend_bounds(&self, bounds: &mut Bounds) {
        for &p in self.control_points() {
            bounds.include(p);
        }
    }

    // ── Editing ─────────────────────────────────────────────────────────────

    /// De Casteljau split at `t`; both halves keep this edge's colour.
    pub fn split_at(&self, t: f64) -> (Self, Self) {
        match self {
            Self::Linear(e) => {
                let (a, b) = e.split_at(t);
                (Self::Linear(a), Self::Linear(b))
            }
            Self::Quadratic(e) => {
                let (a, b) = e.split_at(t);
                (Self::Quadratic(a), Self::Quadratic(b))
            }
            Self::Cubic(e) => {
                let (a, b) = e.split_at(t);
                (Self::Cubic(a), Self::Cubic(b))
            }
        }
    }

    /// Three consecutive pieces covering `[0, 1/3]`, `[1/3, 2/3]`, `[2/3, 1]`.
    /// The shared split points are bit-identical, so closure is preserved.
    pub fn split_in_thirds(&self) -> [Self; 3] {
        let (first, rest) = self.split_at(1.0 / 3.0);
        let (second, third) = rest.split_at(0.5);
        [first, second, third]
    }

    /// Reverses the traversal direction.
    pub fn reverse(&mut self) {
        self.control_points_mut().reverse();
    }
}
