//! Per-sample distance selectors.
//!
//! A selector is created for one sample point, fed every relevant edge
//! together with its contour neighbours, and finally asked for the distance
//! it settled on.  Selectors are plain values: the combiners build one per
//! contour, merge them, and throw them away before the next texel.

use glam::DVec2;

use crate::math::{cross, median};
use crate::shape::{EdgeSegment, SignedDistance};

/// A distance value produced by a selector, reducible to one signed scalar.
pub trait FieldDistance: Copy + PartialEq {
    /// Value reported by a selector that saw no edge.
    const FAR: Self;

    /// Scalar the value stands for: the median for multi-channel values.
    fn resolve(&self) -> f64;
}

impl FieldDistance for f64 {
    const FAR: Self = -f64::MAX;

    #[inline]
    fn resolve(&self) -> f64 {
        *self
    }
}

/// One signed distance per colour channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiDistance {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl FieldDistance for MultiDistance {
    const FAR: Self = Self {
        r: -f64::MAX,
        g: -f64::MAX,
        b: -f64::MAX,
    };

    #[inline]
    fn resolve(&self) -> f64 {
        median(self.r, self.g, self.b)
    }
}

pub trait EdgeSelector: Clone {
    type Distance: FieldDistance;

    /// Empty selector for sample point `p`.
    fn new(p: DVec2) -> Self;

    /// Considers `edge`; `prev` and `next` are its cyclic neighbours in the
    /// contour and define the bisectors at its endpoints.
    fn add_edge(&mut self, prev: &EdgeSegment, edge: &EdgeSegment, next: &EdgeSegment);

    /// Folds another selector for the same sample point into this one.
    fn merge(&mut self, other: &Self);

    fn distance(&self) -> Self::Distance;
}

// ── True distance ──────────────────────────────────────────────────────────

/// Plain nearest-edge signed distance; drives the single-channel generator.
#[derive(Debug, Clone)]
pub struct TrueDistanceSelector {
    p: DVec2,
    min_distance: SignedDistance,
}

impl EdgeSelector for TrueDistanceSelector {
    type Distance = f64;

    fn new(p: DVec2) -> Self {
        Self {
            p,
            min_distance: SignedDistance::INFINITE,
        }
    }

    fn add_edge(&mut self, _prev: &EdgeSegment, edge: &EdgeSegment, _next: &EdgeSegment) {
        let (distance, _) = edge.signed_distance(self.p);
        if distance < self.min_distance {
            self.min_distance = distance;
        }
    }

    fn merge(&mut self, other: &Self) {
        if other.min_distance < self.min_distance {
            self.min_distance = other.min_distance;
        }
    }

    fn distance(&self) -> f64 {
        self.min_distance.distance
    }
}

// ── Perpendicular distance ─────────────────────────────────────────────────

/// Running state of one channel: the closest true distance, the edge it came
/// from, and the closest perpendicular distances on either side of zero.
///
/// Perpendicular candidates are only offered when they beat the true distance
/// of the edge that produced them.
#[derive(Debug, Clone)]
struct PerpendicularBase {
    min_true: SignedDistance,
    min_negative_perpendicular: f64,
    min_positive_perpendicular: f64,
    near_edge: Option<(EdgeSegment, f64)>,
}

impl PerpendicularBase {
    fn new() -> Self {
        Self {
            min_true: SignedDistance::INFINITE,
            min_negative_perpendicular: -f64::MAX,
            min_positive_perpendicular: f64::MAX,
            near_edge: None,
        }
    }

    fn add_true(&mut self, edge: &EdgeSegment, distance: SignedDistance, param: f64) {
        if distance < self.min_true {
            self.min_true = distance;
            self.near_edge = Some((*edge, param));
        }
    }

    fn add_perpendicular(&mut self, distance: f64) {
        if distance <= 0.0 && distance > self.min_negative_perpendicular {
            self.min_negative_perpendicular = distance;
        }
        if distance >= 0.0 && distance < self.min_positive_perpendicular {
            self.min_positive_perpendicular = distance;
        }
    }

    fn merge(&mut self, other: &Self) {
        if other.min_true < self.min_true {
            self.min_true = other.min_true;
            self.near_edge = other.near_edge;
        }
        if other.min_negative_perpendicular > self.min_negative_perpendicular {
            self.min_negative_perpendicular = other.min_negative_perpendicular;
        }
        if other.min_positive_perpendicular < self.min_positive_perpendicular {
            self.min_positive_perpendicular = other.min_positive_perpendicular;
        }
    }

    fn compute(&self, p: DVec2) -> f64 {
        let mut min_distance = if self.min_true.distance < 0.0 {
            self.min_negative_perpendicular
        } else {
            self.min_positive_perpendicular
        };
        if let Some((edge, param)) = &self.near_edge {
            let mut distance = self.min_true;
            edge.distance_to_perpendicular(&mut distance, p, *param);
            if distance.distance.abs() < min_distance.abs() {
                min_distance = distance.distance;
            }
        }
        min_distance
    }
}

/// Perpendicular distance from `ep` to the line through an endpoint along
/// `dir`, if the sample lies ahead of the endpoint and it beats `distance`.
fn perpendicular_distance(distance: f64, ep: DVec2, dir: DVec2) -> Option<f64> {
    if ep.dot(dir) > 0.0 {
        let perpendicular = cross(ep, dir);
        if perpendicular.abs() < distance.abs() {
            return Some(perpendicular);
        }
    }
    None
}

/// Endpoint perpendicular candidates of `edge` for sample `p`.
///
/// A candidate exists at an endpoint only when `p` lies on the edge's side of
/// the bisector formed with the neighbouring edge; the start candidate comes
/// back negated so that both share the sign convention of the edge itself.
fn endpoint_perpendiculars(
    p: DVec2,
    prev: &EdgeSegment,
    edge: &EdgeSegment,
    next: &EdgeSegment,
    distance: f64,
) -> [Option<f64>; 2] {
    let ap = p - edge.point(0.0);
    let bp = p - edge.point(1.0);
    let a_dir = edge.direction(0.0).normalize_or_zero();
    let b_dir = edge.direction(1.0).normalize_or_zero();
    let prev_dir = prev.direction(1.0).normalize_or_zero();
    let next_dir = next.direction(0.0).normalize_or_zero();
    let add = ap.dot((prev_dir + a_dir).normalize_or_zero());
    let bdd = -bp.dot((b_dir + next_dir).normalize_or_zero());

    let start = if add > 0.0 {
        perpendicular_distance(distance, ap, -a_dir).map(|d| -d)
    } else {
        None
    };
    let end = if bdd > 0.0 {
        perpendicular_distance(distance, bp, b_dir)
    } else {
        None
    };
    [start, end]
}

/// Selector for the multi-channel field: one perpendicular-distance state per
/// channel, each fed only the edges whose colour includes that channel.
#[derive(Debug, Clone)]
pub struct MultiDistanceSelector {
    p: DVec2,
    channels: [PerpendicularBase; 3],
}

impl MultiDistanceSelector {
    /// Closest true distance over all channels.
    pub fn true_distance(&self) -> SignedDistance {
        let mut best = self.channels[0].min_true;
        for channel in &self.channels[1..] {
            if channel.min_true < best {
                best = channel.min_true;
            }
        }
        best
    }
}

impl EdgeSelector for MultiDistanceSelector {
    type Distance = MultiDistance;

    fn new(p: DVec2) -> Self {
        Self {
            p,
            channels: [PerpendicularBase::new(), PerpendicularBase::new(), PerpendicularBase::new()],
        }
    }

    fn add_edge(&mut self, prev: &EdgeSegment, edge: &EdgeSegment, next: &EdgeSegment) {
        let color = edge.color();
        let (distance, param) = edge.signed_distance(self.p);
        for (c, channel) in self.channels.iter_mut().enumerate() {
            if color.has_channel(c) {
                channel.add_true(edge, distance, param);
            }
        }
        for perpendicular in endpoint_perpendiculars(self.p, prev, edge, next, distance.distance)
            .into_iter()
            .flatten()
        {
            for (c, channel) in self.channels.iter_mut().enumerate() {
                if color.has_channel(c) {
                    channel.add_perpendicular(perpendicular);
                }
            }
        }
    }

    fn merge(&mut self, other: &Self) {
        for (mine, theirs) in self.channels.iter_mut().zip(&other.channels) {
            mine.merge(theirs);
        }
    }

    fn distance(&self) -> MultiDistance {
        let [r, g, b] = &self.channels;
        MultiDistance {
            r: r.compute(self.p),
            g: g.compute(self.p),
            b: b.compute(self.p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::EdgeColor;

    fn square() -> Vec<EdgeSegment> {
        // clockwise in y-up: inside is positive
        let p = [
            DVec2::new(0.0, 0.0),
            DVec2::new(0.0, 1.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(1.0, 0.0),
        ];
        let colors = [EdgeColor::MAGENTA, EdgeColor::YELLOW, EdgeColor::CYAN, EdgeColor::MAGENTA];
        (0..4)
            .map(|i| EdgeSegment::linear(p[i], p[(i + 1) % 4], colors[i]))
            .collect()
    }

    fn feed<S: EdgeSelector>(p: DVec2, edges: &[EdgeSegment]) -> S {
        let mut selector = S::new(p);
        let n = edges.len();
        for i in 0..n {
            selector.add_edge(&edges[(i + n - 1) % n], &edges[i], &edges[(i + 1) % n]);
        }
        selector
    }

    #[test]
    fn true_selector_reports_nearest_edge() {
        let d = feed::<TrueDistanceSelector>(DVec2::new(0.25, 0.5), &square()).distance();
        assert!((d - 0.25).abs() < 1e-12);
        let d = feed::<TrueDistanceSelector>(DVec2::new(-0.5, 0.5), &square()).distance();
        assert!((d + 0.5).abs() < 1e-12);
    }

    #[test]
    fn empty_selectors_are_far() {
        let p = DVec2::ZERO;
        assert_eq!(TrueDistanceSelector::new(p).distance(), f64::FAR);
        assert_eq!(MultiDistanceSelector::new(p).distance(), MultiDistance::FAR);
    }

    #[test]
    fn channels_agree_in_the_middle_of_an_edge() {
        let d = feed::<MultiDistanceSelector>(DVec2::new(0.1, 0.5), &square()).distance();
        // left edge is magenta: red and blue see it directly
        assert!((d.r - 0.1).abs() < 1e-12);
        assert!((d.b - 0.1).abs() < 1e-12);
        assert!((d.resolve() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn perpendicular_extends_past_a_corner() {
        // diagonally outside the (0, 0) corner; the green channel only sees the
        // top and right edges, the red channel sees left/bottom so its
        // distance past the corner follows the extended edge lines
        let p = DVec2::new(-0.2, -0.1);
        let d = feed::<MultiDistanceSelector>(p, &square()).distance();
        assert!(d.resolve() < 0.0);
        assert!(d.r.abs() <= p.length() + 1e-12);
    }

    #[test]
    fn merge_keeps_the_closer_state() {
        let edges = square();
        let p = DVec2::new(0.3, 0.5);
        let mut a = feed::<MultiDistanceSelector>(p, &edges[..2]);
        let b = feed::<MultiDistanceSelector>(p, &edges[2..]);
        a.merge(&b);
        let whole = feed::<MultiDistanceSelector>(p, &edges);
        assert!((a.true_distance().distance - whole.true_distance().distance).abs() < 1e-12);
    }
}
