//! Horizontal scanline intersection and non-zero winding fill tests.

use crate::shape::Shape;

/// One crossing of a horizontal line by an edge.  `direction` is `+1` where
/// the edge moves towards increasing y and `-1` where it moves down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    pub x: f64,
    pub direction: i32,
}

/// All crossings of a shape along one horizontal line, sorted by x, with the
/// running winding number to the right of each crossing.
#[derive(Debug, Clone, Default)]
pub struct Scanline {
    crossings: Vec<Crossing>,
    winding: Vec<i32>,
}

impl Scanline {
    pub fn new(mut crossings: Vec<Crossing>) -> Self {
        crossings.sort_by(|a, b| a.x.total_cmp(&b.x));
        let winding = crossings
            .iter()
            .scan(0, |sum, c| {
                *sum += c.direction;
                Some(*sum)
            })
            .collect();
        Self { crossings, winding }
    }

    /// Intersects every edge of `shape` with the line at `y`.
    pub fn of_shape(shape: &Shape, y: f64) -> Self {
        let mut crossings = Vec::new();
        for edge in shape.contours.iter().flat_map(|c| c.edges.iter()) {
            edge.scanline_crossings(y, &mut crossings);
        }
        Self::new(crossings)
    }

    pub fn crossings(&self) -> &[Crossing] {
        &self.crossings
    }

    /// Winding number at `x`: the sum of the directions of every crossing at
    /// or left of `x`.
    pub fn winding_at(&self, x: f64) -> i32 {
        match self.crossings.partition_point(|c| c.x <= x) {
            0 => 0,
            n => self.winding[n - 1],
        }
    }

    /// Non-zero winding rule.
    pub fn filled(&self, x: f64) -> bool {
        self.winding_at(x) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{Contour, EdgeColor, EdgeSegment};
    use glam::DVec2;

    fn polygon(points: &[(f64, f64)]) -> Contour {
        let pts: Vec<DVec2> = points.iter().map(|&(x, y)| DVec2::new(x, y)).collect();
        Contour::new(
            (0..pts.len())
                .map(|i| EdgeSegment::linear(pts[i], pts[(i + 1) % pts.len()], EdgeColor::WHITE))
                .collect(),
        )
    }

    #[test]
    fn square_is_filled_between_its_sides() {
        let shape = Shape::new(vec![polygon(&[(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)])], false);
        let line = Scanline::of_shape(&shape, 1.0);
        assert_eq!(line.crossings().len(), 2);
        assert!(!line.filled(-0.5));
        assert!(line.filled(1.0));
        assert!(!line.filled(2.5));
    }

    #[test]
    fn non_zero_rule_fills_same_direction_hole() {
        // two nested squares wound the same way: the inner one is still filled
        let outer = polygon(&[(0.0, 0.0), (0.0, 4.0), (4.0, 4.0), (4.0, 0.0)]);
        let inner = polygon(&[(1.0, 1.0), (1.0, 3.0), (3.0, 3.0), (3.0, 1.0)]);
        let shape = Shape::new(vec![outer, inner], false);
        let line = Scanline::of_shape(&shape, 2.0);
        assert_eq!(line.winding_at(2.0).abs(), 2);
        assert!(line.filled(2.0));
    }

    #[test]
    fn opposite_hole_is_empty() {
        let outer = polygon(&[(0.0, 0.0), (0.0, 4.0), (4.0, 4.0), (4.0, 0.0)]);
        let inner = polygon(&[(1.0, 1.0), (3.0, 1.0), (3.0, 3.0), (1.0, 3.0)]);
        let shape = Shape::new(vec![outer, inner], false);
        let line = Scanline::of_shape(&shape, 2.0);
        assert!(line.filled(0.5));
        assert!(!line.filled(2.0));
        assert!(line.filled(3.5));
    }
}
