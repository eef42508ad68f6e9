use glam::DVec2;

use super::EdgeSegment;

/// Closed, cyclic sequence of edges.
///
/// Stored as a flat `Vec` with modulo-indexed neighbours: coloring and the
/// perpendicular-distance bisectors both need O(1) access to the previous and
/// next edge of every edge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contour {
    pub edges: Vec<EdgeSegment>,
}

fn shoelace(a: DVec2, b: DVec2) -> f64 {
    (b.x - a.x) * (a.y + b.y)
}

impl Contour {
    pub fn new(edges: Vec<EdgeSegment>) -> Self {
        Self { edges }
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn prev(&self, index: usize) -> &EdgeSegment {
        let n = self.edges.len();
        &self.edges[(index + n - 1) % n]
    }

    pub fn next(&self, index: usize) -> &EdgeSegment {
        &self.edges[(index + 1) % self.edges.len()]
    }

    /// `(previous, current, next)` for every edge in order.  A single-edge
    /// contour is its own neighbour.
    pub fn edge_triples(&self) -> impl Iterator<Item = (&EdgeSegment, &EdgeSegment, &EdgeSegment)> {
        (0..self.edges.len()).map(move |i| (self.prev(i), &self.edges[i], self.next(i)))
    }

    /// Index of the first edge whose start does not coincide with the end of
    /// its predecessor, if any.
    pub fn first_gap(&self) -> Option<usize> {
        let mut corner = self.edges.last()?.end();
        for (i, edge) in self.edges.iter().enumerate() {
            if edge.start() != corner {
                return Some(i);
            }
            corner = edge.end();
        }
        None
    }

    /// Sign of the shoelace sum: `+1`, `-1`, or `0` for an empty or
    /// zero-area contour.  Derived on every call; edits invalidate nothing.
    pub fn winding(&self) -> i32 {
        let total = match self.edges.len() {
            0 => return 0,
            1 => {
                let e = &self.edges[0];
                let (a, b, c) = (e.point(0.0), e.point(1.0 / 3.0), e.point(2.0 / 3.0));
                shoelace(a, b) + shoelace(b, c) + shoelace(c, a)
            }
            2 => {
                let (e0, e1) = (&self.edges[0], &self.edges[1]);
                let (a, b, c, d) = (e0.point(0.0), e0.point(0.5), e1.point(0.0), e1.point(0.5));
                shoelace(a, b) + shoelace(b, c) + shoelace(c, d) + shoelace(d, a)
            }
            _ => {
                let mut prev = self.edges[self.edges.len() - 1].start();
                let mut total = 0.0;
                for edge in &self.edges {
                    let cur = edge.start();
                    total += shoelace(prev, cur);
                    prev = cur;
                }
                total
            }
        };
        crate::math::sign(total)
    }

    /// Reverses traversal: edge order and every edge's own direction.
    pub fn reverse(&mut self) {
        self.edges.reverse();
        for edge in &mut self.edges {
            edge.reverse();
        }
    }
}
