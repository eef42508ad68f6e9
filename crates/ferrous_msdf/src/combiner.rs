//! Contour combiners: how per-edge selectors are aggregated into one
//! distance per sample.

use glam::DVec2;

use crate::selector::{EdgeSelector, FieldDistance};
use crate::shape::Shape;

pub trait ContourCombiner<S: EdgeSelector> {
    fn distance(&self, shape: &Shape, p: DVec2) -> S::Distance;
}

/// One selector over every edge of the shape.  Sign comes straight from the
/// nearest edge, so the shape's contours must already be consistently wound.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleCombiner;

impl<S: EdgeSelector> ContourCombiner<S> for SimpleCombiner {
    fn distance(&self, shape: &Shape, p: DVec2) -> S::Distance {
        let mut selector = S::new(p);
        for contour in &shape.contours {
            for (prev, edge, next) in contour.edge_triples() {
                selector.add_edge(prev, edge, next);
            }
        }
        selector.distance()
    }
}

/// Resolves overlapping contours by winding ownership.
///
/// Each contour is measured on its own.  Positive-winding contours that see
/// the sample inside form the inner set, negative-winding contours that see
/// it outside form the outer set, and whichever of the two is nearer decides
/// the sign.  Contours of the opposite winding may still tighten the result
/// when they agree with that sign.
#[derive(Debug, Clone)]
pub struct OverlappingCombiner {
    windings: Vec<i32>,
}

impl OverlappingCombiner {
    /// Captures the natural winding of every contour.  Must be built from the
    /// same shape it is later queried with.
    pub fn new(shape: &Shape) -> Self {
        Self {
            windings: shape.contours.iter().map(|c| c.winding()).collect(),
        }
    }

    pub fn windings(&self) -> &[i32] {
        &self.windings
    }
}

impl<S: EdgeSelector> ContourCombiner<S> for OverlappingCombiner {
    fn distance(&self, shape: &Shape, p: DVec2) -> S::Distance {
        let selectors: Vec<S> = shape
            .contours
            .iter()
            .map(|contour| {
                let mut selector = S::new(p);
                for (prev, edge, next) in contour.edge_triples() {
                    selector.add_edge(prev, edge, next);
                }
                selector
            })
            .collect();
        let distances: Vec<S::Distance> = selectors.iter().map(S::distance).collect();

        let mut shape_selector = S::new(p);
        let mut inner_selector = S::new(p);
        let mut outer_selector = S::new(p);
        for ((selector, distance), &winding) in selectors.iter().zip(&distances).zip(&self.windings) {
            shape_selector.merge(selector);
            let scalar = distance.resolve();
            if winding > 0 && scalar >= 0.0 {
                inner_selector.merge(selector);
            }
            if winding < 0 && scalar <= 0.0 {
                outer_selector.merge(selector);
            }
        }

        let shape_distance = shape_selector.distance();
        let inner_distance = inner_selector.distance();
        let outer_distance = outer_selector.distance();
        let inner = inner_distance.resolve();
        let outer = outer_distance.resolve();

        let contours = || distances.iter().zip(&self.windings);
        let (mut distance, winding) = if inner >= 0.0 && inner.abs() <= outer.abs() {
            let mut distance = inner_distance;
            for (candidate, _) in contours().filter(|(_, w)| **w > 0) {
                let d = candidate.resolve();
                if d.abs() < outer.abs() && d > distance.resolve() {
                    distance = *candidate;
                }
            }
            (distance, 1)
        } else if outer <= 0.0 && outer.abs() < inner.abs() {
            let mut distance = outer_distance;
            for (candidate, _) in contours().filter(|(_, w)| **w < 0) {
                let d = candidate.resolve();
                if d.abs() < inner.abs() && d < distance.resolve() {
                    distance = *candidate;
                }
            }
            (distance, -1)
        } else {
            return shape_distance;
        };

        for (candidate, _) in contours().filter(|(_, w)| **w != winding) {
            let d = candidate.resolve();
            let current = distance.resolve();
            if d * current >= 0.0 && d.abs() < current.abs() {
                distance = *candidate;
            }
        }
        if distance.resolve() == shape_distance.resolve() {
            distance = shape_distance;
        }
        distance
    }
}
