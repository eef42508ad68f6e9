//! Immutable geometric input to every generator: contours of coloured edges.

mod color;
mod contour;
mod edge;
mod signed_distance;

pub use color::EdgeColor;
pub use contour::Contour;
pub use edge::{CubicSegment, EdgeSegment, LinearSegment, QuadraticSegment};
pub use signed_distance::SignedDistance;

use glam::DVec2;

use crate::error::MsdfError;

/// Axis-aligned box in shape space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    /// Box that any `include` call replaces.
    pub const EMPTY: Self = Self {
        min: DVec2::new(f64::INFINITY, f64::INFINITY),
        max: DVec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
    };

    pub fn include(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }

    pub fn center(&self) -> DVec2 {
        0.5 * (self.min + self.max)
    }
}

/// Set of contours plus the row convention of the source geometry.
///
/// `inverse_y_axis` is set for y-up sources (font outlines): generators then
/// write bitmap rows bottom-up so that row 0 of the output is the top of the
/// glyph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    pub contours: Vec<Contour>,
    pub inverse_y_axis: bool,
}

impl Shape {
    pub fn new(contours: Vec<Contour>, inverse_y_axis: bool) -> Self {
        Self {
            contours,
            inverse_y_axis,
        }
    }

    pub fn edge_count(&self) -> usize {
        self.contours.iter().map(Contour::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.edge_count() == 0
    }

    /// Checks that every non-empty contour is a closed loop: each edge starts
    /// exactly where its predecessor ends, including the wrap-around.
    pub fn validate(&self) -> Result<(), MsdfError> {
        for (contour, c) in self.contours.iter().enumerate() {
            if let Some(edge) = c.first_gap() {
                return Err(MsdfError::OpenContour { contour, edge });
            }
        }
        Ok(())
    }

    /// Rejects edges without any channel.  Run after coloring.
    pub fn ensure_colored(&self) -> Result<(), MsdfError> {
        for (contour, c) in self.contours.iter().enumerate() {
            if let Some(edge) = c.edges.iter().position(|e| e.color() == EdgeColor::BLACK) {
                return Err(MsdfError::UncoloredEdge { contour, edge });
            }
        }
        Ok(())
    }

    /// Splits every single-edge contour into three consecutive thirds so that
    /// coloring always has at least three edges to distribute.  Contours that
    /// already have two or more edges are left alone, which makes a second
    /// call a no-op.
    pub fn normalize(&mut self) {
        for contour in &mut self.contours {
            if contour.edges.len() == 1 {
                contour.edges = contour.edges[0].split_in_thirds().to_vec();
            }
        }
    }

    /// Bounding box of all control geometry, or `None` for an empty shape.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut bounds = Bounds::EMPTY;
        for edge in self.contours.iter().flat_map(|c| c.edges.iter()) {
            edge.extend_bounds(&mut bounds);
        }
        (!bounds.is_empty()).then_some(bounds)
    }

    /// Closest true signed distance from `p` to any edge.
    pub fn true_distance(&self, p: DVec2) -> SignedDistance {
        let mut best = SignedDistance::INFINITE;
        for edge in self.contours.iter().flat_map(|c| c.edges.iter()) {
            let (distance, _) = edge.signed_distance(p);
            if distance < best {
                best = distance;
            }
        }
        best
    }

    /// Reverses every contour when a point well outside the bounds evaluates
    /// as inside, i.e. when the whole shape is wound backwards.  Relative
    /// windings between contours are untouched.  Returns whether the shape
    /// was flipped.
    pub fn orient_globally(&mut self) -> bool {
        let Some(bounds) = self.bounds() else {
            return false;
        };
        let outside = bounds.min - bounds.size() - DVec2::ONE;
        if self.true_distance(outside).distance > 0.0 {
            for contour in &mut self.contours {
                contour.reverse();
            }
            log::trace!("shape wound inside-out, reversed {} contours", self.contours.len());
            return true;
        }
        false
    }
}
