use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::shape::{Contour, EdgeColor, EdgeSegment, Shape};

/// One anchor of an editable sprite path.  Handles are offsets from
/// `position`; an absent handle makes that side of the anchor straight.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PathAnchor {
    pub position: DVec2,
    #[serde(default)]
    pub handle_in: Option<DVec2>,
    #[serde(default)]
    pub handle_out: Option<DVec2>,
}

impl PathAnchor {
    pub fn corner(x: f64, y: f64) -> Self {
        Self {
            position: DVec2::new(x, y),
            ..Default::default()
        }
    }

    pub fn smooth(x: f64, y: f64, handle_out: DVec2) -> Self {
        Self {
            position: DVec2::new(x, y),
            handle_in: Some(-handle_out),
            handle_out: Some(handle_out),
        }
    }
}

/// A closed path in screen space (y down).  Subtracting paths cut their area
/// out of the additive paths of the same slot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpritePath {
    pub anchors: Vec<PathAnchor>,
    #[serde(default)]
    pub subtract: bool,
}

/// A mesh slot: the paths rendered into one atlas cell and the colour the
/// renderer fills them with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteSlot {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "path", default)]
    pub paths: Vec<SpritePath>,
    #[serde(default = "SpriteSlot::default_fill")]
    pub fill: [f32; 4],
}

impl SpriteSlot {
    fn default_fill() -> [f32; 4] {
        [1.0, 1.0, 1.0, 1.0]
    }
}

impl SpritePath {
    /// Closed contour through the anchors.  Straight sides become linear
    /// edges, one handle gives a quadratic and two a cubic.
    pub fn to_contour(&self) -> Contour {
        let n = self.anchors.len();
        let mut edges = Vec::with_capacity(n);
        for i in 0..n {
            let (a, b) = (&self.anchors[i], &self.anchors[(i + 1) % n]);
            if a.position == b.position {
                continue;
            }
            let out = a.handle_out.map(|h| a.position + h);
            let into = b.handle_in.map(|h| b.position + h);
            let edge = match (out, into) {
                (None, None) => EdgeSegment::linear(a.position, b.position, EdgeColor::BLACK),
                (Some(c), None) | (None, Some(c)) => {
                    EdgeSegment::quadratic(a.position, c, b.position, EdgeColor::BLACK)
                }
                (Some(c1), Some(c2)) => EdgeSegment::cubic(a.position, c1, c2, b.position, EdgeColor::BLACK),
            };
            edges.push(edge);
        }
        Contour::new(edges)
    }
}

/// Splits a slot's paths into the additive and the subtractive shape.
/// Paths with fewer than two anchors enclose nothing and are skipped.
pub fn sprite_to_shapes(paths: &[SpritePath]) -> (Shape, Shape) {
    let mut add = Vec::new();
    let mut sub = Vec::new();
    for (i, path) in paths.iter().enumerate() {
        if path.anchors.len() < 2 {
            log::warn!("sprite path {i} has {} anchors, skipped", path.anchors.len());
            continue;
        }
        let contour = path.to_contour();
        if path.subtract {
            sub.push(contour);
        } else {
            add.push(contour);
        }
    }
    (Shape::new(add, false), Shape::new(sub, false))
}
