use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::shape::{Contour, EdgeColor, EdgeSegment, Shape};

/// A simplified representation of drawing commands for a glyph.  Coordinates
/// are in font units or normalised em units, with y increasing upward.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum GlyphCommand {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    QuadTo {
        ctrl_x: f64,
        ctrl_y: f64,
        to_x: f64,
        to_y: f64,
    },
    CubicTo {
        ctrl1_x: f64,
        ctrl1_y: f64,
        ctrl2_x: f64,
        ctrl2_y: f64,
        to_x: f64,
        to_y: f64,
    },
    Close,
}

/// A glyph outline is just a sequence of path commands.
pub type GlyphOutline = Vec<GlyphCommand>;

#[derive(Default)]
struct ContourBuilder {
    contours: Vec<Contour>,
    edges: Vec<EdgeSegment>,
    start: DVec2,
    cursor: DVec2,
}

impl ContourBuilder {
    fn push(&mut self, edge: EdgeSegment) {
        self.cursor = edge.end();
        self.edges.push(edge);
    }

    fn line_to(&mut self, to: DVec2) {
        if to != self.cursor {
            self.push(EdgeSegment::linear(self.cursor, to, EdgeColor::BLACK));
        }
    }

    /// Closes the open contour with a straight edge if the outline did not
    /// return to its start.
    fn close(&mut self) {
        if self.edges.is_empty() {
            return;
        }
        self.line_to(self.start);
        self.contours.push(Contour::new(std::mem::take(&mut self.edges)));
    }
}

/// Builds a y-up shape from a glyph outline.
///
/// Contours are closed implicitly at every `MoveTo` and at the end of the
/// outline; zero-length lines are dropped.  The shape is flagged
/// `inverse_y_axis` so that generated rows come out top-down.
pub fn glyph_to_shape(outline: &[GlyphCommand]) -> Shape {
    let mut builder = ContourBuilder::default();
    for command in outline {
        match *command {
            GlyphCommand::MoveTo(x, y) => {
                builder.close();
                builder.start = DVec2::new(x, y);
                builder.cursor = builder.start;
            }
            GlyphCommand::LineTo(x, y) => builder.line_to(DVec2::new(x, y)),
            GlyphCommand::QuadTo { ctrl_x, ctrl_y, to_x, to_y } => {
                let to = DVec2::new(to_x, to_y);
                builder.push(EdgeSegment::quadratic(
                    builder.cursor,
                    DVec2::new(ctrl_x, ctrl_y),
                    to,
                    EdgeColor::BLACK,
                ));
            }
            GlyphCommand::CubicTo {
                ctrl1_x,
                ctrl1_y,
                ctrl2_x,
                ctrl2_y,
                to_x,
                to_y,
            } => {
                builder.push(EdgeSegment::cubic(
                    builder.cursor,
                    DVec2::new(ctrl1_x, ctrl1_y),
                    DVec2::new(ctrl2_x, ctrl2_y),
                    DVec2::new(to_x, to_y),
                    EdgeColor::BLACK,
                ));
            }
            GlyphCommand::Close => {
                builder.close();
                builder.cursor = builder.start;
            }
        }
    }
    builder.close();
    Shape::new(builder.contours, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn implicit_close_adds_a_line() {
        let outline = vec![
            GlyphCommand::MoveTo(0.0, 0.0),
            GlyphCommand::LineTo(0.0, 1.0),
            GlyphCommand::LineTo(1.0, 1.0),
            GlyphCommand::MoveTo(2.0, 0.0),
            GlyphCommand::QuadTo { ctrl_x: 3.0, ctrl_y: 1.0, to_x: 4.0, to_y: 0.0 },
            GlyphCommand::Close,
        ];
        let shape = glyph_to_shape(&outline);
        assert!(shape.inverse_y_axis);
        assert_eq!(shape.contours.len(), 2);
        assert_eq!(shape.contours[0].len(), 3);
        assert_eq!(shape.contours[1].len(), 2);
        assert!(shape.validate().is_ok());
    }

    #[test]
    fn explicit_return_is_not_doubled() {
        let outline = vec![
            GlyphCommand::MoveTo(0.0, 0.0),
            GlyphCommand::LineTo(0.0, 1.0),
            GlyphCommand::LineTo(1.0, 0.0),
            GlyphCommand::LineTo(0.0, 0.0),
            GlyphCommand::LineTo(0.0, 0.0),
            GlyphCommand::Close,
        ];
        let shape = glyph_to_shape(&outline);
        assert_eq!(shape.contours.len(), 1);
        assert_eq!(shape.contours[0].len(), 3);
    }

    #[test]
    fn cubic_commands_become_cubic_edges() {
        let outline = vec![
            GlyphCommand::MoveTo(0.0, 0.0),
            GlyphCommand::CubicTo {
                ctrl1_x: 0.0,
                ctrl1_y: 1.0,
                ctrl2_x: 1.0,
                ctrl2_y: 1.0,
                to_x: 1.0,
                to_y: 0.0,
            },
        ];
        let shape = glyph_to_shape(&outline);
        assert!(matches!(shape.contours[0].edges[0], EdgeSegment::Cubic(_)));
        assert!(matches!(shape.contours[0].edges[1], EdgeSegment::Linear(_)));
    }

    #[test]
    fn empty_outline_is_an_empty_shape() {
        assert!(glyph_to_shape(&[]).is_empty());
        assert!(glyph_to_shape(&[GlyphCommand::MoveTo(1.0, 1.0)]).is_empty());
    }
}
