//! Per-contour orientation repair for the simple generator.
//!
//! The simple generator takes its sign from whichever edge is nearest, so
//! every contour has to be wound the way its fill role demands: filled area
//! on the right of the direction of travel (clockwise in y-up space).

use crate::scanline::Crossing;
use crate::shape::{Bounds, Shape};

/// Fractions of a contour's height at which it is probed.  Irrational, so
/// the probes are unlikely to graze a vertex or a horizontal edge.
const PROBE_HEIGHTS: [f64; 3] = [
    0.618_033_988_749_894_8, // (sqrt(5) - 1) / 2
    0.292_893_218_813_452_5, // 1 - 1 / sqrt(2)
    0.822_467_033_424_113_2, // pi^2 / 12
];

/// Reverses every contour whose winding contradicts the non-zero fill of the
/// shape around it.  Returns the number of contours reversed.
///
/// For each contour, horizontal probes are cast through the whole shape.
/// Every crossing of the probed contour votes: an upward crossing is right
/// when the region to its right is filled, a downward one when the region to
/// its left is filled.  Crossings that share an x with another crossing are
/// ambiguous and do not vote.  Contours with a negative tally are reversed.
pub fn orient_contours(shape: &mut Shape) -> usize {
    let mut votes = vec![0i32; shape.contours.len()];
    let mut crossings: Vec<(Crossing, usize)> = Vec::new();
    let mut scratch = Vec::new();

    for (index, contour) in shape.contours.iter().enumerate() {
        let mut bounds = Bounds::EMPTY;
        for edge in &contour.edges {
            edge.extend_bounds(&mut bounds);
        }
        if bounds.is_empty() || bounds.size().y <= 0.0 {
            continue;
        }
        for fraction in PROBE_HEIGHTS {
            let y = bounds.min.y + fraction * bounds.size().y;
            crossings.clear();
            for (owner, other) in shape.contours.iter().enumerate() {
                for edge in &other.edges {
                    scratch.clear();
                    edge.scanline_crossings(y, &mut scratch);
                    crossings.extend(scratch.iter().map(|&c| (c, owner)));
                }
            }
            crossings.sort_by(|a, b| a.0.x.total_cmp(&b.0.x));

            let mut winding = 0;
            for (j, &(crossing, owner)) in crossings.iter().enumerate() {
                let left = winding;
                winding += crossing.direction;
                if owner != index {
                    continue;
                }
                let shared = (j > 0 && crossings[j - 1].0.x == crossing.x)
                    || crossings.get(j + 1).is_some_and(|next| next.0.x == crossing.x);
                if shared {
                    continue;
                }
                let correct = if crossing.direction > 0 { winding != 0 } else { left != 0 };
                votes[index] += if correct { 1 } else { -1 };
            }
        }
    }

    let mut reversed = 0;
    for (contour, &vote) in shape.contours.iter_mut().zip(&votes) {
        if vote < 0 {
            contour.reverse();
            reversed += 1;
        }
    }
    if reversed > 0 {
        log::trace!("orientation: reversed {reversed} of {} contours", shape.contours.len());
    }
    reversed
}
