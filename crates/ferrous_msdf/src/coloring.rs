//! Assigns channel colours to edges so that every corner separates two edges
//! that disagree on at least one channel.

use glam::DVec2;

use crate::math::{cross, normalize};
use crate::shape::{Contour, EdgeColor, EdgeSegment, Shape};

/// `true` when the turn from `a` to `b` (both unit tangents) is sharp: at
/// least 90°, or deflecting by more than the angle whose sine is
/// `cross_threshold`.
pub fn is_corner(a: DVec2, b: DVec2, cross_threshold: f64) -> bool {
    a.dot(b) <= 0.0 || cross(a, b).abs() > cross_threshold
}

/// Colours every contour of `shape` in place and returns the consumed seed.
///
/// `angle_threshold` is in radians; 3.0 flags any joint deflecting more than
/// roughly 8°.  The seed only picks among equivalent colourings and makes the
/// result reproducible.
pub fn color_edges(shape: &mut Shape, angle_threshold: f64, mut seed: u64) -> u64 {
    let cross_threshold = angle_threshold.sin();
    for contour in &mut shape.contours {
        seed = color_contour(contour, cross_threshold, seed);
    }
    seed
}

fn find_corners(contour: &Contour, cross_threshold: f64) -> Vec<usize> {
    let Some(last) = contour.edges.last() else {
        return Vec::new();
    };
    let mut corners = Vec::new();
    let mut prev_direction = last.direction(1.0);
    for (i, edge) in contour.edges.iter().enumerate() {
        if is_corner(normalize(prev_direction), normalize(edge.direction(0.0)), cross_threshold) {
            corners.push(i);
        }
        prev_direction = edge.direction(1.0);
    }
    corners
}

fn color_contour(contour: &mut Contour, cross_threshold: f64, seed: u64) -> u64 {
    let corners = find_corners(contour, cross_threshold);
    log::trace!("contour with {} edges has {} corners", contour.len(), corners.len());
    match corners.len() {
        _ if contour.is_empty() => seed,
        0 => color_smooth(contour, seed),
        1 => color_teardrop(contour, corners[0], seed),
        _ => color_corners(contour, &corners, seed),
    }
}

/// No corners: a single two-channel colour for the whole contour.
fn color_smooth(contour: &mut Contour, seed: u64) -> u64 {
    let (color, seed) = EdgeColor::WHITE.switched(seed, EdgeColor::BLACK);
    for edge in &mut contour.edges {
        edge.set_color(color);
    }
    seed
}

/// One corner: three regions, symmetric around the corner.  Contours with
/// fewer than three edges are split into thirds first.
fn color_teardrop(contour: &mut Contour, corner: usize, seed: u64) -> u64 {
    let (first, seed) = EdgeColor::WHITE.switched(seed, EdgeColor::BLACK);
    let (last, seed) = first.switched(seed, EdgeColor::BLACK);
    let colors = [first, EdgeColor::WHITE, last];

    let m = contour.len();
    if m >= 3 {
        for i in 0..m {
            // spreads i over [0, m) into three bands around the corner
            let band = (3.0 + 2.875 * i as f64 / (m - 1) as f64 - 1.4375 + 0.5).floor() as usize - 2;
            contour.edges[(corner + i) % m].set_color(colors[band]);
        }
        return seed;
    }

    let parts: Vec<EdgeSegment> = if m == 1 {
        contour.edges[0]
            .split_in_thirds()
            .iter()
            .zip(colors)
            .map(|(part, color)| part.with_color(color))
            .collect()
    } else {
        let from_corner = [contour.edges[corner], contour.edges[(corner + 1) % 2]];
        from_corner
            .iter()
            .flat_map(|edge| edge.split_in_thirds())
            .zip([first, first, EdgeColor::WHITE, EdgeColor::WHITE, last, last])
            .map(|(part, color)| part.with_color(color))
            .collect()
    };
    contour.edges = parts;
    seed
}

/// Two or more corners: switch colour at every corner.  The last run must
/// also differ from the first, since they meet at the starting corner.
fn color_corners(contour: &mut Contour, corners: &[usize], mut seed: u64) -> u64 {
    let m = contour.len();
    let start = corners[0];
    let mut spline = 0;
    let (mut color, next_seed) = EdgeColor::WHITE.switched(seed, EdgeColor::BLACK);
    seed = next_seed;
    let initial = color;
    for i in 0..m {
        let index = (start + i) % m;
        if spline + 1 < corners.len() && corners[spline + 1] == index {
            spline += 1;
            let banned = if spline == corners.len() - 1 {
                initial
            } else {
                EdgeColor::BLACK
            };
            (color, seed) = color.switched(seed, banned);
        }
        contour.edges[index].set_color(color);
    }
    seed
}
