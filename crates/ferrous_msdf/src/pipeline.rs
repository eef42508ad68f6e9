//! End-to-end bakes: validation through encoding for one glyph or one
//! sprite slot.
//!
//! Both pipelines validate before any pixel work and only touch the caller's
//! region once the whole field is ready, so a failed bake leaves the target
//! buffer as it was.

use crate::bitmap::OutputRegion;
use crate::coloring::color_edges;
use crate::compositor::subtract;
use crate::config::{FieldKind, MsdfConfig};
use crate::convert::{sprite_to_shapes, SpritePath};
use crate::error::MsdfError;
use crate::error_correction::{clash_threshold, correct_errors};
use crate::generator::{generate_msdf, generate_msdf_simple, generate_sdf, generate_sdf_simple};
use crate::orientation::orient_contours;
use crate::projection::Projection;
use crate::shape::Shape;
use crate::sign_correction::correct_sign;

fn prepare(shape: &mut Shape, config: &MsdfConfig) -> Result<(), MsdfError> {
    shape.validate()?;
    shape.normalize();
    color_edges(shape, config.angle_threshold, config.coloring_seed);
    Ok(())
}

/// Bakes a glyph: per-contour orientation, nearest-edge generation, then
/// scanline sign correction and (multi-channel only) clash correction.
pub fn render_glyph(
    mut shape: Shape,
    config: &MsdfConfig,
    projection: &Projection,
    output: &mut OutputRegion<'_>,
) -> Result<(), MsdfError> {
    prepare(&mut shape, config)?;
    if shape.is_empty() {
        log::warn!("glyph has no edges; writing an empty field");
    }
    orient_contours(&mut shape);

    let (width, height) = output.size();
    match config.kind {
        FieldKind::MultiChannel => {
            let mut field = generate_msdf_simple(&shape, projection, config.range, width, height)?;
            correct_sign(&mut field, &shape, projection);
            if config.error_correction {
                let threshold = clash_threshold(config.error_correction_threshold, config.range);
                correct_errors(&mut field, threshold);
            }
            output.write(&field)
        }
        FieldKind::SingleChannel => {
            let mut field = generate_sdf_simple(&shape, projection, config.range, width, height);
            correct_sign(&mut field, &shape, projection);
            output.write(&field)
        }
    }
}

/// Bakes a sprite slot: additive and subtracting paths are generated as two
/// shapes with the overlapping-contour combiner and composited as
/// `min(add, 1 - sub)`.
pub fn render_sprite(
    paths: &[SpritePath],
    config: &MsdfConfig,
    projection: &Projection,
    output: &mut OutputRegion<'_>,
) -> Result<(), MsdfError> {
    let (mut add, mut sub) = sprite_to_shapes(paths);
    for shape in [&mut add, &mut sub] {
        prepare(shape, config)?;
        shape.orient_globally();
    }
    if add.is_empty() {
        log::warn!("sprite slot has no additive edges; writing an empty field");
    }

    let (width, height) = output.size();
    match config.kind {
        FieldKind::MultiChannel => {
            let mut field = generate_msdf(&add, projection, config.range, width, height)?;
            if !sub.is_empty() {
                subtract(&mut field, &generate_msdf(&sub, projection, config.range, width, height)?)?;
            }
            output.write(&field)
        }
        FieldKind::SingleChannel => {
            let mut field = generate_sdf(&add, projection, config.range, width, height);
            if !sub.is_empty() {
                subtract(&mut field, &generate_sdf(&sub, projection, config.range, width, height))?;
            }
            output.write(&field)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::{texel_signal, Bitmap};
    use crate::convert::{glyph_to_shape, GlyphCommand, PathAnchor};
    use crate::math::median;
    use crate::shape::{Contour, EdgeColor, EdgeSegment};
    use glam::DVec2;

    fn rect_outline(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<GlyphCommand> {
        // clockwise in y-up
        vec![
            GlyphCommand::MoveTo(x0, y0),
            GlyphCommand::LineTo(x0, y1),
            GlyphCommand::LineTo(x1, y1),
            GlyphCommand::LineTo(x1, y0),
            GlyphCommand::Close,
        ]
    }

    fn rect_path(x0: f64, y0: f64, x1: f64, y1: f64, subtract: bool) -> SpritePath {
        SpritePath {
            anchors: vec![
                PathAnchor::corner(x0, y0),
                PathAnchor::corner(x1, y0),
                PathAnchor::corner(x1, y1),
                PathAnchor::corner(x0, y1),
            ],
            subtract,
        }
    }

    fn square_shape(x0: f64, y0: f64, x1: f64, y1: f64) -> Shape {
        let mut shape = glyph_to_shape(&rect_outline(x0, y0, x1, y1));
        shape.inverse_y_axis = false;
        shape
    }

    fn decode(byte: u8, range: f64) -> f64 {
        (byte as f64 / 255.0 - 0.5) * 2.0 * range
    }

    /// Bilinear sample of the field at pixel coordinate `p`, texel centres at
    /// half-integers.
    fn bilinear<const N: usize>(field: &Bitmap<N>, p: DVec2) -> [f64; N] {
        let (w, h) = (field.width() as i64, field.height() as i64);
        let u = p - DVec2::splat(0.5);
        let (ix, iy) = (u.x.floor() as i64, u.y.floor() as i64);
        let (fx, fy) = (u.x - u.x.floor(), u.y - u.y.floor());
        let at = |x: i64, y: i64| *field.get(x.clamp(0, w - 1) as usize, y.clamp(0, h - 1) as usize);
        let (a, b, c, d) = (at(ix, iy), at(ix + 1, iy), at(ix, iy + 1), at(ix + 1, iy + 1));
        let mut out = [0.0; N];
        for i in 0..N {
            let top = a[i] + (b[i] - a[i]) * fx;
            let bottom = c[i] + (d[i] - c[i]) * fx;
            out[i] = top + (bottom - top) * fy;
        }
        out
    }

    /// Offset along the diagonal through `corner` at which the reconstructed
    /// 0.5 isocontour crosses it.
    fn isocontour_offset<const N: usize>(field: &Bitmap<N>, corner: DVec2) -> f64 {
        let value = |s: f64| texel_signal(&bilinear(field, corner + DVec2::splat(s))) - 0.5;
        let (mut lo, mut hi) = (-0.9, 0.9);
        assert!(value(lo) < 0.0 && value(hi) > 0.0);
        for _ in 0..60 {
            let mid = 0.5 * (lo + hi);
            if value(mid) < 0.0 {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        0.5 * (lo + hi) * std::f64::consts::SQRT_2
    }

    fn circle(center: DVec2, r: f64) -> Shape {
        const K: f64 = 0.552_284_749_830_793_4;
        let pts = [DVec2::X, DVec2::NEG_Y, DVec2::NEG_X, DVec2::Y];
        let edges = (0..4)
            .map(|i| {
                let (a, b) = (pts[i], pts[(i + 1) % 4]);
                EdgeSegment::cubic(
                    center + r * a,
                    center + r * (a + K * b),
                    center + r * (b + K * a),
                    center + r * b,
                    EdgeColor::BLACK,
                )
            })
            .collect();
        Shape::new(vec![Contour::new(edges)], false)
    }

    #[test]
    fn open_contour_is_rejected_before_any_write() {
        let mut broken = glyph_to_shape(&rect_outline(0.0, 0.0, 4.0, 4.0));
        broken.contours[0].edges[1] = EdgeSegment::linear(
            DVec2::new(0.0, 4.5),
            DVec2::new(4.0, 4.0),
            EdgeColor::BLACK,
        );
        let mut buf = vec![7u8; 4 * 4 * 3];
        let mut region = OutputRegion::whole(&mut buf, 4, 4, 3).unwrap();
        let err = render_glyph(broken, &MsdfConfig::default(), &Projection::default(), &mut region).unwrap_err();
        assert!(matches!(err, MsdfError::OpenContour { contour: 0, edge: 1 }));
        assert!(buf.iter().all(|&b| b == 7));
    }

    #[test]
    fn simple_and_overlapping_agree_on_sign_for_a_smooth_convex_contour() {
        let mut shape = circle(DVec2::splat(8.0), 5.3);
        color_edges(&mut shape, 3.0, 0);
        let projection = Projection::default();
        let simple = generate_msdf_simple(&shape, &projection, 2.0, 16, 16).unwrap();
        let overlapping = generate_msdf(&shape, &projection, 2.0, 16, 16).unwrap();
        for (a, b) in simple.pixels().iter().zip(overlapping.pixels()) {
            assert_eq!(texel_signal(a) > 0.5, texel_signal(b) > 0.5);
        }
        // and the sign is the circle's
        assert!(texel_signal(simple.get(8, 8)) > 0.5);
        assert!(texel_signal(simple.get(0, 0)) < 0.5);
    }

    #[test]
    fn channels_match_the_nearest_edge_away_from_corners() {
        let mut shape = square_shape(0.0, 0.0, 8.0, 8.0);
        color_edges(&mut shape, 3.0, 0);
        let left = shape.contours[0].edges[0].color();
        let range = 2.0;
        let field = generate_msdf_simple(&shape, &Projection::default(), range, 8, 8).unwrap();
        // texel (1, 3) is centred at (1.5, 3.5): 1.5 from the left edge, at
        // least 3.5 from every other edge
        let texel = field.get(1, 3);
        let expected = 1.5 / (2.0 * range) + 0.5;
        assert!((median(texel[0], texel[1], texel[2]) - expected).abs() < 1e-12);
        for c in (0..3).filter(|&c| left.has_channel(c)) {
            assert!((texel[c] - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn msdf_keeps_corners_that_single_channel_rounds() {
        let mut shape = square_shape(4.0, 4.0, 12.0, 12.0);
        color_edges(&mut shape, 3.0, 0);
        let projection = Projection::default();
        let corner = DVec2::splat(4.0);

        let msdf = generate_msdf_simple(&shape, &projection, 4.0, 16, 16).unwrap();
        let sdf = generate_sdf_simple(&shape, &projection, 4.0, 16, 16);
        let sharp = isocontour_offset(&msdf, corner).abs();
        let rounded = isocontour_offset(&sdf, corner).abs();
        assert!(sharp < 0.05, "msdf corner off by {sharp}");
        assert!(rounded > 0.1, "sdf corner only off by {rounded}");
    }

    #[test]
    fn subtraction_is_min_against_the_inverted_cutout() {
        let config = MsdfConfig::default().with_range(2.0);
        let projection = Projection::default();
        let outer = rect_path(2.0, 2.0, 14.0, 14.0, false);
        let inner = rect_path(5.0, 5.0, 11.0, 11.0, true);
        let bake = |paths: &[SpritePath]| {
            let mut buf = vec![0u8; 16 * 16 * 3];
            let mut region = OutputRegion::whole(&mut buf, 16, 16, 3).unwrap();
            render_sprite(paths, &config, &projection, &mut region).unwrap();
            buf
        };
        let ring = bake(&[outer.clone(), inner.clone()]);
        let a = bake(&[outer]);
        let b = bake(&[SpritePath { subtract: false, ..inner }]);
        for i in 0..ring.len() {
            let expected = a[i].min(255 - b[i]);
            assert!(ring[i].abs_diff(expected) <= 1, "texel byte {i}: {} vs {expected}", ring[i]);
        }
        let signal = |x: usize, y: usize| {
            let t = &ring[(y * 16 + x) * 3..(y * 16 + x) * 3 + 3];
            median(t[0] as f64, t[1] as f64, t[2] as f64)
        };
        assert!(signal(8, 8) < 127.5);
        assert!(signal(3, 8) > 127.5);
        assert!(signal(0, 0) < 127.5);
    }

    #[test]
    fn normalize_is_idempotent() {
        let p = DVec2::ZERO;
        let loop_edge = EdgeSegment::cubic(p, DVec2::new(-2.0, 3.0), DVec2::new(2.0, 3.0), p, EdgeColor::BLACK);
        let mut shape = Shape::new(vec![Contour::new(vec![loop_edge])], false);
        shape.normalize();
        assert_eq!(shape.edge_count(), 3);
        assert!(shape.validate().is_ok());
        let once = shape.clone();
        shape.normalize();
        assert_eq!(shape, once);
    }

    #[test]
    fn unit_square_centre_decodes_to_half_side() {
        let range = 1.5;
        let config = MsdfConfig::default().with_range(range);
        let tolerance = (1.0 / 255.0) * (range * 2.0);

        let mut buf = [0u8; 3];
        let mut region = OutputRegion::whole(&mut buf, 1, 1, 3).unwrap();
        render_glyph(
            glyph_to_shape(&rect_outline(0.0, 0.0, 1.0, 1.0)),
            &config,
            &Projection::default(),
            &mut region,
        )
        .unwrap();
        let m = median(buf[0] as f64, buf[1] as f64, buf[2] as f64) as u8;
        assert!((decode(m, range) - 0.5).abs() <= tolerance);

        let mut buf = [0u8; 1];
        let mut region = OutputRegion::whole(&mut buf, 1, 1, 1).unwrap();
        render_sprite(
            &[rect_path(0.0, 0.0, 1.0, 1.0, false)],
            &config.clone().with_kind(FieldKind::SingleChannel),
            &Projection::default(),
            &mut region,
        )
        .unwrap();
        assert!((decode(buf[0], range) - 0.5).abs() <= tolerance);
    }

    /// Overlapping contours are where nearest-edge generation produces seams;
    /// both pipelines must still classify every texel by the union's fill.
    #[test]
    fn overlapping_contours_have_no_seam() {
        let union = |p: DVec2| {
            let inside = |x0: f64, y0: f64, x1: f64, y1: f64| p.x > x0 && p.x < x1 && p.y > y0 && p.y < y1;
            inside(1.0, 1.0, 9.0, 9.0) || inside(5.25, 3.25, 13.25, 11.25)
        };
        let config = MsdfConfig::default().with_range(2.0);
        let projection = Projection::default();

        let mut outline = rect_outline(1.0, 1.0, 9.0, 9.0);
        outline.extend(rect_outline(5.25, 3.25, 13.25, 11.25));
        let mut glyph = [0u8; 16 * 16 * 3];
        let mut region = OutputRegion::whole(&mut glyph, 16, 16, 3).unwrap();
        render_glyph(glyph_to_shape(&outline), &config, &projection, &mut region).unwrap();

        let mut sprite = [0u8; 16 * 16 * 3];
        let mut region = OutputRegion::whole(&mut sprite, 16, 16, 3).unwrap();
        let paths = [
            rect_path(1.0, 1.0, 9.0, 9.0, false),
            rect_path(5.25, 3.25, 13.25, 11.25, false),
        ];
        render_sprite(&paths, &config, &projection, &mut region).unwrap();

        for y in 0..16 {
            for x in 0..16 {
                let centre = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                // glyph rows run top-down over a y-up shape
                let glyph_centre = DVec2::new(centre.x, 16.0 - centre.y);
                let at = |buf: &[u8]| {
                    let t = &buf[(y * 16 + x) * 3..(y * 16 + x) * 3 + 3];
                    median(t[0] as f64, t[1] as f64, t[2] as f64) > 127.5
                };
                assert_eq!(at(&glyph), union(glyph_centre), "glyph texel ({x}, {y})");
                assert_eq!(at(&sprite), union(centre), "sprite texel ({x}, {y})");
            }
        }
    }

    #[test]
    fn empty_glyph_is_all_outside() {
        let mut buf = [9u8; 2 * 2 * 4];
        let mut region = OutputRegion::whole(&mut buf, 2, 2, 4).unwrap();
        render_glyph(Shape::default(), &MsdfConfig::default(), &Projection::default(), &mut region).unwrap();
        assert_eq!(buf, [0, 0, 0, 255, 0, 0, 0, 255, 0, 0, 0, 255, 0, 0, 0, 255]);
    }
}
