//! Distance field generators.
//!
//! Every generator samples texel centres through the [`Projection`], writes
//! rows bottom-up when the shape is y-up, and stores
//! `distance_px / (2 * range) + 0.5` per channel, unclamped.

use crate::bitmap::Bitmap;
use crate::combiner::{ContourCombiner, OverlappingCombiner, SimpleCombiner};
use crate::error::MsdfError;
use crate::projection::Projection;
use crate::selector::{EdgeSelector, MultiDistance, MultiDistanceSelector, TrueDistanceSelector};
use crate::shape::Shape;

fn fill<S, C, const N: usize>(
    shape: &Shape,
    combiner: &C,
    projection: &Projection,
    range: f64,
    width: usize,
    height: usize,
    texel: impl Fn(S::Distance, f64) -> [f64; N],
) -> Bitmap<N>
where
    S: EdgeSelector,
    C: ContourCombiner<S>,
{
    let factor = projection.pixels_per_unit() / (2.0 * range);
    let mut bitmap = Bitmap::new(width, height);
    for y in 0..height {
        let row = if shape.inverse_y_axis { height - 1 - y } else { y };
        for x in 0..width {
            let p = projection.texel_center(x, y);
            *bitmap.get_mut(x, row) = texel(combiner.distance(shape, p), factor);
        }
    }
    bitmap
}

fn multi_texel(d: MultiDistance, factor: f64) -> [f64; 3] {
    [d.r * factor + 0.5, d.g * factor + 0.5, d.b * factor + 0.5]
}

fn single_texel(d: f64, factor: f64) -> [f64; 1] {
    [d * factor + 0.5]
}

/// Multi-channel field from one nearest-edge search per channel.  The shape
/// must be coloured and consistently oriented.
pub fn generate_msdf_simple(
    shape: &Shape,
    projection: &Projection,
    range: f64,
    width: usize,
    height: usize,
) -> Result<Bitmap<3>, MsdfError> {
    shape.ensure_colored()?;
    log::debug!(
        "msdf (simple): {} contours, {} edges -> {}x{}",
        shape.contours.len(),
        shape.edge_count(),
        width,
        height
    );
    Ok(fill::<MultiDistanceSelector, _, 3>(
        shape,
        &SimpleCombiner,
        projection,
        range,
        width,
        height,
        multi_texel,
    ))
}

/// Multi-channel field resolving overlapping contours by their natural
/// winding.  Do not orient the shape's contours individually beforehand.
pub fn generate_msdf(
    shape: &Shape,
    projection: &Projection,
    range: f64,
    width: usize,
    height: usize,
) -> Result<Bitmap<3>, MsdfError> {
    shape.ensure_colored()?;
    log::debug!(
        "msdf (overlapping): {} contours, {} edges -> {}x{}",
        shape.contours.len(),
        shape.edge_count(),
        width,
        height
    );
    Ok(fill::<MultiDistanceSelector, _, 3>(
        shape,
        &OverlappingCombiner::new(shape),
        projection,
        range,
        width,
        height,
        multi_texel,
    ))
}

/// Single-channel true-distance field with winding-based contour ownership.
/// Colours are ignored.
pub fn generate_sdf(shape: &Shape, projection: &Projection, range: f64, width: usize, height: usize) -> Bitmap<1> {
    log::debug!("sdf (overlapping): {} contours -> {}x{}", shape.contours.len(), width, height);
    fill::<TrueDistanceSelector, _, 1>(
        shape,
        &OverlappingCombiner::new(shape),
        projection,
        range,
        width,
        height,
        single_texel,
    )
}

/// Single-channel true-distance field from the nearest edge of the whole
/// shape.
pub fn generate_sdf_simple(
    shape: &Shape,
    projection: &Projection,
    range: f64,
    width: usize,
    height: usize,
) -> Bitmap<1> {
    log::debug!("sdf (simple): {} contours -> {}x{}", shape.contours.len(), width, height);
    fill::<TrueDistanceSelector, _, 1>(shape, &SimpleCombiner, projection, range, width, height, single_texel)
}
