//! Pixel ↔ shape-space mapping shared by every generator and correction pass.

use glam::DVec2;

use crate::shape::Bounds;

/// `shape = (pixel + 0.5) / scale - translate`, evaluated at texel centres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub scale: DVec2,
    pub translate: DVec2,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            scale: DVec2::ONE,
            translate: DVec2::ZERO,
        }
    }
}

impl Projection {
    pub fn new(scale: DVec2, translate: DVec2) -> Self {
        Self { scale, translate }
    }

    /// Shape-space position of the centre of texel `(x, y)`.
    #[inline]
    pub fn texel_center(&self, x: usize, y: usize) -> DVec2 {
        self.unproject(DVec2::new(x as f64 + 0.5, y as f64 + 0.5))
    }

    /// Pixel coordinates → shape space.
    #[inline]
    pub fn unproject(&self, pixel: DVec2) -> DVec2 {
        pixel / self.scale - self.translate
    }

    /// Shape space → pixel coordinates.
    #[inline]
    pub fn project(&self, point: DVec2) -> DVec2 {
        (point + self.translate) * self.scale
    }

    #[inline]
    pub fn unproject_y(&self, y: f64) -> f64 {
        y / self.scale.y - self.translate.y
    }

    #[inline]
    pub fn unproject_x(&self, x: f64) -> f64 {
        x / self.scale.x - self.translate.x
    }

    /// Pixels per shape unit used to express distances in pixels.  Equal to
    /// the scale for uniform projections; the mean for stretched ones.
    #[inline]
    pub fn pixels_per_unit(&self) -> f64 {
        0.5 * (self.scale.x + self.scale.y)
    }

    /// Uniform projection placing `bounds` centred inside a `size` cell with
    /// `padding` pixels kept free on every side.  Degenerate bounds (a point
    /// or a line) keep unit scale on the collapsed axis.
    pub fn fit(bounds: Bounds, size: (usize, usize), padding: f64) -> Self {
        let frame = DVec2::new(size.0 as f64, size.1 as f64) - DVec2::splat(2.0 * padding);
        let extent = bounds.size();
        let fits = |frame: f64, extent: f64| {
            if extent > 0.0 {
                frame / extent
            } else {
                f64::INFINITY
            }
        };
        let mut scale = fits(frame.x, extent.x).min(fits(frame.y, extent.y));
        if !scale.is_finite() || scale <= 0.0 {
            scale = 1.0;
        }
        // centre of the cell in pixels ↔ centre of the bounds in shape space
        let cell_center = 0.5 * DVec2::new(size.0 as f64, size.1 as f64);
        let translate = cell_center / scale - bounds.center();
        Self::new(DVec2::splat(scale), translate)
    }
}
