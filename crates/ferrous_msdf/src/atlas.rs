//! Atlas packing for baked glyph and sprite fields.
//!
//! Cells are square, `cell_size` texels wide, laid out left to right and top
//! to bottom in the smallest square grid that holds every entry.  Each cell
//! is baked on its own, on the rayon pool when the `parallel` feature is on,
//! and copied into the atlas afterwards.

use std::collections::HashMap;

use glam::DVec2;
use serde::Serialize;

use crate::bitmap::OutputRegion;
use crate::config::{FieldKind, MsdfConfig};
use crate::convert::{glyph_to_shape, sprite_to_shapes, GlyphOutline, SpriteSlot};
use crate::error::MsdfError;
use crate::pipeline::{render_glyph, render_sprite};
use crate::projection::Projection;
use crate::shape::{Bounds, Shape};

#[derive(Debug, Clone, PartialEq)]
pub struct GlyphMetrics {
    /// `[u0, v0, u1, v1]`, v growing downward.
    pub uv: [f32; 4],
    pub size: [f32; 2],
    pub advance: f32,
    /// Outline-space rectangle covered by the cell: `[left, bottom, right, top]`.
    pub plane: [f32; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpriteCell {
    pub name: String,
    pub uv: [f32; 4],
    pub fill: [f32; 4],
}

/// Atlas pixels, row-major, top row first.  Multi-channel atlases are RGBA
/// with opaque alpha; single-channel ones are one byte per texel.
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasImage {
    pub width: u32,
    pub height: u32,
    pub channels: usize,
    pub pixels: Vec<u8>,
}

/// A glyph to bake, as handed over by the font parser.
#[derive(Debug, Clone)]
pub struct GlyphSource {
    pub ch: char,
    pub outline: GlyphOutline,
    pub advance: f32,
}

pub struct FontAtlas {
    pub image: AtlasImage,
    pub metrics: HashMap<char, GlyphMetrics>,
    pub glyph_size: u32,
    pub kind: FieldKind,
}

pub struct SpriteAtlas {
    pub image: AtlasImage,
    pub cells: Vec<SpriteCell>,
    pub cell_size: u32,
    pub kind: FieldKind,
}

fn atlas_channels(kind: FieldKind) -> usize {
    match kind {
        FieldKind::SingleChannel => 1,
        FieldKind::MultiChannel => 4,
    }
}

/// Projection fitting `bounds` into a cell with the distance range as
/// margin.  Shapes without geometry keep the identity mapping.
fn cell_projection(bounds: Option<Bounds>, cell_size: u32, range: f64) -> Projection {
    match bounds {
        Some(bounds) => Projection::fit(bounds, (cell_size as usize, cell_size as usize), range),
        None => Projection::default(),
    }
}

fn union_bounds(shapes: &[&Shape]) -> Option<Bounds> {
    let mut out: Option<Bounds> = None;
    for bounds in shapes.iter().filter_map(|s| s.bounds()) {
        out = Some(match out {
            Some(mut acc) => {
                acc.include(bounds.min);
                acc.include(bounds.max);
                acc
            }
            None => bounds,
        });
    }
    out
}

/// Bakes every item into its own cell buffer.
fn bake_cells<T, F>(items: &[T], bake: F) -> Result<Vec<Vec<u8>>, MsdfError>
where
    T: Sync,
    F: Fn(&T) -> Result<Vec<u8>, MsdfError> + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        items.par_iter().map(bake).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        items.iter().map(bake).collect()
    }
}

/// Square grid layout: atlas side in cells and texels.
fn grid(count: usize, cell_size: u32) -> (u32, u32) {
    let dim = ((count as f32).sqrt().ceil() as u32).max(1);
    (dim, dim * cell_size)
}

fn cell_origin(index: usize, dim: u32, cell_size: u32) -> (u32, u32) {
    let index = index as u32;
    ((index % dim) * cell_size, (index / dim) * cell_size)
}

fn cell_uv(origin: (u32, u32), cell_size: u32, tex_size: u32) -> [f32; 4] {
    let t = tex_size as f32;
    [
        origin.0 as f32 / t,
        origin.1 as f32 / t,
        (origin.0 + cell_size) as f32 / t,
        (origin.1 + cell_size) as f32 / t,
    ]
}

fn assemble(cells: &[Vec<u8>], cell_size: u32, channels: usize) -> AtlasImage {
    let (dim, tex_size) = grid(cells.len(), cell_size);
    let mut pixels = vec![0u8; tex_size as usize * tex_size as usize * channels];
    let row_bytes = cell_size as usize * channels;
    for (i, cell) in cells.iter().enumerate() {
        let (x, y) = cell_origin(i, dim, cell_size);
        for (row, src) in cell.chunks_exact(row_bytes).enumerate() {
            let dst = ((y as usize + row) * tex_size as usize + x as usize) * channels;
            pixels[dst..dst + row_bytes].copy_from_slice(src);
        }
    }
    AtlasImage {
        width: tex_size,
        height: tex_size,
        channels,
        pixels,
    }
}

impl FontAtlas {
    pub fn build(glyphs: &[GlyphSource], config: &MsdfConfig, glyph_size: u32) -> Result<Self, MsdfError> {
        let channels = atlas_channels(config.kind);
        let (dim, tex_size) = grid(glyphs.len(), glyph_size);
        log::debug!("building font atlas {tex_size}x{tex_size} for {} glyphs", glyphs.len());

        let jobs: Vec<(Shape, Projection)> = glyphs
            .iter()
            .map(|glyph| {
                let shape = glyph_to_shape(&glyph.outline);
                let projection = cell_projection(shape.bounds(), glyph_size, config.range);
                (shape, projection)
            })
            .collect();

        let baked = bake_cells(&jobs, |(shape, projection)| {
            let side = glyph_size as usize;
            let mut cell = vec![0u8; side * side * channels];
            let mut region = OutputRegion::whole(&mut cell, side, side, channels)?;
            render_glyph(shape.clone(), config, projection, &mut region)?;
            Ok(cell)
        })?;

        let mut metrics = HashMap::with_capacity(glyphs.len());
        for (i, (glyph, (_, projection))) in glyphs.iter().zip(&jobs).enumerate() {
            // texel (0, 0) is the bottom-left corner of a y-up glyph
            let lo = projection.unproject(DVec2::ZERO);
            let hi = projection.unproject(DVec2::splat(glyph_size as f64));
            metrics.insert(
                glyph.ch,
                GlyphMetrics {
                    uv: cell_uv(cell_origin(i, dim, glyph_size), glyph_size, tex_size),
                    size: [glyph_size as f32, glyph_size as f32],
                    advance: glyph.advance,
                    plane: [lo.x as f32, lo.y as f32, hi.x as f32, hi.y as f32],
                },
            );
        }

        Ok(Self {
            image: assemble(&baked, glyph_size, channels),
            metrics,
            glyph_size,
            kind: config.kind,
        })
    }
}

impl SpriteAtlas {
    pub fn build(slots: &[SpriteSlot], config: &MsdfConfig, cell_size: u32) -> Result<Self, MsdfError> {
        let channels = atlas_channels(config.kind);
        let (dim, tex_size) = grid(slots.len(), cell_size);
        log::debug!("building sprite atlas {tex_size}x{tex_size} for {} slots", slots.len());

        let baked = bake_cells(slots, |slot| {
            let (add, sub) = sprite_to_shapes(&slot.paths);
            let projection = cell_projection(union_bounds(&[&add, &sub]), cell_size, config.range);
            let side = cell_size as usize;
            let mut cell = vec![0u8; side * side * channels];
            let mut region = OutputRegion::whole(&mut cell, side, side, channels)?;
            render_sprite(&slot.paths, config, &projection, &mut region)?;
            Ok(cell)
        })?;

        let cells = slots
            .iter()
            .enumerate()
            .map(|(i, slot)| SpriteCell {
                name: slot.name.clone(),
                uv: cell_uv(cell_origin(i, dim, cell_size), cell_size, tex_size),
                fill: slot.fill,
            })
            .collect();

        Ok(Self {
            image: assemble(&baked, cell_size, channels),
            cells,
            cell_size,
            kind: config.kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{GlyphCommand, PathAnchor, SpritePath};

    fn square_glyph(ch: char) -> GlyphSource {
        GlyphSource {
            ch,
            outline: vec![
                GlyphCommand::MoveTo(0.0, 0.0),
                GlyphCommand::LineTo(0.0, 1.0),
                GlyphCommand::LineTo(1.0, 1.0),
                GlyphCommand::LineTo(1.0, 0.0),
                GlyphCommand::Close,
            ],
            advance: 1.2,
        }
    }

    #[test]
    fn font_atlas_lays_out_a_square_grid() {
        let glyphs: Vec<_> = "abcde".chars().map(square_glyph).collect();
        let atlas = FontAtlas::build(&glyphs, &MsdfConfig::default(), 16).unwrap();
        assert_eq!((atlas.image.width, atlas.image.height), (48, 48));
        assert_eq!(atlas.image.pixels.len(), 48 * 48 * 4);
        let e = &atlas.metrics[&'e'];
        assert_eq!(e.uv, [16.0 / 48.0, 16.0 / 48.0, 32.0 / 48.0, 32.0 / 48.0]);
        assert_eq!(e.advance, 1.2);
        // plane rectangle encloses the outline
        assert!(e.plane[0] < 0.0 && e.plane[1] < 0.0 && e.plane[2] > 1.0 && e.plane[3] > 1.0);
        // centre of the 'a' cell is inside the glyph
        let centre = (8 * 48 + 8) * 4;
        assert!(atlas.image.pixels[centre..centre + 3].iter().all(|&b| b > 128));
        assert_eq!(atlas.image.pixels[centre + 3], 255);
    }

    #[test]
    fn sprite_atlas_keeps_slot_fill() {
        let slot = SpriteSlot {
            name: "dot".into(),
            paths: vec![SpritePath {
                anchors: vec![
                    PathAnchor::corner(0.0, 0.0),
                    PathAnchor::corner(10.0, 0.0),
                    PathAnchor::corner(10.0, 10.0),
                    PathAnchor::corner(0.0, 10.0),
                ],
                subtract: false,
            }],
            fill: [1.0, 0.0, 0.0, 1.0],
        };
        let config = MsdfConfig::default().with_kind(FieldKind::SingleChannel);
        let atlas = SpriteAtlas::build(&[slot.clone(), slot], &config, 8).unwrap();
        assert_eq!(atlas.image.channels, 1);
        assert_eq!((atlas.image.width, atlas.image.height), (16, 16));
        assert_eq!(atlas.cells[1].uv, [0.5, 0.0, 1.0, 0.5]);
        assert_eq!(atlas.cells[1].fill, [1.0, 0.0, 0.0, 1.0]);
        // inside of the second cell
        assert!(atlas.image.pixels[4 * 16 + 12] > 128);
        // unused fourth cell stays empty
        assert_eq!(atlas.image.pixels[12 * 16 + 12], 0);
    }

    #[test]
    fn empty_font_still_has_one_cell() {
        let atlas = FontAtlas::build(&[], &MsdfConfig::default(), 4).unwrap();
        assert!(atlas.metrics.is_empty());
        assert_eq!(atlas.image.pixels, vec![0u8; 4 * 4 * 4]);
    }
}
