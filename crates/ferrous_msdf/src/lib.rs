//! Multi-channel signed distance field generation for glyphs and sprites.
//!
//! Glyph outlines go through [`render_glyph`]: contours are oriented, the
//! field comes from the nearest edge per channel, and scanline sign
//! correction plus clash correction clean up after it.  Sprite slots go
//! through [`render_sprite`], which keeps contour windings as authored,
//! resolves overlaps per contour and cuts subtracting paths out of the
//! result.  [`FontAtlas`] and [`SpriteAtlas`] bake many of either into one
//! texture.

pub mod atlas;
pub mod bitmap;
pub mod coloring;
pub mod combiner;
pub mod compositor;
pub mod config;
pub mod convert;
pub mod error;
pub mod error_correction;
pub mod generator;
pub mod math;
pub mod orientation;
pub mod pipeline;
pub mod projection;
pub mod scanline;
pub mod selector;
pub mod shape;
pub mod sign_correction;

pub use atlas::{AtlasImage, FontAtlas, GlyphMetrics, GlyphSource, SpriteAtlas, SpriteCell};
pub use bitmap::{Bitmap, OutputRegion};
pub use coloring::color_edges;
pub use config::{FieldKind, MsdfConfig};
pub use convert::{glyph_to_shape, sprite_to_shapes, GlyphCommand, GlyphOutline, PathAnchor, SpritePath, SpriteSlot};
pub use error::MsdfError;
pub use generator::{generate_msdf, generate_msdf_simple, generate_sdf, generate_sdf_simple};
pub use pipeline::{render_glyph, render_sprite};
pub use projection::Projection;
pub use shape::{Bounds, Contour, EdgeColor, EdgeSegment, Shape, SignedDistance};
