//! Converters from source geometry into [`Shape`](crate::shape::Shape)s.
//!
//! Converted edges are uncoloured; coloring runs later in the pipeline.

mod glyph;
mod sprite;

pub use glyph::{glyph_to_shape, GlyphCommand, GlyphOutline};
pub use sprite::{sprite_to_shapes, PathAnchor, SpritePath, SpriteSlot};
