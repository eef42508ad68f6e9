use thiserror::Error;

/// Failures of a single shape's generation.  Everything here is raised
/// before any texel of the caller's buffer is written.
#[derive(Debug, Error)]
pub enum MsdfError {
    #[error("contour {contour} is not closed: edge {edge} does not start where the previous edge ends")]
    OpenContour { contour: usize, edge: usize },
    #[error("edge {edge} of contour {contour} has no channel colour")]
    UncoloredEdge { contour: usize, edge: usize },
    #[error("output region {width}x{height} at ({x}, {y}) exceeds a {buffer_width}x{buffer_height} buffer")]
    RegionOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        buffer_width: usize,
        buffer_height: usize,
    },
    #[error("unsupported channel count {0} (expected 1, 3 or 4)")]
    UnsupportedChannels(usize),
    #[error("bitmap is {actual:?} but the output region is {expected:?}")]
    SizeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    #[error("invalid msdf configuration: {0}")]
    Config(#[from] toml::de::Error),
}
