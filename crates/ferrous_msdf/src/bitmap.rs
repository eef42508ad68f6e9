//! Floating-point working bitmaps and the caller-owned byte output region.

use crate::error::MsdfError;
use crate::math::median;

/// Row-major bitmap of `N`-channel texels holding range-normalised distance
/// (0.5 on the edge, above 0.5 inside).  Values are not clamped until they
/// are encoded, so the correction passes see the full signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap<const N: usize> {
    width: usize,
    height: usize,
    pixels: Vec<[f64; N]>,
}

impl<const N: usize> Bitmap<N> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0.0; N]; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> &[f64; N] {
        &self.pixels[y * self.width + x]
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut [f64; N] {
        &mut self.pixels[y * self.width + x]
    }

    pub fn pixels(&self) -> &[[f64; N]] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [[f64; N]] {
        &mut self.pixels
    }
}

/// The scalar a texel encodes: the channel median for MSDF texels, the value
/// itself for single-channel texels.
#[inline]
pub fn texel_signal<const N: usize>(texel: &[f64; N]) -> f64 {
    if N >= 3 {
        median(texel[0], texel[1], texel[2])
    } else {
        texel[0]
    }
}

/// `clamp(value, 0, 1) * 255`, rounded to the nearest byte.
#[inline]
pub fn encode_byte(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Rectangular window into a caller-owned texel buffer.
///
/// `buffer` is `buffer_width` texels wide with `channels` bytes per texel;
/// the region starts at `position` and spans `size` texels.  Writing fully
/// overwrites the region and nothing outside it.
pub struct OutputRegion<'a> {
    buffer: &'a mut [u8],
    buffer_width: usize,
    channels: usize,
    position: (usize, usize),
    size: (usize, usize),
}

impl<'a> OutputRegion<'a> {
    pub fn new(
        buffer: &'a mut [u8],
        buffer_width: usize,
        channels: usize,
        position: (usize, usize),
        size: (usize, usize),
    ) -> Result<Self, MsdfError> {
        if !matches!(channels, 1 | 3 | 4) {
            return Err(MsdfError::UnsupportedChannels(channels));
        }
        let row_bytes = buffer_width * channels;
        let buffer_height = if row_bytes == 0 { 0 } else { buffer.len() / row_bytes };
        if position.0 + size.0 > buffer_width || position.1 + size.1 > buffer_height {
            return Err(MsdfError::RegionOutOfBounds {
                x: position.0,
                y: position.1,
                width: size.0,
                height: size.1,
                buffer_width,
                buffer_height,
            });
        }
        Ok(Self {
            buffer,
            buffer_width,
            channels,
            position,
            size,
        })
    }

    /// Region covering an entire buffer.
    pub fn whole(buffer: &'a mut [u8], width: usize, height: usize, channels: usize) -> Result<Self, MsdfError> {
        Self::new(buffer, width, channels, (0, 0), (width, height))
    }

    pub fn size(&self) -> (usize, usize) {
        self.size
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Encodes `bitmap` into the region.
    ///
    /// A 3-channel bitmap written to a 1-channel region stores the median; a
    /// 1-channel bitmap written to a wider region is replicated.  The fourth
    /// byte of a 4-channel region is opaque alpha.
    pub fn write<const N: usize>(&mut self, bitmap: &Bitmap<N>) -> Result<(), MsdfError> {
        let actual = (bitmap.width(), bitmap.height());
        if actual != self.size {
            return Err(MsdfError::SizeMismatch {
                expected: self.size,
                actual,
            });
        }
        let channels = self.channels;
        for y in 0..self.size.1 {
            let row = (self.position.1 + y) * self.buffer_width + self.position.0;
            for x in 0..self.size.0 {
                let texel = bitmap.get(x, y);
                let offset = (row + x) * channels;
                let out = &mut self.buffer[offset..offset + channels];
                match (channels, N) {
                    (1, _) => out[0] = encode_byte(texel_signal(texel)),
                    (_, 1) => out[..3].fill(encode_byte(texel[0])),
                    _ => {
                        for c in 0..3 {
                            out[c] = encode_byte(texel[c]);
                        }
                    }
                }
                if channels == 4 {
                    out[3] = 255;
                }
            }
        }
        Ok(())
    }
}
