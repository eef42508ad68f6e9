use crate::bitmap::{texel_signal, Bitmap};
use crate::projection::Projection;
use crate::scanline::Scanline;
use crate::shape::Shape;

/// Makes the sign of every texel agree with the shape's non-zero fill.
///
/// Each texel's decoded signal is compared against a scanline fill test at
/// the texel centre and inverted (`1 - v` per channel) on disagreement.
/// Texels sitting exactly on 0.5 are left for a second pass that inverts
/// them when most of their 4-neighbours needed inverting.  Returns the number
/// of texels inverted.
pub fn correct_sign<const N: usize>(bitmap: &mut Bitmap<N>, shape: &Shape, projection: &Projection) -> usize {
    let (w, h) = (bitmap.width(), bitmap.height());
    // +1 agreed, -1 inverted, 0 undecided; indexed by sample row
    let mut matches = vec![0i8; w * h];
    let mut ambiguous = false;
    let mut inverted = 0;

    for y in 0..h {
        let row = if shape.inverse_y_axis { h - 1 - y } else { y };
        let scanline = Scanline::of_shape(shape, projection.unproject_y(y as f64 + 0.5));
        for x in 0..w {
            let filled = scanline.filled(projection.unproject_x(x as f64 + 0.5));
            let texel = bitmap.get_mut(x, row);
            let signal = texel_signal(texel);
            let slot = &mut matches[y * w + x];
            if signal == 0.5 {
                ambiguous = true;
            } else if (signal > 0.5) != filled {
                invert(texel);
                inverted += 1;
                *slot = -1;
            } else {
                *slot = 1;
            }
        }
    }

    if ambiguous {
        for y in 0..h {
            let row = if shape.inverse_y_axis { h - 1 - y } else { y };
            for x in 0..w {
                let i = y * w + x;
                if matches[i] != 0 {
                    continue;
                }
                let mut vote = 0i32;
                if x > 0 {
                    vote += matches[i - 1] as i32;
                }
                if x + 1 < w {
                    vote += matches[i + 1] as i32;
                }
                if y > 0 {
                    vote += matches[i - w] as i32;
                }
                if y + 1 < h {
                    vote += matches[i + w] as i32;
                }
                if vote < 0 {
                    invert(bitmap.get_mut(x, row));
                    inverted += 1;
                }
            }
        }
    }

    if inverted > 0 {
        log::trace!("sign correction inverted {inverted} of {} texels", w * h);
    }
    inverted
}

#[inline]
fn invert<const N: usize>(texel: &mut [f64; N]) {
    for v in texel.iter_mut() {
        *v = 1.0 - *v;
    }
}
