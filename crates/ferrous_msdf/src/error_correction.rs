//! Clash detection between neighbouring MSDF texels.
//!
//! Where two adjacent texels disagree strongly in two channels, bilinear
//! filtering between them can produce a median that crosses 0.5 where
//! neither texel does, drawing a spurious edge.  The texel farther from the
//! true edge is flattened to its median, giving up its corner information.

use crate::bitmap::Bitmap;
use crate::math::median;

/// Channel difference, in encoded units, above which two texels clash for a
/// given tolerance and pixel range.
pub fn clash_threshold(tolerance: f64, range: f64) -> f64 {
    tolerance / (2.0 * range)
}

fn detect_clash(a: &[f64; 3], b: &[f64; 3], threshold: f64) -> bool {
    // order channel pairs by decreasing difference
    let mut pairs = [(a[0], b[0]), (a[1], b[1]), (a[2], b[2])];
    pairs.sort_by(|p, q| (q.1 - q.0).abs().total_cmp(&(p.1 - p.0).abs()));
    let [(_, b0), (a1, b1), (a2, b2)] = pairs;
    (b1 - a1).abs() >= threshold
        // neighbour already flattened
        && !(b0 == b1 && b0 == b2)
        // only the texel farther from the edge is flagged
        && (a2 - 0.5).abs() >= (b2 - 0.5).abs()
}

/// Flattens every texel that clashes with one of its 4-neighbours to
/// `R = G = B = median`.  Detection runs on the uncorrected field; returns
/// the number of texels flattened.
pub fn correct_errors(bitmap: &mut Bitmap<3>, threshold: f64) -> usize {
    let (w, h) = (bitmap.width(), bitmap.height());
    let mut clashes = Vec::new();
    for y in 0..h {
        for x in 0..w {
            let texel = bitmap.get(x, y);
            let clash = (x > 0 && detect_clash(texel, bitmap.get(x - 1, y), threshold))
                || (x + 1 < w && detect_clash(texel, bitmap.get(x + 1, y), threshold))
                || (y > 0 && detect_clash(texel, bitmap.get(x, y - 1), threshold))
                || (y + 1 < h && detect_clash(texel, bitmap.get(x, y + 1), threshold));
            if clash {
                clashes.push((x, y));
            }
        }
    }
    for &(x, y) in &clashes {
        let texel = bitmap.get_mut(x, y);
        let m = median(texel[0], texel[1], texel[2]);
        *texel = [m; 3];
    }
    if !clashes.is_empty() {
        log::trace!("error correction flattened {} texels", clashes.len());
    }
    clashes.len()
}
