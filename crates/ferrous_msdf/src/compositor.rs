use crate::bitmap::Bitmap;
use crate::error::MsdfError;

/// Boolean subtraction of two fields of the same size:
/// `out = min(add, 1 - sub)` per channel, written into `add`.
///
/// Inverting `sub` turns "inside B" into "outside", so the minimum is inside
/// only where A is inside and B is not.
pub fn subtract<const N: usize>(add: &mut Bitmap<N>, sub: &Bitmap<N>) -> Result<(), MsdfError> {
    let (expected, actual) = ((add.width(), add.height()), (sub.width(), sub.height()));
    if expected != actual {
        return Err(MsdfError::SizeMismatch { expected, actual });
    }
    for (a, s) in add.pixels_mut().iter_mut().zip(sub.pixels()) {
        for (va, vs) in a.iter_mut().zip(s) {
            *va = va.min(1.0 - vs);
        }
    }
    Ok(())
}
