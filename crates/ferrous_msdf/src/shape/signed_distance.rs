use std::cmp::Ordering;

/// Distance from a point to an edge, paired with an orthogonality measure.
///
/// `dot` is the absolute cosine between the edge tangent at the closest point
/// and the direction towards the sample.  It is zero when the closest point is
/// interior to the edge and grows as the sample swings around an endpoint.
/// Ordering is by `|distance|` first and `dot` second, so of two equidistant
/// edges the one seen more perpendicularly wins: its normal is the more
/// reliable sign estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignedDistance {
    pub distance: f64,
    pub dot: f64,
}

impl SignedDistance {
    /// Sentinel that compares greater than every real distance.
    pub const INFINITE: Self = Self {
        distance: -f64::MAX,
        dot: 0.0,
    };

    pub const fn new(distance: f64, dot: f64) -> Self {
        Self { distance, dot }
    }
}

impl Default for SignedDistance {
    fn default() -> Self {
        Self::INFINITE
    }
}

impl PartialOrd for SignedDistance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.distance.abs().partial_cmp(&other.distance.abs())? {
            Ordering::Equal => self.dot.partial_cmp(&other.dot),
            ord => Some(ord),
        }
    }
}
