//! Scalar and vector helpers shared by the edge, selector and correction code.
//!
//! Everything here is `f64`.  The engine's general vector math is `f32`, but
//! the distance field exists to recover sub-texel corner positions and single
//! precision loses exactly that information.

use glam::DVec2;

/// Median of three values: `max(min(a, b), min(max(a, b), c))`.
#[inline]
pub fn median(a: f64, b: f64, c: f64) -> f64 {
    a.min(b).max(a.max(b).min(c))
}

/// `1.0` for strictly positive values, `-1.0` otherwise (zero maps to `-1`).
#[inline]
pub fn non_zero_sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Signum that keeps zero as zero.
#[inline]
pub fn sign(value: f64) -> i32 {
    (value > 0.0) as i32 - (value < 0.0) as i32
}

/// 2D cross product (`a.x * b.y - a.y * b.x`).
#[inline]
pub fn cross(a: DVec2, b: DVec2) -> f64 {
    a.perp_dot(b)
}

/// Unit vector, or `(0, 1)` for a zero-length input so that degenerate edges
/// still yield a finite direction.
#[inline]
pub fn normalize(v: DVec2) -> DVec2 {
    let len = v.length();
    if len == 0.0 {
        DVec2::Y
    } else {
        v / len
    }
}

/// Unit vector orthogonal to `v`.  `polarity = true` rotates counter-clockwise
/// (`(-y, x)`), `false` rotates clockwise (`(y, -x)`).
#[inline]
pub fn orthonormal(v: DVec2, polarity: bool) -> DVec2 {
    let len = v.length();
    if len == 0.0 {
        return if polarity { DVec2::Y } else { DVec2::NEG_Y };
    }
    if polarity {
        DVec2::new(-v.y / len, v.x / len)
    } else {
        DVec2::new(v.y / len, -v.x / len)
    }
}

/// Real roots of a polynomial, at most three.
#[derive(Debug, Clone, Copy, Default)]
pub struct Roots {
    values: [f64; 3],
    count: usize,
}

impl Roots {
    fn push(&mut self, value: f64) {
        self.values[self.count] = value;
        self.count += 1;
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values[..self.count]
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.as_slice().iter().copied()
    }
}

/// Solves `a*x² + b*x + c = 0`.
///
/// Falls back to the linear equation when `a` is zero or negligible next to
/// `b`.  The degenerate identity `0 = 0` reports no roots.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Roots {
    let mut roots = Roots::default();
    if a == 0.0 || b.abs() > 1e12 * a.abs() {
        if b != 0.0 {
            roots.push(-c / b);
        }
        return roots;
    }
    let discriminant = b * b - 4.0 * a * c;
    if discriminant > 0.0 {
        let s = discriminant.sqrt();
        roots.push((-b + s) / (2.0 * a));
        roots.push((-b - s) / (2.0 * a));
    } else if discriminant == 0.0 {
        roots.push(-b / (2.0 * a));
    }
    roots
}

fn solve_cubic_normed(a: f64, b: f64, c: f64) -> Roots {
    let mut roots = Roots::default();
    let a2 = a * a;
    let mut q = (a2 - 3.0 * b) / 9.0;
    let r = (a * (2.0 * a2 - 9.0 * b) + 27.0 * c) / 54.0;
    let r2 = r * r;
    let q3 = q * q * q;
    let a = a / 3.0;
    if r2 < q3 {
        let t = (r / q3.sqrt()).clamp(-1.0, 1.0).acos();
        q = -2.0 * q.sqrt();
        let tau = std::f64::consts::TAU;
        roots.push(q * (t / 3.0).cos() - a);
        roots.push(q * ((t + tau) / 3.0).cos() - a);
        roots.push(q * ((t - tau) / 3.0).cos() - a);
    } else {
        let direction = if r < 0.0 { 1.0 } else { -1.0 };
        let u = direction * (r.abs() + (r2 - q3).sqrt()).cbrt();
        let v = if u == 0.0 { 0.0 } else { q / u };
        roots.push((u + v) - a);
        if u == v || (u - v).abs() < 1e-12 * (u + v).abs() {
            roots.push(-0.5 * (u + v) - a);
        }
    }
    roots
}

/// Solves `a*x³ + b*x² + c*x + d = 0`.
///
/// When the leading coefficient is small enough that normalising by it would
/// amplify rounding error beyond treating it as zero, the quadratic is solved
/// instead.
pub fn solve_cubic(a: f64, b: f64, c: f64, d: f64) -> Roots {
    if a != 0.0 {
        let bn = b / a;
        if bn.abs() < 1e6 {
            return solve_cubic_normed(bn, c / a, d / a);
        }
    }
    solve_quadratic(b, c, d)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(r: Roots) -> Vec<f64> {
        let mut v: Vec<f64> = r.iter().collect();
        v.sort_by(|a, b| a.partial_cmp(b).unwrap());
        v
    }

    #[test]
    fn median_picks_middle() {
        assert_eq!(median(0.1, 0.9, 0.5), 0.5);
        assert_eq!(median(0.9, 0.1, 0.5), 0.5);
        assert_eq!(median(0.5, 0.5, 0.0), 0.5);
        assert_eq!(median(0.2, 0.2, 0.2), 0.2);
    }

    #[test]
    fn quadratic_two_roots() {
        let r = sorted(solve_quadratic(1.0, -3.0, 2.0));
        assert_eq!(r.len(), 2);
        assert!((r[0] - 1.0).abs() < 1e-12);
        assert!((r[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn quadratic_degrades_to_linear() {
        let r = solve_quadratic(0.0, 2.0, -1.0);
        assert_eq!(r.as_slice(), &[0.5]);
        assert!(solve_quadratic(0.0, 0.0, 0.0).is_empty());
    }

    #[test]
    fn cubic_three_roots() {
        // (x - 1)(x - 2)(x - 3)
        let r = sorted(solve_cubic(1.0, -6.0, 11.0, -6.0));
        assert_eq!(r.len(), 3);
        for (got, want) in r.iter().zip([1.0, 2.0, 3.0]) {
            assert!((got - want).abs() < 1e-9, "{got} vs {want}");
        }
    }

    #[test]
    fn cubic_single_real_root() {
        // x³ + x + 2 has the single real root -1
        let r = solve_cubic(1.0, 0.0, 1.0, 2.0);
        assert!(r.iter().any(|x| (x + 1.0).abs() < 1e-9));
    }

    #[test]
    fn orthonormal_rotations() {
        let v = DVec2::new(2.0, 0.0);
        assert_eq!(orthonormal(v, true), DVec2::new(0.0, 1.0));
        assert_eq!(orthonormal(v, false), DVec2::new(0.0, -1.0));
    }
}
