use super::Coord;
use crate::core::traits::Real;

/// Computes the sign of the determinant of the 2x2 matrix `[[x1, y1], [x2, y2]]` exactly,
/// returning -1, 0, or 1.
///
/// Uses the running-error elimination algorithm of Avnaim, Boissonnat, Preparata and
/// Yvinec, which produces the exact sign using only double precision arithmetic. This is
/// the foundation of every topology decision made by the overlay: float round-off in a
/// naive cross product produces inconsistent orientations that corrupt the graph.
pub fn sign_of_det2x2<T>(x1: T, y1: T, x2: T, y2: T) -> i32
where
    T: Real,
{
    let zero = T::zero();
    let (mut x1, mut y1, mut x2, mut y2) = (x1, y1, x2, y2);
    let mut sign = 1;

    // handle null entries up front
    if x1 == zero || y2 == zero {
        if y1 == zero || x2 == zero {
            return 0;
        } else if y1 > zero {
            if x2 > zero {
                return -sign;
            }
            return sign;
        } else {
            if x2 > zero {
                return sign;
            }
            return -sign;
        }
    }
    if y1 == zero || x2 == zero {
        if y2 > zero {
            if x1 > zero {
                return sign;
            }
            return -sign;
        } else {
            if x1 > zero {
                return -sign;
            }
            return sign;
        }
    }

    // make y coordinates positive and permute the entries so that y2 is the biggest
    if zero < y1 {
        if zero < y2 {
            if y1 > y2 {
                sign = -sign;
                std::mem::swap(&mut x1, &mut x2);
                std::mem::swap(&mut y1, &mut y2);
            }
        } else if y1 <= -y2 {
            sign = -sign;
            x2 = -x2;
            y2 = -y2;
        } else {
            sign = -sign;
            let swap = x1;
            x1 = -x2;
            x2 = swap;
            let swap = y1;
            y1 = -y2;
            y2 = swap;
        }
    } else if zero < y2 {
        if -y1 <= y2 {
            sign = -sign;
            x1 = -x1;
            y1 = -y1;
        } else {
            sign = -sign;
            let swap = -x1;
            x1 = x2;
            x2 = swap;
            let swap = -y1;
            y1 = y2;
            y2 = swap;
        }
    } else if y1 >= y2 {
        x1 = -x1;
        y1 = -y1;
        x2 = -x2;
        y2 = -y2;
    } else {
        sign = -sign;
        let swap = -x1;
        x1 = -x2;
        x2 = swap;
        let swap = -y1;
        y1 = -y2;
        y2 = swap;
    }

    // make x coordinates positive, assuming y1 <= y2
    if zero < x1 {
        if zero < x2 {
            if x1 > x2 {
                return sign;
            }
        } else {
            return sign;
        }
    } else if zero < x2 {
        return -sign;
    } else if x1 >= x2 {
        sign = -sign;
        x1 = -x1;
        x2 = -x2;
    } else {
        return -sign;
    }

    // all entries strictly positive with x1 <= x2 and y1 <= y2
    loop {
        let k = (x2 / x1).floor();
        x2 = x2 - k * x1;
        y2 = y2 - k * y1;

        if y2 < zero {
            return -sign;
        }
        if y2 > y1 {
            return sign;
        }

        if x1 > x2 + x2 {
            if y1 < y2 + y2 {
                return sign;
            }
        } else if y1 > y2 + y2 {
            return -sign;
        } else {
            x2 = x1 - x2;
            y2 = y1 - y2;
            sign = -sign;
        }
        if y2 == zero {
            if x2 == zero {
                return 0;
            }
            return -sign;
        }
        if x2 == zero {
            return sign;
        }

        // exchange roles of (x1, y1) and (x2, y2)
        let k = (x1 / x2).floor();
        x1 = x1 - k * x2;
        y1 = y1 - k * y2;

        if y1 < zero {
            return sign;
        }
        if y1 > y2 {
            return -sign;
        }

        if x2 > x1 + x1 {
            if y2 < y1 + y1 {
                return -sign;
            }
        } else if y2 > y1 + y1 {
            return sign;
        } else {
            x1 = x2 - x1;
            y1 = y2 - y1;
            sign = -sign;
        }
        if y1 == zero {
            if x1 == zero {
                return 0;
            }
            return sign;
        }
        if x1 == zero {
            return -sign;
        }
    }
}

/// Robust orientation of point `q` relative to the directed line `p1->p2`.
///
/// Returns 1 if `q` is counter clockwise (left) of `p1->p2`, -1 if clockwise (right),
/// and 0 if collinear.
pub fn orientation_index<T>(p1: Coord<T>, p2: Coord<T>, q: Coord<T>) -> i32
where
    T: Real,
{
    let dx1 = p2.x - p1.x;
    let dy1 = p2.y - p1.y;
    let dx2 = q.x - p2.x;
    let dy2 = q.y - p2.y;
    sign_of_det2x2(dx1, dy1, dx2, dy2)
}

/// Pseudo-distance of intersection point `p` along the segment `p0->p1`.
///
/// Uses the larger ordinate axis rather than the true euclidean distance since only the
/// relative ordering of intersection points along one segment matters. `p` is expected
/// to lie on the segment.
pub fn edge_distance<T>(p: Coord<T>, p0: Coord<T>, p1: Coord<T>) -> T
where
    T: Real,
{
    let dx = (p1.x - p0.x).abs();
    let dy = (p1.y - p0.y).abs();

    if p == p0 {
        return T::zero();
    }
    if p == p1 {
        if dx > dy {
            return dx;
        }
        return dy;
    }

    let pdx = (p.x - p0.x).abs();
    let pdy = (p.y - p0.y).abs();
    let dist = if dx > dy { pdx } else { pdy };
    // hedge against the point lying on the perpendicular axis of a degenerate segment
    if dist == T::zero() && p != p0 {
        return num_traits::real::Real::max(pdx, pdy);
    }
    dist
}

/// Distance from point `p` to the segment `s0->s1`.
pub fn dist_point_to_seg<T>(p: Coord<T>, s0: Coord<T>, s1: Coord<T>) -> T
where
    T: Real,
{
    if s0 == s1 {
        return (p - s0).length();
    }
    let v = s1 - s0;
    let t = (p - s0).dot(v) / v.length_squared();
    let t = num_traits::clamp(t, T::zero(), T::one());
    let closest = coord_on_seg(s0, v, t);
    (p - closest).length()
}

fn coord_on_seg<T>(s0: Coord<T>, v: Coord<T>, t: T) -> Coord<T>
where
    T: Real,
{
    Coord::new(s0.x + t * v.x, s0.y + t * v.y)
}

/// Twice the signed area of the (closed or implicitly closed) ring given.
///
/// Positive for counter clockwise rings, negative for clockwise rings.
pub fn signed_area2<T>(ring: &[Coord<T>]) -> T
where
    T: Real,
{
    if ring.len() < 3 {
        return T::zero();
    }
    let mut sum = T::zero();
    let n = ring.len();
    for i in 0..n {
        let p0 = ring[i];
        let p1 = ring[(i + 1) % n];
        sum = sum + p0.perp_dot(p1);
    }
    sum
}

/// Signed area of the ring given (positive for counter clockwise).
pub fn signed_area<T>(ring: &[Coord<T>]) -> T
where
    T: Real,
{
    signed_area2(ring) / T::two()
}

/// Returns true if the ring given is oriented counter clockwise.
pub fn is_ccw<T>(ring: &[Coord<T>]) -> bool
where
    T: Real,
{
    signed_area2(ring) > T::zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::coord;
    use crate::core::traits::FuzzyEq;

    #[test]
    fn det_sign_exact_cases() {
        assert_eq!(sign_of_det2x2(1.0, 0.0, 0.0, 1.0), 1);
        assert_eq!(sign_of_det2x2(0.0, 1.0, 1.0, 0.0), -1);
        assert_eq!(sign_of_det2x2(2.0, 4.0, 1.0, 2.0), 0);
        assert_eq!(sign_of_det2x2(-3.0, 1.0, 7.0, 2.0), -1);
        assert_eq!(sign_of_det2x2(-3.0, -1.0, -7.0, -2.0), -1);
    }

    #[test]
    fn orientation_basic() {
        let p1 = coord(0.0, 0.0);
        let p2 = coord(10.0, 0.0);
        assert_eq!(orientation_index(p1, p2, coord(5.0, 1.0)), 1);
        assert_eq!(orientation_index(p1, p2, coord(5.0, -1.0)), -1);
        assert_eq!(orientation_index(p1, p2, coord(20.0, 0.0)), 0);
    }

    #[test]
    fn orientation_nearly_collinear_is_consistent() {
        // orientation must agree regardless of segment direction
        let p1 = coord(-140.0, 60.0);
        let p2 = coord(-39.3, 60.0 + 1.0e-12);
        let q = coord(10.0, 60.0);
        let a = orientation_index(p1, p2, q);
        let b = orientation_index(p2, p1, q);
        assert_eq!(a, -b);
    }

    #[test]
    fn ring_orientation() {
        let ccw = [
            coord(0.0, 0.0),
            coord(4.0, 0.0),
            coord(4.0, 4.0),
            coord(0.0, 4.0),
        ];
        assert!(is_ccw(&ccw));
        let cw: Vec<_> = ccw.iter().rev().copied().collect();
        assert!(!is_ccw(&cw));
        assert_fuzzy_eq!(signed_area(&ccw), 16.0);
    }
}
