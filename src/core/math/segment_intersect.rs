use super::{dist_point_to_seg, orientation_index, Coord};
use crate::core::traits::Real;

/// Holds the result of finding the intersect between two line segments.
#[derive(Debug, Copy, Clone)]
pub enum SegSegIntr<T>
where
    T: Real,
{
    /// No intersect between the segments.
    NoIntersect,
    /// The segments intersect in a single point.
    PointIntersect {
        /// The intersection point.
        point: Coord<T>,
        /// True if the intersection point is interior to both segments (not an
        /// endpoint of either).
        is_proper: bool,
    },
    /// The segments are collinear and overlap over a (possibly degenerate) interval.
    CollinearIntersect {
        /// Start of the overlap interval.
        point1: Coord<T>,
        /// End of the overlap interval.
        point2: Coord<T>,
    },
}

/// Finds the intersect between the line segments `p1->p2` and `q1->q2`.
///
/// The classification is computed from robust orientation signs and is order
/// independent: swapping the two segments, or reversing the endpoints of either
/// segment, yields an equivalent classification. Endpoint-touch intersections return
/// the exact input coordinate rather than a recomputed one. This stability is load
/// bearing: an inconsistent answer here shows up later as a corrupted topology graph.
pub fn seg_seg_intr<T>(p1: Coord<T>, p2: Coord<T>, q1: Coord<T>, q2: Coord<T>) -> SegSegIntr<T>
where
    T: Real,
{
    use SegSegIntr::*;

    if !envelopes_intersect(p1, p2, q1, q2) {
        return NoIntersect;
    }

    let pq1 = orientation_index(p1, p2, q1);
    let pq2 = orientation_index(p1, p2, q2);
    if (pq1 > 0 && pq2 > 0) || (pq1 < 0 && pq2 < 0) {
        return NoIntersect;
    }

    let qp1 = orientation_index(q1, q2, p1);
    let qp2 = orientation_index(q1, q2, p2);
    if (qp1 > 0 && qp2 > 0) || (qp1 < 0 && qp2 < 0) {
        return NoIntersect;
    }

    if pq1 == 0 && pq2 == 0 && qp1 == 0 && qp2 == 0 {
        return collinear_intersection(p1, p2, q1, q2);
    }

    if pq1 == 0 || pq2 == 0 || qp1 == 0 || qp2 == 0 {
        // an endpoint of one segment lies on the other segment; use the exact input
        // coordinate so repeated queries against shared endpoints stay consistent
        let point = if p1 == q1 || p1 == q2 {
            p1
        } else if p2 == q1 || p2 == q2 {
            p2
        } else if pq1 == 0 {
            q1
        } else if pq2 == 0 {
            q2
        } else if qp1 == 0 {
            p1
        } else {
            p2
        };
        return PointIntersect {
            point,
            is_proper: false,
        };
    }

    PointIntersect {
        point: proper_intersection(p1, p2, q1, q2),
        is_proper: true,
    }
}

fn collinear_intersection<T>(
    p1: Coord<T>,
    p2: Coord<T>,
    q1: Coord<T>,
    q2: Coord<T>,
) -> SegSegIntr<T>
where
    T: Real,
{
    use SegSegIntr::*;

    let p1q1p2 = envelope_contains(p1, p2, q1);
    let p1q2p2 = envelope_contains(p1, p2, q2);
    let q1p1q2 = envelope_contains(q1, q2, p1);
    let q1p2q2 = envelope_contains(q1, q2, p2);

    if p1q1p2 && p1q2p2 {
        return CollinearIntersect {
            point1: q1,
            point2: q2,
        };
    }
    if q1p1q2 && q1p2q2 {
        return CollinearIntersect {
            point1: p1,
            point2: p2,
        };
    }
    if p1q1p2 && q1p1q2 {
        if q1 == p1 && !p1q2p2 && !q1p2q2 {
            return PointIntersect {
                point: q1,
                is_proper: false,
            };
        }
        return CollinearIntersect {
            point1: q1,
            point2: p1,
        };
    }
    if p1q1p2 && q1p2q2 {
        if q1 == p2 && !p1q2p2 && !q1p1q2 {
            return PointIntersect {
                point: q1,
                is_proper: false,
            };
        }
        return CollinearIntersect {
            point1: q1,
            point2: p2,
        };
    }
    if p1q2p2 && q1p1q2 {
        if q2 == p1 && !p1q1p2 && !q1p2q2 {
            return PointIntersect {
                point: q2,
                is_proper: false,
            };
        }
        return CollinearIntersect {
            point1: q2,
            point2: p1,
        };
    }
    if p1q2p2 && q1p2q2 {
        if q2 == p2 && !p1q1p2 && !q1p1q2 {
            return PointIntersect {
                point: q2,
                is_proper: false,
            };
        }
        return CollinearIntersect {
            point1: q2,
            point2: p2,
        };
    }

    NoIntersect
}

/// Computes the intersection point of two properly crossing segments.
///
/// The computation translates the segments to the origin of the overlap envelope to
/// condition the homogeneous-coordinate line intersection, then falls back to the
/// nearest endpoint if round-off pushes the computed point outside either segment's
/// envelope.
fn proper_intersection<T>(p1: Coord<T>, p2: Coord<T>, q1: Coord<T>, q2: Coord<T>) -> Coord<T>
where
    T: Real,
{
    let centre = overlap_centre(p1, p2, q1, q2);
    let int_pt = homogeneous_intersection(
        p1 - centre,
        p2 - centre,
        q1 - centre,
        q2 - centre,
    )
    .map(|p| p + centre);

    match int_pt {
        Some(p) if envelope_contains(p1, p2, p) && envelope_contains(q1, q2, p) => p,
        _ => nearest_endpoint(p1, p2, q1, q2),
    }
}

/// Intersection of the infinite lines through `p1->p2` and `q1->q2` using homogeneous
/// coordinates. Returns `None` when the computation is not representable (parallel or
/// overflowed lines).
fn homogeneous_intersection<T>(
    p1: Coord<T>,
    p2: Coord<T>,
    q1: Coord<T>,
    q2: Coord<T>,
) -> Option<Coord<T>>
where
    T: Real,
{
    let px = p1.y - p2.y;
    let py = p2.x - p1.x;
    let pw = p1.x * p2.y - p2.x * p1.y;

    let qx = q1.y - q2.y;
    let qy = q2.x - q1.x;
    let qw = q1.x * q2.y - q2.x * q1.y;

    let x = py * qw - qy * pw;
    let y = qx * pw - px * qw;
    let w = px * qy - qx * py;

    if w == T::zero() {
        return None;
    }
    let x_int = x / w;
    let y_int = y / w;
    // comparison is false for NaN and infinities, which both mean the lines were
    // effectively parallel at this precision
    if !(x_int.abs() <= Real::max_value() && y_int.abs() <= Real::max_value()) {
        return None;
    }
    Some(Coord::new(x_int, y_int))
}

/// Finds the endpoint of the two segments nearest the other segment. Used as the
/// intersection point when the exact computation degrades; within the failure bound it
/// is a reasonable approximation.
fn nearest_endpoint<T>(p1: Coord<T>, p2: Coord<T>, q1: Coord<T>, q2: Coord<T>) -> Coord<T>
where
    T: Real,
{
    let mut nearest = p1;
    let mut min_dist = dist_point_to_seg(p1, q1, q2);

    let dist = dist_point_to_seg(p2, q1, q2);
    if dist < min_dist {
        min_dist = dist;
        nearest = p2;
    }
    let dist = dist_point_to_seg(q1, p1, p2);
    if dist < min_dist {
        min_dist = dist;
        nearest = q1;
    }
    let dist = dist_point_to_seg(q2, p1, p2);
    if dist < min_dist {
        nearest = q2;
    }
    nearest
}

fn envelopes_intersect<T>(p1: Coord<T>, p2: Coord<T>, q1: Coord<T>, q2: Coord<T>) -> bool
where
    T: Real,
{
    let pminx = num_traits::real::Real::min(p1.x, p2.x);
    let pmaxx = num_traits::real::Real::max(p1.x, p2.x);
    let pminy = num_traits::real::Real::min(p1.y, p2.y);
    let pmaxy = num_traits::real::Real::max(p1.y, p2.y);
    let qminx = num_traits::real::Real::min(q1.x, q2.x);
    let qmaxx = num_traits::real::Real::max(q1.x, q2.x);
    let qminy = num_traits::real::Real::min(q1.y, q2.y);
    let qmaxy = num_traits::real::Real::max(q1.y, q2.y);
    pminx <= qmaxx && pmaxx >= qminx && pminy <= qmaxy && pmaxy >= qminy
}

fn envelope_contains<T>(s0: Coord<T>, s1: Coord<T>, p: Coord<T>) -> bool
where
    T: Real,
{
    num_traits::real::Real::min(s0.x, s1.x) <= p.x
        && p.x <= num_traits::real::Real::max(s0.x, s1.x)
        && num_traits::real::Real::min(s0.y, s1.y) <= p.y
        && p.y <= num_traits::real::Real::max(s0.y, s1.y)
}

fn overlap_centre<T>(p1: Coord<T>, p2: Coord<T>, q1: Coord<T>, q2: Coord<T>) -> Coord<T>
where
    T: Real,
{
    let minx = num_traits::real::Real::max(
        num_traits::real::Real::min(p1.x, p2.x),
        num_traits::real::Real::min(q1.x, q2.x),
    );
    let miny = num_traits::real::Real::max(
        num_traits::real::Real::min(p1.y, p2.y),
        num_traits::real::Real::min(q1.y, q2.y),
    );
    let maxx = num_traits::real::Real::min(
        num_traits::real::Real::max(p1.x, p2.x),
        num_traits::real::Real::max(q1.x, q2.x),
    );
    let maxy = num_traits::real::Real::min(
        num_traits::real::Real::max(p1.y, p2.y),
        num_traits::real::Real::max(q1.y, q2.y),
    );
    Coord::new((minx + maxx) / T::two(), (miny + maxy) / T::two())
}
