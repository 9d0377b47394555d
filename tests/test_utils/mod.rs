use planar_overlay::core::math::{is_ccw, Coord};
use planar_overlay::geometry::{Geometry, Polygon};

/// Builds a closed ring from the distinct vertices, appending the closing point.
pub fn closed_ring(pts: &[(f64, f64)]) -> Vec<Coord<f64>> {
    let mut ring: Vec<Coord<f64>> = pts.iter().map(|&(x, y)| Coord::new(x, y)).collect();
    ring.push(ring[0]);
    ring
}

pub fn polygon(shell: &[(f64, f64)]) -> Geometry<f64> {
    Geometry::Polygon(Polygon::new(closed_ring(shell), Vec::new()))
}

pub fn polygon_with_holes(shell: &[(f64, f64)], holes: &[&[(f64, f64)]]) -> Geometry<f64> {
    Geometry::Polygon(Polygon::new(
        closed_ring(shell),
        holes.iter().map(|h| closed_ring(h)).collect(),
    ))
}

pub fn line_string(pts: &[(f64, f64)]) -> Geometry<f64> {
    Geometry::LineString(pts.iter().map(|&(x, y)| Coord::new(x, y)).collect())
}

/// Rewrites a closed ring into canonical form: counter clockwise orientation,
/// starting at the lexicographically smallest vertex. Makes rings comparable
/// independent of where the builder happened to start the walk.
pub fn normalize_ring(ring: &[Coord<f64>]) -> Vec<Coord<f64>> {
    assert!(ring.len() >= 4 && ring.first() == ring.last(), "ring not closed");
    let mut open: Vec<Coord<f64>> = ring[..ring.len() - 1].to_vec();
    if !is_ccw(ring) {
        open.reverse();
    }
    let min_index = open
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.compare(b))
        .map(|(i, _)| i)
        .unwrap();
    open.rotate_left(min_index);
    open.push(open[0]);
    open
}

pub fn assert_ring_eq(actual: &[Coord<f64>], expected: &[(f64, f64)]) {
    let expected = normalize_ring(&closed_ring(expected));
    let actual = normalize_ring(actual);
    assert_eq!(
        actual, expected,
        "rings do not match: actual: {actual:?}, expected: {expected:?}"
    );
}

/// Asserts the result is a single polygon whose shell matches `expected_shell`.
pub fn assert_single_polygon(result: &Geometry<f64>, expected_shell: &[(f64, f64)]) {
    match result {
        Geometry::Polygon(p) => {
            assert!(p.holes.is_empty(), "unexpected holes: {:?}", p.holes);
            assert_ring_eq(&p.shell, expected_shell);
        }
        other => panic!("expected a polygon result, got: {other:?}"),
    }
}
