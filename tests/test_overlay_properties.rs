mod test_utils;

use planar_overlay::core::math::Coord;
use planar_overlay::core::traits::FuzzyEq;
use planar_overlay::geometry::Geometry;
use planar_overlay::{overlay, BooleanOp};
use test_utils::{line_string, polygon};

fn assert_area_eq(g: &Geometry<f64>, expected: f64) {
    let area = g.area();
    assert!(
        area.fuzzy_eq_eps(expected, 1e-8),
        "unexpected area: {area}, expected: {expected}"
    );
}

#[test]
fn areas_partition_the_union() {
    let cases: &[(&[(f64, f64)], &[(f64, f64)])] = &[
        (
            &[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)],
            &[(2.0, 2.0), (6.0, 2.0), (6.0, 6.0), (2.0, 6.0)],
        ),
        (
            &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
            &[(3.0, 3.0), (7.0, 3.0), (7.0, 7.0), (3.0, 7.0)],
        ),
        (
            &[(0.0, 0.0), (5.0, 0.0), (5.0, 1.0), (0.0, 1.0)],
            &[(1.0, -2.0), (2.0, -2.0), (2.0, 3.0), (1.0, 3.0)],
        ),
    ];
    for (ring_a, ring_b) in cases {
        let a = polygon(ring_a);
        let b = polygon(ring_b);
        let inter = overlay(&a, &b, BooleanOp::Intersection).unwrap();
        let a_minus_b = overlay(&a, &b, BooleanOp::Difference).unwrap();
        let b_minus_a = overlay(&b, &a, BooleanOp::Difference).unwrap();
        let union = overlay(&a, &b, BooleanOp::Union).unwrap();
        let parts = inter.area() + a_minus_b.area() + b_minus_a.area();
        let total = union.area();
        assert!(
            parts.fuzzy_eq_eps(total, 1e-8),
            "partition failed: parts: {parts}, union: {total}"
        );
    }
}

#[test]
fn sym_difference_area_is_union_minus_intersection() {
    let a = polygon(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
    let b = polygon(&[(2.0, 2.0), (6.0, 2.0), (6.0, 6.0), (2.0, 6.0)]);
    let sym = overlay(&a, &b, BooleanOp::SymDifference).unwrap();
    let union = overlay(&a, &b, BooleanOp::Union).unwrap();
    let inter = overlay(&a, &b, BooleanOp::Intersection).unwrap();
    assert!(sym.area().fuzzy_eq(union.area() - inter.area()));
}

#[test]
fn union_is_idempotent() {
    let a = polygon(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
    let result = overlay(&a, &a.clone(), BooleanOp::Union).unwrap();
    assert_area_eq(&result, 16.0);
}

#[test]
fn union_and_intersection_commute() {
    let a = polygon(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
    let b = polygon(&[(2.0, 2.0), (6.0, 2.0), (6.0, 6.0), (2.0, 6.0)]);
    for op in [
        BooleanOp::Intersection,
        BooleanOp::Union,
        BooleanOp::SymDifference,
    ] {
        let ab = overlay(&a, &b, op).unwrap();
        let ba = overlay(&b, &a, op).unwrap();
        assert!(
            ab.area().fuzzy_eq(ba.area()),
            "areas differ under {op:?}"
        );
    }
}

#[test]
fn spike_collapses_to_line_in_union() {
    // the spike to (6, 1) and back has no area, it survives as a line component
    let spiked = polygon(&[
        (0.0, 0.0),
        (4.0, 0.0),
        (4.0, 1.0),
        (6.0, 1.0),
        (4.0, 1.0),
        (4.0, 4.0),
        (0.0, 4.0),
    ]);
    let b = polygon(&[(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 2.0)]);
    let result = overlay(&spiked, &b, BooleanOp::Union).unwrap();
    match &result {
        Geometry::GeometryCollection(components) => {
            let mut poly_area = 0.0;
            let mut line_count = 0;
            for c in components {
                match c {
                    Geometry::Polygon(p) => poly_area += p.area(),
                    Geometry::LineString(pts) => {
                        line_count += 1;
                        assert_eq!(pts.len(), 2);
                        assert!(pts.iter().all(|p| p.y.fuzzy_eq(1.0)));
                    }
                    other => panic!("unexpected component: {other:?}"),
                }
            }
            assert!(poly_area.fuzzy_eq(16.0), "unexpected area: {poly_area}");
            assert_eq!(line_count, 1);
        }
        other => panic!("expected a mixed dimension result, got: {other:?}"),
    }
}

#[test]
fn line_clipped_by_polygon() {
    let line = line_string(&[(-2.0, 2.0), (8.0, 2.0)]);
    let square = polygon(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
    let result = overlay(&line, &square, BooleanOp::Intersection).unwrap();
    match &result {
        Geometry::LineString(pts) => {
            assert_eq!(
                pts,
                &vec![Coord::new(0.0, 2.0), Coord::new(4.0, 2.0)]
            );
        }
        other => panic!("expected a line result, got: {other:?}"),
    }
}

#[test]
fn line_difference_keeps_outside_parts() {
    let line = line_string(&[(-2.0, 2.0), (8.0, 2.0)]);
    let square = polygon(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
    let result = overlay(&line, &square, BooleanOp::Difference).unwrap();
    match &result {
        Geometry::MultiLineString(lines) => {
            assert_eq!(lines.len(), 2);
            for l in lines {
                assert_eq!(l.len(), 2);
                assert!(l.iter().all(|p| p.y.fuzzy_eq(2.0)));
            }
        }
        other => panic!("expected two line pieces, got: {other:?}"),
    }
}

#[test]
fn line_noding_splits_merge_back() {
    // a polyline with interior vertexes inside the clip area comes back as one piece
    let line = line_string(&[(-2.0, 2.0), (1.0, 2.0), (3.0, 3.0), (8.0, 3.0)]);
    let square = polygon(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
    let result = overlay(&line, &square, BooleanOp::Intersection).unwrap();
    match &result {
        Geometry::LineString(pts) => {
            assert_eq!(pts.len(), 4);
        }
        other => panic!("expected a single line result, got: {other:?}"),
    }
}

#[test]
fn point_in_polygon_intersection() {
    let p = Geometry::Point(Coord::new(2.0, 2.0));
    let square = polygon(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
    let result = overlay(&p, &square, BooleanOp::Intersection).unwrap();
    match &result {
        Geometry::Point(pt) => {
            assert!(pt.x.fuzzy_eq(2.0) && pt.y.fuzzy_eq(2.0));
        }
        other => panic!("expected a point result, got: {other:?}"),
    }
}

#[test]
fn point_outside_polygon_intersection_is_empty() {
    let p = Geometry::Point(Coord::new(20.0, 20.0));
    let square = polygon(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
    let result = overlay(&p, &square, BooleanOp::Intersection).unwrap();
    assert!(result.is_empty(), "expected empty result, got: {result:?}");
}

#[test]
fn point_difference_from_polygon() {
    let p = Geometry::Point(Coord::new(20.0, 20.0));
    let square = polygon(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
    let result = overlay(&p, &square, BooleanOp::Difference).unwrap();
    match &result {
        Geometry::Point(pt) => {
            assert!(pt.x.fuzzy_eq(20.0) && pt.y.fuzzy_eq(20.0));
        }
        other => panic!("expected a point result, got: {other:?}"),
    }
}

#[test]
fn crossing_lines_intersection_is_point() {
    let a = line_string(&[(0.0, 0.0), (4.0, 4.0)]);
    let b = line_string(&[(0.0, 4.0), (4.0, 0.0)]);
    let result = overlay(&a, &b, BooleanOp::Intersection).unwrap();
    match &result {
        Geometry::Point(pt) => {
            assert!(pt.x.fuzzy_eq(2.0) && pt.y.fuzzy_eq(2.0));
        }
        other => panic!("expected a point result, got: {other:?}"),
    }
}

#[test]
fn crossing_lines_union_keeps_both() {
    let a = line_string(&[(0.0, 0.0), (4.0, 4.0)]);
    let b = line_string(&[(0.0, 4.0), (4.0, 0.0)]);
    let result = overlay(&a, &b, BooleanOp::Union).unwrap();
    match &result {
        Geometry::MultiLineString(lines) => {
            let total_pts: usize = lines.iter().map(|l| l.len()).sum();
            assert!(total_pts >= 4, "union lost line pieces: {lines:?}");
        }
        other => panic!("expected lines, got: {other:?}"),
    }
}
