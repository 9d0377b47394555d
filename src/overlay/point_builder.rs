use crate::core::math::Coord;
use crate::core::traits::Real;
use crate::geometry::{locate_point_in_areas, Geometry, Location, PointLocator, Polygon};
use crate::graph::PlanarGraph;
use crate::overlay::{is_result_of_op, BooleanOp};

/// Collects the result points from the graph nodes.
///
/// A node contributes a point when its own labelling satisfies the operation but
/// none of its incident edges made it into the result and no result line or polygon
/// already covers it. Nodes with incident edges only qualify under intersection,
/// where two boundaries crossing at a single point is a genuine result.
pub(super) fn build_points<T>(
    graph: &PlanarGraph<T>,
    op: BooleanOp,
    result_polygons: &[Polygon<T>],
    result_lines: &[Vec<Coord<T>>],
) -> Vec<Coord<T>>
where
    T: Real,
{
    let line_geom = Geometry::MultiLineString(result_lines.to_vec());
    let locator = PointLocator::new();

    let mut points = Vec::new();
    for node in &graph.nodes {
        if node
            .star
            .iter()
            .any(|de| graph.edges[graph.dir_edges[de.0].edge].in_result)
        {
            continue;
        }
        if !node.star.is_empty() && op != BooleanOp::Intersection {
            continue;
        }
        let label = node.label;
        if !is_result_of_op(label.location_on(0), label.location_on(1), op) {
            continue;
        }
        if !result_lines.is_empty() && locator.locate(node.coord, &line_geom) != Location::Exterior
        {
            continue;
        }
        if locate_point_in_areas(node.coord, result_polygons) != Location::Exterior {
            continue;
        }
        points.push(node.coord);
    }
    points
}
