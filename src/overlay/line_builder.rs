use std::collections::BTreeMap;

use crate::core::math::Coord;
use crate::core::traits::Real;
use crate::geometry::{locate_point_in_areas, Location, Polygon};
use crate::graph::{CoordKey, PlanarGraph};
use crate::overlay::{is_result_of_op, BooleanOp};

/// Collects the result lines from the line edges of the graph.
///
/// A line edge belongs to the result when its labelling satisfies the operation and
/// it is not covered by a result polygon. Collapsed area boundaries that touch the
/// result border contribute as well under intersection. Collected edges are finally
/// merged across nodes of degree two, so a line split by noding comes back out as a
/// single linestring.
pub(super) fn build_lines<T>(
    graph: &mut PlanarGraph<T>,
    op: BooleanOp,
    result_polygons: &[Polygon<T>],
) -> Vec<Vec<Coord<T>>>
where
    T: Real,
{
    find_covered_line_edges(graph, result_polygons);

    let mut line_edges = Vec::new();
    for de_index in 0..graph.dir_edges.len() {
        collect_line_edge(graph, de_index, op, &mut line_edges);
        collect_boundary_touch_edge(graph, de_index, op, &mut line_edges);
    }

    let mut lines = Vec::new();
    for edge_index in line_edges {
        let edge = &mut graph.edges[edge_index];
        lines.push(edge.pts.clone());
        edge.in_result = true;
    }
    merge_line_chains(lines)
}

/// Marks every line edge as covered or not by the result area.
///
/// At nodes where area edges are present the covered state is read off the star: the
/// stars are in CCW order, so walking the star crosses from the right side of each
/// area edge to its left, toggling between result interior and exterior. Line edges
/// at area free nodes fall back to a point in area test.
fn find_covered_line_edges<T>(graph: &mut PlanarGraph<T>, result_polygons: &[Polygon<T>])
where
    T: Real,
{
    for node_index in 0..graph.nodes.len() {
        let star = graph.nodes[node_index].star.clone();

        let mut start_loc = None;
        for &de_id in &star {
            let de = &graph.dir_edges[de_id.0];
            if de.is_line_edge() {
                continue;
            }
            if de.in_result {
                start_loc = Some(Location::Interior);
                break;
            }
            if graph.dir_edges[de.sym.0].in_result {
                start_loc = Some(Location::Exterior);
                break;
            }
        }
        // no area edges at this node, leave its line edges for the fallback test
        let Some(start_loc) = start_loc else {
            continue;
        };

        let mut curr_loc = start_loc;
        for &de_id in &star {
            let de = &graph.dir_edges[de_id.0];
            if de.is_line_edge() {
                let edge = de.edge;
                graph.edges[edge].covered = Some(curr_loc == Location::Interior);
            } else {
                if de.in_result {
                    curr_loc = Location::Exterior;
                }
                if graph.dir_edges[de.sym.0].in_result {
                    curr_loc = Location::Interior;
                }
            }
        }
    }

    for de_index in 0..graph.dir_edges.len() {
        let de = &graph.dir_edges[de_index];
        if !de.is_line_edge() || graph.edges[de.edge].covered.is_some() {
            continue;
        }
        let covered = locate_point_in_areas(de.p0, result_polygons) != Location::Exterior;
        let edge = de.edge;
        graph.edges[edge].covered = Some(covered);
    }
}

fn collect_line_edge<T>(
    graph: &mut PlanarGraph<T>,
    de_index: usize,
    op: BooleanOp,
    line_edges: &mut Vec<usize>,
) where
    T: Real,
{
    let de = &graph.dir_edges[de_index];
    if !de.is_line_edge() || de.visited {
        return;
    }
    let label = de.label;
    if !is_result_of_op(label.location_on(0), label.location_on(1), op) {
        return;
    }
    if graph.edges[de.edge].covered == Some(true) {
        return;
    }
    line_edges.push(graph.dir_edges[de_index].edge);
    set_visited_edge(graph, de_index);
}

/// Collects an area boundary edge that collapsed out of both result areas but still
/// touches the result. Such an edge only qualifies under intersection.
fn collect_boundary_touch_edge<T>(
    graph: &mut PlanarGraph<T>,
    de_index: usize,
    op: BooleanOp,
    line_edges: &mut Vec<usize>,
) where
    T: Real,
{
    let de = &graph.dir_edges[de_index];
    if de.is_line_edge() || de.visited || de.is_interior_area_edge() {
        return;
    }
    if graph.edges[de.edge].in_result {
        return;
    }
    debug_assert!(
        !(de.in_result || graph.dir_edges[de.sym.0].in_result)
            || !graph.edges[de.edge].in_result
    );
    let label = de.label;
    if is_result_of_op(label.location_on(0), label.location_on(1), op)
        && op == BooleanOp::Intersection
    {
        line_edges.push(graph.dir_edges[de_index].edge);
        set_visited_edge(graph, de_index);
    }
}

fn set_visited_edge<T>(graph: &mut PlanarGraph<T>, de_index: usize)
where
    T: Real,
{
    let sym = graph.dir_edges[de_index].sym;
    graph.dir_edges[de_index].visited = true;
    graph.dir_edges[sym.0].visited = true;
}

/// Joins collected lines end to end wherever exactly two line endpoints meet, so
/// noding splits internal to a result line do not survive into the output.
fn merge_line_chains<T>(lines: Vec<Vec<Coord<T>>>) -> Vec<Vec<Coord<T>>>
where
    T: Real,
{
    let mut endpoints: BTreeMap<CoordKey<T>, Vec<usize>> = BTreeMap::new();
    for (i, line) in lines.iter().enumerate() {
        endpoints.entry(CoordKey(line[0])).or_default().push(i);
        endpoints
            .entry(CoordKey(line[line.len() - 1]))
            .or_default()
            .push(i);
    }

    let mut used = vec![false; lines.len()];
    let mut merged = Vec::new();
    for i in 0..lines.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        let mut chain = lines[i].clone();

        // grow the tail, then flip and grow the other end
        for _ in 0..2 {
            loop {
                let tail = chain[chain.len() - 1];
                if tail == chain[0] && chain.len() > 1 {
                    // chain closed into a ring
                    break;
                }
                let at_tail = &endpoints[&CoordKey(tail)];
                if at_tail.len() != 2 {
                    break;
                }
                let Some(&next) = at_tail.iter().find(|&&j| !used[j]) else {
                    break;
                };
                used[next] = true;
                let next_line = &lines[next];
                if next_line[0] == tail {
                    chain.extend_from_slice(&next_line[1..]);
                } else {
                    chain.extend(next_line[..next_line.len() - 1].iter().rev());
                }
            }
            chain.reverse();
        }
        merged.push(chain);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(pts: &[(f64, f64)]) -> Vec<Coord<f64>> {
        pts.iter().map(|&(x, y)| Coord::new(x, y)).collect()
    }

    #[test]
    fn merge_joins_split_segments() {
        let lines = vec![
            coords(&[(0.0, 0.0), (1.0, 0.0)]),
            coords(&[(1.0, 0.0), (2.0, 0.0)]),
            coords(&[(2.0, 0.0), (3.0, 1.0)]),
        ];
        let merged = merge_line_chains(lines);
        assert_eq!(merged.len(), 1);
        let chain = &merged[0];
        assert_eq!(chain.len(), 4);
        let forward = coords(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 1.0)]);
        let mut reverse = forward.clone();
        reverse.reverse();
        assert!(chain == &forward || chain == &reverse);
    }

    #[test]
    fn merge_stops_at_junctions() {
        // three segments meeting at (1, 0), no pair may merge through the junction
        let lines = vec![
            coords(&[(0.0, 0.0), (1.0, 0.0)]),
            coords(&[(1.0, 0.0), (2.0, 0.0)]),
            coords(&[(1.0, 0.0), (1.0, 1.0)]),
        ];
        let merged = merge_line_chains(lines);
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn merge_preserves_disjoint_lines() {
        let lines = vec![
            coords(&[(0.0, 0.0), (1.0, 0.0)]),
            coords(&[(5.0, 5.0), (6.0, 5.0)]),
        ];
        let merged = merge_line_chains(lines);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn merge_closes_rings() {
        let lines = vec![
            coords(&[(0.0, 0.0), (1.0, 0.0)]),
            coords(&[(1.0, 0.0), (1.0, 1.0)]),
            coords(&[(1.0, 1.0), (0.0, 0.0)]),
        ];
        let merged = merge_line_chains(lines);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].len(), 4);
        assert_eq!(merged[0][0], merged[0][3]);
    }
}
