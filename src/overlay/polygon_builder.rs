use static_aabb2d_index::{
    IndexableNum, StaticAABB2DIndex, StaticAABB2DIndexBuildError, StaticAABB2DIndexBuilder,
};

use crate::core::math::{is_ccw, Coord};
use crate::core::traits::Real;
use crate::error::TopologyError;
use crate::geometry::{locate_in_ring, Location, Polygon};
use crate::graph::{DirEdgeId, PlanarGraph};

/// Assembles the result polygons from the directed edges marked as in the result.
///
/// The result edges around every node are first linked into maximal ring cycles.
/// Maximal rings that touch themselves at a node are relinked into minimal rings,
/// which separate the shell from the holes the self touch pinches off. Shells and
/// holes are then matched: a hole produced alongside its shell is attached directly,
/// any remaining hole is assigned to the smallest result shell containing it.
pub(super) fn build_polygons<T>(
    graph: &mut PlanarGraph<T>,
) -> Result<Vec<Polygon<T>>, TopologyError>
where
    T: Real,
{
    for node_index in 0..graph.nodes.len() {
        graph.link_result_directed_edges(node_index)?;
    }

    let max_rings = build_maximal_rings(graph)?;

    let mut shells: Vec<ResultShell<T>> = Vec::new();
    let mut free_holes: Vec<Vec<Coord<T>>> = Vec::new();
    let mut min_ring_count = 0_usize;

    for (ring_id, ring_edges) in max_rings.iter().enumerate() {
        if max_node_degree(graph, ring_edges, ring_id) > 2 {
            for de in ring_edges {
                let node = graph.dir_edges[de.0].node;
                graph.link_minimal_directed_edges(node.0, ring_id);
            }
            let minimal = build_minimal_rings(graph, ring_edges, &mut min_ring_count)?;

            // at most one of the minimal rings is the shell, the rest are the holes
            // the self touches pinched off
            let mut shell_pts: Option<Vec<Coord<T>>> = None;
            let mut holes = Vec::new();
            for pts in minimal {
                if is_ccw(&pts) {
                    holes.push(pts);
                } else {
                    debug_assert!(shell_pts.is_none());
                    shell_pts = Some(pts);
                }
            }
            match shell_pts {
                Some(pts) => shells.push(ResultShell { pts, holes }),
                None => free_holes.extend(holes),
            }
        } else {
            let pts = ring_points(graph, ring_edges)?;
            if is_ccw(&pts) {
                free_holes.push(pts);
            } else {
                shells.push(ResultShell {
                    pts,
                    holes: Vec::new(),
                });
            }
        }
    }

    place_free_holes(&mut shells, free_holes)?;
    Ok(shells
        .into_iter()
        .map(|s| Polygon::new(s.pts, s.holes))
        .collect())
}

struct ResultShell<T>
where
    T: Real,
{
    pts: Vec<Coord<T>>,
    holes: Vec<Vec<Coord<T>>>,
}

/// Walks the `next` cycles of the result edges, assigning each edge to a maximal
/// ring. A broken or self revisiting cycle means the result border cannot close.
fn build_maximal_rings<T>(graph: &mut PlanarGraph<T>) -> Result<Vec<Vec<DirEdgeId>>, TopologyError>
where
    T: Real,
{
    let mut rings = Vec::new();
    for start in 0..graph.dir_edges.len() {
        {
            let de = &graph.dir_edges[start];
            if !de.in_result || !de.label.is_area() || de.edge_ring.is_some() {
                continue;
            }
        }
        let ring_id = rings.len();
        let mut edges = Vec::new();
        let mut current = DirEdgeId(start);
        loop {
            if graph.dir_edges[current.0].edge_ring.is_some() {
                return Err(TopologyError::ring_not_closed(graph.dir_edges[current.0].p0));
            }
            edges.push(current);
            graph.dir_edges[current.0].edge_ring = Some(ring_id);
            let edge = graph.dir_edges[current.0].edge;
            graph.edges[edge].in_result = true;
            let next = graph.dir_edges[current.0]
                .next
                .ok_or_else(|| TopologyError::ring_not_closed(graph.dir_edges[current.0].p1))?;
            if next.0 == start {
                break;
            }
            current = next;
        }
        rings.push(edges);
    }
    Ok(rings)
}

fn max_node_degree<T>(graph: &PlanarGraph<T>, ring_edges: &[DirEdgeId], ring_id: usize) -> usize
where
    T: Real,
{
    ring_edges
        .iter()
        .map(|de| graph.outgoing_degree(graph.dir_edges[de.0].node.0, ring_id))
        .max()
        .unwrap_or(0)
}

/// Walks the `next_min` cycles of one maximal ring's edges, producing the coordinate
/// rings of its minimal rings.
fn build_minimal_rings<T>(
    graph: &mut PlanarGraph<T>,
    ring_edges: &[DirEdgeId],
    min_ring_count: &mut usize,
) -> Result<Vec<Vec<Coord<T>>>, TopologyError>
where
    T: Real,
{
    let mut rings_pts = Vec::new();
    for &start in ring_edges {
        if graph.dir_edges[start.0].min_edge_ring.is_some() {
            continue;
        }
        let min_id = *min_ring_count;
        *min_ring_count += 1;
        let mut edges = Vec::new();
        let mut current = start;
        loop {
            if graph.dir_edges[current.0].min_edge_ring.is_some() {
                return Err(TopologyError::ring_not_closed(graph.dir_edges[current.0].p0));
            }
            edges.push(current);
            graph.dir_edges[current.0].min_edge_ring = Some(min_id);
            let next = graph.dir_edges[current.0]
                .next_min
                .ok_or_else(|| TopologyError::ring_not_closed(graph.dir_edges[current.0].p1))?;
            if next == start {
                break;
            }
            current = next;
        }
        rings_pts.push(ring_points(graph, &edges)?);
    }
    Ok(rings_pts)
}

/// Concatenates the coordinates of a cycle of directed edges into a closed ring.
/// Every edge after the first skips its start point, which the previous edge already
/// contributed.
fn ring_points<T>(graph: &PlanarGraph<T>, edges: &[DirEdgeId]) -> Result<Vec<Coord<T>>, TopologyError>
where
    T: Real,
{
    let mut pts: Vec<Coord<T>> = Vec::new();
    for (i, de_id) in edges.iter().enumerate() {
        let de = &graph.dir_edges[de_id.0];
        let edge_pts = &graph.edges[de.edge].pts;
        let is_first = i == 0;
        if de.forward {
            let start = if is_first { 0 } else { 1 };
            pts.extend_from_slice(&edge_pts[start..]);
        } else {
            let start = if is_first {
                edge_pts.len() - 1
            } else {
                edge_pts.len() - 2
            };
            for j in (0..=start).rev() {
                pts.push(edge_pts[j]);
            }
        }
    }
    if pts.len() < 4 || pts.first() != pts.last() {
        return Err(TopologyError::ring_not_closed(pts[0]));
    }
    Ok(pts)
}

/// Assigns every unattached hole to the smallest result shell containing it, using a
/// spatial index over the shell bounding boxes to prefilter candidates.
fn place_free_holes<T>(
    shells: &mut [ResultShell<T>],
    free_holes: Vec<Vec<Coord<T>>>,
) -> Result<(), TopologyError>
where
    T: Real,
{
    if free_holes.is_empty() {
        return Ok(());
    }
    if shells.is_empty() {
        return Err(TopologyError::hole_not_assigned(free_holes[0][0]));
    }

    let shell_envs: Vec<Env<T>> = shells.iter().map(|s| envelope(&s.pts)).collect();
    let aabb_index = {
        let mut builder = StaticAABB2DIndexBuilder::new(shells.len());
        for env in &shell_envs {
            builder.add(env.min_x, env.min_y, env.max_x, env.max_y);
        }
        unwrap_spatial_index(builder)
    };

    let mut query_stack = Vec::with_capacity(8);
    for hole in free_holes {
        let hole_env = envelope(&hole);

        let mut candidates = Vec::new();
        let mut query_visitor = |shell_index: usize| {
            candidates.push(shell_index);
        };
        aabb_index.visit_query_with_stack(
            hole_env.min_x,
            hole_env.min_y,
            hole_env.max_x,
            hole_env.max_y,
            &mut query_visitor,
            &mut query_stack,
        );

        let mut min_shell: Option<usize> = None;
        for shell_index in candidates {
            let shell_env = &shell_envs[shell_index];
            if !shell_env.contains(&hole_env) || *shell_env == hole_env {
                continue;
            }
            // the test point must not be a shell vertex, a shared vertex says
            // nothing about containment
            let test_pt = hole
                .iter()
                .find(|p| !shells[shell_index].pts.contains(p));
            let Some(test_pt) = test_pt else {
                continue;
            };
            if locate_in_ring(*test_pt, &shells[shell_index].pts) == Location::Exterior {
                continue;
            }
            min_shell = match min_shell {
                Some(current) if !shell_envs[current].contains(shell_env) => Some(current),
                _ => Some(shell_index),
            };
        }

        match min_shell {
            Some(shell_index) => shells[shell_index].holes.push(hole),
            None => return Err(TopologyError::hole_not_assigned(hole[0])),
        }
    }
    Ok(())
}

#[derive(Debug, PartialEq)]
struct Env<T> {
    min_x: T,
    min_y: T,
    max_x: T,
    max_y: T,
}

impl<T> Env<T>
where
    T: Real,
{
    fn contains(&self, other: &Env<T>) -> bool {
        self.min_x <= other.min_x
            && self.min_y <= other.min_y
            && self.max_x >= other.max_x
            && self.max_y >= other.max_y
    }
}

fn envelope<T>(pts: &[Coord<T>]) -> Env<T>
where
    T: Real,
{
    let mut env: Env<T> = Env {
        min_x: Real::max_value(),
        min_y: Real::max_value(),
        max_x: Real::min_value(),
        max_y: Real::min_value(),
    };
    for p in pts {
        env.min_x = num_traits::real::Real::min(env.min_x, p.x);
        env.min_y = num_traits::real::Real::min(env.min_y, p.y);
        env.max_x = num_traits::real::Real::max(env.max_x, p.x);
        env.max_y = num_traits::real::Real::max(env.max_y, p.y);
    }
    env
}

/// Helper function to unwrap a spatial index from a builder or panic for the
/// unexpected case of failure.
fn unwrap_spatial_index<T>(builder: StaticAABB2DIndexBuilder<T>) -> StaticAABB2DIndex<T>
where
    T: IndexableNum,
{
    match builder.build() {
        Ok(x) => x,
        Err(e) => match e {
            StaticAABB2DIndexBuildError::ItemCountError { .. } => {
                unreachable!("internal library error: count mismatch when building spatial index")
            }
            StaticAABB2DIndexBuildError::NumericCastError => {
                panic!("failed to cast coordinate type: {e}")
            }
        },
    }
}
