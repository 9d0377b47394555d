use std::collections::BTreeMap;

use super::edge::Edge;
use super::geometry_graph::GeometryGraph;
use super::label::{Label, Position};
use super::CoordKey;
use crate::core::math::{orientation_index, Coord};
use crate::core::traits::Real;
use crate::error::TopologyError;
use crate::geometry::{locate_point_in_areas, Location};

/// Index of a node in the graph's node arena.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// Index of a directed edge in the graph's directed edge arena.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DirEdgeId(pub usize);

/// One direction of traversal of an edge. The forward directed edge runs from the
/// edge's first point, the reverse from its last; each is the other's sym.
#[derive(Debug, Clone)]
pub struct DirectedEdge<T>
where
    T: Real,
{
    /// Index of the underlying edge in the graph's edge list.
    pub edge: usize,
    pub forward: bool,
    /// Origin of the directed edge.
    pub p0: Coord<T>,
    /// Second point of the directed edge, fixing its direction.
    pub p1: Coord<T>,
    /// The edge's label, flipped for the reverse direction so left and right match
    /// the direction of travel.
    pub label: Label,
    pub sym: DirEdgeId,
    pub node: NodeId,
    /// Next directed edge of the maximal result ring this edge belongs to.
    pub next: Option<DirEdgeId>,
    /// Next directed edge of the minimal result ring this edge belongs to.
    pub next_min: Option<DirEdgeId>,
    pub edge_ring: Option<usize>,
    pub min_edge_ring: Option<usize>,
    pub in_result: bool,
    pub visited: bool,
}

impl<T> DirectedEdge<T>
where
    T: Real,
{
    fn quadrant(&self) -> u8 {
        let dx = self.p1.x - self.p0.x;
        let dy = self.p1.y - self.p0.y;
        if dx >= T::zero() {
            if dy >= T::zero() {
                0
            } else {
                3
            }
        } else if dy >= T::zero() {
            1
        } else {
            2
        }
    }

    /// Orders directed edges counter clockwise around their shared origin, starting
    /// from the positive x axis.
    fn compare_direction(&self, other: &DirectedEdge<T>) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        match self.quadrant().cmp(&other.quadrant()) {
            Ordering::Equal => orientation_index(other.p0, other.p1, self.p1).cmp(&0),
            ord => ord,
        }
    }

    /// True when for every geometry with an area label both sides of the edge are in
    /// the geometry's interior. Such edges lie inside the result area and never on
    /// its border.
    pub fn is_interior_area_edge(&self) -> bool {
        let mut is_interior = true;
        for i in 0..2 {
            if !(self.label.is_area_geom(i)
                && self.label.location(i, Position::Left) == Some(Location::Interior)
                && self.label.location(i, Position::Right) == Some(Location::Interior))
            {
                is_interior = false;
            }
        }
        is_interior
    }

    /// True for an edge that is a line for both geometries rather than an area border
    /// for either.
    pub fn is_line_edge(&self) -> bool {
        let is_line = self.label.is_line(0) || self.label.is_line(1);
        let all_locations_line = (0..2).all(|i| {
            !self.label.is_area_geom(i)
                || self.label.all_positions_equal(i, Location::Exterior)
        });
        is_line && all_locations_line
    }
}

/// A node of the overlay graph: a coordinate, its topological label, and the star of
/// directed edges leaving it, kept sorted counter clockwise.
#[derive(Debug, Clone)]
pub struct Node<T>
where
    T: Real,
{
    pub coord: Coord<T>,
    pub label: Label,
    pub star: Vec<DirEdgeId>,
}

impl<T> Node<T>
where
    T: Real,
{
    /// True when the node touches only one of the input geometries.
    pub fn is_isolated(&self) -> bool {
        self.label.geometry_count() == 1
    }
}

/// How the edges of each node star are ordered. Selecting the ordering here keeps
/// alternative star layouts open without polymorphic node construction.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum StarKind {
    /// Directed edges ordered counter clockwise from the positive x axis, as the
    /// side-label propagation and ring linking require.
    #[default]
    Directed,
}

/// The noded overlay graph. Nodes and directed edges live in index arenas; all cross
/// references are arena indices.
#[derive(Debug, Default)]
pub struct PlanarGraph<T>
where
    T: Real,
{
    pub nodes: Vec<Node<T>>,
    pub dir_edges: Vec<DirectedEdge<T>>,
    pub edges: Vec<Edge<T>>,
    star_kind: StarKind,
    node_map: BTreeMap<CoordKey<T>, NodeId>,
}

impl<T> PlanarGraph<T>
where
    T: Real,
{
    pub fn new(star_kind: StarKind) -> Self {
        PlanarGraph {
            nodes: Vec::new(),
            dir_edges: Vec::new(),
            edges: Vec::new(),
            star_kind,
            node_map: BTreeMap::new(),
        }
    }

    pub fn star_kind(&self) -> StarKind {
        self.star_kind
    }

    pub fn add_node(&mut self, coord: Coord<T>) -> NodeId {
        match self.node_map.get(&CoordKey(coord)) {
            Some(id) => *id,
            None => {
                let id = NodeId(self.nodes.len());
                self.nodes.push(Node {
                    coord,
                    label: Label::empty_line(),
                    star: Vec::new(),
                });
                self.node_map.insert(CoordKey(coord), id);
                id
            }
        }
    }

    /// Sets the on location of the node at `coord` for one geometry, creating the
    /// node if needed.
    pub fn set_node_location(&mut self, coord: Coord<T>, geom_index: usize, loc: Location) {
        let id = self.add_node(coord);
        self.nodes[id.0].label.set_location_on(geom_index, loc);
    }

    /// Takes ownership of the noded edges and builds their directed edges, inserting
    /// each into the star of its origin node.
    pub fn add_edges(&mut self, edges: Vec<Edge<T>>) {
        self.edges = edges;
        for edge_index in 0..self.edges.len() {
            let edge = &self.edges[edge_index];
            let n = edge.pts.len();
            let forward_id = DirEdgeId(self.dir_edges.len());
            let reverse_id = DirEdgeId(self.dir_edges.len() + 1);
            let mut reverse_label = edge.label;
            reverse_label.flip();
            let (p0f, p1f) = (edge.pts[0], edge.pts[1]);
            let (p0r, p1r) = (edge.pts[n - 1], edge.pts[n - 2]);
            let label = edge.label;
            let forward_node = self.add_node(p0f);
            let reverse_node = self.add_node(p0r);
            self.dir_edges.push(DirectedEdge {
                edge: edge_index,
                forward: true,
                p0: p0f,
                p1: p1f,
                label,
                sym: reverse_id,
                node: forward_node,
                next: None,
                next_min: None,
                edge_ring: None,
                min_edge_ring: None,
                in_result: false,
                visited: false,
            });
            self.dir_edges.push(DirectedEdge {
                edge: edge_index,
                forward: false,
                p0: p0r,
                p1: p1r,
                label: reverse_label,
                sym: forward_id,
                node: reverse_node,
                next: None,
                next_min: None,
                edge_ring: None,
                min_edge_ring: None,
                in_result: false,
                visited: false,
            });
            self.insert_into_star(forward_node, forward_id);
            self.insert_into_star(reverse_node, reverse_id);
        }
    }

    fn insert_into_star(&mut self, node: NodeId, de: DirEdgeId) {
        let star = &self.nodes[node.0].star;
        let new_edge = &self.dir_edges[de.0];
        let pos = match self.star_kind {
            StarKind::Directed => star
                .binary_search_by(|existing| {
                    self.dir_edges[existing.0].compare_direction(new_edge)
                })
                .unwrap_or_else(|i| i),
        };
        self.nodes[node.0].star.insert(pos, de);
    }

    pub fn sym(&self, de: DirEdgeId) -> DirEdgeId {
        self.dir_edges[de.0].sym
    }

    /// Computes complete labels for every directed edge by propagating the known side
    /// locations around each node star and locating the remaining unknown sides
    /// against the input areas.
    pub fn compute_labelling(
        &mut self,
        graphs: &[GeometryGraph<T>; 2],
    ) -> Result<(), TopologyError> {
        for node_index in 0..self.nodes.len() {
            self.compute_star_labelling(node_index, graphs)?;
        }
        self.merge_sym_labels();
        self.update_node_labelling();
        Ok(())
    }

    fn compute_star_labelling(
        &mut self,
        node_index: usize,
        graphs: &[GeometryGraph<T>; 2],
    ) -> Result<(), TopologyError> {
        self.propagate_side_labels(node_index, 0)?;
        self.propagate_side_labels(node_index, 1)?;

        let star = self.nodes[node_index].star.clone();

        let mut has_dimensional_collapse = [false, false];
        for de in &star {
            let label = &self.dir_edges[de.0].label;
            for (geom_index, collapse) in has_dimensional_collapse.iter_mut().enumerate() {
                if label.is_line(geom_index)
                    && label.location_on(geom_index) == Some(Location::Boundary)
                {
                    *collapse = true;
                }
            }
        }

        // the point in area locations are shared by every edge of the star
        let mut area_loc_cache: [Option<Location>; 2] = [None, None];
        for de in &star {
            for geom_index in 0..2 {
                if self.dir_edges[de.0].label.is_any_null(geom_index) {
                    let loc = if has_dimensional_collapse[geom_index] {
                        // a dimensional collapse at this node means the edge does not
                        // reach into the area's interior
                        Location::Exterior
                    } else {
                        let coord = self.nodes[node_index].coord;
                        *area_loc_cache[geom_index].get_or_insert_with(|| {
                            locate_point_in_areas(coord, graphs[geom_index].area_polygons())
                        })
                    };
                    self.dir_edges[de.0]
                        .label
                        .set_all_locations_if_null(geom_index, loc);
                }
            }
        }
        Ok(())
    }

    /// Propagates side locations counter clockwise around the star: the left side of
    /// each area edge becomes the current location, which must agree with the right
    /// side of the next area edge encountered.
    fn propagate_side_labels(
        &mut self,
        node_index: usize,
        geom_index: usize,
    ) -> Result<(), TopologyError> {
        let star = self.nodes[node_index].star.clone();
        let coord = self.nodes[node_index].coord;

        let mut start_loc = None;
        for de in &star {
            let label = &self.dir_edges[de.0].label;
            if label.is_area_geom(geom_index) {
                if let Some(left) = label.location(geom_index, Position::Left) {
                    start_loc = Some(left);
                }
            }
        }
        let Some(start_loc) = start_loc else {
            // no area edges with known sides touch this node for this geometry
            return Ok(());
        };

        let mut curr_loc = start_loc;
        for de in &star {
            let label = &mut self.dir_edges[de.0].label;
            if label.location_on(geom_index).is_none() {
                label.set_location(geom_index, Position::On, curr_loc);
            }
            if !label.is_area_geom(geom_index) {
                continue;
            }
            let left_loc = label.location(geom_index, Position::Left);
            let right_loc = label.location(geom_index, Position::Right);
            match right_loc {
                Some(right_loc) => {
                    if right_loc != curr_loc {
                        return Err(TopologyError::side_location_conflict(coord));
                    }
                    let Some(left_loc) = left_loc else {
                        return Err(TopologyError::single_null_side(coord));
                    };
                    curr_loc = left_loc;
                }
                None => {
                    if left_loc.is_some() {
                        return Err(TopologyError::single_null_side(coord));
                    }
                    label.set_location(geom_index, Position::Right, curr_loc);
                    label.set_location(geom_index, Position::Left, curr_loc);
                }
            }
        }
        Ok(())
    }

    fn merge_sym_labels(&mut self) {
        for i in 0..self.dir_edges.len() {
            let sym_label = self.dir_edges[self.dir_edges[i].sym.0].label;
            self.dir_edges[i].label.merge(&sym_label);
        }
    }

    fn update_node_labelling(&mut self) {
        for node in self.nodes.iter_mut() {
            // the node is interior to a geometry if any incident edge reaches its
            // interior or boundary
            let mut star_label = Label::empty_line();
            for de in &node.star {
                let label = &self.dir_edges[de.0].label;
                for geom_index in 0..2 {
                    if matches!(
                        label.location_on(geom_index),
                        Some(Location::Interior) | Some(Location::Boundary)
                    ) {
                        star_label.set_location_on(geom_index, Location::Interior);
                    }
                }
            }
            node.label.merge(&star_label);
        }
    }

    /// Completes the labels of nodes that touch only one geometry by locating them
    /// against the other geometry, then pushes node locations onto any still null
    /// edge labels.
    pub fn label_incomplete_nodes(&mut self, graphs: &[GeometryGraph<T>; 2]) {
        let locator = crate::geometry::PointLocator::new();
        for node_index in 0..self.nodes.len() {
            if self.nodes[node_index].is_isolated() {
                let target = if self.nodes[node_index].label.is_null(0) {
                    0
                } else {
                    1
                };
                let loc = locator.locate(self.nodes[node_index].coord, graphs[target].geometry());
                self.nodes[node_index]
                    .label
                    .set_location_on(target, loc);
            }
            let node_label = self.nodes[node_index].label;
            let star = self.nodes[node_index].star.clone();
            for de in star {
                for geom_index in 0..2 {
                    if let Some(loc) = node_label.location_on(geom_index) {
                        self.dir_edges[de.0]
                            .label
                            .set_all_locations_if_null(geom_index, loc);
                    }
                }
            }
        }
    }

    /// The star edges participating in the result area, in counter clockwise order.
    pub fn result_area_edges(&self, node_index: usize) -> Vec<DirEdgeId> {
        self.nodes[node_index]
            .star
            .iter()
            .copied()
            .filter(|de| {
                self.dir_edges[de.0].in_result || self.dir_edges[self.sym(*de).0].in_result
            })
            .collect()
    }

    /// Links the result edges around one node into maximal ring cycles: traversing
    /// the star counter clockwise, each incoming result edge is linked to the next
    /// outgoing result edge.
    pub fn link_result_directed_edges(&mut self, node_index: usize) -> Result<(), TopologyError> {
        let area_edges = self.result_area_edges(node_index);

        let mut first_out: Option<DirEdgeId> = None;
        let mut incoming: Option<DirEdgeId> = None;
        let mut linking = false;

        for next_out in &area_edges {
            let next_in = self.sym(*next_out);
            if !self.dir_edges[next_out.0].label.is_area() {
                continue;
            }
            if first_out.is_none() && self.dir_edges[next_out.0].in_result {
                first_out = Some(*next_out);
            }
            if !linking {
                if !self.dir_edges[next_in.0].in_result {
                    continue;
                }
                incoming = Some(next_in);
                linking = true;
            } else {
                if !self.dir_edges[next_out.0].in_result {
                    continue;
                }
                if let Some(incoming) = incoming {
                    self.dir_edges[incoming.0].next = Some(*next_out);
                }
                linking = false;
            }
        }
        if linking {
            let coord = self.nodes[node_index].coord;
            let first_out = first_out.ok_or_else(|| TopologyError::no_outgoing_edge(coord))?;
            if let Some(incoming) = incoming {
                self.dir_edges[incoming.0].next = Some(first_out);
            }
        }
        Ok(())
    }

    /// Links the edges of one maximal ring around one node into minimal ring cycles.
    /// Traversal is clockwise so each minimal cycle turns as tightly as possible.
    pub fn link_minimal_directed_edges(&mut self, node_index: usize, ring: usize) {
        let area_edges = self.result_area_edges(node_index);

        let mut first_out: Option<DirEdgeId> = None;
        let mut incoming: Option<DirEdgeId> = None;
        let mut linking = false;

        for next_out in area_edges.iter().rev() {
            let next_in = self.sym(*next_out);
            if first_out.is_none() && self.dir_edges[next_out.0].edge_ring == Some(ring) {
                first_out = Some(*next_out);
            }
            if !linking {
                if self.dir_edges[next_in.0].edge_ring != Some(ring) {
                    continue;
                }
                incoming = Some(next_in);
                linking = true;
            } else {
                if self.dir_edges[next_out.0].edge_ring != Some(ring) {
                    continue;
                }
                if let Some(incoming) = incoming {
                    self.dir_edges[incoming.0].next_min = Some(*next_out);
                }
                linking = false;
            }
        }
        if linking {
            if let (Some(incoming), Some(first_out)) = (incoming, first_out) {
                self.dir_edges[incoming.0].next_min = Some(first_out);
            }
        }
    }

    /// Number of star edges at a node that belong to the given maximal ring.
    pub fn outgoing_degree(&self, node_index: usize, ring: usize) -> usize {
        self.nodes[node_index]
            .star
            .iter()
            .filter(|de| self.dir_edges[de.0].edge_ring == Some(ring))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::coord;

    fn dir_edge_stub(p0: Coord<f64>, p1: Coord<f64>) -> DirectedEdge<f64> {
        DirectedEdge {
            edge: 0,
            forward: true,
            p0,
            p1,
            label: Label::empty_line(),
            sym: DirEdgeId(0),
            node: NodeId(0),
            next: None,
            next_min: None,
            edge_ring: None,
            min_edge_ring: None,
            in_result: false,
            visited: false,
        }
    }

    #[test]
    fn star_insertion_orders_counter_clockwise() {
        let mut graph = PlanarGraph::new(StarKind::Directed);
        let origin = coord(0.0, 0.0);
        let directions = [
            coord(1.0, 0.0),
            coord(1.0, 1.0),
            coord(0.0, 1.0),
            coord(-1.0, 1.0),
            coord(-1.0, -1.0),
            coord(1.0, -1.0),
        ];
        // insert out of order
        let edges: Vec<Edge<f64>> = [3, 0, 5, 2, 4, 1]
            .iter()
            .map(|&i| Edge::new(vec![origin, directions[i]], Label::empty_line()))
            .collect();
        graph.add_edges(edges);
        let node = graph
            .nodes
            .iter()
            .find(|n| n.coord == origin)
            .expect("origin node");
        let ordered: Vec<_> = node
            .star
            .iter()
            .map(|de| graph.dir_edges[de.0].p1)
            .collect();
        assert_eq!(ordered, directions.to_vec());
    }

    #[test]
    fn quadrants_partition_directions() {
        assert_eq!(dir_edge_stub(coord(0.0, 0.0), coord(1.0, 0.0)).quadrant(), 0);
        assert_eq!(dir_edge_stub(coord(0.0, 0.0), coord(0.0, 1.0)).quadrant(), 0);
        assert_eq!(dir_edge_stub(coord(0.0, 0.0), coord(-1.0, 0.5)).quadrant(), 1);
        assert_eq!(dir_edge_stub(coord(0.0, 0.0), coord(-1.0, -0.5)).quadrant(), 2);
        assert_eq!(dir_edge_stub(coord(0.0, 0.0), coord(1.0, -0.5)).quadrant(), 3);
    }

    #[test]
    fn sym_edges_reference_each_other() {
        let mut graph = PlanarGraph::new(StarKind::Directed);
        graph.add_edges(vec![Edge::new(
            vec![coord(0.0, 0.0), coord(2.0, 0.0)],
            Label::empty_line(),
        )]);
        assert_eq!(graph.dir_edges.len(), 2);
        assert_eq!(graph.sym(DirEdgeId(0)), DirEdgeId(1));
        assert_eq!(graph.sym(DirEdgeId(1)), DirEdgeId(0));
        assert!(graph.dir_edges[0].forward);
        assert!(!graph.dir_edges[1].forward);
        assert_eq!(graph.dir_edges[1].p0, coord(2.0, 0.0));
    }
}
