mod line_builder;
mod point_builder;
mod polygon_builder;

use crate::core::traits::Real;
use crate::error::TopologyError;
use crate::geometry::{Geometry, GeometryFactory, Location};
use crate::graph::{EdgeList, GeometryGraph, PlanarGraph, Position, StarKind};

/// Boolean operation to apply between two geometries.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BooleanOp {
    /// The part of space covered by both inputs.
    Intersection,
    /// The part of space covered by either input.
    Union,
    /// The part of the first input not covered by the second.
    Difference,
    /// The part of space covered by exactly one input.
    SymDifference,
}

/// Options used when performing an overlay between two geometries.
#[derive(Debug, Copy, Clone)]
pub struct OverlayOptions<T>
where
    T: Real,
{
    /// Fuzzy comparison epsilon used for determining if two positions are equal when
    /// deduplicating input vertices and dropping zero length split edges. Never used
    /// to decide topology.
    pub pos_equal_eps: T,
}

impl<T> OverlayOptions<T>
where
    T: Real,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            pos_equal_eps: T::from(1e-5).unwrap(),
        }
    }
}

impl<T> Default for OverlayOptions<T>
where
    T: Real,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Computes the overlay of two geometries under `op` with default options.
pub fn overlay<T>(
    a: &Geometry<T>,
    b: &Geometry<T>,
    op: BooleanOp,
) -> Result<Geometry<T>, TopologyError>
where
    T: Real,
{
    overlay_opt(a, b, op, &Default::default())
}

/// Computes the overlay of two geometries under `op` with options provided.
pub fn overlay_opt<T>(
    a: &Geometry<T>,
    b: &Geometry<T>,
    op: BooleanOp,
    options: &OverlayOptions<T>,
) -> Result<Geometry<T>, TopologyError>
where
    T: Real,
{
    OverlayComputer::new(a, b, options.pos_equal_eps)?.compute(op)
}

/// Decides whether a point with the given on locations relative to the two inputs
/// belongs to the result of `op`. A boundary location counts as interior.
pub fn is_result_of_op(
    loc0: Option<Location>,
    loc1: Option<Location>,
    op: BooleanOp,
) -> bool {
    let in0 = matches!(loc0, Some(Location::Interior) | Some(Location::Boundary));
    let in1 = matches!(loc1, Some(Location::Interior) | Some(Location::Boundary));
    match op {
        BooleanOp::Intersection => in0 && in1,
        BooleanOp::Union => in0 || in1,
        BooleanOp::Difference => in0 && !in1,
        BooleanOp::SymDifference => in0 != in1,
    }
}

/// Runs the overlay pipeline: node the inputs, merge the noded edges into a planar
/// graph, label it, select the result edges for the operation, and assemble the
/// result geometry.
struct OverlayComputer<T>
where
    T: Real,
{
    graphs: [GeometryGraph<T>; 2],
    graph: PlanarGraph<T>,
    edge_list: EdgeList<T>,
}

impl<T> OverlayComputer<T>
where
    T: Real,
{
    fn new(a: &Geometry<T>, b: &Geometry<T>, pos_equal_eps: T) -> Result<Self, TopologyError> {
        Ok(OverlayComputer {
            graphs: [
                GeometryGraph::new(0, a, pos_equal_eps)?,
                GeometryGraph::new(1, b, pos_equal_eps)?,
            ],
            graph: PlanarGraph::new(StarKind::Directed),
            edge_list: EdgeList::new(),
        })
    }

    fn compute(mut self, op: BooleanOp) -> Result<Geometry<T>, TopologyError> {
        self.copy_points(0);
        self.copy_points(1);

        self.graphs[0].compute_self_nodes();
        self.graphs[1].compute_self_nodes();
        {
            let [a, b] = &mut self.graphs;
            a.compute_edge_intersections(b);
        }

        let mut base_split_edges = Vec::new();
        self.graphs[0].compute_split_edges(&mut base_split_edges);
        self.graphs[1].compute_split_edges(&mut base_split_edges);
        for edge in base_split_edges {
            self.insert_unique_edge(edge);
        }

        self.compute_labels_from_depths()?;
        self.replace_collapsed_edges();

        let edges = std::mem::take(&mut self.edge_list.edges);
        self.graph.add_edges(edges);
        self.graph.compute_labelling(&self.graphs)?;
        self.graph.label_incomplete_nodes(&self.graphs);

        self.find_result_area_edges(op);
        self.cancel_duplicate_result_edges();

        let polygons = polygon_builder::build_polygons(&mut self.graph)?;
        let lines = line_builder::build_lines(&mut self.graph, op, &polygons);
        let points = point_builder::build_points(&self.graph, op, &polygons, &lines);
        Ok(GeometryFactory::build_geometry(points, lines, polygons))
    }

    /// Copies the labelled node points of one operand graph into the overlay graph so
    /// isolated input points and boundary nodes survive into the result graph.
    fn copy_points(&mut self, geom_index: usize) {
        let points: Vec<_> = self.graphs[geom_index].node_points().collect();
        for (coord, loc) in points {
            if let Some(loc) = loc {
                self.graph.set_node_location(coord, geom_index, loc);
            }
        }
    }

    /// Inserts a noded edge into the pooled edge list. A pointwise duplicate is
    /// merged instead: its label joins the existing edge's label and the side depths
    /// accumulate, with a reversed duplicate contributing its flipped label.
    fn insert_unique_edge(&mut self, edge: crate::graph::Edge<T>) {
        match self.edge_list.find_equal_edge(&edge) {
            Some((i, same_dir)) => {
                let existing = &mut self.edge_list.edges[i];
                let mut label_to_merge = edge.label;
                if !same_dir {
                    label_to_merge.flip();
                }
                if existing.depth.is_null() {
                    let existing_label = existing.label;
                    existing.depth.add(&existing_label);
                }
                existing.depth.add(&label_to_merge);
                existing.label.merge(&label_to_merge);
            }
            None => self.edge_list.push(edge),
        }
    }

    /// Converts the depths accumulated by duplicate merging back into side
    /// locations. An edge whose two sides ended at equal depth no longer separates
    /// interior from exterior and is downgraded to a line.
    fn compute_labels_from_depths(&mut self) -> Result<(), TopologyError> {
        for edge in self.edge_list.edges.iter_mut() {
            if edge.depth.is_null() {
                continue;
            }
            edge.depth.normalize();
            for i in 0..2 {
                if edge.label.is_null(i)
                    || !edge.label.is_area()
                    || edge.depth.is_null_geom(i)
                {
                    continue;
                }
                if edge.depth.delta(i) == 0 {
                    edge.label.to_line(i);
                } else {
                    let left = edge
                        .depth
                        .location_at(i, Position::Left)
                        .ok_or(TopologyError::UninitializedDepth)?;
                    edge.label.set_location(i, Position::Left, left);
                    let right = edge
                        .depth
                        .location_at(i, Position::Right)
                        .ok_or(TopologyError::UninitializedDepth)?;
                    edge.label.set_location(i, Position::Right, right);
                }
            }
        }
        Ok(())
    }

    /// Replaces area edges that have folded onto themselves with the line edges they
    /// collapse to. Collapsed edges are collected first, then swapped in.
    fn replace_collapsed_edges(&mut self) {
        let mut collapsed = Vec::new();
        self.edge_list.edges.retain(|edge| {
            if edge.is_collapsed() {
                collapsed.push(edge.collapsed_edge());
                false
            } else {
                true
            }
        });
        self.edge_list.edges.extend(collapsed);
    }

    /// Marks the directed edges bordering the result area: edges with a complete
    /// area label whose right side passes the operation's truth table, excluding
    /// edges entirely interior to the result.
    fn find_result_area_edges(&mut self, op: BooleanOp) {
        for de in self.graph.dir_edges.iter_mut() {
            let label = de.label;
            if label.is_area()
                && !de.is_interior_area_edge()
                && is_result_of_op(
                    label.location(0, Position::Right),
                    label.location(1, Position::Right),
                    op,
                )
            {
                de.in_result = true;
            }
        }
    }

    /// Unmarks directed edge pairs where both directions were selected; both borders
    /// of such an edge face the result interior, so the edge is not part of the
    /// result border at all.
    fn cancel_duplicate_result_edges(&mut self) {
        for i in 0..self.graph.dir_edges.len() {
            let sym = self.graph.dir_edges[i].sym.0;
            if self.graph.dir_edges[i].in_result && self.graph.dir_edges[sym].in_result {
                self.graph.dir_edges[i].in_result = false;
                self.graph.dir_edges[sym].in_result = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truth_table_treats_boundary_as_interior() {
        use BooleanOp::*;
        let int = Some(Location::Interior);
        let bnd = Some(Location::Boundary);
        let ext = Some(Location::Exterior);
        assert!(is_result_of_op(int, bnd, Intersection));
        assert!(!is_result_of_op(int, ext, Intersection));
        assert!(is_result_of_op(ext, bnd, Union));
        assert!(!is_result_of_op(ext, None, Union));
        assert!(is_result_of_op(int, ext, Difference));
        assert!(!is_result_of_op(bnd, bnd, Difference));
        assert!(is_result_of_op(ext, int, SymDifference));
        assert!(!is_result_of_op(bnd, int, SymDifference));
    }
}
