use std::collections::BTreeMap;

use super::edge::Edge;
use super::index::{
    compute_cross_intersections, compute_self_intersections, SegmentIntersector,
};
use super::label::Label;
use super::CoordKey;
use crate::core::math::{is_ccw, Coord};
use crate::core::traits::Real;
use crate::error::TopologyError;
use crate::geometry::{Geometry, Location, Polygon};

fn remove_repeated<T>(pts: &[Coord<T>], pos_equal_eps: T) -> Vec<Coord<T>>
where
    T: Real,
{
    let mut out: Vec<Coord<T>> = Vec::with_capacity(pts.len());
    for &p in pts {
        match out.last() {
            Some(last) if last.fuzzy_eq_eps(p, pos_equal_eps) => {}
            _ => out.push(p),
        }
    }
    out
}

/// The topology graph of a single input geometry: its edges labelled with the
/// geometry's boundary and interior sides, and the labelled nodes its vertices and
/// self intersections induce.
#[derive(Debug)]
pub struct GeometryGraph<T>
where
    T: Real,
{
    geom_index: usize,
    geometry: Geometry<T>,
    area_polygons: Vec<Polygon<T>>,
    pos_equal_eps: T,
    pub edges: Vec<Edge<T>>,
    node_labels: BTreeMap<CoordKey<T>, Label>,
}

impl<T> GeometryGraph<T>
where
    T: Real,
{
    pub fn new(
        geom_index: usize,
        geometry: &Geometry<T>,
        pos_equal_eps: T,
    ) -> Result<Self, TopologyError> {
        let mut graph = GeometryGraph {
            geom_index,
            geometry: geometry.clone(),
            area_polygons: Vec::new(),
            pos_equal_eps,
            edges: Vec::new(),
            node_labels: BTreeMap::new(),
        };
        graph.add_geometry(geometry.clone())?;
        Ok(graph)
    }

    pub fn geometry(&self) -> &Geometry<T> {
        &self.geometry
    }

    /// The polygonal components of the input, used to locate points relative to the
    /// input's area.
    pub fn area_polygons(&self) -> &[Polygon<T>] {
        &self.area_polygons
    }

    /// The labelled nodes of the graph as coordinate and on location pairs.
    pub fn node_points(&self) -> impl Iterator<Item = (Coord<T>, Option<Location>)> + '_ {
        self.node_labels
            .iter()
            .map(move |(key, label)| (key.0, label.location_on(self.geom_index)))
    }

    pub fn boundary_nodes(&self) -> Vec<Coord<T>> {
        self.node_labels
            .iter()
            .filter(|(_, label)| label.location_on(self.geom_index) == Some(Location::Boundary))
            .map(|(key, _)| key.0)
            .collect()
    }

    fn add_geometry(&mut self, geometry: Geometry<T>) -> Result<(), TopologyError> {
        match geometry {
            Geometry::Point(p) => self.insert_point(p, Location::Interior),
            Geometry::LineString(line) => self.add_line(&line),
            Geometry::Polygon(polygon) => self.add_polygon(polygon)?,
            Geometry::MultiPoint(points) => {
                for p in points {
                    self.insert_point(p, Location::Interior);
                }
            }
            Geometry::MultiLineString(lines) => {
                for line in lines {
                    self.add_line(&line);
                }
            }
            Geometry::MultiPolygon(polygons) => {
                for polygon in polygons {
                    self.add_polygon(polygon)?;
                }
            }
            Geometry::GeometryCollection(components) => {
                for component in components {
                    self.add_geometry(component)?;
                }
            }
        }
        Ok(())
    }

    fn add_polygon(&mut self, polygon: Polygon<T>) -> Result<(), TopologyError> {
        self.add_polygon_ring(&polygon.shell, Location::Exterior, Location::Interior)?;
        for hole in &polygon.holes {
            // holes are labelled inside out relative to the shell
            self.add_polygon_ring(hole, Location::Interior, Location::Exterior)?;
        }
        self.area_polygons.push(polygon);
        Ok(())
    }

    /// Adds a ring edge. `cw_left` and `cw_right` are the locations left and right of
    /// the ring when it winds clockwise; they are swapped for a counter clockwise
    /// ring.
    ///
    /// An empty ring is skipped, a non empty ring that degenerates to fewer than four
    /// points is rejected as invalid input.
    fn add_polygon_ring(
        &mut self,
        ring: &[Coord<T>],
        cw_left: Location,
        cw_right: Location,
    ) -> Result<(), TopologyError> {
        let pts = remove_repeated(ring, self.pos_equal_eps);
        if pts.is_empty() {
            return Ok(());
        }
        if pts.len() < 4 {
            return Err(TopologyError::invalid_ring(pts[0]));
        }
        let (left, right) = if is_ccw(&pts) {
            (cw_right, cw_left)
        } else {
            (cw_left, cw_right)
        };
        let first = pts[0];
        self.edges.push(Edge::new(
            pts,
            Label::area_for(self.geom_index, Location::Boundary, left, right),
        ));
        self.insert_point(first, Location::Boundary);
        Ok(())
    }

    fn add_line(&mut self, line: &[Coord<T>]) {
        let pts = remove_repeated(line, self.pos_equal_eps);
        if pts.len() < 2 {
            return;
        }
        let first = pts[0];
        let last = pts[pts.len() - 1];
        self.edges.push(Edge::new(
            pts,
            Label::line_for(self.geom_index, Location::Interior),
        ));
        // a closed line inserts its endpoint twice, which the mod-2 rule turns into
        // an interior point
        self.insert_boundary_point(first);
        self.insert_boundary_point(last);
    }

    fn insert_point(&mut self, coord: Coord<T>, loc: Location) {
        let geom_index = self.geom_index;
        self.node_labels
            .entry(CoordKey(coord))
            .or_insert_with(Label::empty_line)
            .set_location_on(geom_index, loc);
    }

    /// Inserts a point that lies on the geometry's boundary an unknown number of
    /// times, applying the mod-2 rule: a point incident on the boundary an odd number
    /// of times is a boundary point, an even number of times an interior point.
    fn insert_boundary_point(&mut self, coord: Coord<T>) {
        let geom_index = self.geom_index;
        let label = self
            .node_labels
            .entry(CoordKey(coord))
            .or_insert_with(Label::empty_line);
        let mut boundary_count = 1;
        if label.location_on(geom_index) == Some(Location::Boundary) {
            boundary_count += 1;
        }
        let new_loc = if boundary_count % 2 == 1 {
            Location::Boundary
        } else {
            Location::Interior
        };
        label.set_location_on(geom_index, new_loc);
    }

    fn is_boundary_node(&self, coord: Coord<T>) -> bool {
        self.node_labels
            .get(&CoordKey(coord))
            .map(|label| label.location_on(self.geom_index) == Some(Location::Boundary))
            .unwrap_or(false)
    }

    /// Finds the self intersections of the geometry's edges and records them as
    /// labelled nodes.
    pub fn compute_self_nodes(&mut self) -> SegmentIntersector<T> {
        let mut si = SegmentIntersector::new(true, false);
        compute_self_intersections(&mut self.edges, &mut si);
        self.add_self_intersection_nodes();
        si
    }

    /// Finds the intersections between this graph's edges and another graph's edges.
    pub fn compute_edge_intersections(
        &mut self,
        other: &mut GeometryGraph<T>,
    ) -> SegmentIntersector<T> {
        let mut si = SegmentIntersector::new(true, true);
        si.set_boundary_nodes(self.boundary_nodes(), other.boundary_nodes());
        compute_cross_intersections(&mut self.edges, &mut other.edges, &mut si);
        si
    }

    /// Splits every edge at its recorded intersections, appending the split edges to
    /// `out`.
    pub fn compute_split_edges(&mut self, out: &mut Vec<Edge<T>>) {
        for edge in self.edges.iter_mut() {
            edge.split_at_intersections(self.pos_equal_eps, out);
        }
    }

    fn add_self_intersection_nodes(&mut self) {
        let mut pending: Vec<(Coord<T>, Option<Location>)> = Vec::new();
        for edge in &self.edges {
            let loc = edge.label.location_on(self.geom_index);
            for ei in edge.int_list.iter() {
                pending.push((ei.coord, loc));
            }
        }
        for (coord, loc) in pending {
            if self.is_boundary_node(coord) {
                continue;
            }
            match loc {
                Some(Location::Boundary) => self.insert_boundary_point(coord),
                Some(loc) => self.insert_point(coord, loc),
                None => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::coord;
    use crate::graph::label::Position;

    fn square(x: f64, y: f64, size: f64) -> Vec<Coord<f64>> {
        vec![
            coord(x, y),
            coord(x + size, y),
            coord(x + size, y + size),
            coord(x, y + size),
            coord(x, y),
        ]
    }

    #[test]
    fn polygon_ring_side_labels_follow_orientation() {
        // counter clockwise shell has the interior on its left
        let g = Geometry::Polygon(Polygon::new(square(0.0, 0.0, 4.0), Vec::new()));
        let graph = GeometryGraph::new(0, &g, 1e-5).unwrap();
        assert_eq!(graph.edges.len(), 1);
        let label = graph.edges[0].label;
        assert_eq!(label.location_on(0), Some(Location::Boundary));
        assert_eq!(label.location(0, Position::Left), Some(Location::Interior));
        assert_eq!(label.location(0, Position::Right), Some(Location::Exterior));

        let mut cw = square(0.0, 0.0, 4.0);
        cw.reverse();
        let g = Geometry::Polygon(Polygon::new(cw, Vec::new()));
        let graph = GeometryGraph::new(0, &g, 1e-5).unwrap();
        let label = graph.edges[0].label;
        assert_eq!(label.location(0, Position::Left), Some(Location::Exterior));
        assert_eq!(label.location(0, Position::Right), Some(Location::Interior));
    }

    #[test]
    fn line_endpoints_are_boundary_nodes() {
        let g: Geometry<f64> =
            Geometry::LineString(vec![coord(0.0, 0.0), coord(4.0, 0.0), coord(4.0, 4.0)]);
        let graph = GeometryGraph::new(1, &g, 1e-5).unwrap();
        let boundary = graph.boundary_nodes();
        assert_eq!(boundary.len(), 2);
        assert!(boundary.contains(&coord(0.0, 0.0)));
        assert!(boundary.contains(&coord(4.0, 4.0)));
    }

    #[test]
    fn closed_line_has_no_boundary() {
        let g: Geometry<f64> = Geometry::LineString(vec![
            coord(0.0, 0.0),
            coord(4.0, 0.0),
            coord(2.0, 3.0),
            coord(0.0, 0.0),
        ]);
        let graph = GeometryGraph::new(0, &g, 1e-5).unwrap();
        assert!(graph.boundary_nodes().is_empty());
        // the start point is an interior node, not absent
        let node_locs: Vec<_> = graph.node_points().collect();
        assert!(node_locs.contains(&(coord(0.0, 0.0), Some(Location::Interior))));
    }

    #[test]
    fn split_edges_cover_ring_between_intersections() {
        let g = Geometry::Polygon(Polygon::new(square(0.0, 0.0, 4.0), Vec::new()));
        let mut ga = GeometryGraph::new(0, &g, 1e-5).unwrap();
        let g2 = Geometry::Polygon(Polygon::new(square(2.0, 2.0, 4.0), Vec::new()));
        let mut gb = GeometryGraph::new(1, &g2, 1e-5).unwrap();
        ga.compute_self_nodes();
        gb.compute_self_nodes();
        let si = ga.compute_edge_intersections(&mut gb);
        assert!(si.has_intersection);
        let mut splits = Vec::new();
        ga.compute_split_edges(&mut splits);
        // ring split at (4, 2) and (2, 4) into three chains
        assert_eq!(splits.len(), 3);
        let total_pts: usize = splits.iter().map(|e| e.pts.len() - 1).sum();
        assert_eq!(total_pts, 6);
    }

    #[test]
    fn repeated_points_are_dropped() {
        let g: Geometry<f64> = Geometry::LineString(vec![
            coord(0.0, 0.0),
            coord(0.0, 0.0),
            coord(4.0, 0.0),
            coord(4.0, 0.0),
            coord(4.0, 4.0),
        ]);
        let graph = GeometryGraph::new(0, &g, 1e-5).unwrap();
        assert_eq!(graph.edges[0].pts.len(), 3);
    }
}
