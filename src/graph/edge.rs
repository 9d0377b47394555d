use super::depth::Depth;
use super::label::Label;
use crate::core::math::{edge_distance, Coord};
use crate::core::traits::Real;

/// A point where another edge crosses this edge, positioned along the edge by the
/// index of the segment it falls in and a pseudo distance from that segment's start.
#[derive(Debug, Copy, Clone)]
pub struct EdgeIntersection<T>
where
    T: Real,
{
    pub coord: Coord<T>,
    pub seg_index: usize,
    pub dist: T,
}

impl<T> EdgeIntersection<T>
where
    T: Real,
{
    fn cmp_position(&self, seg_index: usize, dist: T) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        match self.seg_index.cmp(&seg_index) {
            Ordering::Equal => self.dist.partial_cmp(&dist).unwrap_or(Ordering::Equal),
            ord => ord,
        }
    }
}

/// Intersections recorded along an edge, kept sorted by position along the edge and
/// deduplicated by position.
#[derive(Debug, Clone, Default)]
pub struct EdgeIntersectionList<T>
where
    T: Real,
{
    intersections: Vec<EdgeIntersection<T>>,
}

impl<T> EdgeIntersectionList<T>
where
    T: Real,
{
    pub fn new() -> Self {
        EdgeIntersectionList {
            intersections: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.intersections.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EdgeIntersection<T>> {
        self.intersections.iter()
    }

    pub fn add(&mut self, coord: Coord<T>, seg_index: usize, dist: T) {
        use std::cmp::Ordering;
        let insert_at = self
            .intersections
            .binary_search_by(|ei| ei.cmp_position(seg_index, dist));
        match insert_at {
            // position already recorded
            Ok(_) => {}
            Err(i) => self.intersections.insert(
                i,
                EdgeIntersection {
                    coord,
                    seg_index,
                    dist,
                },
            ),
        }
        debug_assert!(self
            .intersections
            .windows(2)
            .all(|w| w[0].cmp_position(w[1].seg_index, w[1].dist) == Ordering::Less));
    }
}

/// An edge of the topology graph: a chain of coordinates with a topological label,
/// side depths, and the intersections other edges make with it.
#[derive(Debug, Clone)]
pub struct Edge<T>
where
    T: Real,
{
    pub pts: Vec<Coord<T>>,
    pub label: Label,
    pub depth: Depth,
    pub int_list: EdgeIntersectionList<T>,
    pub in_result: bool,
    pub is_isolated: bool,
    pub visited: bool,
    /// Whether the edge is covered by the result area. `None` until computed.
    pub covered: Option<bool>,
}

impl<T> Edge<T>
where
    T: Real,
{
    pub fn new(pts: Vec<Coord<T>>, label: Label) -> Self {
        Edge {
            pts,
            label,
            depth: Depth::new(),
            int_list: EdgeIntersectionList::new(),
            in_result: false,
            is_isolated: true,
            visited: false,
            covered: None,
        }
    }

    pub fn num_segments(&self) -> usize {
        self.pts.len() - 1
    }

    pub fn is_closed(&self) -> bool {
        self.pts.first() == self.pts.last()
    }

    /// True for an area edge whose ring has collapsed to a zero width spike.
    pub fn is_collapsed(&self) -> bool {
        self.label.is_area() && self.pts.len() == 3 && self.pts[0] == self.pts[2]
    }

    /// The line edge a collapsed area edge degrades to.
    pub fn collapsed_edge(&self) -> Edge<T> {
        let mut label = self.label;
        for i in 0..2 {
            label.to_line(i);
        }
        Edge::new(vec![self.pts[0], self.pts[1]], label)
    }

    /// Records an intersection on segment `seg_index`, normalizing an intersection at
    /// the segment's far endpoint onto the start of the next segment so shared vertex
    /// intersections always key to the same position.
    pub fn add_intersection(&mut self, coord: Coord<T>, seg_index: usize) {
        let mut normalized_index = seg_index;
        let mut dist = edge_distance(coord, self.pts[seg_index], self.pts[seg_index + 1]);
        // an intersection at the far vertex keys to the start of the next segment,
        // even past the last segment for the final vertex, matching the endpoint
        // convention below
        if coord == self.pts[seg_index + 1] {
            normalized_index = seg_index + 1;
            dist = T::zero();
        }
        self.int_list.add(coord, normalized_index, dist);
    }

    /// Adds the edge's own endpoints as intersections so splitting always produces
    /// complete coverage of the edge.
    pub fn add_endpoint_intersections(&mut self) {
        let max_seg_index = self.pts.len() - 1;
        self.int_list.add(self.pts[0], 0, T::zero());
        self.int_list
            .add(self.pts[max_seg_index], max_seg_index, T::zero());
    }

    /// Splits the edge at its recorded intersections, appending the resulting edges to
    /// `out`. Each split edge carries a copy of this edge's label. Splits shorter than
    /// `pos_equal_eps` are dropped.
    pub fn split_at_intersections(&mut self, pos_equal_eps: T, out: &mut Vec<Edge<T>>) {
        self.add_endpoint_intersections();
        let intersections = &self.int_list.intersections;
        for pair in intersections.windows(2) {
            if let Some(split) = self.create_split_edge(&pair[0], &pair[1], pos_equal_eps) {
                out.push(split);
            }
        }
    }

    fn create_split_edge(
        &self,
        ei0: &EdgeIntersection<T>,
        ei1: &EdgeIntersection<T>,
        pos_equal_eps: T,
    ) -> Option<Edge<T>> {
        // include the last vertex only when the end intersection is not itself a
        // vertex of the edge
        let use_end_point = ei1.dist > T::zero() || ei1.coord != self.pts[ei1.seg_index];

        let mut pts = Vec::with_capacity(ei1.seg_index - ei0.seg_index + 2);
        pts.push(ei0.coord);
        pts.extend_from_slice(&self.pts[(ei0.seg_index + 1)..=ei1.seg_index]);
        if use_end_point {
            pts.push(ei1.coord);
        }

        if pts.len() < 2 || (pts.len() == 2 && pts[0].fuzzy_eq_eps(pts[1], pos_equal_eps)) {
            return None;
        }
        Some(Edge::new(pts, self.label))
    }

    /// Compares the coordinate chains of two edges. Returns `Some(true)` when they are
    /// equal in the same direction, `Some(false)` when equal in opposite directions.
    pub fn pointwise_equal(&self, other: &Edge<T>) -> Option<bool> {
        if self.pts.len() != other.pts.len() {
            return None;
        }
        if self.pts == other.pts {
            return Some(true);
        }
        if self.pts.iter().eq(other.pts.iter().rev()) {
            return Some(false);
        }
        None
    }
}

/// The pooled edges of an overlay graph. Lookup of a pointwise equal edge is a linear
/// scan; edge counts after noding are small enough that this beats maintaining a
/// directional keying structure.
#[derive(Debug, Clone, Default)]
pub struct EdgeList<T>
where
    T: Real,
{
    pub edges: Vec<Edge<T>>,
}

impl<T> EdgeList<T>
where
    T: Real,
{
    pub fn new() -> Self {
        EdgeList { edges: Vec::new() }
    }

    /// Finds an edge pointwise equal to `edge` in either direction. Returns the index
    /// and whether the match runs in the same direction.
    pub fn find_equal_edge(&self, edge: &Edge<T>) -> Option<(usize, bool)> {
        self.edges
            .iter()
            .enumerate()
            .find_map(|(i, e)| e.pointwise_equal(edge).map(|same_dir| (i, same_dir)))
    }

    pub fn push(&mut self, edge: Edge<T>) {
        self.edges.push(edge);
    }
}
