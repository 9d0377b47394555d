use super::edge::Edge;
use crate::core::math::{seg_seg_intr, Coord, SegSegIntr};
use crate::core::traits::Real;

/// Computes and records the intersections between pairs of edge segments, filtering
/// out the trivial self intersections every chain has with its own adjacent segments.
#[derive(Debug)]
pub struct SegmentIntersector<T>
where
    T: Real,
{
    include_proper: bool,
    record_isolated: bool,
    boundary_nodes: Option<[Vec<Coord<T>>; 2]>,
    /// True once any non-trivial intersection has been found.
    pub has_intersection: bool,
    /// True once a proper intersection has been found.
    pub has_proper: bool,
    /// True once a proper intersection not at a boundary node has been found.
    pub has_proper_interior: bool,
    pub num_intersections: usize,
}

impl<T> SegmentIntersector<T>
where
    T: Real,
{
    pub fn new(include_proper: bool, record_isolated: bool) -> Self {
        SegmentIntersector {
            include_proper,
            record_isolated,
            boundary_nodes: None,
            has_intersection: false,
            has_proper: false,
            has_proper_interior: false,
            num_intersections: 0,
        }
    }

    /// Supplies the boundary nodes of both operands so proper intersections at
    /// boundary points can be told apart from proper interior intersections.
    pub fn set_boundary_nodes(&mut self, nodes0: Vec<Coord<T>>, nodes1: Vec<Coord<T>>) {
        self.boundary_nodes = Some([nodes0, nodes1]);
    }

    /// Computes the intersection of segment `seg0` of `e0` with segment `seg1` of
    /// `e1` and records it on both edges.
    pub fn add_intersections(&mut self, e0: &mut Edge<T>, seg0: usize, e1: &mut Edge<T>, seg1: usize) {
        let intr = seg_seg_intr(e0.pts[seg0], e0.pts[seg0 + 1], e1.pts[seg1], e1.pts[seg1 + 1]);
        if matches!(intr, SegSegIntr::NoIntersect) {
            return;
        }
        if self.record_isolated {
            e0.is_isolated = false;
            e1.is_isolated = false;
        }
        self.num_intersections += 1;
        self.record(&intr, |coord| {
            e0.add_intersection(coord, seg0);
            e1.add_intersection(coord, seg1);
        });
    }

    /// Computes the intersection of two segments of the same edge, skipping the
    /// trivial intersections between adjacent segments and the closing wraparound of
    /// a ring.
    pub fn add_self_intersections(&mut self, e: &mut Edge<T>, seg0: usize, seg1: usize) {
        if seg0 == seg1 {
            return;
        }
        let intr = seg_seg_intr(e.pts[seg0], e.pts[seg0 + 1], e.pts[seg1], e.pts[seg1 + 1]);
        if matches!(intr, SegSegIntr::NoIntersect) {
            return;
        }
        if self.record_isolated {
            e.is_isolated = false;
        }
        self.num_intersections += 1;
        if Self::is_trivial(e, seg0, seg1, &intr) {
            return;
        }
        self.record(&intr, |coord| {
            e.add_intersection(coord, seg0);
            e.add_intersection(coord, seg1);
        });
    }

    fn is_trivial(e: &Edge<T>, seg0: usize, seg1: usize, intr: &SegSegIntr<T>) -> bool {
        if !matches!(intr, SegSegIntr::PointIntersect { .. }) {
            return false;
        }
        if seg0 + 1 == seg1 || seg1 + 1 == seg0 {
            return true;
        }
        if e.is_closed() {
            let max_seg_index = e.num_segments() - 1;
            if (seg0 == 0 && seg1 == max_seg_index) || (seg1 == 0 && seg0 == max_seg_index) {
                return true;
            }
        }
        false
    }

    fn record(&mut self, intr: &SegSegIntr<T>, mut record_point: impl FnMut(Coord<T>)) {
        self.has_intersection = true;
        match *intr {
            SegSegIntr::PointIntersect { point, is_proper } => {
                if self.include_proper || !is_proper {
                    record_point(point);
                }
                if is_proper {
                    self.has_proper = true;
                    if !self.is_boundary_point(point) {
                        self.has_proper_interior = true;
                    }
                }
            }
            SegSegIntr::CollinearIntersect { point1, point2 } => {
                record_point(point1);
                record_point(point2);
            }
            SegSegIntr::NoIntersect => {}
        }
    }

    fn is_boundary_point(&self, point: Coord<T>) -> bool {
        match &self.boundary_nodes {
            Some(node_lists) => node_lists
                .iter()
                .any(|nodes| nodes.iter().any(|n| *n == point)),
            None => false,
        }
    }
}

struct SweepSegment<T>
where
    T: Real,
{
    set: usize,
    edge: usize,
    seg: usize,
    min_x: T,
    max_x: T,
}

fn build_segments<T>(out: &mut Vec<SweepSegment<T>>, set: usize, edges: &[Edge<T>])
where
    T: Real,
{
    for (edge_index, edge) in edges.iter().enumerate() {
        for seg in 0..edge.num_segments() {
            let x0 = edge.pts[seg].x;
            let x1 = edge.pts[seg + 1].x;
            out.push(SweepSegment {
                set,
                edge: edge_index,
                seg,
                min_x: num_traits::real::Real::min(x0, x1),
                max_x: num_traits::real::Real::max(x0, x1),
            });
        }
    }
}

/// Collects the candidate segment pairs whose x ranges overlap by sweeping the
/// insert/delete events of the segments in ascending x. Pairs are collected first and
/// intersected afterwards since intersecting mutates the edges.
fn candidate_pairs<T>(segments: &[SweepSegment<T>], cross_only: bool) -> Vec<(usize, usize)>
where
    T: Real,
{
    use std::cmp::Ordering;

    // (x, is_delete, segment id); inserts sort before deletes at equal x so segments
    // that only touch in x still pair up
    let mut events: Vec<(T, bool, usize)> = Vec::with_capacity(2 * segments.len());
    for (id, seg) in segments.iter().enumerate() {
        events.push((seg.min_x, false, id));
        events.push((seg.max_x, true, id));
    }
    events.sort_by(|a, b| {
        a.0.partial_cmp(&b.0)
            .unwrap_or(Ordering::Equal)
            .then(a.1.cmp(&b.1))
    });

    let mut delete_pos = vec![0_usize; segments.len()];
    for (i, ev) in events.iter().enumerate() {
        if ev.1 {
            delete_pos[ev.2] = i;
        }
    }

    let mut pairs = Vec::new();
    for (i, ev) in events.iter().enumerate() {
        if ev.1 {
            continue;
        }
        let s0 = ev.2;
        for ev2 in &events[(i + 1)..delete_pos[s0]] {
            if ev2.1 {
                continue;
            }
            let s1 = ev2.2;
            if cross_only && segments[s0].set == segments[s1].set {
                continue;
            }
            pairs.push((s0, s1));
        }
    }
    pairs
}

/// Finds all intersections among the segments of a single edge set.
pub fn compute_self_intersections<T>(edges: &mut [Edge<T>], si: &mut SegmentIntersector<T>)
where
    T: Real,
{
    let mut segments = Vec::new();
    build_segments(&mut segments, 0, edges);
    for (s0, s1) in candidate_pairs(&segments, false) {
        let a = &segments[s0];
        let b = &segments[s1];
        if a.edge == b.edge {
            si.add_self_intersections(&mut edges[a.edge], a.seg, b.seg);
        } else {
            let (e0, e1) = index_pair_mut(edges, a.edge, b.edge);
            si.add_intersections(e0, a.seg, e1, b.seg);
        }
    }
}

/// Finds all intersections between the segments of two edge sets, ignoring pairs
/// within the same set.
pub fn compute_cross_intersections<T>(
    edges0: &mut [Edge<T>],
    edges1: &mut [Edge<T>],
    si: &mut SegmentIntersector<T>,
) where
    T: Real,
{
    let mut segments = Vec::new();
    build_segments(&mut segments, 0, edges0);
    build_segments(&mut segments, 1, edges1);
    for (s0, s1) in candidate_pairs(&segments, true) {
        let a = &segments[s0];
        let b = &segments[s1];
        let (a, b) = if a.set == 0 { (a, b) } else { (b, a) };
        si.add_intersections(&mut edges0[a.edge], a.seg, &mut edges1[b.edge], b.seg);
    }
}

/// Mutably borrows two distinct elements of a slice.
fn index_pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert!(i != j);
    if i < j {
        let (head, tail) = items.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = items.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::coord;
    use crate::graph::label::Label;
    use crate::geometry::Location;

    fn square_edge(x: f64, y: f64, size: f64) -> Edge<f64> {
        Edge::new(
            vec![
                coord(x, y),
                coord(x + size, y),
                coord(x + size, y + size),
                coord(x, y + size),
                coord(x, y),
            ],
            Label::area_for(0, Location::Boundary, Location::Exterior, Location::Interior),
        )
    }

    #[test]
    fn cross_intersections_of_overlapping_squares() {
        let mut edges0 = vec![square_edge(0.0, 0.0, 4.0)];
        let mut edges1 = vec![square_edge(2.0, 2.0, 4.0)];
        let mut si = SegmentIntersector::new(true, true);
        compute_cross_intersections(&mut edges0, &mut edges1, &mut si);
        assert!(si.has_intersection);
        assert!(si.has_proper);
        let pts0: Vec<_> = edges0[0].int_list.iter().map(|ei| ei.coord).collect();
        assert!(pts0.contains(&coord(4.0, 2.0)));
        assert!(pts0.contains(&coord(2.0, 4.0)));
        let pts1: Vec<_> = edges1[0].int_list.iter().map(|ei| ei.coord).collect();
        assert!(pts1.contains(&coord(4.0, 2.0)));
        assert!(pts1.contains(&coord(2.0, 4.0)));
    }

    #[test]
    fn ring_self_noding_skips_adjacent_and_wraparound() {
        let mut edges = vec![square_edge(0.0, 0.0, 4.0)];
        let mut si = SegmentIntersector::new(true, false);
        compute_self_intersections(&mut edges, &mut si);
        assert!(!si.has_intersection);
        assert!(edges[0].int_list.is_empty());
    }

    #[test]
    fn self_noding_finds_figure_eight_crossing() {
        // a bowtie ring crossing itself at (2, 2)
        let mut edges = vec![Edge::new(
            vec![
                coord(0.0, 0.0),
                coord(4.0, 4.0),
                coord(4.0, 0.0),
                coord(0.0, 4.0),
                coord(0.0, 0.0),
            ],
            Label::area_for(0, Location::Boundary, Location::Exterior, Location::Interior),
        )];
        let mut si = SegmentIntersector::new(true, false);
        compute_self_intersections(&mut edges, &mut si);
        assert!(si.has_intersection);
        let pts: Vec<_> = edges[0].int_list.iter().map(|ei| ei.coord).collect();
        assert!(pts.contains(&coord(2.0, 2.0)));
    }

    #[test]
    fn disjoint_sets_share_no_intersections() {
        let mut edges0 = vec![square_edge(0.0, 0.0, 1.0)];
        let mut edges1 = vec![square_edge(5.0, 5.0, 1.0)];
        let mut si = SegmentIntersector::new(true, true);
        compute_cross_intersections(&mut edges0, &mut edges1, &mut si);
        assert!(!si.has_intersection);
        assert!(edges0[0].is_isolated);
        assert!(edges1[0].is_isolated);
    }

    #[test]
    fn proper_intersection_at_boundary_node_is_not_interior() {
        let mut edges0 = vec![Edge::new(
            vec![coord(0.0, 0.0), coord(4.0, 0.0)],
            Label::line_for(0, Location::Interior),
        )];
        let mut edges1 = vec![Edge::new(
            vec![coord(2.0, -2.0), coord(2.0, 2.0)],
            Label::line_for(1, Location::Interior),
        )];
        let mut si = SegmentIntersector::new(true, true);
        si.set_boundary_nodes(vec![coord(2.0, 0.0)], Vec::new());
        compute_cross_intersections(&mut edges0, &mut edges1, &mut si);
        assert!(si.has_proper);
        assert!(!si.has_proper_interior);
    }
}
