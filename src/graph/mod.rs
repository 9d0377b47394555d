pub mod depth;
pub mod edge;
pub mod geometry_graph;
pub mod index;
pub mod label;
pub mod planar_graph;

pub use depth::Depth;
pub use edge::{Edge, EdgeIntersection, EdgeIntersectionList, EdgeList};
pub use geometry_graph::GeometryGraph;
pub use index::SegmentIntersector;
pub use label::{Label, Position, TopologyLocation};
pub use planar_graph::{DirEdgeId, DirectedEdge, Node, NodeId, PlanarGraph, StarKind};

use crate::core::math::Coord;
use crate::core::traits::Real;

/// Totally ordered wrapper over a coordinate so node maps can key by exact position.
/// Incomparable components (NaN) compare equal, which keeps the ordering total.
#[derive(Debug, Copy, Clone)]
pub(crate) struct CoordKey<T>(pub Coord<T>)
where
    T: Real;

impl<T> PartialEq for CoordKey<T>
where
    T: Real,
{
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl<T> Eq for CoordKey<T> where T: Real {}

impl<T> PartialOrd for CoordKey<T>
where
    T: Real,
{
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for CoordKey<T>
where
    T: Real,
{
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.compare(&other.0)
    }
}
