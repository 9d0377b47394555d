use crate::core::math::Coord;
use crate::core::traits::Real;

/// Errors raised when the overlay cannot build a consistent topology.
///
/// All variants are fatal to the current overlay call: a silently "fixed" topology would
/// produce a geometrically wrong answer, so the computation is aborted instead and the
/// error is propagated to the caller unmodified.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TopologyError {
    /// Ring of an input polygon has too few points to enclose an area.
    #[error("invalid input ring (fewer than 4 points) at ({x}, {y})")]
    InvalidRing {
        /// X ordinate of a point on the offending ring.
        x: f64,
        /// Y ordinate of a point on the offending ring.
        y: f64,
    },

    /// Two edges incident at a node claim conflicting side locations, which indicates a
    /// noding inconsistency upstream.
    #[error("side location conflict at ({x}, {y})")]
    SideLocationConflict {
        /// X ordinate of the node.
        x: f64,
        /// Y ordinate of the node.
        y: f64,
    },

    /// An edge label carries one defined side and one undefined side, which should be
    /// structurally impossible after noding.
    #[error("found single null side at ({x}, {y})")]
    SingleNullSide {
        /// X ordinate of the node.
        x: f64,
        /// Y ordinate of the node.
        y: f64,
    },

    /// A side depth was never initialized when a collapsed edge was resolved.
    #[error("depth of edge side has not been initialized")]
    UninitializedDepth,

    /// No outgoing result edge was found while linking result rings at a node.
    #[error("no outgoing result edge found at ({x}, {y})")]
    NoOutgoingEdge {
        /// X ordinate of the node.
        x: f64,
        /// Y ordinate of the node.
        y: f64,
    },

    /// A result ring could not be completed from the marked result edges.
    #[error("unable to complete result ring at ({x}, {y})")]
    RingNotClosed {
        /// X ordinate of the point where ring building stopped.
        x: f64,
        /// Y ordinate of the point where ring building stopped.
        y: f64,
    },

    /// A result hole ring is not contained by any result shell.
    #[error("unable to assign hole to a shell at ({x}, {y})")]
    HoleNotAssigned {
        /// X ordinate of a point on the hole ring.
        x: f64,
        /// Y ordinate of a point on the hole ring.
        y: f64,
    },
}

impl TopologyError {
    pub(crate) fn invalid_ring<T>(c: Coord<T>) -> Self
    where
        T: Real,
    {
        let (x, y) = to_f64_pair(c);
        TopologyError::InvalidRing { x, y }
    }

    pub(crate) fn side_location_conflict<T>(c: Coord<T>) -> Self
    where
        T: Real,
    {
        let (x, y) = to_f64_pair(c);
        TopologyError::SideLocationConflict { x, y }
    }

    pub(crate) fn single_null_side<T>(c: Coord<T>) -> Self
    where
        T: Real,
    {
        let (x, y) = to_f64_pair(c);
        TopologyError::SingleNullSide { x, y }
    }

    pub(crate) fn no_outgoing_edge<T>(c: Coord<T>) -> Self
    where
        T: Real,
    {
        let (x, y) = to_f64_pair(c);
        TopologyError::NoOutgoingEdge { x, y }
    }

    pub(crate) fn ring_not_closed<T>(c: Coord<T>) -> Self
    where
        T: Real,
    {
        let (x, y) = to_f64_pair(c);
        TopologyError::RingNotClosed { x, y }
    }

    pub(crate) fn hole_not_assigned<T>(c: Coord<T>) -> Self
    where
        T: Real,
    {
        let (x, y) = to_f64_pair(c);
        TopologyError::HoleNotAssigned { x, y }
    }
}

fn to_f64_pair<T>(c: Coord<T>) -> (f64, f64)
where
    T: Real,
{
    (
        num_traits::cast(c.x).unwrap_or(f64::NAN),
        num_traits::cast(c.y).unwrap_or(f64::NAN),
    )
}
