//! `planar_overlay` is a 2D computational geometry library that computes boolean set
//! operations (intersection, union, difference, symmetric difference) between planar
//! vector geometries (point/line/polygon collections).
//!
//! The implementation is a full topological overlay: all segment intersections between
//! the two inputs are found with a robust intersector and a sweep-line index, the split
//! edges are assembled into a planar graph with angularly ordered edge stars, every edge
//! and node is labeled with its location (interior/boundary/exterior) relative to each
//! input, and the result polygons, lines and points are reassembled from the labeled
//! graph in area-before-line-before-point order.
//!
//! The main entry point is [overlay::overlay], see also [overlay::BooleanOp].

#[macro_use]
mod macros;
mod error;

pub mod core;
pub mod geometry;
pub mod graph;
pub mod overlay;

pub use crate::error::TopologyError;
pub use crate::overlay::{overlay, overlay_opt, BooleanOp, OverlayOptions};
