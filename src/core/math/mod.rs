//! Core/common math functions for working with 2D coordinates, robust orientation
//! predicates, and segment intersections.
mod coord;
mod predicates;
mod segment_intersect;

pub use coord::{coord, Coord};
pub use predicates::*;
pub use segment_intersect::{seg_seg_intr, SegSegIntr};
