use super::label::{Label, Position};
use crate::geometry::Location;

fn side_index(pos: Position) -> usize {
    match pos {
        Position::Left => 0,
        Position::Right => 1,
        Position::On => panic!("depth has no on position"),
    }
}

/// Records the topological depth of the two sides of an edge, per input geometry.
///
/// A depth counts how many interiors of area components of a geometry cover that side.
/// `None` means uninitialized. Depths accumulate when pointwise equal edges are merged
/// and are later normalized back to 0/1 to derive side locations.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Depth {
    depths: [[Option<i32>; 2]; 2],
}

impl Depth {
    pub fn new() -> Self {
        Depth::default()
    }

    pub fn depth(&self, geom_index: usize, pos: Position) -> Option<i32> {
        self.depths[geom_index][side_index(pos)]
    }

    pub fn is_null(&self) -> bool {
        self.depths
            .iter()
            .all(|g| g.iter().all(|d| d.is_none()))
    }

    pub fn is_null_geom(&self, geom_index: usize) -> bool {
        self.depths[geom_index].iter().all(|d| d.is_none())
    }

    /// Location of a side derived from a normalized depth: depth 0 is exterior, any
    /// greater depth interior. `None` when the depth is uninitialized.
    pub fn location_at(&self, geom_index: usize, pos: Position) -> Option<Location> {
        self.depths[geom_index][side_index(pos)].map(|d| {
            if d <= 0 {
                Location::Exterior
            } else {
                Location::Interior
            }
        })
    }

    /// Accumulates the side locations of `label` into the depths. An interior side
    /// adds one, any other defined side adds zero, initializing the slot either way.
    pub fn add(&mut self, label: &Label) {
        for (geom_index, geom_depths) in self.depths.iter_mut().enumerate() {
            for (side, pos) in [Position::Left, Position::Right].into_iter().enumerate() {
                if let Some(loc) = label.location(geom_index, pos) {
                    let increment = if loc == Location::Interior { 1 } else { 0 };
                    geom_depths[side] = Some(geom_depths[side].unwrap_or(0) + increment);
                }
            }
        }
    }

    /// Depth difference between the right and left side for a geometry. Zero means
    /// both sides see the same coverage, so the edge does not separate interior from
    /// exterior for that geometry.
    pub fn delta(&self, geom_index: usize) -> i32 {
        self.depths[geom_index][1].unwrap_or(0) - self.depths[geom_index][0].unwrap_or(0)
    }

    /// Normalizes accumulated depths to the 0/1 domain. The lowest initialized depth
    /// of each geometry becomes 0 and every strictly deeper side becomes 1, preserving
    /// which side is deeper while discarding how many overlaps produced the depth.
    pub fn normalize(&mut self) {
        for geom_depths in self.depths.iter_mut() {
            let min_depth = geom_depths
                .iter()
                .flatten()
                .copied()
                .min()
                .map(|d| d.max(0));
            if let Some(min_depth) = min_depth {
                for depth in geom_depths.iter_mut() {
                    if let Some(d) = depth {
                        *depth = Some(if *d > min_depth { 1 } else { 0 });
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_accumulates_interior_sides() {
        let mut depth = Depth::new();
        assert!(depth.is_null());
        let label = Label::area_for(0, Location::Boundary, Location::Interior, Location::Exterior);
        depth.add(&label);
        depth.add(&label);
        assert_eq!(depth.depth(0, Position::Left), Some(2));
        assert_eq!(depth.depth(0, Position::Right), Some(0));
        assert!(depth.is_null_geom(1));
        assert_eq!(depth.delta(0), -2);
    }

    #[test]
    fn normalize_restores_unit_depths() {
        let mut depth = Depth::new();
        let label = Label::area_for(0, Location::Boundary, Location::Interior, Location::Exterior);
        depth.add(&label);
        depth.add(&label);
        depth.normalize();
        assert_eq!(depth.depth(0, Position::Left), Some(1));
        assert_eq!(depth.depth(0, Position::Right), Some(0));
        assert_eq!(depth.location_at(0, Position::Left), Some(Location::Interior));
        assert_eq!(
            depth.location_at(0, Position::Right),
            Some(Location::Exterior)
        );
    }

    #[test]
    fn normalize_cancels_equal_sides() {
        // an edge merged with its reverse sees interior on both sides
        let mut depth = Depth::new();
        depth.add(&Label::area_for(
            0,
            Location::Boundary,
            Location::Interior,
            Location::Exterior,
        ));
        depth.add(&Label::area_for(
            0,
            Location::Boundary,
            Location::Exterior,
            Location::Interior,
        ));
        depth.normalize();
        assert_eq!(depth.delta(0), 0);
    }
}
