use crate::geometry::Location;

/// Position of a labelled location relative to an edge or node.
///
/// `Left` and `Right` are relative to the direction of travel along an edge. Nodes
/// and line edges only carry an `On` location.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Position {
    On,
    Left,
    Right,
}

/// Locations of a graph component relative to one input geometry.
///
/// Line variants label components of zero or one dimensional geometries with a single
/// on location. Area variants also record which side of the component the interior of
/// the geometry lies on. `None` means not yet computed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TopologyLocation {
    Line {
        on: Option<Location>,
    },
    Area {
        on: Option<Location>,
        left: Option<Location>,
        right: Option<Location>,
    },
}

impl TopologyLocation {
    pub fn line(on: Option<Location>) -> Self {
        TopologyLocation::Line { on }
    }

    pub fn area(on: Option<Location>, left: Option<Location>, right: Option<Location>) -> Self {
        TopologyLocation::Area { on, left, right }
    }

    pub fn is_area(&self) -> bool {
        matches!(self, TopologyLocation::Area { .. })
    }

    pub fn is_line(&self) -> bool {
        matches!(self, TopologyLocation::Line { .. })
    }

    pub fn is_null(&self) -> bool {
        match self {
            TopologyLocation::Line { on } => on.is_none(),
            TopologyLocation::Area { on, left, right } => {
                on.is_none() && left.is_none() && right.is_none()
            }
        }
    }

    pub fn is_any_null(&self) -> bool {
        match self {
            TopologyLocation::Line { on } => on.is_none(),
            TopologyLocation::Area { on, left, right } => {
                on.is_none() || left.is_none() || right.is_none()
            }
        }
    }

    pub fn get(&self, pos: Position) -> Option<Location> {
        match (self, pos) {
            (TopologyLocation::Line { on }, Position::On) => *on,
            (TopologyLocation::Line { .. }, _) => None,
            (TopologyLocation::Area { on, .. }, Position::On) => *on,
            (TopologyLocation::Area { left, .. }, Position::Left) => *left,
            (TopologyLocation::Area { right, .. }, Position::Right) => *right,
        }
    }

    /// Sets the location at `pos`, promoting a line to an area when a side position is
    /// assigned.
    pub fn set(&mut self, pos: Position, loc: Location) {
        if pos != Position::On && self.is_line() {
            self.expand_to_area();
        }
        match (&mut *self, pos) {
            (TopologyLocation::Line { on }, Position::On) => *on = Some(loc),
            (TopologyLocation::Line { .. }, _) => unreachable!(),
            (TopologyLocation::Area { on, .. }, Position::On) => *on = Some(loc),
            (TopologyLocation::Area { left, .. }, Position::Left) => *left = Some(loc),
            (TopologyLocation::Area { right, .. }, Position::Right) => *right = Some(loc),
        }
    }

    pub fn set_all(&mut self, loc: Location) {
        match self {
            TopologyLocation::Line { on } => *on = Some(loc),
            TopologyLocation::Area { on, left, right } => {
                *on = Some(loc);
                *left = Some(loc);
                *right = Some(loc);
            }
        }
    }

    pub fn set_all_if_null(&mut self, loc: Location) {
        match self {
            TopologyLocation::Line { on } => {
                if on.is_none() {
                    *on = Some(loc);
                }
            }
            TopologyLocation::Area { on, left, right } => {
                if on.is_none() {
                    *on = Some(loc);
                }
                if left.is_none() {
                    *left = Some(loc);
                }
                if right.is_none() {
                    *right = Some(loc);
                }
            }
        }
    }

    pub fn all_positions_equal(&self, loc: Location) -> bool {
        match self {
            TopologyLocation::Line { on } => *on == Some(loc),
            TopologyLocation::Area { on, left, right } => {
                *on == Some(loc) && *left == Some(loc) && *right == Some(loc)
            }
        }
    }

    /// Swaps the left and right locations. No effect on line locations.
    pub fn flip(&mut self) {
        if let TopologyLocation::Area { left, right, .. } = self {
            std::mem::swap(left, right);
        }
    }

    fn expand_to_area(&mut self) {
        if let TopologyLocation::Line { on } = *self {
            *self = TopologyLocation::Area {
                on,
                left: None,
                right: None,
            };
        }
    }

    /// Fills in null locations from `other`. If `other` is an area location this one
    /// is promoted to an area first.
    pub fn merge(&mut self, other: &TopologyLocation) {
        if other.is_area() && self.is_line() {
            self.expand_to_area();
        }
        for pos in [Position::On, Position::Left, Position::Right] {
            if self.get(pos).is_none() {
                if let Some(loc) = other.get(pos) {
                    self.set(pos, loc);
                }
            }
        }
    }
}

/// Topological label of a graph component relative to the two input geometries.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Label {
    locations: [TopologyLocation; 2],
}

impl Label {
    /// A label with line locations for both geometries, both set to `on`.
    pub fn line(on: Location) -> Self {
        Label {
            locations: [
                TopologyLocation::line(Some(on)),
                TopologyLocation::line(Some(on)),
            ],
        }
    }

    /// A label with null line locations for both geometries.
    pub fn empty_line() -> Self {
        Label {
            locations: [TopologyLocation::line(None), TopologyLocation::line(None)],
        }
    }

    /// A label with a line location for a single geometry, the other geometry null.
    pub fn line_for(geom_index: usize, on: Location) -> Self {
        let mut label = Label::empty_line();
        label.locations[geom_index] = TopologyLocation::line(Some(on));
        label
    }

    /// A label with an area location for a single geometry, the other geometry a null
    /// line location.
    pub fn area_for(geom_index: usize, on: Location, left: Location, right: Location) -> Self {
        let mut label = Label::empty_line();
        label.locations[geom_index] = TopologyLocation::area(Some(on), Some(left), Some(right));
        label
    }

    pub fn location(&self, geom_index: usize, pos: Position) -> Option<Location> {
        self.locations[geom_index].get(pos)
    }

    pub fn location_on(&self, geom_index: usize) -> Option<Location> {
        self.locations[geom_index].get(Position::On)
    }

    pub fn set_location(&mut self, geom_index: usize, pos: Position, loc: Location) {
        self.locations[geom_index].set(pos, loc);
    }

    pub fn set_location_on(&mut self, geom_index: usize, loc: Location) {
        self.locations[geom_index].set(Position::On, loc);
    }

    pub fn set_all_locations(&mut self, geom_index: usize, loc: Location) {
        self.locations[geom_index].set_all(loc);
    }

    pub fn set_all_locations_if_null(&mut self, geom_index: usize, loc: Location) {
        self.locations[geom_index].set_all_if_null(loc);
    }

    pub fn is_null(&self, geom_index: usize) -> bool {
        self.locations[geom_index].is_null()
    }

    pub fn is_any_null(&self, geom_index: usize) -> bool {
        self.locations[geom_index].is_any_null()
    }

    /// True if either geometry's location is an area location.
    pub fn is_area(&self) -> bool {
        self.locations[0].is_area() || self.locations[1].is_area()
    }

    pub fn is_area_geom(&self, geom_index: usize) -> bool {
        self.locations[geom_index].is_area()
    }

    pub fn is_line(&self, geom_index: usize) -> bool {
        self.locations[geom_index].is_line()
    }

    pub fn all_positions_equal(&self, geom_index: usize, loc: Location) -> bool {
        self.locations[geom_index].all_positions_equal(loc)
    }

    /// Number of geometries this label has a defined location for.
    pub fn geometry_count(&self) -> usize {
        self.locations.iter().filter(|l| !l.is_null()).count()
    }

    /// Converts the location for `geom_index` to a line location, keeping the on
    /// location. Used when an area edge is found to be a dimensional collapse.
    pub fn to_line(&mut self, geom_index: usize) {
        if let TopologyLocation::Area { on, .. } = self.locations[geom_index] {
            self.locations[geom_index] = TopologyLocation::line(on);
        }
    }

    pub fn flip(&mut self) {
        self.locations[0].flip();
        self.locations[1].flip();
    }

    /// Fills in null locations from `other` for both geometries.
    pub fn merge(&mut self, other: &Label) {
        for i in 0..2 {
            self.locations[i].merge(&other.locations[i]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_promotes_line_to_area() {
        let mut label = Label::line_for(0, Location::Interior);
        let other = Label::area_for(0, Location::Boundary, Location::Interior, Location::Exterior);
        label.merge(&other);
        assert!(label.is_area_geom(0));
        // existing on location is kept, sides are filled from the merge source
        assert_eq!(label.location_on(0), Some(Location::Interior));
        assert_eq!(label.location(0, Position::Left), Some(Location::Interior));
        assert_eq!(label.location(0, Position::Right), Some(Location::Exterior));
        assert!(label.is_null(1));
    }

    #[test]
    fn flip_swaps_sides() {
        let mut label =
            Label::area_for(1, Location::Boundary, Location::Interior, Location::Exterior);
        label.flip();
        assert_eq!(label.location(1, Position::Left), Some(Location::Exterior));
        assert_eq!(label.location(1, Position::Right), Some(Location::Interior));
        assert_eq!(label.location_on(1), Some(Location::Boundary));
    }

    #[test]
    fn to_line_keeps_on_location() {
        let mut label =
            Label::area_for(0, Location::Interior, Location::Interior, Location::Interior);
        label.to_line(0);
        assert!(label.is_line(0));
        assert_eq!(label.location_on(0), Some(Location::Interior));
        assert_eq!(label.location(0, Position::Left), None);
    }

    #[test]
    fn geometry_count_ignores_null_locations() {
        let label = Label::line_for(0, Location::Interior);
        assert_eq!(label.geometry_count(), 1);
        let label = Label::line(Location::Boundary);
        assert_eq!(label.geometry_count(), 2);
    }
}
