mod point_locator;

pub use point_locator::{locate_in_ring, locate_point_in_areas, PointLocator};

use crate::core::math::{is_ccw, signed_area, Coord};
use crate::core::traits::Real;

/// Topological location of a point relative to a geometry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Location {
    /// The point lies in the interior of the geometry.
    Interior,
    /// The point lies on the boundary of the geometry.
    Boundary,
    /// The point lies in the exterior of the geometry.
    Exterior,
}

/// A polygon made of one outer shell ring and zero or more hole rings.
///
/// Rings are stored closed (first and last coordinate equal). The shell is oriented
/// counter clockwise and holes clockwise when constructed through [GeometryFactory].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polygon<T = f64>
where
    T: Real,
{
    pub shell: Vec<Coord<T>>,
    pub holes: Vec<Vec<Coord<T>>>,
}

impl<T> Polygon<T>
where
    T: Real,
{
    pub fn new(shell: Vec<Coord<T>>, holes: Vec<Vec<Coord<T>>>) -> Self {
        Polygon { shell, holes }
    }

    /// Area enclosed by the shell minus the area of the holes.
    pub fn area(&self) -> T {
        let mut a = signed_area(&self.shell).abs();
        for hole in &self.holes {
            a = a - signed_area(hole).abs();
        }
        a
    }
}

/// A geometry operand or result.
///
/// `GeometryCollection` appears only in results, when an overlay yields components of
/// mixed dimension (for example a union containing both polygons and collapsed lines).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Geometry<T = f64>
where
    T: Real,
{
    Point(Coord<T>),
    LineString(Vec<Coord<T>>),
    Polygon(Polygon<T>),
    MultiPoint(Vec<Coord<T>>),
    MultiLineString(Vec<Vec<Coord<T>>>),
    MultiPolygon(Vec<Polygon<T>>),
    GeometryCollection(Vec<Geometry<T>>),
}

impl<T> Geometry<T>
where
    T: Real,
{
    /// Dimension of the geometry: 0 for points, 1 for lines, 2 for polygons. A
    /// collection reports the maximum dimension of its components, or 0 when empty.
    pub fn dimension(&self) -> u8 {
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => 0,
            Geometry::LineString(_) | Geometry::MultiLineString(_) => 1,
            Geometry::Polygon(_) | Geometry::MultiPolygon(_) => 2,
            Geometry::GeometryCollection(components) => components
                .iter()
                .map(|g| g.dimension())
                .max()
                .unwrap_or(0),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Point(_) => false,
            Geometry::LineString(pts) => pts.is_empty(),
            Geometry::Polygon(p) => p.shell.is_empty(),
            Geometry::MultiPoint(pts) => pts.is_empty(),
            Geometry::MultiLineString(lines) => lines.iter().all(|l| l.is_empty()),
            Geometry::MultiPolygon(polys) => polys.iter().all(|p| p.shell.is_empty()),
            Geometry::GeometryCollection(components) => {
                components.iter().all(|g| g.is_empty())
            }
        }
    }

    /// Total area of all polygonal components.
    pub fn area(&self) -> T {
        match self {
            Geometry::Polygon(p) => p.area(),
            Geometry::MultiPolygon(polys) => polys
                .iter()
                .fold(T::zero(), |acc, p| acc + p.area()),
            Geometry::GeometryCollection(components) => components
                .iter()
                .fold(T::zero(), |acc, g| acc + g.area()),
            _ => T::zero(),
        }
    }
}

/// Builds result geometries from the raw component lists produced by an overlay,
/// normalizing ring orientation and collapsing the representation to the simplest
/// variant that holds the components.
#[derive(Debug, Default, Copy, Clone)]
pub struct GeometryFactory;

impl GeometryFactory {
    /// Normalizes a polygon so the shell winds counter clockwise and holes wind
    /// clockwise.
    pub fn normalized_polygon<T>(mut polygon: Polygon<T>) -> Polygon<T>
    where
        T: Real,
    {
        if !is_ccw(&polygon.shell) {
            polygon.shell.reverse();
        }
        for hole in polygon.holes.iter_mut() {
            if is_ccw(hole) {
                hole.reverse();
            }
        }
        polygon
    }

    /// Assembles the final overlay result from component lists. Components are kept in
    /// the order points, then lines, then polygons. An empty result is represented as
    /// an empty `GeometryCollection`.
    pub fn build_geometry<T>(
        points: Vec<Coord<T>>,
        lines: Vec<Vec<Coord<T>>>,
        polygons: Vec<Polygon<T>>,
    ) -> Geometry<T>
    where
        T: Real,
    {
        let polygons: Vec<_> = polygons
            .into_iter()
            .map(Self::normalized_polygon)
            .collect();

        let mut dims_present = 0;
        if !points.is_empty() {
            dims_present += 1;
        }
        if !lines.is_empty() {
            dims_present += 1;
        }
        if !polygons.is_empty() {
            dims_present += 1;
        }

        if dims_present > 1 {
            let mut components = Vec::new();
            components.extend(points.into_iter().map(Geometry::Point));
            components.extend(lines.into_iter().map(Geometry::LineString));
            components.extend(polygons.into_iter().map(Geometry::Polygon));
            return Geometry::GeometryCollection(components);
        }

        if !polygons.is_empty() {
            if polygons.len() == 1 {
                let mut polygons = polygons;
                return Geometry::Polygon(polygons.remove(0));
            }
            return Geometry::MultiPolygon(polygons);
        }
        if !lines.is_empty() {
            if lines.len() == 1 {
                let mut lines = lines;
                return Geometry::LineString(lines.remove(0));
            }
            return Geometry::MultiLineString(lines);
        }
        if !points.is_empty() {
            if points.len() == 1 {
                return Geometry::Point(points[0]);
            }
            return Geometry::MultiPoint(points);
        }

        Geometry::GeometryCollection(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::coord;
    use crate::core::traits::FuzzyEq;

    #[test]
    fn polygon_area_subtracts_holes() {
        let shell = vec![
            coord(0.0, 0.0),
            coord(10.0, 0.0),
            coord(10.0, 10.0),
            coord(0.0, 10.0),
            coord(0.0, 0.0),
        ];
        let hole = vec![
            coord(2.0, 2.0),
            coord(2.0, 4.0),
            coord(4.0, 4.0),
            coord(4.0, 2.0),
            coord(2.0, 2.0),
        ];
        let p = Polygon::new(shell, vec![hole]);
        assert_fuzzy_eq!(p.area(), 96.0);
    }

    #[test]
    fn build_geometry_collapses_to_simplest_variant() {
        let square = Polygon::new(
            vec![
                coord(0.0, 0.0),
                coord(1.0, 0.0),
                coord(1.0, 1.0),
                coord(0.0, 1.0),
                coord(0.0, 0.0),
            ],
            Vec::new(),
        );
        let g = GeometryFactory::build_geometry(Vec::new(), Vec::new(), vec![square.clone()]);
        assert!(matches!(g, Geometry::Polygon(_)));
        assert_eq!(g.dimension(), 2);

        let g = GeometryFactory::build_geometry(
            vec![coord(5.0, 5.0)],
            Vec::new(),
            vec![square],
        );
        assert!(matches!(g, Geometry::GeometryCollection(_)));
        assert_eq!(g.dimension(), 2);

        let g: Geometry<f64> = GeometryFactory::build_geometry(Vec::new(), Vec::new(), Vec::new());
        assert!(g.is_empty());
    }

    #[test]
    fn normalized_polygon_orients_rings() {
        let cw_shell = vec![
            coord(0.0, 0.0),
            coord(0.0, 1.0),
            coord(1.0, 1.0),
            coord(1.0, 0.0),
            coord(0.0, 0.0),
        ];
        let p = GeometryFactory::normalized_polygon(Polygon::new(cw_shell, Vec::new()));
        assert!(crate::core::math::is_ccw(&p.shell));
    }
}
