use super::{Geometry, Location, Polygon};
use crate::core::math::{sign_of_det2x2, Coord};
use crate::core::traits::Real;

/// Locates a point relative to a closed ring using a robust ray crossing count.
///
/// The ring may wind in either direction. The count follows a ray cast in the
/// positive x direction; crossings through a vertex are resolved by only counting
/// segments whose upper endpoint is strictly above the ray.
pub fn locate_in_ring<T>(p: Coord<T>, ring: &[Coord<T>]) -> Location
where
    T: Real,
{
    let mut crossing_count: u32 = 0;

    for window in ring.windows(2) {
        let p1 = window[1];
        let p2 = window[0];

        if p1.x < p.x && p2.x < p.x {
            continue;
        }
        if p.x == p2.x && p.y == p2.y {
            return Location::Boundary;
        }
        if p1.y == p.y && p2.y == p.y {
            let minx = num_traits::real::Real::min(p1.x, p2.x);
            let maxx = num_traits::real::Real::max(p1.x, p2.x);
            if minx <= p.x && p.x <= maxx {
                return Location::Boundary;
            }
            continue;
        }
        if (p1.y > p.y && p2.y <= p.y) || (p2.y > p.y && p1.y <= p.y) {
            let mut sign = sign_of_det2x2(p1.x - p.x, p1.y - p.y, p2.x - p.x, p2.y - p.y);
            if sign == 0 {
                return Location::Boundary;
            }
            if p2.y < p1.y {
                sign = -sign;
            }
            if sign > 0 {
                crossing_count += 1;
            }
        }
    }

    if crossing_count % 2 == 1 {
        Location::Interior
    } else {
        Location::Exterior
    }
}

/// Locates a point relative to a list of polygons treated as an area. Returns the
/// location against the first polygon the point is not exterior to.
pub fn locate_point_in_areas<T>(p: Coord<T>, polygons: &[Polygon<T>]) -> Location
where
    T: Real,
{
    for polygon in polygons {
        let loc = locate_in_polygon(p, polygon);
        if loc != Location::Exterior {
            return loc;
        }
    }
    Location::Exterior
}

fn locate_in_polygon<T>(p: Coord<T>, polygon: &Polygon<T>) -> Location
where
    T: Real,
{
    if polygon.shell.is_empty() {
        return Location::Exterior;
    }
    let shell_loc = locate_in_ring(p, &polygon.shell);
    if shell_loc != Location::Interior {
        return shell_loc;
    }
    for hole in &polygon.holes {
        match locate_in_ring(p, hole) {
            Location::Interior => return Location::Exterior,
            Location::Boundary => return Location::Boundary,
            Location::Exterior => {}
        }
    }
    Location::Interior
}

fn on_segment<T>(p: Coord<T>, p1: Coord<T>, p2: Coord<T>) -> bool
where
    T: Real,
{
    if p.x < num_traits::real::Real::min(p1.x, p2.x)
        || p.x > num_traits::real::Real::max(p1.x, p2.x)
        || p.y < num_traits::real::Real::min(p1.y, p2.y)
        || p.y > num_traits::real::Real::max(p1.y, p2.y)
    {
        return false;
    }
    sign_of_det2x2(p1.x - p.x, p1.y - p.y, p2.x - p.x, p2.y - p.y) == 0
}

fn on_line<T>(p: Coord<T>, line: &[Coord<T>]) -> bool
where
    T: Real,
{
    line.windows(2).any(|w| on_segment(p, w[0], w[1]))
}

/// Locates points relative to full geometries, applying the mod-2 boundary rule when
/// a point lies on the boundary of multiple components.
#[derive(Debug, Default, Copy, Clone)]
pub struct PointLocator;

impl PointLocator {
    pub fn new() -> Self {
        PointLocator
    }

    pub fn locate<T>(&self, p: Coord<T>, geometry: &Geometry<T>) -> Location
    where
        T: Real,
    {
        let mut is_in = false;
        let mut boundary_count: u32 = 0;
        Self::compute_location(p, geometry, &mut is_in, &mut boundary_count);
        if boundary_count % 2 == 1 {
            return Location::Boundary;
        }
        if boundary_count > 0 || is_in {
            return Location::Interior;
        }
        Location::Exterior
    }

    fn compute_location<T>(
        p: Coord<T>,
        geometry: &Geometry<T>,
        is_in: &mut bool,
        boundary_count: &mut u32,
    ) where
        T: Real,
    {
        match geometry {
            Geometry::Point(q) => {
                // a point geometry has an empty boundary, so coincidence is interior
                Self::update(Self::locate_on_point(p, *q), is_in, boundary_count);
            }
            Geometry::LineString(line) => {
                Self::update(Self::locate_on_line(p, line), is_in, boundary_count);
            }
            Geometry::Polygon(polygon) => {
                Self::update(locate_in_polygon(p, polygon), is_in, boundary_count);
            }
            Geometry::MultiPoint(points) => {
                for q in points {
                    Self::update(Self::locate_on_point(p, *q), is_in, boundary_count);
                }
            }
            Geometry::MultiLineString(lines) => {
                for line in lines {
                    Self::update(Self::locate_on_line(p, line), is_in, boundary_count);
                }
            }
            Geometry::MultiPolygon(polygons) => {
                for polygon in polygons {
                    Self::update(locate_in_polygon(p, polygon), is_in, boundary_count);
                }
            }
            Geometry::GeometryCollection(components) => {
                for component in components {
                    Self::compute_location(p, component, is_in, boundary_count);
                }
            }
        }
    }

    fn update(loc: Location, is_in: &mut bool, boundary_count: &mut u32) {
        match loc {
            Location::Interior => *is_in = true,
            Location::Boundary => *boundary_count += 1,
            Location::Exterior => {}
        }
    }

    fn locate_on_point<T>(p: Coord<T>, q: Coord<T>) -> Location
    where
        T: Real,
    {
        if p == q {
            Location::Interior
        } else {
            Location::Exterior
        }
    }

    fn locate_on_line<T>(p: Coord<T>, line: &[Coord<T>]) -> Location
    where
        T: Real,
    {
        if line.len() < 2 {
            return Location::Exterior;
        }
        let closed = line[0] == line[line.len() - 1];
        if !closed && (p == line[0] || p == line[line.len() - 1]) {
            return Location::Boundary;
        }
        if on_line(p, line) {
            Location::Interior
        } else {
            Location::Exterior
        }
    }
}
