use crate::core::traits::Real;
use std::cmp::Ordering;
use std::ops;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 2D coordinate value type. Copied freely, equality is exact.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coord<T = f64> {
    pub x: T,
    pub y: T,
}

impl<T> Coord<T>
where
    T: Real,
{
    /// Create a new coordinate with x and y ordinates.
    pub fn new(x: T, y: T) -> Self {
        Coord { x, y }
    }

    /// Dot product.
    pub fn dot(&self, other: Self) -> T {
        self.x * other.x + self.y * other.y
    }

    /// Compute the perpendicular dot product (`self.x * other.y - self.y * other.x`).
    pub fn perp_dot(&self, other: Self) -> T {
        self.x * other.y - self.y * other.x
    }

    /// Squared length of the coordinate viewed as a vector from the origin.
    pub fn length_squared(&self) -> T {
        self.dot(*self)
    }

    /// Length of the coordinate viewed as a vector from the origin.
    pub fn length(&self) -> T {
        self.dot(*self).sqrt()
    }

    /// Fuzzy equal comparison with another coordinate using `fuzzy_epsilon` given.
    pub fn fuzzy_eq_eps(&self, other: Self, fuzzy_epsilon: T) -> bool {
        self.x.fuzzy_eq_eps(other.x, fuzzy_epsilon) && self.y.fuzzy_eq_eps(other.y, fuzzy_epsilon)
    }

    /// Fuzzy equal comparison with another coordinate using `T::fuzzy_epsilon()`.
    pub fn fuzzy_eq(&self, other: Self) -> bool {
        self.fuzzy_eq_eps(other, T::fuzzy_epsilon())
    }

    /// Strict total ordering by x ordinate, then y ordinate.
    ///
    /// Used for keying node maps and orienting coordinate sequences. Coordinates are
    /// expected to be finite; non-comparable ordinates compare equal.
    pub fn compare(&self, other: &Self) -> Ordering {
        match self.x.partial_cmp(&other.x) {
            Some(Ordering::Equal) | None => self.y.partial_cmp(&other.y).unwrap_or(Ordering::Equal),
            Some(ordering) => ordering,
        }
    }
}

/// Shorthand for creating a [Coord].
#[inline]
pub fn coord<T>(x: T, y: T) -> Coord<T>
where
    T: Real,
{
    Coord::new(x, y)
}

impl<T> ops::Add for Coord<T>
where
    T: Real,
{
    type Output = Coord<T>;
    fn add(self, rhs: Self) -> Self::Output {
        coord(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<T> ops::Sub for Coord<T>
where
    T: Real,
{
    type Output = Coord<T>;
    fn sub(self, rhs: Self) -> Self::Output {
        coord(self.x - rhs.x, self.y - rhs.y)
    }
}

impl<T> ops::Neg for Coord<T>
where
    T: Real,
{
    type Output = Coord<T>;
    fn neg(self) -> Self::Output {
        coord(-self.x, -self.y)
    }
}
