//! Waypoint-indexed delivery routes.
//!
//! A [`Route`] is an ordered list of waypoints from origin to destination and
//! a cursor naming the waypoint the courier is currently heading for. The
//! cursor only moves forward and never passes the final waypoint.

use thiserror::Error;

use crate::Coordinates;

/// Errors returned by [`Route::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Fewer than two waypoints were supplied.
    #[error("route needs an origin and a destination, got {0} waypoint(s)")]
    TooFewWaypoints(usize),
    /// A stored cursor pointed past the final waypoint.
    #[error("cursor {index} is past the last of {len} waypoints")]
    CursorOutOfRange {
        /// Cursor value read.
        index: usize,
        /// Number of waypoints in the route.
        len: usize,
    },
}

/// The walkable route for one delivery order.
///
/// # Examples
/// ```
/// use waypost_core::{Coordinates, Route};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let origin = Coordinates::from_degrees(-23.5505, -46.6333)?;
/// let destination = Coordinates::from_degrees(-23.5631, -46.6542)?;
/// let mut route = Route::new(vec![origin, destination])?;
///
/// assert_eq!(route.next_waypoint(), Some(origin));
/// route.advance(5);
/// assert!(route.is_complete());
/// assert_eq!(route.current_index(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawRoute"))]
pub struct Route {
    waypoints: Vec<Coordinates>,
    current_index: usize,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawRoute {
    waypoints: Vec<Coordinates>,
    current_index: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<RawRoute> for Route {
    type Error = RouteError;

    fn try_from(raw: RawRoute) -> Result<Self, Self::Error> {
        let len = raw.waypoints.len();
        let mut route = Self::new(raw.waypoints)?;
        if raw.current_index >= len {
            return Err(RouteError::CursorOutOfRange {
                index: raw.current_index,
                len,
            });
        }
        route.current_index = raw.current_index;
        Ok(route)
    }
}

impl Route {
    /// Construct a route positioned at its first waypoint.
    pub fn new(waypoints: Vec<Coordinates>) -> Result<Self, RouteError> {
        if waypoints.len() < 2 {
            return Err(RouteError::TooFewWaypoints(waypoints.len()));
        }
        Ok(Self {
            waypoints,
            current_index: 0,
        })
    }

    /// All waypoints in travel order.
    #[must_use]
    pub fn waypoints(&self) -> &[Coordinates] {
        &self.waypoints
    }

    /// Index of the waypoint currently being approached.
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current_index
    }

    /// Index of the final waypoint.
    #[must_use]
    pub const fn last_index(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }

    /// The route's first waypoint.
    #[must_use]
    pub fn origin(&self) -> Option<Coordinates> {
        self.waypoints.first().copied()
    }

    /// The route's final waypoint.
    #[must_use]
    pub fn destination(&self) -> Option<Coordinates> {
        self.waypoints.last().copied()
    }

    /// The waypoint under the cursor, or `None` once the cursor has reached
    /// the final index.
    #[must_use]
    pub fn next_waypoint(&self) -> Option<Coordinates> {
        if self.is_complete() {
            return None;
        }
        self.waypoints.get(self.current_index).copied()
    }

    /// Move the cursor forward by `steps`, stopping at the final index.
    ///
    /// Returns `true` when the cursor moved.
    pub fn advance(&mut self, steps: usize) -> bool {
        let next = self
            .current_index
            .saturating_add(steps)
            .min(self.last_index());
        let moved = next > self.current_index;
        self.current_index = self.current_index.max(next);
        moved
    }

    /// True once the cursor sits on the final waypoint.
    ///
    /// A route without waypoints is trivially complete.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.current_index >= self.last_index()
    }

    /// Number of waypoints not yet reached, counting the one under the cursor.
    #[must_use]
    pub const fn remaining_waypoints(&self) -> usize {
        self.waypoints.len().saturating_sub(self.current_index)
    }
}
