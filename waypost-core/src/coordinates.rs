//! Geographic positions held as fixed-precision decimals.
//!
//! Courier positions are updated additively on every simulation tick, so the
//! latitude and longitude are stored as [`Decimal`] values quantised to
//! [`COORDINATE_SCALE`] places. Great-circle maths converts to `f64` at the
//! edges and never feeds a float back into a stored position unrounded.

use std::fmt;

use geo::{Distance, Haversine, Point};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Number of decimal places retained for latitude and longitude.
///
/// Seven places resolve roughly one centimetre at the equator.
pub const COORDINATE_SCALE: u32 = 7;

const MAX_LATITUDE: Decimal = Decimal::from_parts(90, 0, 0, false, 0);
const MAX_LONGITUDE: Decimal = Decimal::from_parts(180, 0, 0, false, 0);

/// Errors returned when constructing [`Coordinates`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinatesError {
    /// Latitude fell outside `[-90, 90]`.
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(Decimal),
    /// Longitude fell outside `[-180, 180]`.
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(Decimal),
    /// A floating-point input was NaN or infinite.
    #[error("coordinate component {0} is not a finite number")]
    NotFinite(f64),
}

/// An immutable WGS84 latitude/longitude pair.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use waypost_core::Coordinates;
///
/// # fn main() -> Result<(), waypost_core::CoordinatesError> {
/// let se = Coordinates::from_degrees(-23.5505, -46.6333)?;
/// assert_eq!(se.latitude(), Decimal::new(-235505, 4));
/// assert_eq!(se.to_string(), "-23.5505000,-46.6333000");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawCoordinates"))]
pub struct Coordinates {
    latitude: Decimal,
    longitude: Decimal,
}

/// Unchecked wire form; deserialised values go through [`Coordinates::new`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawCoordinates {
    latitude: Decimal,
    longitude: Decimal,
}

#[cfg(feature = "serde")]
impl TryFrom<RawCoordinates> for Coordinates {
    type Error = CoordinatesError;

    fn try_from(raw: RawCoordinates) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl Coordinates {
    /// Validates and constructs coordinates from decimal degrees.
    pub fn new(latitude: Decimal, longitude: Decimal) -> Result<Self, CoordinatesError> {
        if latitude.abs() > MAX_LATITUDE {
            return Err(CoordinatesError::LatitudeOutOfRange(latitude));
        }
        if longitude.abs() > MAX_LONGITUDE {
            return Err(CoordinatesError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude: quantise(latitude),
            longitude: quantise(longitude),
        })
    }

    /// Validates and constructs coordinates from floating-point degrees.
    pub fn from_degrees(latitude: f64, longitude: f64) -> Result<Self, CoordinatesError> {
        Self::new(to_decimal(latitude)?, to_decimal(longitude)?)
    }

    /// Latitude in decimal degrees.
    #[must_use]
    pub const fn latitude(&self) -> Decimal {
        self.latitude
    }

    /// Longitude in decimal degrees.
    #[must_use]
    pub const fn longitude(&self) -> Decimal {
        self.longitude
    }

    /// Convert to a `geo` point (`x = longitude`, `y = latitude`).
    #[must_use]
    pub fn to_point(&self) -> Point<f64> {
        Point::new(
            self.longitude.to_f64().unwrap_or_default(),
            self.latitude.to_f64().unwrap_or_default(),
        )
    }

    /// Great-circle distance to `other` in kilometres.
    #[must_use]
    pub fn distance_km(&self, other: &Self) -> f64 {
        Haversine.distance(self.to_point(), other.to_point()) / 1000.0
    }

    /// Move a `fraction` of the way towards `target`.
    ///
    /// Interpolation is linear on each component. `fraction` is clamped into
    /// `[0, 1]`, so the result always lies between the two endpoints.
    #[must_use]
    pub fn interpolate(&self, target: &Self, fraction: f64) -> Self {
        let step = Decimal::from_f64(fraction.clamp(0.0, 1.0)).unwrap_or(Decimal::ZERO);
        Self {
            latitude: quantise(self.latitude + (target.latitude - self.latitude) * step),
            longitude: quantise(self.longitude + (target.longitude - self.longitude) * step),
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

fn quantise(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(COORDINATE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(COORDINATE_SCALE);
    rounded
}

fn to_decimal(value: f64) -> Result<Decimal, CoordinatesError> {
    if !value.is_finite() {
        return Err(CoordinatesError::NotFinite(value));
    }
    Decimal::from_f64(value).ok_or(CoordinatesError::NotFinite(value))
}
