//! Courier vehicle types.
//!
//! A vehicle type drives two decisions: the routing-engine profile used to
//! plan roads, and the base speed the simulator and tracking fallback assume.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The vehicle a courier delivers with.
///
/// # Examples
///
/// ```
/// use waypost_core::VehicleType;
///
/// let vehicle: VehicleType = "MOTO".parse().unwrap();
/// assert_eq!(vehicle, VehicleType::Motorcycle);
/// assert_eq!(vehicle.routing_profile(), "driving");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum VehicleType {
    /// Motorcycle or scooter.
    Motorcycle,
    /// Car.
    Car,
    /// Bicycle.
    Bicycle,
}

/// Returned when a vehicle name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown vehicle type {0:?}")]
pub struct UnknownVehicleError(pub String);

impl VehicleType {
    /// Typical urban speed in km/h before traffic variance.
    #[must_use]
    pub const fn base_speed_kmh(self) -> f64 {
        match self {
            Self::Motorcycle => 30.0,
            Self::Car => 25.0,
            Self::Bicycle => 15.0,
        }
    }

    /// Routing-engine profile selecting the road rules for this vehicle.
    #[must_use]
    pub const fn routing_profile(self) -> &'static str {
        match self {
            Self::Motorcycle | Self::Car => "driving",
            Self::Bicycle => "cycling",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Motorcycle => "motorcycle",
            Self::Car => "car",
            Self::Bicycle => "bicycle",
        };
        f.write_str(name)
    }
}

impl FromStr for VehicleType {
    type Err = UnknownVehicleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "moto" | "motorcycle" | "motorbike" => Ok(Self::Motorcycle),
            "carro" | "car" => Ok(Self::Car),
            "bicicleta" | "bike" | "bicycle" => Ok(Self::Bicycle),
            _ => Err(UnknownVehicleError(s.to_owned())),
        }
    }
}
