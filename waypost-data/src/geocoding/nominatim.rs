//! Nominatim search response types.
//!
//! See: <https://nominatim.org/release-docs/latest/api/Search/>

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Deserialize;
use waypost_core::Coordinates;

/// One search hit. Nominatim sends degrees as strings; some compatible
/// services send numbers, so both are accepted.
#[derive(Debug, Deserialize)]
pub struct Place {
    lat: Degrees,
    lon: Degrees,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Degrees {
    Text(String),
    Number(f64),
}

impl Degrees {
    fn to_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Text(text) => Decimal::from_str(text.trim()).ok(),
            Self::Number(value) => Decimal::from_f64(*value),
        }
    }
}

impl Place {
    /// Coordinates of this hit, if both components parse and are in range.
    pub fn coordinates(&self) -> Option<Coordinates> {
        let latitude = self.lat.to_decimal()?;
        let longitude = self.lon.to_decimal()?;
        Coordinates::new(latitude, longitude).ok()
    }
}
