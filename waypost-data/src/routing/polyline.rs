//! Decoder for the encoded polyline format used by routing engines.
//!
//! Each coordinate is stored as a zig-zag encoded delta from the previous
//! one, split into 5-bit chunks offset by 63. Decoding yields exact fixed
//! point values at the given precision, which map straight onto decimal
//! coordinates without a float round-trip.

use rust_decimal::Decimal;
use thiserror::Error;
use waypost_core::{Coordinates, CoordinatesError};

const CHUNK_MASK: i64 = 0x1f;
const CONTINUATION_BIT: i64 = 0x20;
const ASCII_OFFSET: u8 = 63;
const MAX_SHIFT: u32 = 60;

/// Errors raised while decoding a polyline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolylineError {
    /// A byte outside the polyline alphabet was found.
    #[error("invalid polyline character {byte:#04x} at offset {offset}")]
    InvalidCharacter {
        /// Offending byte.
        byte: u8,
        /// Byte offset within the input.
        offset: usize,
    },
    /// The input ended in the middle of a value or a coordinate pair.
    #[error("polyline ends in the middle of a coordinate")]
    Truncated,
    /// A value used more chunks than fit in 64 bits.
    #[error("polyline value overflows at offset {offset}")]
    Overflow {
        /// Byte offset within the input.
        offset: usize,
    },
    /// A decoded point was not a valid coordinate.
    #[error(transparent)]
    InvalidCoordinate(#[from] CoordinatesError),
}

/// Decode `encoded` into coordinates, with `precision` decimal places
/// (5 for `polyline`, 6 for `polyline6`).
pub fn decode(encoded: &str, precision: u32) -> Result<Vec<Coordinates>, PolylineError> {
    let mut chunks = encoded.bytes().enumerate();
    let mut latitude: i64 = 0;
    let mut longitude: i64 = 0;
    let mut points = Vec::new();

    while let Some(lat_delta) = next_value(&mut chunks)? {
        let lon_delta = next_value(&mut chunks)?.ok_or(PolylineError::Truncated)?;
        latitude = latitude.saturating_add(lat_delta);
        longitude = longitude.saturating_add(lon_delta);
        points.push(Coordinates::new(
            Decimal::new(latitude, precision),
            Decimal::new(longitude, precision),
        )?);
    }
    Ok(points)
}

/// Read one zig-zag encoded value. Returns `Ok(None)` at a clean end of input.
fn next_value(
    chunks: &mut impl Iterator<Item = (usize, u8)>,
) -> Result<Option<i64>, PolylineError> {
    let mut result: i64 = 0;
    let mut shift: u32 = 0;
    let mut started = false;

    loop {
        let Some((offset, byte)) = chunks.next() else {
            return if started {
                Err(PolylineError::Truncated)
            } else {
                Ok(None)
            };
        };
        started = true;
        if !(ASCII_OFFSET..=126).contains(&byte) {
            return Err(PolylineError::InvalidCharacter { byte, offset });
        }
        if shift > MAX_SHIFT {
            return Err(PolylineError::Overflow { offset });
        }
        let chunk = i64::from(byte - ASCII_OFFSET);
        result |= (chunk & CHUNK_MASK) << shift;
        shift += 5;
        if chunk & CONTINUATION_BIT == 0 {
            break;
        }
    }

    let value = if result & 1 == 0 {
        result >> 1
    } else {
        !(result >> 1)
    };
    Ok(Some(value))
}
