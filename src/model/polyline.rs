//! Encoded polyline codec.
//!
//! Each coordinate is scaled by 1e5, rounded, and written as the zig-zag
//! delta from the previous point in 5-bit chunks offset by 63, latitude first.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const PRECISION: f64 = 1e5;

const CHUNK_BITS: u32 = 5;
const CHUNK_MASK: i64 = 0x1f;
const CONTINUATION: i64 = 0x20;
const OFFSET: u8 = 63;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    #[must_use]
    pub fn as_pair(&self) -> [f64; 2] {
        [self.lat, self.lng]
    }
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolylineError {
    #[error("invalid character {ch:?} at index {index}")]
    InvalidChar { index: usize, ch: char },
    #[error("input ends mid-value at index {index}")]
    Truncated { index: usize },
    #[error("value starting before index {index} does not fit in 64 bits")]
    Overflow { index: usize },
}

/// Decodes an encoded polyline into points.
///
/// # Errors
///
/// Returns `Err` on characters outside `'?'..='~'`, on a value whose last
/// chunk still carries the continuation bit, or on a latitude with no
/// longitude after it.
pub fn decode(encoded: &str) -> Result<Vec<LatLng>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while index < bytes.len() {
        let (dlat, next) = read_value(bytes, index)?;
        if next >= bytes.len() {
            return Err(PolylineError::Truncated { index: next });
        }
        let (dlng, next) = read_value(bytes, next)?;
        index = next;

        lat += dlat;
        lng += dlng;
        points.push(LatLng::new(lat as f64 / PRECISION, lng as f64 / PRECISION));
    }

    Ok(points)
}

fn read_value(bytes: &[u8], start: usize) -> Result<(i64, usize), PolylineError> {
    let mut index = start;
    let mut shift = 0;
    let mut result: i64 = 0;

    loop {
        let Some(&byte) = bytes.get(index) else {
            return Err(PolylineError::Truncated { index });
        };
        if !(OFFSET..=b'~').contains(&byte) {
            return Err(PolylineError::InvalidChar {
                index,
                ch: char::from(byte),
            });
        }
        if shift >= 64 - CHUNK_BITS {
            return Err(PolylineError::Overflow { index });
        }
        let chunk = i64::from(byte - OFFSET);
        result |= (chunk & CHUNK_MASK) << shift;
        shift += CHUNK_BITS;
        index += 1;
        if chunk < CONTINUATION {
            break;
        }
    }

    let value = if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    };
    Ok((value, index))
}

/// Encodes points, rounding each coordinate to five decimal places.
#[must_use]
pub fn encode(points: &[LatLng]) -> String {
    let mut out = String::new();
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for point in points {
        let lat = scale(point.lat);
        let lng = scale(point.lng);
        write_value(&mut out, lat - prev_lat);
        write_value(&mut out, lng - prev_lng);
        prev_lat = lat;
        prev_lng = lng;
    }

    out
}

fn scale(coord: f64) -> i64 {
    (coord * PRECISION).round() as i64
}

fn write_value(out: &mut String, value: i64) {
    let mut v = if value < 0 { !(value << 1) } else { value << 1 };
    while v >= CONTINUATION {
        out.push(char::from(((CONTINUATION | (v & CHUNK_MASK)) as u8) + OFFSET));
        v >>= CHUNK_BITS;
    }
    out.push(char::from((v as u8) + OFFSET));
}

/// Smallest box holding every point; `None` for an empty path.
#[must_use]
pub fn bounds(points: &[LatLng]) -> Option<Bounds> {
    let first = points.first()?;
    let mut south_west = *first;
    let mut north_east = *first;
    for p in &points[1..] {
        south_west.lat = south_west.lat.min(p.lat);
        south_west.lng = south_west.lng.min(p.lng);
        north_east.lat = north_east.lat.max(p.lat);
        north_east.lng = north_east.lng.max(p.lng);
    }
    Some(Bounds {
        south_west,
        north_east,
    })
}
