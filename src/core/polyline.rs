//! Encoded polyline decoding
//!
//! Decodes the compact polyline format used by the directions service
//! (5 decimal digits of precision, zig-zag signed deltas in 5-bit chunks).

use crate::core::directions::LatLng;
use crate::core::error::{Error, Result};

const PRECISION: f64 = 1e5;

/// Decode an encoded polyline into its sequence of points
pub fn decode_polyline(encoded: &str) -> Result<Vec<LatLng>> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while index < bytes.len() {
        lat += next_delta(bytes, &mut index)?;
        lng += next_delta(bytes, &mut index)?;

        points.push(LatLng {
            lat: lat as f64 / PRECISION,
            lng: lng as f64 / PRECISION,
        });
    }

    Ok(points)
}

/// Read one zig-zag encoded value starting at `index`
fn next_delta(bytes: &[u8], index: &mut usize) -> Result<i64> {
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let byte = *bytes.get(*index).ok_or_else(|| {
            Error::InvalidPolyline(format!("truncated value at byte {}", *index))
        })?;

        if !(63..=126).contains(&byte) {
            return Err(Error::InvalidPolyline(format!(
                "unexpected character {:?} at byte {}",
                byte as char, *index
            )));
        }
        if shift > 30 {
            return Err(Error::InvalidPolyline(format!(
                "value too long at byte {}",
                *index
            )));
        }

        let chunk = i64::from(byte - 63);
        *index += 1;
        result |= (chunk & 0x1f) << shift;
        shift += 5;

        if chunk < 0x20 {
            break;
        }
    }

    Ok(if result & 1 == 1 { !(result >> 1) } else { result >> 1 })
}
