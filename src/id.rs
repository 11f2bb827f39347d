//! Fresh identifier generation.
//!
//! Ids are random RFC 4122 version-4 UUID strings, e.g.
//! `"3f0c9a52-8d1e-4b7a-9c3e-51d2a0f4e6b8"`. They are opaque to the rest of
//! the crate: imported data may carry any string id.

use crate::error::{Error, Result};

/// Generate a fresh random id
pub fn new_id() -> Result<String> {
    let mut bytes = [0u8; 16];
    getrandom::getrandom(&mut bytes).map_err(|e| Error::IdGeneration(e.to_string()))?;
    Ok(format_uuid(bytes))
}

/// Format 16 random bytes as a version-4, variant-1 UUID
fn format_uuid(mut b: [u8; 16]) -> String {
    b[6] = (b[6] & 0x0f) | 0x40;
    b[8] = (b[8] & 0x3f) | 0x80;
    let hex: String = b.iter().map(|x| format!("{:02x}", x)).collect();
    format!("{}-{}-{}-{}-{}", &hex[0..8], &hex[8..12], &hex[12..16], &hex[16..20], &hex[20..32])
}
