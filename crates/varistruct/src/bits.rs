//! Low-level numeric read and write utilities for byte slices.
//!
//! Integers are handled as unsigned 64-bit patterns of 1 to 8 bytes; signed
//! interpretation and range checks sit on top.

use crate::variant::Endianness;

/// Reads `bytes` (at most 8) as an unsigned integer.
pub fn read_uint(bytes: &[u8], endianness: Endianness) -> u64 {
    debug_assert!(bytes.len() <= 8);

    match endianness {
        Endianness::Big => bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b)),
        Endianness::Little => bytes
            .iter()
            .rev()
            .fold(0u64, |acc, b| (acc << 8) | u64::from(*b)),
    }
}

/// Writes the low `bytes.len()` bytes of `value` into `bytes`.
pub fn write_uint(bytes: &mut [u8], value: u64, endianness: Endianness) {
    debug_assert!(bytes.len() <= 8);

    let width = bytes.len();
    for i in 0..width {
        let byte = (value >> (8 * i)) as u8;
        match endianness {
            Endianness::Little => bytes[i] = byte,
            Endianness::Big => bytes[width - 1 - i] = byte,
        }
    }
}

/// Sign-extends the low `bits` of `value` to a full `i64`.
pub fn sign_extend(value: u64, bits: usize) -> i64 {
    let shift = 64 - bits;
    ((value << shift) as i64) >> shift
}

/// Mask covering every bit of a `width`-byte integer.
pub fn width_mask(width: usize) -> i128 {
    (1i128 << (8 * width)) - 1
}

/// Whether `value` can be stored in `width` bytes with the given signedness.
pub fn fits(value: i128, width: usize, signed: bool) -> bool {
    let bits = 8 * width as u32;
    if signed {
        let half = 1i128 << (bits - 1);
        (-half..half).contains(&value)
    } else {
        (0..1i128 << bits).contains(&value)
    }
}
