//! Mirage frequency divider calculation.
//!
//! The fan's LED flicker synthesizer takes three divider bytes per color
//! channel, derived from a fixed master clock. The arithmetic below
//! (truncation included) must match the firmware's expectation bit-for-bit;
//! do not change the rounding without hardware verification.

/// Master clock the fan's frequency synthesizer divides down from.
pub const MIRAGE_MASTER_CLOCK: f64 = 187_498.0;

/// Lowest frequency the synthesizer can represent, in Hz.
pub const MIRAGE_MIN_HZ: u16 = 45;

/// Highest frequency the synthesizer can represent, in Hz.
pub const MIRAGE_MAX_HZ: u16 = 2000;

/// Compute the three divider bytes (multiplicand, fractional part, integer
/// part) for a desired frequency in Hz.
///
/// Callers enforce the 45-2000 Hz domain before converting.
pub fn mirage_bytes(hz: u16) -> [u8; 3] {
    let initial = MIRAGE_MASTER_CLOCK / f64::from(hz);
    let multiplicand = (initial / 256.0).floor();
    let remainder = initial / (multiplicand + 1.0);

    [
        multiplicand as u8,
        (remainder.fract() * 256.0).floor() as u8,
        remainder.floor() as u8,
    ]
}
