//! Factory-default lighting configuration.
//!
//! Used by `WraithPrism::reset_to_default` to bring the device back to a
//! known-good state matching the cooler's out-of-box behavior.

use crate::protocol::codec::{ChannelState, Color, Direction};
use crate::protocol::modes::{BasicMode, Mode, RingMode};

/// Default mirage frequency, in Hz, applied to all three color channels.
pub const DEFAULT_MIRAGE_HZ: u16 = 330;

/// Medium speed ordinal (index 2 of 5).
pub const SPEED_MEDIUM: u8 = 2;

/// High brightness ordinal (index 2 of 3).
pub const BRIGHTNESS_HIGH: u8 = 2;

/// Factory default for the logo and fan: color cycle at medium speed and
/// high brightness.
pub fn default_basic_state() -> ChannelState {
    ChannelState {
        mode: Mode::Basic(BasicMode::Cycle),
        color: Color::BLACK,
        color_randomized: false,
        speed: SPEED_MEDIUM,
        brightness: BRIGHTNESS_HIGH,
        direction: Direction::Clockwise,
    }
}

/// Factory default for the ring: rainbow at medium speed and high brightness.
pub fn default_ring_state() -> ChannelState {
    ChannelState {
        mode: Mode::Ring(RingMode::Rainbow),
        color: Color::BLACK,
        color_randomized: false,
        speed: SPEED_MEDIUM,
        brightness: BRIGHTNESS_HIGH,
        direction: Direction::Clockwise,
    }
}
