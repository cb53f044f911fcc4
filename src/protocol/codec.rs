//! Channel descriptor codec for the Wraith Prism.
//!
//! Converts between a component's semantic state and the 9-byte channel
//! descriptor transmitted on the wire, and decodes the channel readback
//! response back into that state. Offsets verified against stock controller
//! traffic captures.

use crate::error::Result;
use crate::protocol::modes::{BasicMode, ColorSupport, Mode, RingMode};

// =============================================================================
// Readback Offsets (for 0x52 0x2C responses)
// =============================================================================

/// Offset of the channel id in a channel readback.
const OFFSET_CHANNEL: usize = 4;
/// Offset of the speed byte.
const OFFSET_SPEED: usize = 5;
/// Offset of the color-source byte.
const OFFSET_COLOR_SOURCE: usize = 6;
/// Offset of the mode opcode.
const OFFSET_MODE: usize = 7;
/// Offset of the brightness byte.
const OFFSET_BRIGHTNESS: usize = 9;
/// Offset of the first color byte (red, then green, then blue).
const OFFSET_COLOR: usize = 10;

/// Bytes of a readback the decoder inspects.
pub const READBACK_LENGTH: usize = 13;

/// Speed ordinal assumed when the readback byte is not in the mode's table.
const DEFAULT_SPEED: u8 = 2;
/// Brightness ordinal assumed when the readback byte is not in the mode's table.
const DEFAULT_BRIGHTNESS: u8 = 1;

/// Color-source bit marking randomized color (or, for rotation modes, the
/// direction-bearing source).
const SOURCE_RANDOM_BIT: u8 = 0x80;

// =============================================================================
// Semantic State
// =============================================================================

/// An RGB color triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Rotation direction for ring effects that support it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Clockwise,
    Counterclockwise,
}

impl Direction {
    const fn bit(&self) -> u8 {
        match self {
            Direction::Clockwise => 0,
            Direction::Counterclockwise => 1,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Clockwise => write!(f, "clockwise"),
            Direction::Counterclockwise => write!(f, "counterclockwise"),
        }
    }
}

/// Semantic state of one lighting channel.
///
/// The 9-byte wire encoding is derivable purely from these fields; the
/// session's validated setters keep them within what the active mode's
/// capability tables allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelState {
    pub mode: Mode,
    pub color: Color,
    pub color_randomized: bool,
    /// Speed ordinal, 0 (slowest) to 4 (fastest).
    pub speed: u8,
    /// Brightness ordinal, 0 (dimmest) to 2 (brightest).
    pub brightness: u8,
    pub direction: Direction,
}

impl ChannelState {
    /// A state with the given mode and every other field at its canonical
    /// default (medium speed, medium brightness, black, clockwise).
    pub fn with_mode(mode: Mode) -> Self {
        ChannelState {
            mode,
            color: Color::BLACK,
            color_randomized: false,
            speed: DEFAULT_SPEED,
            brightness: DEFAULT_BRIGHTNESS,
            direction: Direction::Clockwise,
        }
    }

    /// Switch modes, clamping speed/brightness into the new mode's tables and
    /// re-normalizing color fields to the new capability class.
    pub fn switch_mode(&mut self, mode: Mode) {
        self.mode = mode;
        let caps = mode.caps();
        if caps.speeds.is_empty() {
            self.speed = DEFAULT_SPEED;
        } else {
            self.speed = self.speed.min(caps.speeds.len() as u8 - 1);
        }
        if caps.brightnesses.is_empty() {
            self.brightness = DEFAULT_BRIGHTNESS;
        } else {
            self.brightness = self.brightness.min(caps.brightnesses.len() as u8 - 1);
        }
        if caps.color_support == ColorSupport::None {
            self.color = Color::BLACK;
        }
        if caps.color_support != ColorSupport::All || caps.supports_direction {
            self.color_randomized = false;
        }
        if !caps.supports_direction {
            self.direction = Direction::Clockwise;
        }
    }

    fn speed_byte(&self) -> u8 {
        let caps = self.mode.caps();
        caps.speeds
            .get(self.speed as usize)
            .copied()
            .unwrap_or_else(|| self.mode.speed_fallback())
    }

    fn brightness_byte(&self) -> u8 {
        let caps = self.mode.caps();
        caps.brightnesses
            .get(self.brightness as usize)
            .copied()
            .unwrap_or_else(|| self.mode.brightness_fallback())
    }

    fn color_source_byte(&self) -> u8 {
        let caps = self.mode.caps();
        if caps.supports_direction {
            // Rotation modes fold direction into the source byte; the 0x80
            // bit is the marker, the low bit the direction.
            SOURCE_RANDOM_BIT | self.direction.bit()
        } else if caps.color_support == ColorSupport::All && self.color_randomized {
            SOURCE_RANDOM_BIT
        } else {
            caps.color_source
        }
    }
}

// =============================================================================
// Encoding
// =============================================================================

/// Encode a channel state into the 9-byte wire descriptor:
/// `[channel, speed, colorSource, mode, 0xFF, brightness, r, g, b]`.
///
/// `channel` is the component's assigned channel id for logo/fan; ring states
/// ignore it and use their mode's own channel.
pub fn encode_channel(state: &ChannelState, channel: u8) -> [u8; 9] {
    let caps = state.mode.caps();
    let channel = match state.mode {
        Mode::Basic(_) => channel,
        Mode::Ring(_) => caps.channel,
    };
    // Black regardless of the stored color when the mode takes none.
    let color = if caps.color_support == ColorSupport::None {
        Color::BLACK
    } else {
        state.color
    };

    [
        channel,
        state.speed_byte(),
        state.color_source_byte(),
        caps.opcode,
        0xFF,
        state.brightness_byte(),
        color.r,
        color.g,
        color.b,
    ]
}

// =============================================================================
// Decoding
// =============================================================================

fn ordinal_or_default(table: &[u8], byte: u8, default: u8) -> u8 {
    table
        .iter()
        .position(|&b| b == byte)
        .map(|i| i as u8)
        // Byte outside the known table (e.g. newer firmware); assume the
        // middle setting rather than failing.
        .unwrap_or(default)
}

fn decode_fields(buf: &[u8], mode: Mode) -> ChannelState {
    let caps = mode.caps();
    let color_source = buf[OFFSET_COLOR_SOURCE];

    let color = if caps.color_support == ColorSupport::None {
        Color::BLACK
    } else {
        Color::new(buf[OFFSET_COLOR], buf[OFFSET_COLOR + 1], buf[OFFSET_COLOR + 2])
    };

    let color_randomized = caps.color_support == ColorSupport::All
        && !caps.supports_direction
        && color_source & SOURCE_RANDOM_BIT != 0;

    let direction = if caps.supports_direction && color_source & 0x01 != 0 {
        Direction::Counterclockwise
    } else {
        Direction::Clockwise
    };

    ChannelState {
        mode,
        color,
        color_randomized,
        speed: ordinal_or_default(caps.speeds, buf[OFFSET_SPEED], DEFAULT_SPEED),
        brightness: ordinal_or_default(caps.brightnesses, buf[OFFSET_BRIGHTNESS], DEFAULT_BRIGHTNESS),
        direction,
    }
}

/// Decode a logo/fan channel readback. The mode is resolved from the opcode
/// byte; fails with `UnknownOpcode` on a byte the registry does not know.
pub fn decode_basic(buf: &[u8]) -> Result<ChannelState> {
    debug_assert!(buf.len() >= READBACK_LENGTH);
    let mode = BasicMode::from_opcode(buf[OFFSET_MODE])?;
    Ok(decode_fields(buf, Mode::Basic(mode)))
}

/// Decode a ring channel readback. The mode is resolved from the channel id;
/// fails with `UnknownOpcode` on an id the registry does not know.
pub fn decode_ring(buf: &[u8]) -> Result<ChannelState> {
    debug_assert!(buf.len() >= READBACK_LENGTH);
    let mode = RingMode::from_channel(buf[OFFSET_CHANNEL])?;
    Ok(decode_fields(buf, Mode::Ring(mode)))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::commands::{FAN_CHANNEL, LOGO_CHANNEL};

    /// Wrap a 9-byte descriptor in a fake readback buffer so encode output
    /// can be fed straight back into decode.
    fn readback_from(descriptor: [u8; 9]) -> [u8; 13] {
        let mut buf = [0u8; 13];
        buf[4..13].copy_from_slice(&descriptor);
        buf
    }

    /// Every state the validated setters can produce for a mode.
    fn legal_states(mode: Mode) -> Vec<ChannelState> {
        let caps = mode.caps();
        let speeds: Vec<u8> = if caps.speeds.is_empty() {
            vec![2]
        } else {
            (0..caps.speeds.len() as u8).collect()
        };
        let brightnesses: Vec<u8> = if caps.brightnesses.is_empty() {
            vec![1]
        } else {
            (0..caps.brightnesses.len() as u8).collect()
        };
        let colors = match caps.color_support {
            ColorSupport::None => vec![Color::BLACK],
            _ => vec![Color::BLACK, Color::new(255, 0, 128), Color::new(1, 2, 3)],
        };
        let randomized = if caps.color_support == ColorSupport::All && !caps.supports_direction {
            vec![false, true]
        } else {
            vec![false]
        };
        let directions = if caps.supports_direction {
            vec![Direction::Clockwise, Direction::Counterclockwise]
        } else {
            vec![Direction::Clockwise]
        };

        let mut states = Vec::new();
        for &speed in &speeds {
            for &brightness in &brightnesses {
                for &color in &colors {
                    for &color_randomized in &randomized {
                        for &direction in &directions {
                            states.push(ChannelState {
                                mode,
                                color,
                                color_randomized,
                                speed,
                                brightness,
                                direction,
                            });
                        }
                    }
                }
            }
        }
        states
    }

    #[test]
    fn test_round_trip_basic_modes() {
        for mode in BasicMode::ALL {
            for state in legal_states(Mode::Basic(mode)) {
                let encoded = encode_channel(&state, LOGO_CHANNEL);
                let decoded = decode_basic(&readback_from(encoded)).unwrap();
                assert_eq!(decoded, state, "mode {mode}");
            }
        }
    }

    #[test]
    fn test_round_trip_ring_modes() {
        for mode in RingMode::ALL {
            for state in legal_states(Mode::Ring(mode)) {
                let encoded = encode_channel(&state, 0);
                let decoded = decode_ring(&readback_from(encoded)).unwrap();
                assert_eq!(decoded, state, "mode {mode}");
            }
        }
    }

    #[test]
    fn test_encode_layout() {
        let state = ChannelState {
            mode: Mode::Basic(BasicMode::Static),
            color: Color::new(0x12, 0x34, 0x56),
            color_randomized: false,
            speed: 2,
            brightness: 1,
            direction: Direction::Clockwise,
        };
        let encoded = encode_channel(&state, FAN_CHANNEL);
        // Static has no speed table, so the basic idle byte is used.
        assert_eq!(
            encoded,
            [FAN_CHANNEL, 0x2C, 0x20, 0x01, 0xFF, 0x99, 0x12, 0x34, 0x56]
        );
    }

    #[test]
    fn test_swirl_counterclockwise_color_source() {
        let mut state = ChannelState::with_mode(Mode::Ring(RingMode::Swirl));
        state.direction = Direction::Counterclockwise;
        state.color = Color::new(255, 0, 128);
        let encoded = encode_channel(&state, 0);
        assert_eq!(encoded[0], 0x0A);
        assert_eq!(encoded[2], 0x81);
        assert_eq!(&encoded[6..9], &[255, 0, 128]);
    }

    #[test]
    fn test_color_forced_black_when_unsupported() {
        let mut state = ChannelState::with_mode(Mode::Ring(RingMode::Rainbow));
        state.color = Color::new(10, 20, 30);
        let encoded = encode_channel(&state, 0);
        assert_eq!(&encoded[6..9], &[0, 0, 0]);

        let mut state = ChannelState::with_mode(Mode::Basic(BasicMode::Off));
        state.color = Color::new(1, 1, 1);
        let encoded = encode_channel(&state, LOGO_CHANNEL);
        assert_eq!(&encoded[6..9], &[0, 0, 0]);
    }

    #[test]
    fn test_decode_unknown_speed_and_brightness_bytes() {
        let mut state = ChannelState::with_mode(Mode::Basic(BasicMode::Cycle));
        state.speed = 4;
        state.brightness = 0;
        let mut encoded = encode_channel(&state, LOGO_CHANNEL);
        encoded[1] = 0xEE; // not in any speed table
        encoded[5] = 0xEE; // not in any brightness table
        let decoded = decode_basic(&readback_from(encoded)).unwrap();
        assert_eq!(decoded.speed, 2);
        assert_eq!(decoded.brightness, 1);
    }

    #[test]
    fn test_decode_randomized_flag() {
        let mut state = ChannelState::with_mode(Mode::Ring(RingMode::Breathe));
        state.color_randomized = true;
        let encoded = encode_channel(&state, 0);
        assert_eq!(encoded[2], 0x80);
        let decoded = decode_ring(&readback_from(encoded)).unwrap();
        assert!(decoded.color_randomized);

        // Bounce carries a fixed 0x80 source but takes no color, so the flag
        // must stay clear.
        let state = ChannelState::with_mode(Mode::Ring(RingMode::Bounce));
        let encoded = encode_channel(&state, 0);
        assert_eq!(encoded[2], 0x80);
        let decoded = decode_ring(&readback_from(encoded)).unwrap();
        assert!(!decoded.color_randomized);
    }

    #[test]
    fn test_decode_unknown_mode_bytes() {
        let mut buf = [0u8; 13];
        buf[OFFSET_MODE] = 0x7E;
        assert!(decode_basic(&buf).is_err());
        let mut buf = [0u8; 13];
        buf[OFFSET_CHANNEL] = 0x42;
        assert!(decode_ring(&buf).is_err());
    }

    #[test]
    fn test_switch_mode_normalizes_fields() {
        let mut state = ChannelState::with_mode(Mode::Basic(BasicMode::Cycle));
        state.color = Color::new(9, 9, 9);
        state.color_randomized = true;
        state.speed = 4;
        state.switch_mode(Mode::Basic(BasicMode::Off));
        assert_eq!(state.color, Color::BLACK);
        assert!(!state.color_randomized);
        assert_eq!(state.speed, 2);
        assert_eq!(state.brightness, 1);
    }

    #[test]
    fn test_morse_speed_fallback() {
        let state = ChannelState::with_mode(Mode::Ring(RingMode::Morse));
        let encoded = encode_channel(&state, 0);
        assert_eq!(encoded[1], 0x6B);
        let state = ChannelState::with_mode(Mode::Ring(RingMode::Static));
        let encoded = encode_channel(&state, 0);
        assert_eq!(encoded[1], 0xFF);
    }
}
