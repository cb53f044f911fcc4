//! Lighting mode registry for the Wraith Prism.
//!
//! Static tables describing, per mode, its wire opcode, speed and brightness
//! byte tables, color capabilities, and ring-specific extras (wire channel,
//! rotation support, fixed color source). All validation in the driver defers
//! to these tables.

use crate::error::{PrismError, Result};

// =============================================================================
// Capability Tables
// =============================================================================

/// Brightness bytes shared by most modes (low, medium, high).
const BRIGHTNESS_STANDARD: [u8; 3] = [0x4C, 0x99, 0xFF];

/// Brightness bytes for the color-cycle effect.
const BRIGHTNESS_CYCLE: [u8; 3] = [0x10, 0x40, 0x7F];

/// Speed bytes, slowest to fastest, per effect family.
const SPEEDS_CYCLE: [u8; 5] = [0x96, 0x8C, 0x80, 0x6E, 0x68];
const SPEEDS_BREATHE: [u8; 5] = [0x3C, 0x37, 0x31, 0x2C, 0x26];
const SPEEDS_RAINBOW: [u8; 5] = [0x72, 0x68, 0x64, 0x62, 0x61];
const SPEEDS_SWIRL: [u8; 5] = [0x90, 0x85, 0x77, 0x74, 0x70];
const SPEEDS_CHASE: [u8; 5] = [0x77, 0x74, 0x6E, 0x6B, 0x67];

/// Whether a mode accepts a color at all, one fixed color, or any color
/// (including the firmware's own randomization).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSupport {
    None,
    Specific,
    All,
}

/// Static capability record for a mode.
///
/// Empty `speeds`/`brightnesses` tables mean the mode does not support that
/// setting; the codec substitutes a fixed idle byte on encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeCaps {
    /// Wire opcode placed in the channel descriptor's mode byte.
    pub opcode: u8,
    /// Speed bytes, slowest to fastest. Empty when unsupported.
    pub speeds: &'static [u8],
    /// Brightness bytes, dimmest to brightest. Empty when unsupported.
    pub brightnesses: &'static [u8],
    pub color_support: ColorSupport,
    /// Color-source byte used when neither randomization nor rotation applies.
    pub color_source: u8,
    /// Wire channel id (ring modes select the effect via the channel table).
    pub channel: u8,
    /// Whether the effect has a rotation direction (ring only).
    pub supports_direction: bool,
    /// Speed byte substituted when the speed table is empty.
    pub speed_fallback: u8,
}

// =============================================================================
// Basic Modes (logo and fan)
// =============================================================================

/// Modes available on the logo and fan components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicMode {
    Off,
    Static,
    Cycle,
    Breathe,
}

impl BasicMode {
    /// All basic modes, in registry order.
    pub const ALL: [BasicMode; 4] = [
        BasicMode::Off,
        BasicMode::Static,
        BasicMode::Cycle,
        BasicMode::Breathe,
    ];

    /// Capability record for this mode.
    pub const fn caps(&self) -> &'static ModeCaps {
        const OFF: ModeCaps = ModeCaps {
            opcode: 0x00,
            speeds: &[],
            brightnesses: &[],
            color_support: ColorSupport::None,
            color_source: 0x20,
            channel: 0,
            supports_direction: false,
            speed_fallback: 0x2C,
        };
        const STATIC: ModeCaps = ModeCaps {
            opcode: 0x01,
            speeds: &[],
            brightnesses: &BRIGHTNESS_STANDARD,
            color_support: ColorSupport::Specific,
            color_source: 0x20,
            channel: 0,
            supports_direction: false,
            speed_fallback: 0x2C,
        };
        const CYCLE: ModeCaps = ModeCaps {
            opcode: 0x02,
            speeds: &SPEEDS_CYCLE,
            brightnesses: &BRIGHTNESS_CYCLE,
            color_support: ColorSupport::All,
            color_source: 0x20,
            channel: 0,
            supports_direction: false,
            speed_fallback: 0x2C,
        };
        const BREATHE: ModeCaps = ModeCaps {
            opcode: 0x03,
            speeds: &SPEEDS_BREATHE,
            brightnesses: &BRIGHTNESS_STANDARD,
            color_support: ColorSupport::All,
            color_source: 0x20,
            channel: 0,
            supports_direction: false,
            speed_fallback: 0x2C,
        };

        match self {
            BasicMode::Off => &OFF,
            BasicMode::Static => &STATIC,
            BasicMode::Cycle => &CYCLE,
            BasicMode::Breathe => &BREATHE,
        }
    }

    /// Look up a basic mode by name (case-insensitive).
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "off" => Ok(BasicMode::Off),
            "static" => Ok(BasicMode::Static),
            "cycle" => Ok(BasicMode::Cycle),
            "breathe" => Ok(BasicMode::Breathe),
            _ => Err(PrismError::UnknownMode {
                family: "basic",
                name: name.to_string(),
            }),
        }
    }

    /// Resolve a basic mode from its wire opcode (channel readback byte 7).
    pub fn from_opcode(opcode: u8) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.caps().opcode == opcode)
            .ok_or(PrismError::UnknownOpcode {
                family: "basic",
                value: opcode,
            })
    }

    pub const fn name(&self) -> &'static str {
        match self {
            BasicMode::Off => "off",
            BasicMode::Static => "static",
            BasicMode::Cycle => "cycle",
            BasicMode::Breathe => "breathe",
        }
    }
}

impl std::fmt::Display for BasicMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =============================================================================
// Ring Modes
// =============================================================================

/// Modes available on the rotating LED ring.
///
/// The ring selects its effect through the wire channel id rather than the
/// descriptor's mode byte, so each ring mode carries its own channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingMode {
    Off,
    Static,
    Breathe,
    Cycle,
    Rainbow,
    Bounce,
    Chase,
    Swirl,
    Morse,
}

impl RingMode {
    /// All ring modes, in registry order.
    pub const ALL: [RingMode; 9] = [
        RingMode::Off,
        RingMode::Static,
        RingMode::Breathe,
        RingMode::Cycle,
        RingMode::Rainbow,
        RingMode::Bounce,
        RingMode::Chase,
        RingMode::Swirl,
        RingMode::Morse,
    ];

    /// Capability record for this mode.
    pub const fn caps(&self) -> &'static ModeCaps {
        const OFF: ModeCaps = ModeCaps {
            opcode: 0xFF,
            speeds: &[],
            brightnesses: &[],
            color_support: ColorSupport::None,
            color_source: 0x00,
            channel: 0xFE,
            supports_direction: false,
            speed_fallback: 0xFF,
        };
        const STATIC: ModeCaps = ModeCaps {
            opcode: 0xFF,
            speeds: &[],
            brightnesses: &BRIGHTNESS_STANDARD,
            color_support: ColorSupport::Specific,
            color_source: 0x20,
            channel: 0x00,
            supports_direction: false,
            speed_fallback: 0xFF,
        };
        const BREATHE: ModeCaps = ModeCaps {
            opcode: 0xFF,
            speeds: &SPEEDS_BREATHE,
            brightnesses: &BRIGHTNESS_STANDARD,
            color_support: ColorSupport::All,
            color_source: 0x20,
            channel: 0x01,
            supports_direction: false,
            speed_fallback: 0xFF,
        };
        const CYCLE: ModeCaps = ModeCaps {
            opcode: 0xFF,
            speeds: &SPEEDS_CYCLE,
            brightnesses: &BRIGHTNESS_CYCLE,
            color_support: ColorSupport::All,
            color_source: 0x00,
            channel: 0x02,
            supports_direction: false,
            speed_fallback: 0xFF,
        };
        const RAINBOW: ModeCaps = ModeCaps {
            opcode: 0x05,
            speeds: &SPEEDS_RAINBOW,
            brightnesses: &BRIGHTNESS_STANDARD,
            color_support: ColorSupport::None,
            color_source: 0x00,
            channel: 0x07,
            supports_direction: false,
            speed_fallback: 0xFF,
        };
        const BOUNCE: ModeCaps = ModeCaps {
            opcode: 0xFF,
            speeds: &SPEEDS_CHASE,
            brightnesses: &BRIGHTNESS_STANDARD,
            color_support: ColorSupport::None,
            color_source: 0x80,
            channel: 0x08,
            supports_direction: false,
            speed_fallback: 0xFF,
        };
        const CHASE: ModeCaps = ModeCaps {
            opcode: 0xC3,
            speeds: &SPEEDS_CHASE,
            brightnesses: &BRIGHTNESS_STANDARD,
            color_support: ColorSupport::All,
            color_source: 0x20,
            channel: 0x09,
            supports_direction: true,
            speed_fallback: 0xFF,
        };
        const SWIRL: ModeCaps = ModeCaps {
            opcode: 0x4A,
            speeds: &SPEEDS_SWIRL,
            brightnesses: &BRIGHTNESS_STANDARD,
            color_support: ColorSupport::All,
            color_source: 0x20,
            channel: 0x0A,
            supports_direction: true,
            speed_fallback: 0xFF,
        };
        const MORSE: ModeCaps = ModeCaps {
            opcode: 0x05,
            speeds: &[],
            brightnesses: &BRIGHTNESS_STANDARD,
            color_support: ColorSupport::All,
            color_source: 0x05,
            channel: 0x0B,
            supports_direction: false,
            speed_fallback: 0x6B,
        };

        match self {
            RingMode::Off => &OFF,
            RingMode::Static => &STATIC,
            RingMode::Breathe => &BREATHE,
            RingMode::Cycle => &CYCLE,
            RingMode::Rainbow => &RAINBOW,
            RingMode::Bounce => &BOUNCE,
            RingMode::Chase => &CHASE,
            RingMode::Swirl => &SWIRL,
            RingMode::Morse => &MORSE,
        }
    }

    /// Look up a ring mode by name (case-insensitive).
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "off" => Ok(RingMode::Off),
            "static" => Ok(RingMode::Static),
            "breathe" => Ok(RingMode::Breathe),
            "cycle" => Ok(RingMode::Cycle),
            "rainbow" => Ok(RingMode::Rainbow),
            "bounce" => Ok(RingMode::Bounce),
            "chase" => Ok(RingMode::Chase),
            "swirl" => Ok(RingMode::Swirl),
            "morse" => Ok(RingMode::Morse),
            _ => Err(PrismError::UnknownMode {
                family: "ring",
                name: name.to_string(),
            }),
        }
    }

    /// Resolve a ring mode from its wire channel id (channel readback byte 4).
    pub fn from_channel(channel: u8) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.caps().channel == channel)
            .ok_or(PrismError::UnknownOpcode {
                family: "ring",
                value: channel,
            })
    }

    pub const fn name(&self) -> &'static str {
        match self {
            RingMode::Off => "off",
            RingMode::Static => "static",
            RingMode::Breathe => "breathe",
            RingMode::Cycle => "cycle",
            RingMode::Rainbow => "rainbow",
            RingMode::Bounce => "bounce",
            RingMode::Chase => "chase",
            RingMode::Swirl => "swirl",
            RingMode::Morse => "morse",
        }
    }
}

impl std::fmt::Display for RingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =============================================================================
// Mode (either family)
// =============================================================================

/// A mode from either family, as held by a component's live state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Basic(BasicMode),
    Ring(RingMode),
}

impl Mode {
    pub const fn caps(&self) -> &'static ModeCaps {
        match self {
            Mode::Basic(mode) => mode.caps(),
            Mode::Ring(mode) => mode.caps(),
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Mode::Basic(mode) => mode.name(),
            Mode::Ring(mode) => mode.name(),
        }
    }

    /// Speed byte substituted when the ordinal misses the table.
    pub const fn speed_fallback(&self) -> u8 {
        self.caps().speed_fallback
    }

    /// Brightness byte substituted when the ordinal misses the table.
    pub const fn brightness_fallback(&self) -> u8 {
        match self {
            Mode::Basic(_) => 0x00,
            Mode::Ring(_) => 0x99,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =============================================================================
// Tests
// =============================================================================
