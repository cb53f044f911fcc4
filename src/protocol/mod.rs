//! HID protocol implementation for the Wraith Prism.
//!
//! This module contains the low-level command constants and builders, the
//! mode registry, the channel descriptor codec, and the morse/mirage
//! encoders, all reverse-engineered from the stock controller's traffic.

pub mod codec;
pub mod commands;
pub mod mirage;
pub mod modes;
pub mod morse;

pub use codec::{ChannelState, Color, Direction, decode_basic, decode_ring, encode_channel};
pub use commands::*;
pub use mirage::{MIRAGE_MAX_HZ, MIRAGE_MIN_HZ, mirage_bytes};
pub use modes::{BasicMode, ColorSupport, Mode, ModeCaps, RingMode};
pub use morse::{MAX_MORSE_BYTES, encode_morse};
