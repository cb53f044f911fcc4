//! Custom error types for the Wraith Prism driver.
//!
//! This module provides fine-grained error handling for device communication,
//! protocol parsing, and input validation.

use thiserror::Error;

/// Main error type for Wraith Prism operations.
#[derive(Error, Debug)]
pub enum PrismError {
    /// Device not found during enumeration.
    #[error("Wraith Prism not found. Check USB connection and permissions.")]
    DeviceNotFound,

    /// Device was found but could not be opened due to OS permissions.
    #[error("Permission denied opening the Wraith Prism. Check udev rules or run as root.")]
    PermissionDenied,

    /// HID communication error.
    #[error("HID communication error: {0}")]
    HidError(#[from] hidapi::HidError),

    /// Transport failure (timeout or I/O error) during a 64-byte exchange.
    /// The device may be left in an intermediate state; resync with a readback.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Mode name not present in the registry.
    #[error("Unknown {family} mode '{name}'")]
    UnknownMode { family: &'static str, name: String },

    /// Readback byte that matches no registry entry (firmware/table mismatch).
    #[error("Unknown {family} mode byte {value:#04x} in device readback")]
    UnknownOpcode { family: &'static str, value: u8 },

    /// Attempted edit that the active mode does not support.
    #[error("{what} is not supported by the {mode} mode")]
    UnsupportedForMode { what: &'static str, mode: String },

    /// Morse text contains characters with no morse representation.
    #[error("No morse representation for: {0}")]
    InvalidMorseCharacters(String),

    /// Encoded morse payload exceeds the two-chunk transfer limit.
    #[error("Morse text encodes to {bytes} bytes, maximum is {max}")]
    MorseTooLong { bytes: usize, max: usize },

    /// Operation attempted after the session was closed.
    #[error("Session is closed")]
    SessionClosed,

    /// Generic invalid input error.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Wraith Prism operations.
pub type Result<T> = std::result::Result<T, PrismError>;
