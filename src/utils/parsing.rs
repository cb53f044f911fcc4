//! Parsing utilities for CLI arguments.
//!
//! This module provides reusable parsing functions for the input formats the
//! command-line surface accepts, mapping them onto the validated types the
//! device session expects.

use crate::error::{PrismError, Result};
use crate::protocol::codec::{Color, Direction};

// =============================================================================
// Color Parsing
// =============================================================================

/// Parse a hex color string into an RGB color.
///
/// Accepts formats: `#RRGGBB` or `RRGGBB`
///
/// # Example
/// ```
/// use wraith_rust_devices::utils::parsing::parse_hex_color;
///
/// let color = parse_hex_color("#FF5500").unwrap();
/// assert_eq!((color.r, color.g, color.b), (255, 85, 0));
/// ```
pub fn parse_hex_color(hex: &str) -> Result<Color> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(PrismError::InvalidInput(format!(
            "Invalid color hex '{hex}'. Use RRGGBB or #RRGGBB"
        )));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .map_err(|_| PrismError::InvalidInput(format!("Invalid color hex '{hex}'")))
    };
    Ok(Color::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

// =============================================================================
// Level Parsing
// =============================================================================

/// Parse a speed level into its ordinal (0-4).
///
/// Accepts the names `slowest`, `slow`, `medium`, `fast`, `fastest` or a bare
/// ordinal.
pub fn parse_speed(name: &str) -> Result<u8> {
    match name.to_lowercase().as_str() {
        "slowest" => Ok(0),
        "slow" => Ok(1),
        "medium" => Ok(2),
        "fast" => Ok(3),
        "fastest" => Ok(4),
        other => match other.parse::<u8>() {
            Ok(n) if n <= 4 => Ok(n),
            _ => Err(PrismError::InvalidInput(format!(
                "Unknown speed '{name}'. Use slowest, slow, medium, fast, fastest or 0-4"
            ))),
        },
    }
}

/// Parse a brightness level into its ordinal (0-2).
///
/// Accepts the names `low`, `medium`, `high` or a bare ordinal.
pub fn parse_brightness(name: &str) -> Result<u8> {
    match name.to_lowercase().as_str() {
        "low" => Ok(0),
        "medium" => Ok(1),
        "high" => Ok(2),
        other => match other.parse::<u8>() {
            Ok(n) if n <= 2 => Ok(n),
            _ => Err(PrismError::InvalidInput(format!(
                "Unknown brightness '{name}'. Use low, medium, high or 0-2"
            ))),
        },
    }
}

/// Parse a rotation direction name.
pub fn parse_direction(name: &str) -> Result<Direction> {
    match name.to_lowercase().as_str() {
        "clockwise" | "cw" => Ok(Direction::Clockwise),
        "counterclockwise" | "ccw" => Ok(Direction::Counterclockwise),
        _ => Err(PrismError::InvalidInput(format!(
            "Unknown direction '{name}'. Use clockwise or counterclockwise"
        ))),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#FF0000").unwrap(), Color::new(255, 0, 0));
        assert_eq!(parse_hex_color("00ff80").unwrap(), Color::new(0, 255, 128));
        assert!(parse_hex_color("FFF").is_err());
        assert!(parse_hex_color("GGGGGG").is_err());
        assert!(parse_hex_color("").is_err());
    }

    #[test]
    fn test_parse_speed() {
        assert_eq!(parse_speed("slowest").unwrap(), 0);
        assert_eq!(parse_speed("MEDIUM").unwrap(), 2);
        assert_eq!(parse_speed("4").unwrap(), 4);
        assert!(parse_speed("5").is_err());
        assert!(parse_speed("warp").is_err());
    }

    #[test]
    fn test_parse_brightness() {
        assert_eq!(parse_brightness("low").unwrap(), 0);
        assert_eq!(parse_brightness("High").unwrap(), 2);
        assert_eq!(parse_brightness("1").unwrap(), 1);
        assert!(parse_brightness("3").is_err());
    }

    #[test]
    fn test_parse_direction() {
        assert_eq!(parse_direction("cw").unwrap(), Direction::Clockwise);
        assert_eq!(
            parse_direction("Counterclockwise").unwrap(),
            Direction::Counterclockwise
        );
        assert!(parse_direction("up").is_err());
    }
}
