//! Morse text encoder for the ring's morse display mode.
//!
//! Accepts either plain text or literal dot/dash notation and packs it into
//! the bitstream format the ring firmware expects: two bits per symbol
//! (`.` = 10, `-` = 01, gap = 00), a fixed 4-bit terminator, then each 8-bit
//! group bit-reversed into a byte.

use crate::error::{PrismError, Result};

// =============================================================================
// Constants
// =============================================================================

/// Maximum encoded payload: two 60-byte transfer chunks.
pub const MAX_MORSE_BYTES: usize = 120;

/// Terminator bits appended after the last symbol.
const TERMINATOR: &str = "0011";

/// International morse code table. Lookups are case-insensitive; the space
/// entry widens the inter-letter gap into a word gap.
const MORSE_TABLE: &[(char, &str)] = &[
    ('a', ".-"),
    ('b', "-..."),
    ('c', "-.-."),
    ('d', "-.."),
    ('e', "."),
    ('f', "..-."),
    ('g', "--."),
    ('h', "...."),
    ('i', ".."),
    ('j', ".---"),
    ('k', "-.-"),
    ('l', ".-.."),
    ('m', "--"),
    ('n', "-."),
    ('o', "---"),
    ('p', ".--."),
    ('q', "--.-"),
    ('r', ".-."),
    ('s', "..."),
    ('t', "-"),
    ('u', "..-"),
    ('v', "...-"),
    ('w', ".--"),
    ('x', "-..-"),
    ('y', "-.--"),
    ('z', "--.."),
    ('0', "-----"),
    ('1', ".----"),
    ('2', "..---"),
    ('3', "...--"),
    ('4', "....-"),
    ('5', "....."),
    ('6', "-...."),
    ('7', "--..."),
    ('8', "---.."),
    ('9', "----."),
    ('.', ".-.-.-"),
    (',', "--..--"),
    ('?', "..--.."),
    ('\'', ".----."),
    ('!', "-.-.--"),
    ('/', "-..-."),
    ('(', "-.--."),
    (')', "-.--.-"),
    ('&', ".-..."),
    (':', "---..."),
    (';', "-.-.-."),
    ('=', "-...-"),
    ('+', ".-.-."),
    ('-', "-....-"),
    ('_', "..--.-"),
    ('"', ".-..-."),
    ('$', "...-..-"),
    ('@', ".--.-."),
    (' ', ""),
];

fn code_for(c: char) -> Option<&'static str> {
    let c = c.to_ascii_lowercase();
    MORSE_TABLE
        .iter()
        .find(|(entry, _)| *entry == c)
        .map(|(_, code)| *code)
}

// =============================================================================
// Encoding
// =============================================================================

/// Whether an input is literal morse notation: after trimming, splitting on
/// spaces and `/` yields only tokens made of dots and dashes that appear in
/// the code table.
pub fn is_morse_notation(input: &str) -> bool {
    let mut tokens = input
        .trim()
        .split(|c| c == ' ' || c == '/')
        .filter(|t| !t.is_empty())
        .peekable();
    tokens.peek().is_some()
        && tokens.all(|t| MORSE_TABLE.iter().any(|(_, code)| *code == t))
}

/// Normalize an input into a symbol stream of dots, dashes and spaces.
///
/// Literal notation tokens are rejoined with single spaces; text is mapped
/// character by character through the code table. Unsupported characters fail
/// with `InvalidMorseCharacters` naming each offender once.
fn normalize(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if is_morse_notation(trimmed) {
        let tokens: Vec<&str> = trimmed
            .split(|c| c == ' ' || c == '/')
            .filter(|t| !t.is_empty())
            .collect();
        return Ok(tokens.join(" "));
    }

    let mut invalid = String::new();
    for c in trimmed.chars() {
        if code_for(c).is_none() && !invalid.contains(c.to_ascii_lowercase()) {
            invalid.push(c.to_ascii_lowercase());
        }
    }
    if !invalid.is_empty() {
        return Err(PrismError::InvalidMorseCharacters(invalid));
    }

    let codes: Vec<&str> = trimmed.chars().filter_map(code_for).collect();
    Ok(codes.join(" "))
}

/// Encode text or literal notation into the ring's packed byte format.
///
/// The encoder is total over representable inputs and does not enforce the
/// transfer limit itself; callers check [`MAX_MORSE_BYTES`] before pushing
/// the payload to the device.
pub fn encode_morse(input: &str) -> Result<Vec<u8>> {
    let symbols = normalize(input)?;

    let mut bits = String::with_capacity(symbols.len() * 2 + TERMINATOR.len());
    for symbol in symbols.chars() {
        bits.push_str(match symbol {
            '.' => "10",
            '-' => "01",
            _ => "00",
        });
    }
    bits.push_str(TERMINATOR);

    let bytes = bits
        .as_bytes()
        .chunks(8)
        .map(|group| {
            // Zero-fill on the right, then bit-reverse the group.
            let mut byte = 0u8;
            for (i, bit) in group.iter().enumerate() {
                if *bit == b'1' {
                    byte |= 1 << i;
                }
            }
            byte
        })
        .collect();

    Ok(bytes)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_and_notation_agree() {
        assert_eq!(
            encode_morse("SOS").unwrap(),
            encode_morse(".../---/...").unwrap()
        );
        assert_eq!(
            encode_morse("sos").unwrap(),
            encode_morse("... --- ...").unwrap()
        );
    }

    #[test]
    fn test_notation_detection() {
        assert!(is_morse_notation(".../---/..."));
        assert!(is_morse_notation(".- -... -.-."));
        assert!(!is_morse_notation("SOS"));
        assert!(!is_morse_notation(""));
        // Dot/dash runs that match no table entry are not notation.
        assert!(!is_morse_notation("........"));
    }

    #[test]
    fn test_single_letter_packing() {
        // "e" = "." -> bits 10 + 0011 -> 10001100 -> reversed 00110001.
        assert_eq!(encode_morse("e").unwrap(), vec![0x31]);
    }

    #[test]
    fn test_invalid_characters_are_named() {
        let err = encode_morse("na[ve #text#").unwrap_err();
        match err {
            PrismError::InvalidMorseCharacters(chars) => {
                assert_eq!(chars, "[#");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_word_gap_differs_from_letter_gap() {
        assert_ne!(encode_morse("ab").unwrap(), encode_morse("a b").unwrap());
    }

    #[test]
    fn test_deterministic() {
        let a = encode_morse("the quick brown fox").unwrap();
        let b = encode_morse("the quick brown fox").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_length_scales_past_transfer_limit() {
        let long = "0123456789".repeat(12);
        let bytes = encode_morse(&long).unwrap();
        assert!(bytes.len() > MAX_MORSE_BYTES);
    }
}
