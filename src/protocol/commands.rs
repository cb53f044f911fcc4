//! HID command definitions and builders for the Wraith Prism.
//!
//! All frames are 64 bytes; the first one or two bytes identify the
//! operation. Protocol reverse-engineered from the stock Cooler Master
//! controller traffic.

// =============================================================================
// Constants
// =============================================================================

/// HID report length for reads and writes.
pub const HID_REPORT_LENGTH: usize = 64;

/// Cooler Master Vendor ID.
pub const COOLER_MASTER_VID: u16 = 0x2516;

/// Wraith Prism Product ID.
pub const WRAITH_PRISM_PID: u16 = 0x0051;

/// Logo and fan channel ids as reported by the channel table.
pub const LOGO_CHANNEL: u8 = 0x05;
pub const FAN_CHANNEL: u8 = 0x06;

/// Encoded channel descriptor length (see `protocol::codec`).
pub const CHANNEL_DESCRIPTOR_LENGTH: usize = 9;

/// Largest morse payload a single 0x51 0x73 frame carries.
pub const MORSE_CHUNK_LENGTH: usize = 60;

// =============================================================================
// HID Commands
// =============================================================================

/// Power the lighting controller on.
pub const CMD_POWER_ON: [u8; 2] = [0x41, 0x80];

/// Power the lighting controller off.
pub const CMD_POWER_OFF: [u8; 2] = [0x41, 0x03];

/// Persist the active configuration to device flash.
pub const CMD_SAVE: [u8; 2] = [0x50, 0x55];

/// Load the persisted configuration.
pub const CMD_LOAD: [u8; 1] = [0x50];

/// Restore the persisted configuration into the active channels.
pub const CMD_RESTORE: [u8; 2] = [0x00, 0x41];

/// Apply the active channel configuration (makes prior sets visible).
pub const CMD_APPLY: [u8; 5] = [0x51, 0x28, 0x00, 0x00, 0xE0];

/// Request the global channel table. Response bytes 8, 9 and 10 hold the
/// logo, fan and ring channel ids.
pub const CMD_GET_CHANNEL_TABLE: [u8; 8] = [0x52, 0xA0, 0x01, 0x00, 0x00, 0x03, 0x00, 0x00];

/// Request the descriptor of one channel: `[0x52, 0x2C, 1, 0, channel]`.
pub const CMD_GET_CHANNEL_HEADER: [u8; 4] = [0x52, 0x2C, 0x01, 0x00];

/// Set the descriptor of one channel: `[0x51, 0x2C, 1, 0, <9 bytes>, 0, 0, 0]`.
pub const CMD_SET_CHANNEL_HEADER: [u8; 4] = [0x51, 0x2C, 0x01, 0x00];

/// Bind channels into the global channel table.
pub const CMD_ASSIGN_CHANNELS_HEADER: [u8; 8] = [0x51, 0xA0, 0x01, 0x00, 0x00, 0x03, 0x00, 0x00];

/// Mirage frequency synthesizer header: `[0x51, 0x71, 0, 0]` followed by four
/// numbered divider groups.
pub const CMD_MIRAGE_HEADER: [u8; 4] = [0x51, 0x71, 0x00, 0x00];

/// Divider triple that disables a mirage group.
pub const MIRAGE_GROUP_OFF: [u8; 3] = [0x00, 0xFF, 0x4A];

/// Morse payload chunk header: `[0x51, 0x73, chunk, 0, <up to 60 bytes>]`.
pub const CMD_MORSE_CHUNK_HEADER: [u8; 2] = [0x51, 0x73];

/// Query the enso ambient override flag. Response byte 4 is 0x10 when on.
pub const CMD_GET_ENSO: [u8; 2] = [0x52, 0x96];

/// Enable the enso ambient override.
pub const CMD_ENSO_ON: [u8; 5] = [0x51, 0x96, 0x00, 0x00, 0x10];

/// Disable the enso ambient override.
pub const CMD_ENSO_OFF: [u8; 2] = [0x51, 0x96];

/// Enso response byte marking the override as active.
pub const ENSO_ACTIVE: u8 = 0x10;

/// Request the firmware version string (response bytes 8-33, ASCII).
pub const CMD_GET_FIRMWARE: [u8; 2] = [0x12, 0x20];

/// Byte range of the ASCII firmware string in the version response.
pub const FIRMWARE_STRING_RANGE: std::ops::Range<usize> = 8..34;

// =============================================================================
// Command Builders
// =============================================================================

/// Build a get-channel-values command for one channel.
pub fn build_get_channel_cmd(channel: u8) -> [u8; HID_REPORT_LENGTH] {
    let mut buf = [0u8; HID_REPORT_LENGTH];
    buf[0..4].copy_from_slice(&CMD_GET_CHANNEL_HEADER);
    buf[4] = channel;
    buf
}

/// Build a set-channel-values command from a 9-byte channel descriptor.
///
/// The descriptor is followed by three zero bytes and the remainder of the
/// frame is filled with 0xFF, matching the stock controller's traffic.
pub fn build_set_channel_cmd(
    descriptor: &[u8; CHANNEL_DESCRIPTOR_LENGTH],
) -> [u8; HID_REPORT_LENGTH] {
    let mut buf = [0xFFu8; HID_REPORT_LENGTH];
    buf[0..4].copy_from_slice(&CMD_SET_CHANNEL_HEADER);
    buf[4..4 + CHANNEL_DESCRIPTOR_LENGTH].copy_from_slice(descriptor);
    buf[13] = 0x00;
    buf[14] = 0x00;
    buf[15] = 0x00;
    buf
}

/// Build the channel-assignment command binding the logo and fan channels and
/// the ring's current mode channel (repeated over the 15 ring segments).
pub fn build_assign_channels_cmd(
    logo_channel: u8,
    fan_channel: u8,
    ring_channel: u8,
) -> [u8; HID_REPORT_LENGTH] {
    let mut buf = [0u8; HID_REPORT_LENGTH];
    buf[0..8].copy_from_slice(&CMD_ASSIGN_CHANNELS_HEADER);
    buf[8] = logo_channel;
    buf[9] = fan_channel;
    for byte in &mut buf[10..25] {
        *byte = ring_channel;
    }
    buf
}

/// Build a mirage command from three divider triples (red, green, blue).
///
/// The frame carries four numbered groups; group 1 is always the fixed
/// off-triple, groups 2-4 carry the per-color dividers.
pub fn build_mirage_cmd(
    red: &[u8; 3],
    green: &[u8; 3],
    blue: &[u8; 3],
) -> [u8; HID_REPORT_LENGTH] {
    let mut buf = [0u8; HID_REPORT_LENGTH];
    buf[0..4].copy_from_slice(&CMD_MIRAGE_HEADER);
    buf[4] = 0x01;
    buf[5..8].copy_from_slice(&MIRAGE_GROUP_OFF);
    buf[8] = 0x02;
    buf[9..12].copy_from_slice(red);
    buf[12] = 0x03;
    buf[13..16].copy_from_slice(green);
    buf[16] = 0x04;
    buf[17..20].copy_from_slice(blue);
    buf
}

/// Build the mirage command that disables all three synthesizer groups.
pub fn build_mirage_off_cmd() -> [u8; HID_REPORT_LENGTH] {
    build_mirage_cmd(&MIRAGE_GROUP_OFF, &MIRAGE_GROUP_OFF, &MIRAGE_GROUP_OFF)
}

/// Build one morse payload chunk. `payload` must be at most 60 bytes; the
/// remainder of the frame stays zeroed.
pub fn build_morse_chunk_cmd(chunk_index: u8, payload: &[u8]) -> [u8; HID_REPORT_LENGTH] {
    debug_assert!(payload.len() <= MORSE_CHUNK_LENGTH);
    let mut buf = [0u8; HID_REPORT_LENGTH];
    buf[0..2].copy_from_slice(&CMD_MORSE_CHUNK_HEADER);
    buf[2] = chunk_index;
    buf[4..4 + payload.len()].copy_from_slice(payload);
    buf
}

/// Extract the firmware version string from a 0x12 0x20 response.
pub fn parse_firmware_string(buf: &[u8; HID_REPORT_LENGTH]) -> String {
    buf[FIRMWARE_STRING_RANGE]
        .iter()
        .take_while(|&&b| b != 0)
        .map(|&b| b as char)
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
