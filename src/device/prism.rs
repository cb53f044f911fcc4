//! Wraith Prism device session.
//!
//! High-level interface owning the transport and the three live component
//! states, keeping the in-memory model synchronized with whatever the device
//! currently holds.

use std::thread;
use std::time::Duration;

use crate::config::{DEFAULT_MIRAGE_HZ, default_basic_state, default_ring_state};
use crate::device::transport::{HidTransport, Transport};
use crate::error::{PrismError, Result};
use crate::protocol::codec::{
    ChannelState, Color, Direction, decode_basic, decode_ring, encode_channel,
};
use crate::protocol::commands::{
    CMD_APPLY, CMD_ENSO_OFF, CMD_ENSO_ON, CMD_GET_CHANNEL_TABLE, CMD_GET_ENSO, CMD_GET_FIRMWARE,
    CMD_LOAD, CMD_POWER_OFF, CMD_POWER_ON, CMD_RESTORE, CMD_SAVE, ENSO_ACTIVE, HID_REPORT_LENGTH,
    MORSE_CHUNK_LENGTH, build_assign_channels_cmd, build_get_channel_cmd, build_mirage_cmd,
    build_mirage_off_cmd, build_morse_chunk_cmd, build_set_channel_cmd, parse_firmware_string,
};
use crate::protocol::mirage::{MIRAGE_MAX_HZ, MIRAGE_MIN_HZ, mirage_bytes};
use crate::protocol::modes::{ColorSupport, Mode};
use crate::protocol::morse::{MAX_MORSE_BYTES, encode_morse};

// =============================================================================
// Constants
// =============================================================================

/// Settle delay between disabling the mirage synthesizer and re-enabling it.
/// Re-enabling immediately makes the synthesizer latch wrong dividers.
const MIRAGE_SETTLE: Duration = Duration::from_millis(100);

// =============================================================================
// Component Records
// =============================================================================

/// The three addressable lighting components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Logo,
    Fan,
    Ring,
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentKind::Logo => write!(f, "logo"),
            ComponentKind::Fan => write!(f, "fan"),
            ComponentKind::Ring => write!(f, "ring"),
        }
    }
}

/// Live state of one component plus the last encoding known to be persisted
/// on the device.
#[derive(Debug, Clone)]
pub struct Component {
    channel: u8,
    state: ChannelState,
    saved_bytes: [u8; 9],
}

impl Component {
    fn from_readback(channel: u8, state: ChannelState) -> Self {
        let saved_bytes = encode_channel(&state, channel);
        Component {
            channel,
            state,
            saved_bytes,
        }
    }

    /// The component's semantic state.
    pub fn state(&self) -> &ChannelState {
        &self.state
    }

    /// Assigned wire channel id (ring components track their mode's channel).
    pub fn channel(&self) -> u8 {
        match self.state.mode {
            Mode::Ring(mode) => mode.caps().channel,
            Mode::Basic(_) => self.channel,
        }
    }

    /// Whether the live encoding differs from the last saved encoding.
    pub fn is_dirty(&self) -> bool {
        encode_channel(&self.state, self.channel) != self.saved_bytes
    }

    fn mark_saved(&mut self) {
        self.saved_bytes = encode_channel(&self.state, self.channel);
    }
}

/// Mirage state of the fan. The device offers no readback for it, so it is
/// assumed off right after connecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MirageState {
    #[default]
    Off,
    On {
        red_hz: u16,
        green_hz: u16,
        blue_hz: u16,
    },
}

impl MirageState {
    /// Mirage enabled with the same frequency on all three channels.
    pub const fn uniform(hz: u16) -> Self {
        MirageState::On {
            red_hz: hz,
            green_hz: hz,
            blue_hz: hz,
        }
    }
}

/// A partial component update; unset fields keep their current values.
///
/// Updates are validated as a whole against the target mode before anything
/// is transmitted, so an invalid edit never partially applies.
#[derive(Debug, Clone, Default)]
pub struct ComponentUpdate {
    pub mode: Option<Mode>,
    pub color: Option<Color>,
    pub color_randomized: Option<bool>,
    pub speed: Option<u8>,
    pub brightness: Option<u8>,
    pub direction: Option<Direction>,
}

// =============================================================================
// WraithPrism
// =============================================================================

/// Wraith Prism device session.
///
/// Owns the transport exclusively; every operation takes `&mut self`, which
/// serializes transactions (the protocol allows exactly one outstanding
/// request/response at a time).
///
/// # Example
///
/// ```no_run
/// use wraith_rust_devices::device::{ComponentKind, ComponentUpdate, WraithPrism};
/// use wraith_rust_devices::protocol::{Color, Mode, RingMode};
///
/// let mut prism = WraithPrism::open()?;
/// prism.update_component(
///     ComponentKind::Ring,
///     ComponentUpdate {
///         mode: Some(Mode::Ring(RingMode::Swirl)),
///         color: Some(Color::new(255, 0, 128)),
///         ..Default::default()
///     },
/// )?;
/// prism.save()?;
/// # Ok::<(), wraith_rust_devices::error::PrismError>(())
/// ```
pub struct WraithPrism<T: Transport = HidTransport> {
    transport: T,
    closed: bool,
    logo: Component,
    fan: Component,
    ring: Component,
    mirage: MirageState,
    morse_bytes: Vec<u8>,
    saved_morse_bytes: Vec<u8>,
}

impl WraithPrism<HidTransport> {
    /// Open the first available Wraith Prism and run the power-on sequence.
    pub fn open() -> Result<Self> {
        Self::connect(HidTransport::open()?)
    }
}

impl<T: Transport> WraithPrism<T> {
    /// Initialize a session over an already-open transport: power on, restore
    /// the persisted configuration into the active channels, apply, then read
    /// back all three channels.
    pub fn connect(mut transport: T) -> Result<Self> {
        exchange(&mut transport, &CMD_POWER_ON)?;
        exchange(&mut transport, &CMD_RESTORE)?;
        exchange(&mut transport, &CMD_APPLY)?;

        let table = exchange(&mut transport, &CMD_GET_CHANNEL_TABLE)?;
        let (logo_channel, fan_channel, ring_channel) = (table[8], table[9], table[10]);

        let logo = read_component(&mut transport, logo_channel, false)?;
        let fan = read_component(&mut transport, fan_channel, false)?;
        let ring = read_component(&mut transport, ring_channel, true)?;

        Ok(WraithPrism {
            transport,
            closed: false,
            logo,
            fan,
            ring,
            mirage: MirageState::Off,
            morse_bytes: Vec::new(),
            saved_morse_bytes: Vec::new(),
        })
    }

    // =========================================================================
    // State Access
    // =========================================================================

    pub fn component(&self, kind: ComponentKind) -> &Component {
        match kind {
            ComponentKind::Logo => &self.logo,
            ComponentKind::Fan => &self.fan,
            ComponentKind::Ring => &self.ring,
        }
    }

    /// Fan mirage state as last pushed this session.
    pub fn mirage(&self) -> MirageState {
        self.mirage
    }

    /// Whether any component (or the ring's morse text) has unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.logo.is_dirty()
            || self.fan.is_dirty()
            || self.ring.is_dirty()
            || self.morse_bytes != self.saved_morse_bytes
    }

    // =========================================================================
    // Device Operations
    // =========================================================================

    /// Validate and apply a component update, then push it to the device.
    ///
    /// The set-channel, assign-channels and apply commands always run as one
    /// sequence; none of them takes visible effect alone.
    pub fn update_component(&mut self, kind: ComponentKind, update: ComponentUpdate) -> Result<()> {
        self.ensure_open()?;

        let current = self.component(kind).state;
        let target_mode = update.mode.unwrap_or(current.mode);

        match (kind, target_mode) {
            (ComponentKind::Ring, Mode::Ring(_)) => {}
            (ComponentKind::Logo | ComponentKind::Fan, Mode::Basic(_)) => {}
            _ => {
                return Err(PrismError::InvalidInput(format!(
                    "mode '{target_mode}' is not valid for the {kind} component"
                )));
            }
        }

        let caps = target_mode.caps();

        if update.color.is_some() && caps.color_support == ColorSupport::None {
            return Err(unsupported("color", target_mode));
        }
        if update.color_randomized == Some(true)
            && (caps.color_support != ColorSupport::All || caps.supports_direction)
        {
            return Err(unsupported("random color", target_mode));
        }
        if let Some(speed) = update.speed {
            if caps.speeds.is_empty() {
                return Err(unsupported("speed", target_mode));
            }
            if speed as usize >= caps.speeds.len() {
                return Err(PrismError::InvalidInput(format!(
                    "speed ordinal {speed} out of range 0-{}",
                    caps.speeds.len() - 1
                )));
            }
        }
        if let Some(brightness) = update.brightness {
            if caps.brightnesses.is_empty() {
                return Err(unsupported("brightness", target_mode));
            }
            if brightness as usize >= caps.brightnesses.len() {
                return Err(PrismError::InvalidInput(format!(
                    "brightness ordinal {brightness} out of range 0-{}",
                    caps.brightnesses.len() - 1
                )));
            }
        }
        if update.direction.is_some() && !caps.supports_direction {
            return Err(unsupported("direction", target_mode));
        }

        let mut state = current;
        if update.mode.is_some() {
            state.switch_mode(target_mode);
        }
        if let Some(color) = update.color {
            state.color = color;
            state.color_randomized = false;
        }
        if let Some(randomized) = update.color_randomized {
            state.color_randomized = randomized;
        }
        if let Some(speed) = update.speed {
            state.speed = speed;
        }
        if let Some(brightness) = update.brightness {
            state.brightness = brightness;
        }
        if let Some(direction) = update.direction {
            state.direction = direction;
        }

        self.component_mut(kind).state = state;
        self.push_component(kind)?;
        self.assign_and_apply()
    }

    /// Persist the active configuration on the device. This is the only
    /// operation that clears the dirty flags.
    pub fn save(&mut self) -> Result<()> {
        self.exchange(&CMD_SAVE)?;
        self.logo.mark_saved();
        self.fan.mark_saved();
        self.ring.mark_saved();
        self.saved_morse_bytes = self.morse_bytes.clone();
        Ok(())
    }

    /// Issue the device load command. Device-side only; follow with a
    /// readback (`reset`) to resynchronize the in-memory model.
    pub fn load(&mut self) -> Result<()> {
        self.exchange(&CMD_LOAD).map(drop)
    }

    /// Pull the persisted configuration back into the active channels.
    /// Device-side only, like [`load`](Self::load).
    pub fn restore(&mut self) -> Result<()> {
        self.exchange(&CMD_RESTORE).map(drop)
    }

    /// Full reset: load, restore, apply, then read back and decode all three
    /// channels, discarding unsaved in-memory edits.
    pub fn reset(&mut self) -> Result<()> {
        self.exchange(&CMD_LOAD)?;
        self.exchange(&CMD_RESTORE)?;
        self.exchange(&CMD_APPLY)?;
        self.resync()?;
        self.morse_bytes = self.saved_morse_bytes.clone();
        Ok(())
    }

    /// Force the factory-like configuration: enso off, logo/fan cycling at
    /// medium speed and high brightness, ring rainbow at the same levels,
    /// mirage at the default frequency, and push all of it to the device.
    pub fn reset_to_default(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.exchange(&CMD_ENSO_OFF)?;

        self.logo.state = default_basic_state();
        self.fan.state = default_basic_state();
        self.ring.state = default_ring_state();

        self.push_component(ComponentKind::Logo)?;
        self.push_component(ComponentKind::Fan)?;
        self.push_component(ComponentKind::Ring)?;
        self.assign_and_apply()?;

        self.push_mirage(MirageState::uniform(DEFAULT_MIRAGE_HZ))
    }

    /// Query the enso ambient override flag.
    pub fn enso(&mut self) -> Result<bool> {
        let response = self.exchange(&CMD_GET_ENSO)?;
        Ok(response[4] == ENSO_ACTIVE)
    }

    /// Set the enso ambient override. Enabling also saves (the device only
    /// honors the flag from persisted state); disabling restores the
    /// per-channel configuration and resynchronizes.
    pub fn set_enso(&mut self, enabled: bool) -> Result<()> {
        if enabled {
            self.exchange(&CMD_ENSO_ON)?;
            self.save()
        } else {
            self.exchange(&CMD_ENSO_OFF)?;
            self.exchange(&CMD_RESTORE)?;
            self.exchange(&CMD_APPLY)?;
            self.resync()
        }
    }

    /// Push a mirage state to the fan's frequency synthesizer.
    ///
    /// The disable sequence is always sent first; enabling waits a fixed
    /// settle delay before sending the divider triples.
    pub fn push_mirage(&mut self, state: MirageState) -> Result<()> {
        self.ensure_open()?;

        if let MirageState::On {
            red_hz,
            green_hz,
            blue_hz,
        } = state
        {
            for hz in [red_hz, green_hz, blue_hz] {
                if !(MIRAGE_MIN_HZ..=MIRAGE_MAX_HZ).contains(&hz) {
                    return Err(PrismError::InvalidInput(format!(
                        "mirage frequency {hz} Hz out of range \
                         {MIRAGE_MIN_HZ}-{MIRAGE_MAX_HZ}"
                    )));
                }
            }

            self.exchange(&build_mirage_off_cmd())?;
            thread::sleep(MIRAGE_SETTLE);
            let cmd = build_mirage_cmd(
                &mirage_bytes(red_hz),
                &mirage_bytes(green_hz),
                &mirage_bytes(blue_hz),
            );
            self.exchange(&cmd)?;
        } else {
            self.exchange(&build_mirage_off_cmd())?;
        }

        self.mirage = state;
        Ok(())
    }

    /// Encode and push morse text (or literal dot/dash notation) to the ring.
    ///
    /// The payload goes out as two 60-byte chunks, the second zero-padded
    /// when the text is short. Fails with `MorseTooLong` before any
    /// transmission if the encoding exceeds two chunks.
    pub fn update_morse_text(&mut self, text: &str) -> Result<()> {
        self.ensure_open()?;

        let bytes = encode_morse(text)?;
        if bytes.len() > MAX_MORSE_BYTES {
            return Err(PrismError::MorseTooLong {
                bytes: bytes.len(),
                max: MAX_MORSE_BYTES,
            });
        }

        let split = bytes.len().min(MORSE_CHUNK_LENGTH);
        self.exchange(&build_morse_chunk_cmd(0, &bytes[..split]))?;
        self.exchange(&build_morse_chunk_cmd(1, &bytes[split..]))?;
        self.exchange(&CMD_APPLY)?;

        self.morse_bytes = bytes;
        Ok(())
    }

    /// Query the firmware version string.
    pub fn firmware_version(&mut self) -> Result<String> {
        let response = self.exchange(&CMD_GET_FIRMWARE)?;
        Ok(parse_firmware_string(&response))
    }

    /// Turn the lighting controller off.
    pub fn power_off(&mut self) -> Result<()> {
        self.exchange(&CMD_POWER_OFF).map(drop)
    }

    /// Close the session. Terminal: every subsequent operation fails with
    /// `SessionClosed`.
    pub fn close(&mut self) {
        self.closed = true;
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn component_mut(&mut self, kind: ComponentKind) -> &mut Component {
        match kind {
            ComponentKind::Logo => &mut self.logo,
            ComponentKind::Fan => &mut self.fan,
            ComponentKind::Ring => &mut self.ring,
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(PrismError::SessionClosed);
        }
        Ok(())
    }

    fn exchange(&mut self, data: &[u8]) -> Result<[u8; HID_REPORT_LENGTH]> {
        self.ensure_open()?;
        exchange(&mut self.transport, data)
    }

    /// Transmit one component's current encoding via set-channel.
    fn push_component(&mut self, kind: ComponentKind) -> Result<()> {
        let component = self.component(kind);
        let descriptor = encode_channel(&component.state, component.channel);
        self.exchange(&build_set_channel_cmd(&descriptor)).map(drop)
    }

    /// Bind the global channel table and apply. Always follows a set-channel;
    /// neither command is meaningful alone.
    fn assign_and_apply(&mut self) -> Result<()> {
        let cmd = build_assign_channels_cmd(
            self.logo.channel(),
            self.fan.channel(),
            self.ring.channel(),
        );
        self.exchange(&cmd)?;
        self.exchange(&CMD_APPLY).map(drop)
    }

    /// Re-read the channel table and all three channel descriptors, replacing
    /// the in-memory component states with what the device holds.
    fn resync(&mut self) -> Result<()> {
        let table = self.exchange(&CMD_GET_CHANNEL_TABLE)?;
        let (logo_channel, fan_channel, ring_channel) = (table[8], table[9], table[10]);

        self.logo = read_component(&mut self.transport, logo_channel, false)?;
        self.fan = read_component(&mut self.transport, fan_channel, false)?;
        self.ring = read_component(&mut self.transport, ring_channel, true)?;
        Ok(())
    }
}

impl<T: Transport> std::fmt::Debug for WraithPrism<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WraithPrism")
            .field("closed", &self.closed)
            .field("logo", &self.logo.state)
            .field("fan", &self.fan.state)
            .field("ring", &self.ring.state)
            .field("mirage", &self.mirage)
            .finish_non_exhaustive()
    }
}

fn unsupported(what: &'static str, mode: Mode) -> PrismError {
    PrismError::UnsupportedForMode {
        what,
        mode: mode.to_string(),
    }
}

fn exchange<T: Transport>(transport: &mut T, data: &[u8]) -> Result<[u8; HID_REPORT_LENGTH]> {
    let mut buf = [0u8; HID_REPORT_LENGTH];
    let len = data.len().min(HID_REPORT_LENGTH);
    buf[..len].copy_from_slice(&data[..len]);
    transport.exchange(&buf)
}

fn read_component<T: Transport>(transport: &mut T, channel: u8, ring: bool) -> Result<Component> {
    let response = exchange(transport, &build_get_channel_cmd(channel))?;
    let state = if ring {
        decode_ring(&response)?
    } else {
        decode_basic(&response)?
    };
    Ok(Component::from_readback(channel, state))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::modes::{BasicMode, RingMode};

    /// Scripted in-memory device: answers readbacks from a channel store and
    /// records every frame for ordering assertions.
    struct FakeTransport {
        frames: Vec<[u8; HID_REPORT_LENGTH]>,
        channels: std::collections::HashMap<u8, [u8; 9]>,
        table: (u8, u8, u8),
        enso: bool,
    }

    impl FakeTransport {
        fn new() -> Self {
            let mut channels = std::collections::HashMap::new();
            // Logo: static red. Fan: cycle, medium speed, high brightness.
            // Ring: rainbow, medium speed, high brightness.
            channels.insert(0x05, [0x05, 0x2C, 0x20, 0x01, 0xFF, 0xFF, 255, 0, 0]);
            channels.insert(0x06, [0x06, 0x80, 0x20, 0x02, 0xFF, 0x7F, 0, 0, 0]);
            channels.insert(0x07, [0x07, 0x64, 0x00, 0x05, 0xFF, 0xFF, 0, 0, 0]);
            FakeTransport {
                frames: Vec::new(),
                channels,
                table: (0x05, 0x06, 0x07),
                enso: false,
            }
        }

        fn sent(&self, index_from_end: usize) -> &[u8; HID_REPORT_LENGTH] {
            &self.frames[self.frames.len() - 1 - index_from_end]
        }
    }

    impl Transport for FakeTransport {
        fn exchange(&mut self, out: &[u8; HID_REPORT_LENGTH]) -> Result<[u8; HID_REPORT_LENGTH]> {
            self.frames.push(*out);
            let mut response = [0u8; HID_REPORT_LENGTH];
            match (out[0], out[1]) {
                (0x52, 0xA0) => {
                    response[8] = self.table.0;
                    response[9] = self.table.1;
                    response[10] = self.table.2;
                }
                (0x52, 0x2C) => {
                    if let Some(descriptor) = self.channels.get(&out[4]) {
                        response[4..13].copy_from_slice(descriptor);
                    }
                }
                (0x52, 0x96) => {
                    response[4] = if self.enso { ENSO_ACTIVE } else { 0 };
                }
                (0x51, 0x2C) => {
                    let mut descriptor = [0u8; 9];
                    descriptor.copy_from_slice(&out[4..13]);
                    self.channels.insert(descriptor[0], descriptor);
                }
                (0x51, 0xA0) => {
                    self.table = (out[8], out[9], out[10]);
                }
                (0x51, 0x96) => {
                    self.enso = out[4] == ENSO_ACTIVE;
                }
                _ => {}
            }
            Ok(response)
        }
    }

    fn session() -> WraithPrism<FakeTransport> {
        WraithPrism::connect(FakeTransport::new()).unwrap()
    }

    #[test]
    fn test_connect_decodes_components() {
        let prism = session();

        let logo = prism.component(ComponentKind::Logo).state();
        assert_eq!(logo.mode, Mode::Basic(BasicMode::Static));
        assert_eq!(logo.color, Color::new(255, 0, 0));
        assert_eq!(logo.brightness, 2);

        let fan = prism.component(ComponentKind::Fan).state();
        assert_eq!(fan.mode, Mode::Basic(BasicMode::Cycle));
        assert_eq!(fan.speed, 2);
        assert_eq!(fan.brightness, 2);

        let ring = prism.component(ComponentKind::Ring).state();
        assert_eq!(ring.mode, Mode::Ring(RingMode::Rainbow));
        assert_eq!(ring.speed, 2);

        assert!(!prism.is_dirty());
        assert_eq!(prism.mirage(), MirageState::Off);
    }

    #[test]
    fn test_connect_sequence() {
        let prism = session();
        let frames = &prism.transport.frames;
        assert_eq!(&frames[0][0..2], &CMD_POWER_ON);
        assert_eq!(&frames[1][0..2], &CMD_RESTORE);
        assert_eq!(&frames[2][0..2], &[0x51, 0x28]);
        assert_eq!(&frames[3][0..2], &[0x52, 0xA0]);
        // Three channel readbacks follow.
        assert_eq!(frames[4][4], 0x05);
        assert_eq!(frames[5][4], 0x06);
        assert_eq!(frames[6][4], 0x07);
    }

    #[test]
    fn test_update_sends_set_assign_apply() {
        let mut prism = session();
        prism
            .update_component(
                ComponentKind::Ring,
                ComponentUpdate {
                    mode: Some(Mode::Ring(RingMode::Swirl)),
                    color: Some(Color::new(255, 0, 128)),
                    direction: Some(Direction::Counterclockwise),
                    ..Default::default()
                },
            )
            .unwrap();

        let set = prism.transport.sent(2);
        assert_eq!(&set[0..2], &[0x51, 0x2C]);
        assert_eq!(set[4], 0x0A); // swirl channel
        assert_eq!(set[6], 0x81); // counterclockwise rotation source
        assert_eq!(&set[10..13], &[255, 0, 128]);

        let assign = prism.transport.sent(1);
        assert_eq!(&assign[0..2], &[0x51, 0xA0]);
        assert_eq!(assign[8], 0x05);
        assert_eq!(assign[9], 0x06);
        assert!(assign[10..25].iter().all(|&b| b == 0x0A));

        let apply = prism.transport.sent(0);
        assert_eq!(&apply[0..5], &CMD_APPLY);
    }

    #[test]
    fn test_dirty_tracking() {
        let mut prism = session();
        assert!(!prism.is_dirty());

        prism
            .update_component(
                ComponentKind::Logo,
                ComponentUpdate {
                    color: Some(Color::new(0, 255, 0)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(prism.component(ComponentKind::Logo).is_dirty());

        prism.save().unwrap();
        assert!(!prism.is_dirty());

        prism
            .update_component(
                ComponentKind::Logo,
                ComponentUpdate {
                    brightness: Some(0),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(prism.is_dirty());
    }

    #[test]
    fn test_validation_rejects_before_transmission() {
        let mut prism = session();
        let frames_before = prism.transport.frames.len();

        // Rainbow takes no color.
        let err = prism
            .update_component(
                ComponentKind::Ring,
                ComponentUpdate {
                    color: Some(Color::new(1, 2, 3)),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, PrismError::UnsupportedForMode { .. }));

        // Static has no speed table.
        let err = prism
            .update_component(
                ComponentKind::Logo,
                ComponentUpdate {
                    speed: Some(1),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, PrismError::UnsupportedForMode { .. }));

        // Basic components have no direction.
        let err = prism
            .update_component(
                ComponentKind::Fan,
                ComponentUpdate {
                    direction: Some(Direction::Counterclockwise),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, PrismError::UnsupportedForMode { .. }));

        // Ring modes never fit basic components.
        let err = prism
            .update_component(
                ComponentKind::Fan,
                ComponentUpdate {
                    mode: Some(Mode::Ring(RingMode::Swirl)),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, PrismError::InvalidInput(_)));

        // Rotation modes cannot express random color on the wire.
        let err = prism
            .update_component(
                ComponentKind::Ring,
                ComponentUpdate {
                    mode: Some(Mode::Ring(RingMode::Swirl)),
                    color_randomized: Some(true),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, PrismError::UnsupportedForMode { .. }));

        assert_eq!(prism.transport.frames.len(), frames_before);
    }

    #[test]
    fn test_morse_chunks_and_apply() {
        let mut prism = session();
        prism.update_morse_text("SOS").unwrap();

        let chunk0 = prism.transport.sent(2);
        assert_eq!(&chunk0[0..4], &[0x51, 0x73, 0x00, 0x00]);
        let chunk1 = prism.transport.sent(1);
        assert_eq!(&chunk1[0..4], &[0x51, 0x73, 0x01, 0x00]);
        assert!(chunk1[4..].iter().all(|&b| b == 0));
        let apply = prism.transport.sent(0);
        assert_eq!(&apply[0..5], &CMD_APPLY);

        assert!(prism.is_dirty());
        prism.save().unwrap();
        assert!(!prism.is_dirty());
    }

    #[test]
    fn test_morse_too_long_rejected_before_transmission() {
        let mut prism = session();
        let frames_before = prism.transport.frames.len();
        let err = prism
            .update_morse_text(&"0123456789".repeat(12))
            .unwrap_err();
        assert!(matches!(err, PrismError::MorseTooLong { .. }));
        assert_eq!(prism.transport.frames.len(), frames_before);
    }

    #[test]
    fn test_mirage_disable_precedes_enable() {
        let mut prism = session();
        prism.push_mirage(MirageState::uniform(330)).unwrap();

        let disable = prism.transport.sent(1);
        assert_eq!(&disable[0..2], &[0x51, 0x71]);
        assert_eq!(&disable[9..12], &[0x00, 0xFF, 0x4A]);

        let enable = prism.transport.sent(0);
        assert_eq!(&enable[0..2], &[0x51, 0x71]);
        assert_eq!(&enable[9..12], &mirage_bytes(330));
        assert_eq!(prism.mirage(), MirageState::uniform(330));

        prism.push_mirage(MirageState::Off).unwrap();
        assert_eq!(prism.mirage(), MirageState::Off);
    }

    #[test]
    fn test_mirage_frequency_out_of_range() {
        let mut prism = session();
        let frames_before = prism.transport.frames.len();
        assert!(prism.push_mirage(MirageState::uniform(44)).is_err());
        assert!(prism.push_mirage(MirageState::uniform(2001)).is_err());
        assert_eq!(prism.transport.frames.len(), frames_before);
    }

    #[test]
    fn test_enso_round_trip() {
        let mut prism = session();
        assert!(!prism.enso().unwrap());

        prism.set_enso(true).unwrap();
        assert!(prism.enso().unwrap());
        // Enabling enso also saves.
        let save = prism.transport.sent(1);
        assert_eq!(&save[0..2], &CMD_SAVE);

        prism.set_enso(false).unwrap();
        assert!(!prism.enso().unwrap());
    }

    #[test]
    fn test_reset_discards_unsaved_edits() {
        let mut prism = session();
        prism
            .update_component(
                ComponentKind::Ring,
                ComponentUpdate {
                    mode: Some(Mode::Ring(RingMode::Bounce)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(
            prism.component(ComponentKind::Ring).state().mode,
            Mode::Ring(RingMode::Bounce)
        );

        // The fake device still reports channel 8 (bounce) in its table after
        // the assign, so craft the persisted table back first.
        prism.transport.table = (0x05, 0x06, 0x07);
        prism.reset().unwrap();
        assert_eq!(
            prism.component(ComponentKind::Ring).state().mode,
            Mode::Ring(RingMode::Rainbow)
        );
        assert!(!prism.is_dirty());
    }

    #[test]
    fn test_reset_to_default() {
        let mut prism = session();
        prism.reset_to_default().unwrap();

        let logo = prism.component(ComponentKind::Logo).state();
        assert_eq!(logo.mode, Mode::Basic(BasicMode::Cycle));
        assert_eq!(logo.speed, 2);
        assert_eq!(logo.brightness, 2);

        let ring = prism.component(ComponentKind::Ring).state();
        assert_eq!(ring.mode, Mode::Ring(RingMode::Rainbow));
        assert_eq!(ring.speed, 2);
        assert_eq!(ring.brightness, 2);

        assert_eq!(prism.mirage(), MirageState::uniform(330));

        // The device-side descriptors match after a resync.
        prism.resync().unwrap();
        assert_eq!(
            prism.component(ComponentKind::Fan).state().mode,
            Mode::Basic(BasicMode::Cycle)
        );
    }

    #[test]
    fn test_closed_session_rejects_operations() {
        let mut prism = session();
        prism.close();
        assert!(matches!(prism.save(), Err(PrismError::SessionClosed)));
        assert!(matches!(
            prism.firmware_version(),
            Err(PrismError::SessionClosed)
        ));
        assert!(matches!(
            prism.update_component(ComponentKind::Logo, ComponentUpdate::default()),
            Err(PrismError::SessionClosed)
        ));
    }
}
