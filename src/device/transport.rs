//! Transport abstraction over the Wraith Prism's HID endpoint pair.
//!
//! The protocol is strictly request/response: every command is a 64-byte
//! write followed by a 64-byte read. The session only depends on the
//! [`Transport`] trait, so tests can substitute a scripted device.

use hidapi::{HidApi, HidDevice};

use crate::error::{PrismError, Result};
use crate::protocol::{COOLER_MASTER_VID, HID_REPORT_LENGTH, WRAITH_PRISM_PID};

/// Per-transfer read timeout in milliseconds.
const READ_TIMEOUT_MS: i32 = 1000;

/// One 64-byte-out, 64-byte-in device transaction.
pub trait Transport {
    /// Send one frame and block for the device's response.
    ///
    /// # Errors
    /// `Transport` on timeout, `HidError` on I/O failure. After an error the
    /// device may be mid-sequence; callers resync with a readback.
    fn exchange(&mut self, out: &[u8; HID_REPORT_LENGTH]) -> Result<[u8; HID_REPORT_LENGTH]>;
}

/// HID transport over hidapi.
pub struct HidTransport {
    device: HidDevice,
}

impl HidTransport {
    /// Open the first connected Wraith Prism.
    ///
    /// # Errors
    /// Returns `DeviceNotFound` if no Wraith Prism is enumerated, or
    /// `PermissionDenied` when the OS refuses to open it.
    pub fn open() -> Result<Self> {
        let api = HidApi::new().map_err(PrismError::HidError)?;

        for info in api.device_list() {
            if info.vendor_id() == COOLER_MASTER_VID && info.product_id() == WRAITH_PRISM_PID {
                let device = info.open_device(&api).map_err(classify_open_error)?;
                return Ok(Self { device });
            }
        }

        Err(PrismError::DeviceNotFound)
    }

    /// Open a Wraith Prism by HID path, for hosts with more than one.
    pub fn open_path(path: &std::ffi::CStr) -> Result<Self> {
        let api = HidApi::new().map_err(PrismError::HidError)?;
        let device = api.open_path(path).map_err(classify_open_error)?;
        Ok(Self { device })
    }

    /// List all connected Wraith Prism devices as (path, serial) pairs.
    pub fn list_devices() -> Result<Vec<(String, Option<String>)>> {
        let api = HidApi::new().map_err(PrismError::HidError)?;

        let devices = api
            .device_list()
            .filter(|info| {
                info.vendor_id() == COOLER_MASTER_VID && info.product_id() == WRAITH_PRISM_PID
            })
            .map(|info| {
                (
                    info.path().to_string_lossy().into_owned(),
                    info.serial_number().map(String::from),
                )
            })
            .collect();

        Ok(devices)
    }
}

/// hidapi reports OS open failures as free-form strings with no error code,
/// so permission problems can only be spotted by message text. A wording
/// mismatch degrades to the generic `HidError` variant, never the reverse.
fn classify_open_error(err: hidapi::HidError) -> PrismError {
    let message = err.to_string().to_lowercase();
    if message.contains("permission") || message.contains("access") {
        PrismError::PermissionDenied
    } else {
        PrismError::HidError(err)
    }
}

impl Transport for HidTransport {
    fn exchange(&mut self, out: &[u8; HID_REPORT_LENGTH]) -> Result<[u8; HID_REPORT_LENGTH]> {
        self.device.write(out).map_err(PrismError::HidError)?;

        let mut buf = [0u8; HID_REPORT_LENGTH];
        let read = self
            .device
            .read_timeout(&mut buf, READ_TIMEOUT_MS)
            .map_err(PrismError::HidError)?;

        if read == 0 {
            return Err(PrismError::Transport(format!(
                "device did not respond within {READ_TIMEOUT_MS} ms"
            )));
        }

        Ok(buf)
    }
}

impl std::fmt::Debug for HidTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HidTransport").finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
