//! Wraith Rust Devices Library
//!
//! A Rust driver for the AMD Wraith Prism RGB CPU cooler.
//!
//! # Features
//!
//! - Control the logo, fan and ring lighting components (mode, color, speed,
//!   brightness, rotation direction)
//! - Morse text display on the LED ring
//! - Mirage audio-frequency LED flicker on the fan
//! - Save, restore and reset the device's persisted configuration
//!
//! # Example
//!
//! ```no_run
//! use wraith_rust_devices::device::{ComponentKind, ComponentUpdate, WraithPrism};
//! use wraith_rust_devices::protocol::{BasicMode, Color, Mode};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Open the device; this powers it on and reads back its live state.
//!     let mut prism = WraithPrism::open()?;
//!     println!("Firmware: {}", prism.firmware_version()?);
//!
//!     // Set the logo to a static orange.
//!     prism.update_component(
//!         ComponentKind::Logo,
//!         ComponentUpdate {
//!             mode: Some(Mode::Basic(BasicMode::Static)),
//!             color: Some(Color::new(255, 85, 0)),
//!             ..Default::default()
//!         },
//!     )?;
//!
//!     // Persist it across power cycles.
//!     prism.save()?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod device;
pub mod error;
pub mod protocol;
pub mod utils;

// Re-exports for convenience
pub use device::{ComponentKind, ComponentUpdate, MirageState, WraithPrism};
pub use error::{PrismError, Result};
pub use protocol::{BasicMode, ChannelState, Color, Direction, Mode, RingMode};
