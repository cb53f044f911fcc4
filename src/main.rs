//! AMD Wraith Prism Control CLI
//!
//! Command-line interface for controlling the Wraith Prism's RGB lighting.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use wraith_rust_devices::device::{ComponentKind, ComponentUpdate, MirageState, WraithPrism};
use wraith_rust_devices::device::transport::HidTransport;
use wraith_rust_devices::protocol::{BasicMode, ColorSupport, Mode, RingMode};
use wraith_rust_devices::utils::parsing::{
    parse_brightness, parse_direction, parse_hex_color, parse_speed,
};

// =============================================================================
// CLI Arguments
// =============================================================================

/// AMD Wraith Prism Control Tool
#[derive(Parser, Debug)]
#[command(name = "wraith-prism-cli")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// HID path of the device to open, as printed by 'list'
    /// (default: the first Wraith Prism found)
    #[arg(long, global = true)]
    path: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the current lighting configuration
    Status,

    /// Configure the logo component
    Logo {
        #[command(flatten)]
        options: LedOptions,
    },

    /// Configure the fan component
    Fan {
        #[command(flatten)]
        options: LedOptions,
    },

    /// Configure the LED ring component
    Ring {
        #[command(flatten)]
        options: LedOptions,

        /// Rotation direction: clockwise or counterclockwise
        #[arg(long)]
        direction: Option<String>,
    },

    /// Push morse text (or literal ./- notation) to the ring
    Morse {
        /// Text to display; switch the ring to morse mode to see it
        text: String,
    },

    /// Control the fan's mirage frequency synthesizer
    Mirage {
        #[command(subcommand)]
        action: MirageAction,
    },

    /// Control the enso ambient override
    Enso {
        /// on or off
        state: String,
    },

    /// Persist the active configuration on the device
    Save,

    /// Reload the last saved configuration, discarding unsaved changes
    Reset,

    /// Restore the factory default configuration
    FactoryReset,

    /// Show the device firmware version
    Firmware,

    /// Turn the lighting controller off
    PowerOff,

    /// List connected Wraith Prism devices (paths are accepted by --path)
    List,
}

#[derive(clap::Args, Debug)]
struct LedOptions {
    /// Lighting mode (e.g. static, cycle, breathe; ring adds rainbow, swirl,
    /// chase, bounce, morse)
    #[arg(short, long)]
    mode: Option<String>,

    /// Color as RRGGBB or #RRGGBB
    #[arg(short, long)]
    color: Option<String>,

    /// Let the firmware randomize the color
    #[arg(long)]
    random_color: bool,

    /// Speed: slowest, slow, medium, fast, fastest or 0-4
    #[arg(short, long)]
    speed: Option<String>,

    /// Brightness: low, medium, high or 0-2
    #[arg(short, long)]
    brightness: Option<String>,
}

#[derive(Subcommand, Debug)]
enum MirageAction {
    /// Enable mirage with per-channel frequencies in Hz (45-2000)
    On {
        #[arg(value_parser = clap::value_parser!(u16).range(45..=2000))]
        red: u16,

        /// Green frequency; defaults to the red frequency
        #[arg(value_parser = clap::value_parser!(u16).range(45..=2000))]
        green: Option<u16>,

        /// Blue frequency; defaults to the red frequency
        #[arg(value_parser = clap::value_parser!(u16).range(45..=2000))]
        blue: Option<u16>,
    },
    /// Disable mirage
    Off,
}

// =============================================================================
// Main
// =============================================================================

fn main() -> Result<()> {
    let args = Args::parse();
    let path = args.path.as_deref();

    match args.command {
        Command::Status => cmd_status(path),
        Command::Logo { options } => cmd_component(path, ComponentKind::Logo, options, None),
        Command::Fan { options } => cmd_component(path, ComponentKind::Fan, options, None),
        Command::Ring { options, direction } => {
            cmd_component(path, ComponentKind::Ring, options, direction)
        }
        Command::Morse { text } => cmd_morse(path, &text),
        Command::Mirage { action } => cmd_mirage(path, action),
        Command::Enso { state } => cmd_enso(path, &state),
        Command::Save => cmd_save(path),
        Command::Reset => cmd_reset(path),
        Command::FactoryReset => cmd_factory_reset(path),
        Command::Firmware => cmd_firmware(path),
        Command::PowerOff => cmd_power_off(path),
        Command::List => cmd_list(),
    }
}

fn open(path: Option<&str>) -> Result<WraithPrism> {
    match path {
        Some(path) => {
            let path = std::ffi::CString::new(path)
                .context("Device path contains an interior nul byte")?;
            let transport =
                HidTransport::open_path(&path).context("Failed to open Wraith Prism")?;
            WraithPrism::connect(transport).context("Failed to initialize Wraith Prism")
        }
        None => WraithPrism::open().context("Failed to open Wraith Prism"),
    }
}

// =============================================================================
// Command Implementations
// =============================================================================

fn cmd_status(path: Option<&str>) -> Result<()> {
    let mut prism = open(path)?;

    println!("AMD Wraith Prism");
    println!("  Firmware: {}", prism.firmware_version()?);
    println!("  Enso:     {}", if prism.enso()? { "on" } else { "off" });

    for kind in [ComponentKind::Logo, ComponentKind::Fan, ComponentKind::Ring] {
        let component = prism.component(kind);
        let state = component.state();
        let caps = state.mode.caps();

        print!("  {:<5} mode {}", kind.to_string(), state.mode);
        if !caps.speeds.is_empty() {
            print!(", speed {}", state.speed);
        }
        if !caps.brightnesses.is_empty() {
            print!(", brightness {}", state.brightness);
        }
        if caps.color_support != ColorSupport::None {
            if state.color_randomized {
                print!(", random color");
            } else {
                print!(", color {}", state.color);
            }
        }
        if caps.supports_direction {
            print!(", {}", state.direction);
        }
        if component.is_dirty() {
            print!(" (unsaved)");
        }
        println!();
    }

    match prism.mirage() {
        MirageState::Off => println!("  Mirage:   off"),
        MirageState::On {
            red_hz,
            green_hz,
            blue_hz,
        } => println!("  Mirage:   on ({red_hz}/{green_hz}/{blue_hz} Hz)"),
    }

    Ok(())
}

fn cmd_component(
    path: Option<&str>,
    kind: ComponentKind,
    options: LedOptions,
    direction: Option<String>,
) -> Result<()> {
    let mode = options
        .mode
        .as_deref()
        .map(|name| -> Result<Mode> {
            Ok(match kind {
                ComponentKind::Ring => Mode::Ring(RingMode::from_name(name)?),
                _ => Mode::Basic(BasicMode::from_name(name)?),
            })
        })
        .transpose()?;

    let update = ComponentUpdate {
        mode,
        color: options.color.as_deref().map(parse_hex_color).transpose()?,
        color_randomized: options.random_color.then_some(true),
        speed: options.speed.as_deref().map(parse_speed).transpose()?,
        brightness: options
            .brightness
            .as_deref()
            .map(parse_brightness)
            .transpose()?,
        direction: direction.as_deref().map(parse_direction).transpose()?,
    };

    let mut prism = open(path)?;
    prism
        .update_component(kind, update)
        .with_context(|| format!("Failed to update the {kind} component"))?;

    println!("Updated {kind}. Run 'save' to persist across power cycles.");
    Ok(())
}

fn cmd_morse(path: Option<&str>, text: &str) -> Result<()> {
    let mut prism = open(path)?;
    prism
        .update_morse_text(text)
        .context("Failed to push morse text")?;
    println!("Morse text updated.");
    Ok(())
}

fn cmd_mirage(path: Option<&str>, action: MirageAction) -> Result<()> {
    let state = match action {
        MirageAction::On { red, green, blue } => MirageState::On {
            red_hz: red,
            green_hz: green.unwrap_or(red),
            blue_hz: blue.unwrap_or(red),
        },
        MirageAction::Off => MirageState::Off,
    };

    let mut prism = open(path)?;
    prism.push_mirage(state).context("Failed to set mirage")?;

    match state {
        MirageState::Off => println!("Mirage disabled."),
        MirageState::On { .. } => println!("Mirage enabled."),
    }
    Ok(())
}

fn cmd_enso(path: Option<&str>, state: &str) -> Result<()> {
    let enabled = match state.to_lowercase().as_str() {
        "on" => true,
        "off" => false,
        other => anyhow::bail!("Expected 'on' or 'off', got '{other}'"),
    };

    let mut prism = open(path)?;
    prism.set_enso(enabled).context("Failed to set enso")?;
    println!("Enso {}.", if enabled { "enabled and saved" } else { "disabled" });
    Ok(())
}

fn cmd_save(path: Option<&str>) -> Result<()> {
    let mut prism = open(path)?;
    prism.save().context("Failed to save")?;
    println!("Configuration saved to the device.");
    Ok(())
}

fn cmd_reset(path: Option<&str>) -> Result<()> {
    let mut prism = open(path)?;
    prism.reset().context("Failed to reset")?;
    println!("Reloaded the last saved configuration.");
    Ok(())
}

fn cmd_factory_reset(path: Option<&str>) -> Result<()> {
    let mut prism = open(path)?;
    prism
        .reset_to_default()
        .context("Failed to restore defaults")?;
    prism.save().context("Failed to save defaults")?;
    println!("Factory defaults restored and saved.");
    Ok(())
}

fn cmd_firmware(path: Option<&str>) -> Result<()> {
    let mut prism = open(path)?;
    println!("Firmware: {}", prism.firmware_version()?);
    Ok(())
}

fn cmd_power_off(path: Option<&str>) -> Result<()> {
    let mut prism = open(path)?;
    prism.power_off().context("Failed to power off")?;
    println!("Lighting controller powered off.");
    Ok(())
}

fn cmd_list() -> Result<()> {
    let devices = HidTransport::list_devices().context("Failed to enumerate devices")?;

    if devices.is_empty() {
        println!("No Wraith Prism devices found.");
        return Ok(());
    }

    for (path, serial) in devices {
        match serial {
            Some(serial) => println!("{path} (serial {serial})"),
            None => println!("{path}"),
        }
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
