use anyhow::Result;
use clap::Parser;
use config::{Config, Environment, File};
use pyo3::prelude::*;
use serde::Deserialize;
use std::env;
use std::fmt;

use crate::error::LinkError;

/// Vacuum wavelength of the transmitter diodes [m]. Fixed for the 445 nm
/// blue-diode stack and shared by every beam geometry evaluation.
pub const WAVELENGTH: f32 = 445e-9;
/// Wall-plug efficiency of the laser driver electronics.
pub const DRIVER_EFF: f32 = 0.95;
/// Electro-optical conversion efficiency of a single laser module.
pub const LASER_EFF: f32 = 0.30;
/// Transmission of the beam-forming optics.
pub const OPTICAL_EFF: f32 = 0.97;
/// Transmission of the receiver optics, four surfaces at 1% loss each.
pub const RECEIVER_OPTICS_EFF: f32 = 0.99 * 0.99 * 0.99 * 0.99;
/// Photovoltaic conversion efficiency at the receiver.
pub const PV_EFF: f32 = 0.60;
/// Efficiency of the output power-conditioning electronics.
pub const CONDITIONING_EFF: f32 = 0.90;
/// Number of axial samples in the beam envelope sweep.
pub const ENVELOPE_SAMPLES: usize = 300;
/// Number of points on the receiver cross-section outline.
pub const RECEIVER_OUTLINE_SAMPLES: usize = 100;

/// Runtime configuration for a single link evaluation.
#[pyclass]
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    /// Propagation distance from transmitter to receiver plane [m].
    pub distance: f32,
    /// Beam waist w0 at the transmitter [m].
    pub beam_waist: f32,
    /// Receiver aperture radius [m].
    pub receiver_radius: f32,
    /// Transverse offset of the beam axis at the receiver plane [m].
    pub beam_offset: f32,
    /// Static pointing error [rad].
    pub pointing_error: f32,
    /// Number of combined laser modules.
    pub num_lasers: u32,
    /// Electrical input power [kW].
    pub input_power_kw: f32,
}

#[pymethods]
impl Settings {
    #[new]
    fn py_new(
        distance: f32,
        beam_waist: f32,
        receiver_radius: f32,
        beam_offset: f32,
        pointing_error: f32,
        num_lasers: u32,
        input_power_kw: f32,
    ) -> Self {
        Settings {
            distance,
            beam_waist,
            receiver_radius,
            beam_offset,
            pointing_error,
            num_lasers,
            input_power_kw,
        }
    }

    /// Set the transverse beam offset at the receiver plane
    #[setter]
    fn set_beam_offset(&mut self, offset: f32) {
        self.beam_offset = offset;
    }

    /// Get the transverse beam offset at the receiver plane
    #[getter]
    fn get_beam_offset(&self) -> f32 {
        self.beam_offset
    }

    /// Set the propagation distance
    #[setter]
    fn set_distance(&mut self, distance: f32) {
        self.distance = distance;
    }

    /// Get the propagation distance
    #[getter]
    fn get_distance(&self) -> f32 {
        self.distance
    }
}

impl Settings {
    /// Electrical input power in watts.
    pub fn input_power(&self) -> f32 {
        self.input_power_kw * 1000.0
    }

    /// Checks every parameter against its physical domain. Runs before the
    /// stage chain so that degenerate inputs fail with a named parameter.
    pub fn validate(&self) -> Result<(), LinkError> {
        if !self.distance.is_finite() || self.distance <= 0.0 {
            return Err(LinkError::InvalidParameter {
                name: "distance",
                value: self.distance,
                constraint: "finite and > 0",
            });
        }
        if !self.beam_waist.is_finite() || self.beam_waist <= 0.0 {
            return Err(LinkError::InvalidParameter {
                name: "beam_waist",
                value: self.beam_waist,
                constraint: "finite and > 0",
            });
        }
        if !self.receiver_radius.is_finite() || self.receiver_radius <= 0.0 {
            return Err(LinkError::InvalidParameter {
                name: "receiver_radius",
                value: self.receiver_radius,
                constraint: "finite and > 0",
            });
        }
        if !self.beam_offset.is_finite() || self.beam_offset < 0.0 {
            return Err(LinkError::InvalidParameter {
                name: "beam_offset",
                value: self.beam_offset,
                constraint: "finite and >= 0",
            });
        }
        if !self.pointing_error.is_finite() || self.pointing_error < 0.0 {
            return Err(LinkError::InvalidParameter {
                name: "pointing_error",
                value: self.pointing_error,
                constraint: "finite and >= 0",
            });
        }
        if self.num_lasers < 1 {
            return Err(LinkError::InvalidParameter {
                name: "num_lasers",
                value: self.num_lasers as f32,
                constraint: ">= 1",
            });
        }
        if !self.input_power_kw.is_finite() || self.input_power_kw <= 0.0 {
            return Err(LinkError::InvalidParameter {
                name: "input_power_kw",
                value: self.input_power_kw,
                constraint: "finite and > 0",
            });
        }
        Ok(())
    }
}

pub fn load_default_config() -> Result<Settings> {
    let link_dir = retrieve_project_root();
    let default_config_file = link_dir.join("config/default.toml");

    let settings: Config = Config::builder()
        .add_source(File::from(default_config_file).required(true))
        .build()
        .unwrap_or_else(|err| {
            eprintln!("Error loading configuration: {}", err);
            std::process::exit(1);
        });

    let config: Settings = settings.try_deserialize().unwrap_or_else(|err| {
        eprintln!("Error deserializing configuration: {}", err);
        std::process::exit(1);
    });

    validate_config(&config);

    Ok(config)
}

pub fn load_config() -> Result<Settings> {
    // Try to find the project directory in different ways
    let link_dir = retrieve_project_root();

    let default_config_file = link_dir.join("config/default.toml");
    let local_config = link_dir.join("config/local.toml");

    // Check if local config exists, if not use default
    let config_file = if local_config.exists() {
        println!("Using local configuration: {:?}", local_config);
        local_config
    } else {
        println!("Using default configuration: {:?}", default_config_file);
        default_config_file
    };

    let settings: Config = Config::builder()
        .add_source(File::from(config_file).required(true))
        .add_source(Environment::with_prefix("beamlink"))
        .build()
        .unwrap_or_else(|err| {
            eprintln!("Error loading configuration: {}", err);
            std::process::exit(1);
        });

    let mut config: Settings = settings.try_deserialize().unwrap_or_else(|err| {
        eprintln!("Error deserializing configuration: {}", err);
        std::process::exit(1);
    });

    // Parse command-line arguments and override values
    let args = CliArgs::parse();

    if let Some(distance) = args.distance {
        config.distance = distance;
    }
    if let Some(waist) = args.w0 {
        config.beam_waist = waist;
    }
    if let Some(radius) = args.receiver {
        config.receiver_radius = radius;
    }
    if let Some(offset) = args.offset {
        config.beam_offset = offset;
    }
    if let Some(pointing) = args.pointing {
        config.pointing_error = pointing;
    }
    if let Some(lasers) = args.lasers {
        config.num_lasers = lasers;
    }
    if let Some(power) = args.power {
        config.input_power_kw = power;
    }

    validate_config(&config);

    println!("{:#?}", config);

    Ok(config)
}

/// Retrieve the project root directory.
/// This function tries to find the project root directory in different ways:
/// 1. If the CARGO_MANIFEST_DIR environment variable is set, use it.
/// 2. If the BEAMLINK_ROOT_DIR environment variable is set, use it.
/// 3. If the "config" subdirectory is found in the executable directory or any of its parents, use it.
/// If none of these methods work, the function will panic.
fn retrieve_project_root() -> std::path::PathBuf {
    let link_dir = if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
        // When running through cargo (e.g. cargo run, cargo test)
        std::path::PathBuf::from(manifest_dir)
    } else if let Ok(path) = env::var("BEAMLINK_ROOT_DIR") {
        // Allow explicit configuration via environment variable
        std::path::PathBuf::from(path)
    } else {
        // Fallback: try to find the nearest directory containing a "config" subdirectory
        // Start from the executable directory and walk upward
        let exe_path = env::current_exe().expect("Failed to get current executable path");
        let mut current_dir = exe_path
            .parent()
            .expect("Failed to get executable directory")
            .to_path_buf();
        let mut found = false;

        while !found && current_dir.parent().is_some() {
            if current_dir.join("config").is_dir() {
                found = true;
            } else {
                current_dir = current_dir.parent().unwrap().to_path_buf();
            }
        }

        if found {
            current_dir
        } else {
            panic!("Could not find project root directory");
        }
    };
    link_dir
}

fn validate_config(config: &Settings) {
    if let Err(err) = config.validate() {
        eprintln!("Invalid configuration: {}", err);
        std::process::exit(1);
    }

    // Input surface ranges, tighter than the physical domains above.
    assert!(
        config.distance >= 1.0,
        "Propagation distance must be at least 1 m"
    );
    assert!(
        (0.001..=0.1).contains(&config.beam_waist),
        "Beam waist must be between 1 mm and 10 cm"
    );
    assert!(
        (0.01..=1.0).contains(&config.receiver_radius),
        "Receiver radius must be between 1 cm and 1 m"
    );
    assert!(
        config.beam_offset <= 10.0,
        "Beam offset must be at most 10 m"
    );
    assert!(
        config.pointing_error <= 1e-6,
        "Pointing error must be at most 1e-6 rad"
    );
    assert!(
        (1..=10).contains(&config.num_lasers),
        "Number of lasers must be between 1 and 10"
    );
    assert!(
        (0.1..=10.0).contains(&config.input_power_kw),
        "Input power must be between 0.1 and 10 kW"
    );
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "BEAMLINK - End-to-end laser power-beaming link budget"
)]
pub struct CliArgs {
    /// Propagation distance from transmitter to receiver, in metres.
    #[arg(short, long)]
    distance: Option<f32>,

    /// Beam waist at the transmitter, in metres.
    #[arg(long)]
    w0: Option<f32>,

    /// Receiver aperture radius, in metres.
    #[arg(short, long)]
    receiver: Option<f32>,

    /// Transverse beam offset at the receiver plane, in metres.
    #[arg(long)]
    offset: Option<f32>,

    /// Static pointing error, in radians.
    #[arg(long)]
    pointing: Option<f32>,

    /// Number of combined laser modules. The laser stage output scales
    /// linearly with this count.
    #[arg(short = 'n', long)]
    lasers: Option<u32>,

    /// Electrical input power, in kilowatts.
    #[arg(short, long)]
    power: Option<f32>,
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Settings:
  - Distance: {:.2} m
  - Beam Waist: {:.4} m
  - Receiver Radius: {:.3} m
  - Beam Offset: {:.3} m
  - Pointing Error: {:.2e} rad
  - Lasers: {}
  - Input Power: {:.2} kW
  ",
            self.distance,
            self.beam_waist,
            self.receiver_radius,
            self.beam_offset,
            self.pointing_error,
            self.num_lasers,
            self.input_power_kw,
        )
    }
}
