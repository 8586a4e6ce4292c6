// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use clap::Parser;
use slitscan_camera::{buffer::ClearMode, display::PlacementMode};
use std::path::PathBuf;

/// Background the output image is cleared to before each capture.
#[derive(clap::ValueEnum, Clone, Debug, PartialEq, Copy)]
pub enum ClearSetting {
    /// Black with full alpha
    Opaque,
    /// All channels zero
    Transparent,
}

impl From<ClearSetting> for ClearMode {
    fn from(value: ClearSetting) -> Self {
        match value {
            ClearSetting::Opaque => ClearMode::OpaqueBlack,
            ClearSetting::Transparent => ClearMode::TransparentBlack,
        }
    }
}

/// How the output image is fitted to a larger display surface.
#[derive(clap::ValueEnum, Clone, Debug, PartialEq, Copy)]
pub enum PlacementSetting {
    /// Stretch the image to fill the surface
    Scale,
    /// Keep the image size and center it
    Center,
}

impl From<PlacementSetting> for PlacementMode {
    fn from(value: PlacementSetting) -> Self {
        match value {
            PlacementSetting::Scale => PlacementMode::Scale,
            PlacementSetting::Center => PlacementMode::Center,
        }
    }
}

/// Command-line arguments for the slit-scan camera.
///
/// Arguments can be specified via command line or environment variables.
///
/// # Example
///
/// ```bash
/// # Capture from /dev/video0 in 2 pixel stripes
/// slitscan-camera --camera 0 --stripe-width 2
///
/// # Synthetic camera, single run, no JPEG output
/// slitscan-camera --camera pattern --once --headless
/// ```
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Camera device index or path (e.g. 0, /dev/video0), or "pattern" for
    /// the synthetic test camera
    #[arg(short, long, env = "CAMERA", default_value = "0")]
    pub camera: String,

    /// Output image resolution in pixels (width height)
    #[arg(
        long,
        env = "IMAGE_SIZE",
        default_value = "320 240",
        value_delimiter = ' ',
        num_args = 2
    )]
    pub size: Vec<u32>,

    /// Width in pixels of the stripe taken from each frame
    #[arg(long, env = "STRIPE_WIDTH", default_value = "1")]
    pub stripe_width: u32,

    /// Take every stripe from this camera column instead of the column it
    /// is drawn at
    #[arg(long, env = "SOURCE_COLUMN")]
    pub source_column: Option<u32>,

    /// Camera brightness (0.0 - 1.0)
    #[arg(long, env = "BRIGHTNESS", default_value = "0.75")]
    pub brightness: f64,

    /// Camera contrast (0.0 - 1.0)
    #[arg(long, env = "CONTRAST", default_value = "0.18")]
    pub contrast: f64,

    /// Camera saturation (0.0 - 1.0)
    #[arg(long, env = "SATURATION", default_value = "0.2")]
    pub saturation: f64,

    /// Camera gain (0.0 - 1.0)
    #[arg(long, env = "GAIN", default_value = "0.05")]
    pub gain: f64,

    /// Background of the output image before each capture
    #[arg(long, env = "CLEAR", default_value = "opaque", value_enum)]
    pub clear: ClearSetting,

    /// Fitting of the output image to the display surface. Only visible
    /// when --surface-size differs from --size
    #[arg(long, env = "PLACEMENT", default_value = "scale", value_enum)]
    pub placement: PlacementSetting,

    /// Display surface size in pixels (width height), defaults to --size
    #[arg(long, env = "SURFACE_SIZE", value_delimiter = ' ', num_args = 2)]
    pub surface_size: Option<Vec<u32>>,

    /// JPEG snapshot rewritten after every stripe
    #[arg(short, long, env = "OUTPUT", default_value = "slitscan.jpeg")]
    pub output: PathBuf,

    /// JPEG snapshot quality (1 - 100)
    #[arg(long, env = "JPEG_QUALITY", default_value = "90")]
    pub jpeg_quality: i32,

    /// Keep the output in memory instead of writing JPEG snapshots
    #[arg(long, env = "HEADLESS")]
    pub headless: bool,

    /// Capture once and exit instead of waiting for RETURN
    #[arg(long)]
    pub once: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn width(&self) -> u32 {
        self.size[0]
    }

    pub fn height(&self) -> u32 {
        self.size[1]
    }

    pub fn surface(&self) -> Option<(u32, u32)> {
        self.surface_size.as_deref().map(|s| (s[0], s[1]))
    }
}
