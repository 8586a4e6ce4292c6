// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

mod args;

use args::Args;
use clap::Parser;
use slitscan_camera::{
    camera::{Camera, PatternCamera, Property},
    display::{DisplayContext, DisplayOptions, MemorySurface, Surface},
    jpeg::JpegSurface,
    sequencer::FrameSequencer,
};
use std::{
    error::Error,
    io::{self, BufRead, Write},
};
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

const IMAGE_PROPERTIES: [Property; 4] = [
    Property::Brightness,
    Property::Contrast,
    Property::Saturation,
    Property::Gain,
];

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.verbose);
    info!("Slit-scan Camera");

    let mut camera = open_camera(&args)?;
    configure_camera(camera.as_mut(), &args)?;
    report_parameters(camera.as_ref());

    let options = DisplayOptions {
        clear: args.clear.into(),
        placement: args.placement.into(),
    };
    let (width, height) = (args.width(), args.height());

    if args.headless {
        let surface = match args.surface() {
            Some((w, h)) => MemorySurface::with_size(w, h),
            None => MemorySurface::new(),
        };
        let display = DisplayContext::init(surface, width, height, options)?;
        capture(camera.as_mut(), display, &args)
    } else {
        let mut surface = JpegSurface::new(&args.output).with_quality(args.jpeg_quality);
        if let Some((w, h)) = args.surface() {
            surface = surface.with_surface_size(w, h);
        }
        let display = DisplayContext::init(surface, width, height, options)?;
        capture(camera.as_mut(), display, &args)
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let stderr_log = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_filter(level);
    let journald = tracing_journald::layer()
        .ok()
        .map(|layer| layer.with_filter(LevelFilter::INFO));

    tracing_subscriber::registry()
        .with(stderr_log)
        .with(journald)
        .init();
}

fn open_camera(args: &Args) -> Result<Box<dyn Camera>, Box<dyn Error>> {
    if args.camera == "pattern" {
        return Ok(Box::new(PatternCamera::new(args.width(), args.height())));
    }
    open_device(&args.camera)
}

#[cfg(feature = "v4l")]
fn open_device(name: &str) -> Result<Box<dyn Camera>, Box<dyn Error>> {
    use slitscan_camera::v4l2::V4l2Camera;

    let camera = match name.parse::<usize>() {
        Ok(index) => V4l2Camera::open(index)?,
        Err(_) => V4l2Camera::open_path(name)?,
    };
    Ok(Box::new(camera))
}

#[cfg(not(feature = "v4l"))]
fn open_device(name: &str) -> Result<Box<dyn Camera>, Box<dyn Error>> {
    Err(Box::from(format!(
        "cannot open camera {name}: built without V4L2 support, use --camera pattern"
    )))
}

fn configure_camera(camera: &mut dyn Camera, args: &Args) -> Result<(), Box<dyn Error>> {
    camera.set_property(Property::FrameWidth, f64::from(args.width()))?;
    camera.set_property(Property::FrameHeight, f64::from(args.height()))?;

    let values = [args.brightness, args.contrast, args.saturation, args.gain];
    for (property, value) in IMAGE_PROPERTIES.into_iter().zip(values) {
        // not every driver exposes every control
        if let Err(e) = camera.set_property(property, value) {
            warn!("cannot set {} to {}: {}", property, value, e);
        }
    }
    Ok(())
}

fn report_parameters(camera: &dyn Camera) {
    for property in IMAGE_PROPERTIES {
        match camera.property(property) {
            Ok(value) => info!("{}: {:.6}", property, value),
            Err(e) => warn!("{}: unavailable ({})", property, e),
        }
    }
}

/// Runs a slit-scan sequence each time RETURN is pressed, or once with
/// `--once`, until stdin is closed.
fn capture<S: Surface>(
    camera: &mut dyn Camera,
    mut display: DisplayContext<S>,
    args: &Args,
) -> Result<(), Box<dyn Error>> {
    let mut sequencer = FrameSequencer::new(args.stripe_width)?;
    if let Some(x) = args.source_column {
        sequencer = sequencer.with_source_column(x);
    }

    let stdin = io::stdin();
    loop {
        if !args.once {
            print!("Press RETURN to start capturing...");
            io::stdout().flush()?;
            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }
        }

        sequencer.run(camera, &mut display)?;

        if args.once {
            break;
        }
    }

    display.finish()?;
    Ok(())
}
