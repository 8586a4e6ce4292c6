// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

#![cfg(feature = "v4l")]

use serial_test::serial;
use slitscan_camera::{
    camera::{Camera, Property},
    display::{DisplayContext, DisplayOptions},
    jpeg::JpegSurface,
    sequencer::FrameSequencer,
    v4l2::V4l2Camera,
};
use std::{error::Error, time::Instant};

#[test]
#[serial]
#[ignore = "camera test is disabled by default (run with --include-ignored to enable)"]
fn test_capture() -> Result<(), Box<dyn Error>> {
    let mut cam = V4l2Camera::open(0)?;
    cam.set_property(Property::FrameWidth, 320.0)?;
    cam.set_property(Property::FrameHeight, 240.0)?;

    let frame = cam.next_frame()?;
    println!("camera frame {}", frame);
    let (width, height) = (frame.width(), frame.height());

    let mut display = DisplayContext::init(
        JpegSurface::new("camera.jpeg"),
        width,
        height,
        DisplayOptions::default(),
    )?;
    display.display_whole(&frame)?;
    display.show()?;

    let now = Instant::now();
    let report = FrameSequencer::new(8)?.run(&mut cam, &mut display)?;
    println!(
        "saved camera.jpeg resolution: {}x{} stripes: {} elapsed: {:.2?}",
        width,
        height,
        report.stripes,
        now.elapsed()
    );
    display.finish()?;

    Ok(())
}

#[test]
#[serial]
#[ignore = "camera test is disabled by default (run with --include-ignored to enable)"]
fn test_properties() -> Result<(), Box<dyn Error>> {
    let mut cam = V4l2Camera::open(0)?;
    cam.set_property(Property::Brightness, 0.75)?;
    let value = cam.property(Property::Brightness)?;
    println!("brightness {value}");
    assert!((0.0..=1.0).contains(&value));
    Ok(())
}
