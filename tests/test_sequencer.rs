// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use slitscan_camera::{
    buffer::ClearMode,
    camera::PatternCamera,
    display::{DisplayContext, DisplayOptions, MemorySurface, PlacementMode},
    jpeg::JpegSurface,
    sequencer::FrameSequencer,
    Error,
};
use std::error::Error as StdError;

/// RGBA expected at destination (`x`, `oy`) when it was taken from source
/// column `sx` of pattern frame `sequence` with `height` rows.
fn expected(sx: u32, oy: u32, height: u32, sequence: u64) -> [u8; 4] {
    let [b, g, r] = PatternCamera::pattern(sx, height - 1 - oy, sequence);
    [r, g, b, 255]
}

fn opaque() -> DisplayOptions {
    DisplayOptions {
        clear: ClearMode::OpaqueBlack,
        placement: PlacementMode::Scale,
    }
}

#[test]
fn each_stripe_comes_from_its_own_frame() -> Result<(), Box<dyn StdError>> {
    let (width, height) = (8, 4);
    let mut camera = PatternCamera::new(width, height);
    let mut display = DisplayContext::init(MemorySurface::new(), width, height, opaque())?;

    let report = FrameSequencer::new(2)?.run(&mut camera, &mut display)?;
    assert_eq!(report.stripes, 4);
    assert_eq!(camera.sequence(), 4);
    assert_eq!(display.surface().presents(), 4);

    for oy in 0..height {
        for x in 0..width {
            let stripe = u64::from(x / 2);
            assert_eq!(
                display.buffer().pixel(x, oy)?,
                expected(x, oy, height, stripe),
                "({x}, {oy})"
            );
        }
    }
    assert_eq!(
        display.surface().last_frame(),
        display.buffer().raw_view()?
    );
    Ok(())
}

#[test]
fn fixed_source_column_is_shifted_into_place() -> Result<(), Box<dyn StdError>> {
    let (width, height) = (4, 3);
    let mut camera = PatternCamera::new(16, height);
    let mut display = DisplayContext::init(MemorySurface::new(), width, height, opaque())?;

    let sequencer = FrameSequencer::new(1)?.with_source_column(10);
    sequencer.run(&mut camera, &mut display)?;

    for oy in 0..height {
        for x in 0..width {
            assert_eq!(
                display.buffer().pixel(x, oy)?,
                expected(10, oy, height, u64::from(x)),
                "({x}, {oy})"
            );
        }
    }
    Ok(())
}

#[test]
fn uneven_width_narrows_last_stripe() -> Result<(), Box<dyn StdError>> {
    let mut camera = PatternCamera::new(10, 2);
    let mut display = DisplayContext::init(MemorySurface::new(), 10, 2, opaque())?;

    let report = FrameSequencer::new(4)?.run(&mut camera, &mut display)?;
    assert_eq!(report.stripes, 3);
    assert_eq!(display.buffer().pixel(9, 0)?, expected(9, 0, 2, 2));
    Ok(())
}

#[test]
fn frame_failure_stops_sequence() -> Result<(), Box<dyn StdError>> {
    let (width, height) = (6, 2);
    let mut camera = PatternCamera::new(width, height).with_frame_limit(3);
    let mut display = DisplayContext::init(MemorySurface::new(), width, height, opaque())?;

    let res = FrameSequencer::new(1)?.run(&mut camera, &mut display);
    assert!(matches!(res, Err(Error::FrameAcquisition(_))));
    assert_eq!(display.surface().presents(), 3);

    // stripes drawn before the failure are kept, the rest stay cleared
    for x in 0..width {
        let px = display.buffer().pixel(x, 0)?;
        if x < 3 {
            assert_eq!(px, expected(x, 0, height, u64::from(x)));
        } else {
            assert_eq!(px, [0, 0, 0, 255]);
        }
    }
    Ok(())
}

#[test]
fn camera_smaller_than_display_is_rejected() -> Result<(), Box<dyn StdError>> {
    let mut camera = PatternCamera::new(4, 2);
    let mut display = DisplayContext::init(MemorySurface::new(), 4, 3, opaque())?;

    let res = FrameSequencer::new(1)?.run(&mut camera, &mut display);
    assert!(matches!(res, Err(Error::InvalidRegion(_))));
    assert_eq!(display.surface().presents(), 0);
    Ok(())
}

#[test]
fn sequence_clears_previous_capture() -> Result<(), Box<dyn StdError>> {
    let options = DisplayOptions {
        clear: ClearMode::TransparentBlack,
        placement: PlacementMode::Center,
    };
    let mut display = DisplayContext::init(MemorySurface::new(), 4, 2, options)?;

    let mut camera = PatternCamera::new(4, 2);
    FrameSequencer::new(1)?.run(&mut camera, &mut display)?;

    // second run fails on its first frame, after clearing
    let mut dead = PatternCamera::new(4, 2).with_frame_limit(0);
    assert!(FrameSequencer::new(1)?
        .run(&mut dead, &mut display)
        .is_err());
    assert!(display.buffer().raw_view()?.iter().all(|&b| b == 0));

    display.finish()?;
    assert!(!display.surface().is_active());
    Ok(())
}

#[test]
fn jpeg_surface_writes_snapshot() -> Result<(), Box<dyn StdError>> {
    let path = std::env::temp_dir().join(format!("slitscan-{}.jpeg", std::process::id()));
    let mut camera = PatternCamera::new(32, 16);
    let mut display = DisplayContext::init(JpegSurface::new(&path), 32, 16, opaque())?;

    FrameSequencer::new(8)?.run(&mut camera, &mut display)?;
    assert_eq!(display.surface().presents(), 4);
    display.finish()?;

    let jpeg = std::fs::read(&path)?;
    std::fs::remove_file(&path)?;
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    Ok(())
}
