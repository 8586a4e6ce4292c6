// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! # Slit-scan Camera Library
//!
//! This library composites live camera frames into an RGBA display raster.
//! Its core is a sub-image compositor that copies rectangles between a
//! top-left origin BGR camera frame and a bottom-left origin RGBA display
//! buffer, reordering channels and translating between source and
//! destination rectangles.
//!
//! ## Features
//!
//! - **Region Compositing**: Whole-frame, in-place region and shifted
//!   region copies through a single validated primitive.
//! - **Slit-scan Sequencing**: Build an image one stripe per camera frame.
//! - **Pluggable Collaborators**: Cameras and display surfaces are traits;
//!   V4L2 capture (feature `v4l`), JPEG snapshot output and headless
//!   implementations are provided.
//!
//! ## Example
//!
//! ```
//! use slitscan_camera::{
//!     camera::PatternCamera,
//!     display::{DisplayContext, DisplayOptions, MemorySurface},
//!     sequencer::FrameSequencer,
//! };
//!
//! # fn main() -> Result<(), slitscan_camera::Error> {
//! let mut camera = PatternCamera::new(320, 240);
//! let mut display =
//!     DisplayContext::init(MemorySurface::new(), 320, 240, DisplayOptions::default())?;
//!
//! let report = FrameSequencer::new(4)?.run(&mut camera, &mut display)?;
//! assert_eq!(report.stripes, 80);
//!
//! display.finish()?;
//! # Ok(())
//! # }
//! ```

pub mod buffer;
pub mod camera;
pub mod compositor;
pub mod display;
pub mod error;
pub mod image;
pub mod jpeg;
pub mod sequencer;
#[cfg(feature = "v4l")]
pub mod v4l2;

pub use error::{Error, Result};
