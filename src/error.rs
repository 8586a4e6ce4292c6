// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use thiserror::Error;

/// Errors produced by the compositor, its buffers and its collaborators.
///
/// None of these are retried internally. `InvalidRegion` and
/// `UseAfterRelease` indicate a caller bug, the remaining variants are
/// terminal to the operation in progress.
#[derive(Error, Debug)]
pub enum Error {
    /// The destination raster could not be created.
    #[error("cannot allocate {width}x{height} pixel buffer: {reason}")]
    Allocation {
        width: u32,
        height: u32,
        reason: String,
    },

    /// A rectangle does not lie within its containing raster.
    #[error("invalid region: {0}")]
    InvalidRegion(String),

    /// A source raster has an unsupported channel count or too little data.
    #[error("invalid raster: {0}")]
    InvalidRaster(String),

    /// The camera did not produce a frame.
    #[error("frame acquisition failed: {0}")]
    FrameAcquisition(String),

    /// The pixel buffer was used after `release()`.
    #[error("pixel buffer accessed after release")]
    UseAfterRelease,

    /// The camera could not be opened or configured.
    #[error("camera error: {0}")]
    Camera(String),

    /// The display surface rejected an operation.
    #[error("display error: {0}")]
    Display(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
