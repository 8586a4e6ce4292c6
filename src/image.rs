// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::error::{Error, Result};
use core::fmt;

/// Four character pixel format code, as used by V4L2.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FourCC(pub [u8; 4]);

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &c in &self.0 {
            write!(f, "{}", c as char)?;
        }
        Ok(())
    }
}

/// BGR 24-bit pixel format (8 bits per channel, blue first)
pub const BGR3: FourCC = FourCC(*b"BGR3");

/// BGRA 32-bit pixel format (8 bits per channel, alpha last)
pub const BGRA: FourCC = FourCC(*b"BGRA");

/// RGBA 32-bit pixel format, the destination raster layout
pub const RGBA: FourCC = FourCC(*b"RGBA");

/// Which raster row holds the top of the visual image.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Origin {
    /// Row 0 is the top of the image (camera frames)
    TopLeft,
    /// Row 0 is the bottom of the image (display surfaces)
    BottomLeft,
}

/// A pixel position, expressed in top-left origin coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Rectangle used by composite operations.
///
/// Coordinates are always top-left origin, regardless of the origin
/// convention of the raster the rectangle addresses.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    /// X coordinate of top-left corner
    pub x: u32,
    /// Y coordinate of top-left corner
    pub y: u32,
    /// Width of the rectangle in pixels
    pub width: u32,
    /// Height of the rectangle in pixels
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The rectangle covering a whole `width` x `height` raster.
    pub const fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The rectangle of the same size placed at `origin`.
    pub const fn at(&self, origin: Point) -> Self {
        Self::new(origin.x, origin.y, self.width, self.height)
    }

    /// Checks that the rectangle is non-empty and lies fully within a
    /// `width` x `height` raster.
    pub fn validate(&self, width: u32, height: u32) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidRegion(format!("{self} is empty")));
        }
        let right = u64::from(self.x) + u64::from(self.width);
        let bottom = u64::from(self.y) + u64::from(self.height);
        if right > u64::from(width) || bottom > u64::from(height) {
            return Err(Error::InvalidRegion(format!(
                "{self} exceeds {width}x{height} raster"
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Borrowed view of a camera frame.
///
/// The bytes belong to the camera that produced the frame; the view is only
/// valid until the next call into that camera. Rows are stored top-left
/// origin, tightly packed, in BGR channel order with an optional trailing
/// alpha byte which is never read.
#[derive(Copy, Clone, Debug)]
pub struct SourceRaster<'a> {
    width: u32,
    height: u32,
    channels: usize,
    data: &'a [u8],
}

impl<'a> SourceRaster<'a> {
    /// Wraps `data` as a `width` x `height` raster with `channels` bytes per
    /// pixel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRaster`] if `channels` is not 3 or 4, a
    /// dimension is zero, the raster size overflows, or `data` is shorter
    /// than the raster.
    pub fn new(width: u32, height: u32, channels: usize, data: &'a [u8]) -> Result<Self> {
        if channels != 3 && channels != 4 {
            return Err(Error::InvalidRaster(format!(
                "unsupported channel count {channels}"
            )));
        }
        if width == 0 || height == 0 {
            return Err(Error::InvalidRaster(format!(
                "empty {width}x{height} raster"
            )));
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(channels))
            .ok_or_else(|| {
                Error::InvalidRaster(format!("{width}x{height}x{channels} raster overflows"))
            })?;
        if data.len() < len {
            return Err(Error::InvalidRaster(format!(
                "{width}x{height}x{channels} raster needs {len} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data: &data[..len],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn origin(&self) -> Origin {
        Origin::TopLeft
    }

    pub fn format(&self) -> FourCC {
        match self.channels {
            3 => BGR3,
            _ => BGRA,
        }
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn full_rect(&self) -> Rect {
        Rect::full(self.width, self.height)
    }
}

impl fmt::Display for SourceRaster<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{} {}", self.width, self.height, self.format())
    }
}
