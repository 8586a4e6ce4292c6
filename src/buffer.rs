// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::{
    error::{Error, Result},
    image::{FourCC, Origin, RGBA},
};
use core::fmt;
use tracing::debug;

/// Bytes per destination pixel (RGBA).
pub const CHANNELS: usize = 4;

/// Background written by [`PixelBuffer::clear`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClearMode {
    /// RGB zero, alpha 255, for an opaque background.
    OpaqueBlack,
    /// All bytes zero, for a surface that is itself composited.
    TransparentBlack,
}

/// Destination raster: interleaved RGBA bytes, bottom-left origin.
///
/// The buffer is sized once by [`PixelBuffer::allocate`] and never resized.
/// After [`PixelBuffer::release`] every accessor fails with
/// [`Error::UseAfterRelease`].
pub struct PixelBuffer {
    data: Option<Vec<u8>>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Allocates a zeroed `width` x `height` RGBA buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Allocation`] for a zero dimension or when the memory
    /// cannot be reserved.
    pub fn allocate(width: u32, height: u32) -> Result<Self> {
        let alloc_error = |reason: &str| Error::Allocation {
            width,
            height,
            reason: reason.to_owned(),
        };
        if width == 0 || height == 0 {
            return Err(alloc_error("dimensions must be positive"));
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or_else(|| alloc_error("size overflows"))?;

        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|e| alloc_error(&e.to_string()))?;
        data.resize(len, 0);
        debug!("pixel buffer {}x{} alloc'd", width, height);

        Ok(Self {
            data: Some(data),
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> FourCC {
        RGBA
    }

    pub fn origin(&self) -> Origin {
        Origin::BottomLeft
    }

    /// Size of the raster in bytes.
    pub fn size(&self) -> usize {
        self.width as usize * self.height as usize * CHANNELS
    }

    pub fn is_released(&self) -> bool {
        self.data.is_none()
    }

    pub fn clear(&mut self, mode: ClearMode) -> Result<()> {
        let data = self.raw_view_mut()?;
        match mode {
            ClearMode::TransparentBlack => data.fill(0),
            ClearMode::OpaqueBlack => {
                for px in data.chunks_exact_mut(CHANNELS) {
                    px.copy_from_slice(&[0, 0, 0, 0xFF]);
                }
            }
        }
        Ok(())
    }

    /// The raster bytes, row 0 being the bottom of the image.
    ///
    /// Do not hold the view across a composite into the same buffer.
    pub fn raw_view(&self) -> Result<&[u8]> {
        self.data.as_deref().ok_or(Error::UseAfterRelease)
    }

    pub fn raw_view_mut(&mut self) -> Result<&mut [u8]> {
        self.data.as_deref_mut().ok_or(Error::UseAfterRelease)
    }

    /// RGBA value of the pixel in raster row `y`, column `x`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRegion`] if the pixel lies outside the
    /// buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Result<[u8; 4]> {
        let data = self.raw_view()?;
        if x >= self.width || y >= self.height {
            return Err(Error::InvalidRegion(format!(
                "pixel ({x}, {y}) outside {}x{} buffer",
                self.width, self.height
            )));
        }
        let offset = (x as usize + y as usize * self.width as usize) * CHANNELS;
        let mut px = [0u8; 4];
        px.copy_from_slice(&data[offset..offset + CHANNELS]);
        Ok(px)
    }

    /// Frees the raster. Releasing twice is a caller bug and fails.
    pub fn release(&mut self) -> Result<()> {
        self.data.take().ok_or(Error::UseAfterRelease)?;
        debug!("pixel buffer {}x{} released", self.width, self.height);
        Ok(())
    }
}

impl fmt::Display for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{} {}", self.width, self.height, self.format())?;
        if self.is_released() {
            write!(f, " (released)")?;
        }
        Ok(())
    }
}
