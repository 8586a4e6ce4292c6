// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::{
    buffer::CHANNELS,
    display::{Frame, Placement, Surface},
    error::{Error, Result},
};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};
use tracing::{debug, trace};
use turbojpeg::OwnedBuf;

/// Encodes a top-left origin RGBA image to JPEG using turbojpeg.
///
/// # Errors
///
/// Returns [`Error::Display`] if `pix` does not hold a `width` x `height`
/// RGBA image or compression fails.
///
/// # Example
///
/// ```no_run
/// use slitscan_camera::jpeg::encode_jpeg;
///
/// # fn main() -> Result<(), slitscan_camera::Error> {
/// let pix = vec![255u8; 64 * 48 * 4];
/// let jpeg = encode_jpeg(&pix, 64, 48, 90)?;
/// println!("Compressed to {} bytes", jpeg.len());
/// # Ok(())
/// # }
/// ```
pub fn encode_jpeg(pix: &[u8], width: u32, height: u32, quality: i32) -> Result<OwnedBuf> {
    let pitch = width as usize * CHANNELS;
    if pix.len() < pitch * height as usize {
        return Err(Error::Display(format!(
            "{} bytes is too small for a {}x{} RGBA image",
            pix.len(),
            width,
            height
        )));
    }
    let image = turbojpeg::Image {
        pixels: pix,
        width: width as usize,
        pitch,
        height: height as usize,
        format: turbojpeg::PixelFormat::RGBA,
    };
    turbojpeg::compress(image, quality, turbojpeg::Subsamp::Sub2x2)
        .map_err(|e| Error::Display(format!("jpeg compression failed: {e}")))
}

/// Background of surface pixels the raster does not cover.
const BACKGROUND: [u8; 4] = [0, 0, 0, 0xFF];

/// Draws `frame` onto a top-left origin RGBA `canvas` of `surface` size,
/// applying the frame's placement. Scaling picks the nearest raster pixel;
/// centering leaves the uncovered border opaque black.
fn render_placed(frame: &Frame<'_>, surface: (u32, u32), canvas: &mut Vec<u8>) -> Result<()> {
    let (sw, sh) = (surface.0 as usize, surface.1 as usize);
    let (rw, rh) = (frame.width as usize, frame.height as usize);
    let pitch = rw * CHANNELS;
    if sw == 0 || sh == 0 || rw == 0 || rh == 0 || frame.pixels.len() < pitch * rh {
        return Err(Error::Display(format!(
            "cannot place {}x{} raster of {} bytes on {}x{} surface",
            rw,
            rh,
            frame.pixels.len(),
            sw,
            sh
        )));
    }

    canvas.clear();
    canvas.resize(sw * sh * CHANNELS, 0);

    // canvas rows run top to bottom, the raster's run bottom to top
    for (top, row) in canvas.chunks_exact_mut(sw * CHANNELS).enumerate() {
        let bottom = sh - 1 - top;
        let src_row = match frame.placement {
            Placement::Scale { y, .. } => Some(((bottom as f64 / y) as usize).min(rh - 1)),
            Placement::Center { y, .. } => bottom.checked_sub(y as usize).filter(|&r| r < rh),
        };
        let Some(src_row) = src_row else {
            for px in row.chunks_exact_mut(CHANNELS) {
                px.copy_from_slice(&BACKGROUND);
            }
            continue;
        };

        let src = &frame.pixels[src_row * pitch..][..pitch];
        for (col, px) in row.chunks_exact_mut(CHANNELS).enumerate() {
            let src_col = match frame.placement {
                Placement::Scale { x, .. } => Some(((col as f64 / x) as usize).min(rw - 1)),
                Placement::Center { x, .. } => col.checked_sub(x as usize).filter(|&c| c < rw),
            };
            match src_col {
                Some(c) => px.copy_from_slice(&src[c * CHANNELS..][..CHANNELS]),
                None => px.copy_from_slice(&BACKGROUND),
            }
        }
    }
    Ok(())
}

/// Surface that presents by writing the raster to a JPEG snapshot.
///
/// Every present overwrites the file at `path`, so it always holds the most
/// recent state of the composite. The snapshot has the surface size, which
/// defaults to the raster's own size; with a different size set through
/// [`JpegSurface::with_surface_size`] the raster is scaled or centered on it
/// according to the display placement.
pub struct JpegSurface {
    path: PathBuf,
    quality: i32,
    surface_size: Option<(u32, u32)>,
    canvas: Vec<u8>,
    presents: u64,
}

impl JpegSurface {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            quality: 90,
            surface_size: None,
            canvas: Vec::new(),
            presents: 0,
        }
    }

    pub fn with_quality(mut self, quality: i32) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    /// Writes snapshots of `width` x `height` instead of the raster size.
    pub fn with_surface_size(mut self, width: u32, height: u32) -> Self {
        self.surface_size = Some((width, height));
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn presents(&self) -> u64 {
        self.presents
    }
}

impl Surface for JpegSurface {
    fn init(&mut self, width: u32, height: u32) -> Result<(u32, u32)> {
        let (sw, sh) = *self.surface_size.get_or_insert((width, height));
        if sw == 0 || sh == 0 {
            return Err(Error::Display(format!("empty {sw}x{sh} jpeg surface")));
        }
        self.canvas = vec![0; sw as usize * sh as usize * CHANNELS];
        debug!(
            "jpeg surface {}x{} for {}x{} raster -> {}",
            sw,
            sh,
            width,
            height,
            self.path.display()
        );
        Ok((sw, sh))
    }

    fn present(&mut self, frame: &Frame<'_>) -> Result<()> {
        let now = Instant::now();
        let (sw, sh) = self
            .surface_size
            .ok_or_else(|| Error::Display("jpeg surface is not initialised".to_owned()))?;
        render_placed(frame, (sw, sh), &mut self.canvas)?;

        let jpeg = encode_jpeg(&self.canvas, sw, sh, self.quality)?;
        fs::write(&self.path, &jpeg[..])?;
        self.presents += 1;

        trace!(
            "saved {} size: {}KB elapsed: {:?}",
            self.path.display(),
            jpeg.len() / 1024,
            now.elapsed()
        );
        Ok(())
    }

    fn teardown(&mut self) -> Result<()> {
        self.canvas = Vec::new();
        debug!("jpeg surface closed after {} presents", self.presents);
        Ok(())
    }
}
