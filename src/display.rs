// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::{
    buffer::{ClearMode, PixelBuffer},
    compositor,
    error::{Error, Result},
    image::{Point, Rect, SourceRaster},
};
use tracing::{debug, info, warn};

/// How a raster smaller or larger than the surface is mapped onto it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlacementMode {
    /// Stretch the raster to fill the surface
    Scale,
    /// Draw the raster unscaled in the middle of the surface
    Center,
}

/// Resolved mapping of the destination raster onto the surface.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Placement {
    /// Per-axis scale factors applied by the surface when drawing.
    Scale { x: f64, y: f64 },
    /// Offset of the raster's bottom-left corner on the surface.
    Center { x: u32, y: u32 },
}

impl Placement {
    /// Computes the placement of a `raster` sized image on a `surface`
    /// sized display. Centering offsets saturate at zero when the raster is
    /// the larger of the two.
    pub fn compute(mode: PlacementMode, surface: (u32, u32), raster: (u32, u32)) -> Self {
        match mode {
            PlacementMode::Scale => Placement::Scale {
                x: f64::from(surface.0) / f64::from(raster.0),
                y: f64::from(surface.1) / f64::from(raster.1),
            },
            PlacementMode::Center => Placement::Center {
                x: surface.0.saturating_sub(raster.0) / 2,
                y: surface.1.saturating_sub(raster.1) / 2,
            },
        }
    }
}

/// One presentation request: the destination raster and where it goes.
pub struct Frame<'a> {
    /// RGBA bytes, row 0 at the bottom of the image.
    pub pixels: &'a [u8],
    pub width: u32,
    pub height: u32,
    pub placement: Placement,
}

/// A display that can show the destination raster.
pub trait Surface {
    /// Prepares the surface for `width` x `height` rasters and returns the
    /// physical surface size.
    fn init(&mut self, width: u32, height: u32) -> Result<(u32, u32)>;

    /// Shows `frame`. The surface owns the final orientation of the image.
    fn present(&mut self, frame: &Frame<'_>) -> Result<()>;

    fn teardown(&mut self) -> Result<()>;
}

/// Options for [`DisplayContext::init`].
#[derive(Copy, Clone, Debug)]
pub struct DisplayOptions {
    pub clear: ClearMode,
    pub placement: PlacementMode,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            clear: ClearMode::OpaqueBlack,
            placement: PlacementMode::Scale,
        }
    }
}

/// Display state: the surface, its destination raster and the placement
/// between them.
///
/// Created by [`DisplayContext::init`] and torn down by
/// [`DisplayContext::finish`]. Composites and presents go through the
/// context, which serialises them on the one buffer it owns.
pub struct DisplayContext<S: Surface> {
    surface: S,
    buffer: PixelBuffer,
    surface_size: (u32, u32),
    placement: Placement,
    clear_mode: ClearMode,
    finished: bool,
}

impl<S: Surface> DisplayContext<S> {
    /// Initialises `surface` for a `width` x `height` image and clears the
    /// destination raster.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Allocation`] if the raster cannot be created, or the
    /// surface's error if it fails to initialise.
    pub fn init(mut surface: S, width: u32, height: u32, options: DisplayOptions) -> Result<Self> {
        let mut buffer = PixelBuffer::allocate(width, height)?;
        let surface_size = surface.init(width, height)?;
        let placement = Placement::compute(options.placement, surface_size, (width, height));
        buffer.clear(options.clear)?;

        info!(
            "image display initialised to ({}, {}) on {}x{} surface",
            width, height, surface_size.0, surface_size.1
        );
        debug!("placement {:?}", placement);

        Ok(Self {
            surface,
            buffer,
            surface_size,
            placement,
            clear_mode: options.clear,
            finished: false,
        })
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn surface_size(&self) -> (u32, u32) {
        self.surface_size
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Blanks the destination raster with the configured clear mode.
    pub fn clear(&mut self) -> Result<()> {
        self.buffer.clear(self.clear_mode)
    }

    pub fn composite(
        &mut self,
        source: &SourceRaster<'_>,
        src_rect: Rect,
        dst_origin: Point,
    ) -> Result<()> {
        compositor::composite(source, src_rect, &mut self.buffer, dst_origin)
    }

    pub fn display_whole(&mut self, source: &SourceRaster<'_>) -> Result<()> {
        compositor::display_whole(source, &mut self.buffer)
    }

    pub fn display_region(&mut self, source: &SourceRaster<'_>, rect: Rect) -> Result<()> {
        compositor::display_region(source, rect, &mut self.buffer)
    }

    pub fn display_region_shifted(
        &mut self,
        source: &SourceRaster<'_>,
        src_rect: Rect,
        dst_origin: Point,
    ) -> Result<()> {
        compositor::display_region_shifted(source, src_rect, &mut self.buffer, dst_origin)
    }

    /// Presents the whole destination raster.
    pub fn show(&mut self) -> Result<()> {
        let frame = Frame {
            pixels: self.buffer.raw_view()?,
            width: self.buffer.width(),
            height: self.buffer.height(),
            placement: self.placement,
        };
        self.surface.present(&frame)
    }

    /// Tears down the surface and releases the raster. The context can no
    /// longer be used afterwards.
    ///
    /// # Errors
    ///
    /// Returns the surface's teardown error. The raster is released and the
    /// context finished even then.
    pub fn finish(&mut self) -> Result<()> {
        if self.finished {
            return Err(Error::UseAfterRelease);
        }
        let teardown = self.surface.teardown();
        self.buffer.release()?;
        self.finished = true;
        teardown?;
        info!("finished with display");
        Ok(())
    }
}

impl<S: Surface> Drop for DisplayContext<S> {
    fn drop(&mut self) {
        if !self.finished {
            if let Err(e) = self.finish() {
                warn!("display teardown failed: {}", e);
            }
        }
    }
}

/// Headless surface that keeps the last presented raster in memory.
///
/// The raster is stored as presented, unplaced; the requested placement is
/// kept alongside it.
pub struct MemorySurface {
    size: Option<(u32, u32)>,
    last: Vec<u8>,
    last_placement: Option<Placement>,
    presents: u64,
    active: bool,
}

impl MemorySurface {
    /// A surface matching the raster size passed to `init`.
    pub fn new() -> Self {
        Self {
            size: None,
            last: Vec::new(),
            last_placement: None,
            presents: 0,
            active: false,
        }
    }

    /// A surface with a fixed physical size.
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            size: Some((width, height)),
            ..Self::new()
        }
    }

    /// Bytes of the most recent present.
    pub fn last_frame(&self) -> &[u8] {
        &self.last
    }

    /// Placement the most recent present asked for.
    pub fn last_placement(&self) -> Option<Placement> {
        self.last_placement
    }

    pub fn presents(&self) -> u64 {
        self.presents
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for MemorySurface {
    fn init(&mut self, width: u32, height: u32) -> Result<(u32, u32)> {
        self.active = true;
        Ok(*self.size.get_or_insert((width, height)))
    }

    fn present(&mut self, frame: &Frame<'_>) -> Result<()> {
        if !self.active {
            return Err(Error::Display("surface is not initialised".to_owned()));
        }
        self.last.clear();
        self.last.extend_from_slice(frame.pixels);
        self.last_placement = Some(frame.placement);
        self.presents += 1;
        Ok(())
    }

    fn teardown(&mut self) -> Result<()> {
        self.active = false;
        debug!("memory surface torn down after {} presents", self.presents);
        Ok(())
    }
}
