// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Sub-image compositing from camera frames into the destination raster.
//!
//! Every rectangle and point is given in top-left origin coordinates. The
//! vertical flip between the top-left origin camera frame and the
//! bottom-left origin destination is applied once, when the source row is
//! addressed; destination rows are written as given.
//!
//! Source pixels are BGR (or BGRA, alpha ignored) and are written as RGBA
//! with alpha forced to 255.
//!
//! ```
//! use slitscan_camera::{
//!     buffer::PixelBuffer,
//!     compositor,
//!     image::{Point, Rect, SourceRaster},
//! };
//!
//! # fn main() -> Result<(), slitscan_camera::Error> {
//! // 2x1 BGR frame: a red pixel then a blue one
//! let bytes = [0, 0, 255, 255, 0, 0];
//! let frame = SourceRaster::new(2, 1, 3, &bytes)?;
//! let mut dest = PixelBuffer::allocate(4, 1)?;
//!
//! compositor::composite(&frame, Rect::new(0, 0, 2, 1), &mut dest, Point::new(2, 0))?;
//! assert_eq!(dest.pixel(2, 0)?, [255, 0, 0, 255]);
//! assert_eq!(dest.pixel(3, 0)?, [0, 0, 255, 255]);
//! # Ok(())
//! # }
//! ```

use crate::{
    buffer::{PixelBuffer, CHANNELS},
    error::Result,
    image::{Point, Rect, SourceRaster},
};

/// Copies `src_rect` of `source` into `dest` with its top-left corner at
/// `dst_origin`, converting BGR to RGBA.
///
/// Writes exactly `src_rect.width * src_rect.height` destination pixels
/// and leaves the rest of `dest` untouched.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidRegion`] if `src_rect` is not inside
/// `source` or the placed rectangle is not inside `dest`, and
/// [`crate::Error::UseAfterRelease`] if `dest` was released. Nothing is
/// written on error.
pub fn composite(
    source: &SourceRaster<'_>,
    src_rect: Rect,
    dest: &mut PixelBuffer,
    dst_origin: Point,
) -> Result<()> {
    src_rect.validate(source.width(), source.height())?;
    src_rect.at(dst_origin).validate(dest.width(), dest.height())?;

    let channels = source.channels();
    let src_width = source.width() as usize;
    let src_height = source.height() as usize;
    let dst_width = dest.width() as usize;
    let w = src_rect.width as usize;
    let input = source.data();
    let output = dest.raw_view_mut()?;

    let rows = (src_rect.y as usize..).zip(dst_origin.y as usize..);
    for (iy, oy) in rows.take(src_rect.height as usize) {
        // source origin is top-left, destination origin is bottom-left
        let inp = (src_rect.x as usize + (src_height - 1 - iy) * src_width) * channels;
        let outp = (dst_origin.x as usize + oy * dst_width) * CHANNELS;

        let src_row = &input[inp..inp + w * channels];
        let dst_row = &mut output[outp..outp + w * CHANNELS];
        for (s, d) in src_row
            .chunks_exact(channels)
            .zip(dst_row.chunks_exact_mut(CHANNELS))
        {
            d[0] = s[2];
            d[1] = s[1];
            d[2] = s[0];
            d[3] = 0xFF;
        }
    }

    Ok(())
}

/// Copies the whole of `source` to the bottom-left of `dest`.
pub fn display_whole(source: &SourceRaster<'_>, dest: &mut PixelBuffer) -> Result<()> {
    composite(source, source.full_rect(), dest, Point::default())
}

/// Refreshes `rect` of `dest` from the same rectangle of `source`.
pub fn display_region(
    source: &SourceRaster<'_>,
    rect: Rect,
    dest: &mut PixelBuffer,
) -> Result<()> {
    composite(source, rect, dest, rect.origin())
}

/// Copies `src_rect` of `source` to `dst_origin` in `dest`.
pub fn display_region_shifted(
    source: &SourceRaster<'_>,
    src_rect: Rect,
    dest: &mut PixelBuffer,
    dst_origin: Point,
) -> Result<()> {
    composite(source, src_rect, dest, dst_origin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{buffer::ClearMode, Error};

    /// BGR bytes whose values encode the pixel position.
    fn make_bgr(width: u32, height: u32) -> Vec<u8> {
        let mut data = Vec::new();
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[x as u8, y as u8, 200]);
            }
        }
        data
    }

    #[test]
    fn channels_are_reversed_with_opaque_alpha() -> Result<()> {
        let bytes = [10, 20, 30];
        let src = SourceRaster::new(1, 1, 3, &bytes)?;
        let mut dest = PixelBuffer::allocate(1, 1)?;
        display_whole(&src, &mut dest)?;
        assert_eq!(dest.pixel(0, 0)?, [30, 20, 10, 255]);
        Ok(())
    }

    #[test]
    fn source_alpha_is_ignored() -> Result<()> {
        let bytes = [10, 20, 30, 0, 40, 50, 60, 128];
        let src = SourceRaster::new(2, 1, 4, &bytes)?;
        let mut dest = PixelBuffer::allocate(2, 1)?;
        dest.clear(ClearMode::TransparentBlack)?;
        display_whole(&src, &mut dest)?;
        assert_eq!(dest.pixel(0, 0)?, [30, 20, 10, 255]);
        assert_eq!(dest.pixel(1, 0)?, [60, 50, 40, 255]);
        Ok(())
    }

    #[test]
    fn top_source_row_lands_on_last_destination_row() -> Result<()> {
        let bytes = make_bgr(3, 4);
        let src = SourceRaster::new(3, 4, 3, &bytes)?;
        let mut dest = PixelBuffer::allocate(3, 4)?;
        display_whole(&src, &mut dest)?;
        for y in 0..4 {
            for x in 0..3 {
                // red carries x, green carries the source row
                assert_eq!(dest.pixel(x, y)?, [200, (3 - y) as u8, x as u8, 255]);
            }
        }
        Ok(())
    }

    #[test]
    fn region_is_copied_in_place() -> Result<()> {
        let bytes = make_bgr(4, 4);
        let src = SourceRaster::new(4, 4, 3, &bytes)?;
        let mut dest = PixelBuffer::allocate(4, 4)?;
        dest.clear(ClearMode::TransparentBlack)?;

        display_region(&src, Rect::new(1, 1, 2, 2), &mut dest)?;

        for y in 0..4 {
            for x in 0..4 {
                let px = dest.pixel(x, y)?;
                if (1..3).contains(&x) && (1..3).contains(&y) {
                    assert_eq!(px, [200, (3 - y) as u8, x as u8, 255], "({x}, {y})");
                } else {
                    assert_eq!(px, [0; 4], "({x}, {y})");
                }
            }
        }
        Ok(())
    }

    #[test]
    fn shifted_region_reads_flipped_source_rows() -> Result<()> {
        let bytes = make_bgr(4, 3);
        let src = SourceRaster::new(4, 3, 3, &bytes)?;
        let mut dest = PixelBuffer::allocate(6, 5)?;
        dest.clear(ClearMode::OpaqueBlack)?;

        display_region_shifted(&src, Rect::new(2, 0, 2, 2), &mut dest, Point::new(3, 2))?;

        // destination row oy reads source row (height - 1 - iy)
        assert_eq!(dest.pixel(3, 2)?, [200, 2, 2, 255]);
        assert_eq!(dest.pixel(4, 2)?, [200, 2, 3, 255]);
        assert_eq!(dest.pixel(3, 3)?, [200, 1, 2, 255]);
        assert_eq!(dest.pixel(4, 3)?, [200, 1, 3, 255]);

        let written = dest
            .raw_view()?
            .chunks_exact(4)
            .filter(|px| *px != [0, 0, 0, 255])
            .count();
        assert_eq!(written, 4);
        Ok(())
    }

    #[test]
    fn out_of_bounds_rect_writes_nothing() -> Result<()> {
        let bytes = make_bgr(4, 2);
        let src = SourceRaster::new(4, 2, 3, &bytes)?;
        let mut dest = PixelBuffer::allocate(4, 2)?;
        dest.clear(ClearMode::TransparentBlack)?;

        let res = composite(&src, Rect::new(0, 0, 4, 2), &mut dest, Point::new(1, 0));
        assert!(matches!(res, Err(Error::InvalidRegion(_))));
        let res = composite(&src, Rect::new(0, 1, 4, 2), &mut dest, Point::new(0, 0));
        assert!(matches!(res, Err(Error::InvalidRegion(_))));

        assert!(dest.raw_view()?.iter().all(|&b| b == 0));
        Ok(())
    }

    #[test]
    fn composite_into_released_buffer_fails() -> Result<()> {
        let bytes = make_bgr(2, 2);
        let src = SourceRaster::new(2, 2, 3, &bytes)?;
        let mut dest = PixelBuffer::allocate(2, 2)?;
        dest.release()?;
        assert!(matches!(
            display_whole(&src, &mut dest),
            Err(Error::UseAfterRelease)
        ));
        Ok(())
    }
}
