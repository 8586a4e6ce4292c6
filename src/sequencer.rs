// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Slit-scan capture: one camera frame per vertical stripe of the output.

use crate::{
    camera::Camera,
    display::{DisplayContext, Surface},
    error::{Error, Result},
    image::Rect,
};
use std::time::{Duration, Instant};
use tracing::{info, instrument, trace};

/// Timing of a completed slit-scan sequence.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SequenceReport {
    /// Number of stripes composited and presented
    pub stripes: u32,
    /// Wall time of the whole sequence
    pub elapsed: Duration,
    /// Longest wait for a single camera frame
    pub slowest_frame: Duration,
}

/// Builds an image from successive camera frames, one stripe per frame.
///
/// Stripe `i` covers destination columns `i * stripe_width ..` over the
/// full height. By default it is copied from the same columns of its frame;
/// with a source column set, every stripe is read from that fixed column
/// and shifted into place.
#[derive(Copy, Clone, Debug)]
pub struct FrameSequencer {
    stripe_width: u32,
    source_column: Option<u32>,
}

impl FrameSequencer {
    /// # Errors
    ///
    /// Returns [`Error::InvalidRegion`] for a zero stripe width.
    pub fn new(stripe_width: u32) -> Result<Self> {
        if stripe_width == 0 {
            return Err(Error::InvalidRegion("stripe width must be positive".to_owned()));
        }
        Ok(Self {
            stripe_width,
            source_column: None,
        })
    }

    /// Reads every stripe from source columns starting at `x`.
    pub fn with_source_column(mut self, x: u32) -> Self {
        self.source_column = Some(x);
        self
    }

    pub fn stripe_width(&self) -> u32 {
        self.stripe_width
    }

    pub fn source_column(&self) -> Option<u32> {
        self.source_column
    }

    /// Number of stripes needed to span `dest_width` columns.
    pub fn bands(&self, dest_width: u32) -> u32 {
        dest_width.div_ceil(self.stripe_width)
    }

    /// Destination rectangle of stripe `index`. The last stripe is narrowed
    /// when `dest_width` is not a multiple of the stripe width.
    pub fn stripe_rect(&self, index: u32, dest_width: u32, dest_height: u32) -> Rect {
        let x = index.saturating_mul(self.stripe_width);
        let width = self.stripe_width.min(dest_width.saturating_sub(x));
        Rect::new(x, 0, width, dest_height)
    }

    /// Clears the display, then composites and presents one stripe per
    /// camera frame across the full destination width.
    ///
    /// # Errors
    ///
    /// A failed frame ends the sequence with that error; stripes already
    /// drawn stay in the destination raster. Region and display errors are
    /// propagated the same way.
    #[instrument(skip_all, fields(stripe_width = self.stripe_width))]
    pub fn run<C, S>(
        &self,
        camera: &mut C,
        display: &mut DisplayContext<S>,
    ) -> Result<SequenceReport>
    where
        C: Camera + ?Sized,
        S: Surface,
    {
        let (width, height) = (display.width(), display.height());
        let bands = self.bands(width);
        let start = Instant::now();
        let mut report = SequenceReport::default();

        display.clear()?;

        for index in 0..bands {
            let rect = self.stripe_rect(index, width, height);

            let now = Instant::now();
            let frame = camera.next_frame()?;
            let capture_time = now.elapsed();
            report.slowest_frame = report.slowest_frame.max(capture_time);

            match self.source_column {
                Some(x) => {
                    let src_rect = Rect::new(x, 0, rect.width, rect.height);
                    display.display_region_shifted(&frame, src_rect, rect.origin())?;
                }
                None => display.display_region(&frame, rect)?,
            }
            display.show()?;
            report.stripes += 1;

            trace!("stripe {}/{} {} capture: {:?}", index + 1, bands, rect, capture_time);
        }

        report.elapsed = start.elapsed();
        info!(
            "captured {} stripes in {:?} (slowest frame {:?})",
            report.stripes, report.elapsed, report.slowest_frame
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_stripe_width_is_rejected() {
        assert!(matches!(
            FrameSequencer::new(0),
            Err(Error::InvalidRegion(_))
        ));
    }

    #[test]
    fn bands_cover_width() -> Result<()> {
        assert_eq!(FrameSequencer::new(1)?.bands(320), 320);
        assert_eq!(FrameSequencer::new(4)?.bands(320), 80);
        assert_eq!(FrameSequencer::new(3)?.bands(10), 4);
        Ok(())
    }

    #[test]
    fn stripe_rects_tile_destination() -> Result<()> {
        let seq = FrameSequencer::new(3)?;
        assert_eq!(seq.stripe_rect(0, 10, 5), Rect::new(0, 0, 3, 5));
        assert_eq!(seq.stripe_rect(2, 10, 5), Rect::new(6, 0, 3, 5));
        assert_eq!(seq.stripe_rect(3, 10, 5), Rect::new(9, 0, 1, 5));
        Ok(())
    }
}
