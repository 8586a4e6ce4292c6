// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::{
    error::{Error, Result},
    image::SourceRaster,
};
use core::fmt;
use std::collections::HashMap;
use tracing::debug;

/// Camera properties understood by [`Camera::set_property`].
///
/// Image controls are normalised to `0.0..=1.0`; frame dimensions are in
/// pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    FrameWidth,
    FrameHeight,
    Brightness,
    Contrast,
    Saturation,
    Gain,
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Property::FrameWidth => "Frame width",
            Property::FrameHeight => "Frame height",
            Property::Brightness => "Brightness",
            Property::Contrast => "Contrast",
            Property::Saturation => "Saturation",
            Property::Gain => "Gain",
        };
        f.write_str(name)
    }
}

/// A source of BGR frames.
///
/// A frame borrows from the camera, so it must be dropped before the next
/// frame is requested.
pub trait Camera {
    fn set_property(&mut self, property: Property, value: f64) -> Result<()>;

    fn property(&self, property: Property) -> Result<f64>;

    /// Blocks until the next frame is available.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FrameAcquisition`] when the device cannot produce a
    /// frame. Callers treat this as fatal for the device.
    fn next_frame(&mut self) -> Result<SourceRaster<'_>>;
}

/// Synthetic camera producing a drifting BGR test pattern.
///
/// Each frame is a colour ramp shifted one column further than the last,
/// so a slit-scan of it shows diagonal bands. Used when no capture device
/// is available and by the tests.
pub struct PatternCamera {
    width: u32,
    height: u32,
    frame: Vec<u8>,
    sequence: u64,
    frame_limit: Option<u64>,
    properties: HashMap<Property, f64>,
}

impl PatternCamera {
    pub fn new(width: u32, height: u32) -> Self {
        let properties = [
            (Property::Brightness, 0.5),
            (Property::Contrast, 0.5),
            (Property::Saturation, 0.5),
            (Property::Gain, 0.0),
        ]
        .into_iter()
        .collect();
        Self {
            width,
            height,
            frame: Vec::new(),
            sequence: 0,
            frame_limit: None,
            properties,
        }
    }

    /// Fails every request after `frames` frames have been delivered, like a
    /// device that has been unplugged.
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    /// Number of frames delivered so far.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// BGR value of pixel (`x`, `y`) in frame `sequence`.
    pub fn pattern(x: u32, y: u32, sequence: u64) -> [u8; 3] {
        let shifted = (u64::from(x) + sequence) as u8;
        [shifted, y as u8, shifted ^ y as u8]
    }

    fn render(&mut self) {
        let width = self.width as usize;
        let sequence = self.sequence;
        self.frame.resize(width * self.height as usize * 3, 0);

        for (i, px) in self.frame.chunks_exact_mut(3).enumerate() {
            let (x, y) = ((i % width) as u32, (i / width) as u32);
            px.copy_from_slice(&Self::pattern(x, y, sequence));
        }
    }
}

impl Camera for PatternCamera {
    fn set_property(&mut self, property: Property, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(Error::Camera(format!("{property} value {value} is not finite")));
        }
        match property {
            Property::FrameWidth | Property::FrameHeight => {
                if value < 1.0 || value > f64::from(u16::MAX) {
                    return Err(Error::Camera(format!("{property} {value} out of range")));
                }
                if property == Property::FrameWidth {
                    self.width = value as u32;
                } else {
                    self.height = value as u32;
                }
            }
            _ => {
                self.properties.insert(property, value.clamp(0.0, 1.0));
            }
        }
        debug!("pattern camera {} set to {}", property, value);
        Ok(())
    }

    fn property(&self, property: Property) -> Result<f64> {
        match property {
            Property::FrameWidth => Ok(f64::from(self.width)),
            Property::FrameHeight => Ok(f64::from(self.height)),
            _ => self
                .properties
                .get(&property)
                .copied()
                .ok_or_else(|| Error::Camera(format!("{property} not supported"))),
        }
    }

    fn next_frame(&mut self) -> Result<SourceRaster<'_>> {
        if self.frame_limit.is_some_and(|limit| self.sequence >= limit) {
            return Err(Error::FrameAcquisition(format!(
                "pattern camera stopped after {} frames",
                self.sequence
            )));
        }
        self.render();
        self.sequence += 1;
        SourceRaster::new(self.width, self.height, 3, &self.frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_frames_drift() -> Result<()> {
        let mut cam = PatternCamera::new(8, 4);
        let first = cam.next_frame()?.data()[..3].to_vec();
        let second = cam.next_frame()?.data()[..3].to_vec();
        assert_eq!(first, PatternCamera::pattern(0, 0, 0));
        assert_eq!(second, PatternCamera::pattern(0, 0, 1));
        assert_ne!(first, second);
        assert_eq!(cam.sequence(), 2);
        Ok(())
    }

    #[test]
    fn frame_limit_fails_acquisition() -> Result<()> {
        let mut cam = PatternCamera::new(2, 2).with_frame_limit(1);
        cam.next_frame()?;
        assert!(matches!(cam.next_frame(), Err(Error::FrameAcquisition(_))));
        Ok(())
    }

    #[test]
    fn properties_round_trip_and_resize() -> Result<()> {
        let mut cam = PatternCamera::new(2, 2);
        cam.set_property(Property::Brightness, 0.75)?;
        cam.set_property(Property::Gain, 4.0)?;
        cam.set_property(Property::FrameWidth, 5.0)?;
        assert_eq!(cam.property(Property::Brightness)?, 0.75);
        assert_eq!(cam.property(Property::Gain)?, 1.0);

        let frame = cam.next_frame()?;
        assert_eq!(frame.width(), 5);
        assert_eq!(frame.data().len(), 5 * 2 * 3);
        Ok(())
    }

    #[test]
    fn invalid_property_values_are_rejected() {
        let mut cam = PatternCamera::new(2, 2);
        assert!(cam.set_property(Property::Contrast, f64::NAN).is_err());
        assert!(cam.set_property(Property::FrameHeight, 0.0).is_err());
    }
}
