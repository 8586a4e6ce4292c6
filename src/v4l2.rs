// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::{
    camera::{Camera, Property},
    error::{Error, Result},
    image::{SourceRaster, BGR3},
};
use std::io;
use tracing::{debug, info, warn};
use v4l::{
    buffer::Type,
    control::{Control, Value},
    io::{mmap::Stream as MmapStream, traits::CaptureStream},
    video::Capture,
    Device, Format, FourCC,
};

const V4L2_CID_BRIGHTNESS: u32 = 0x0098_0900;
const V4L2_CID_CONTRAST: u32 = 0x0098_0901;
const V4L2_CID_SATURATION: u32 = 0x0098_0902;
const V4L2_CID_GAIN: u32 = 0x0098_0913;

const BUFFER_COUNT: u32 = 4;

fn control_id(property: Property) -> Option<u32> {
    match property {
        Property::Brightness => Some(V4L2_CID_BRIGHTNESS),
        Property::Contrast => Some(V4L2_CID_CONTRAST),
        Property::Saturation => Some(V4L2_CID_SATURATION),
        Property::Gain => Some(V4L2_CID_GAIN),
        Property::FrameWidth | Property::FrameHeight => None,
    }
}

/// Maps a normalised `0.0..=1.0` value onto a control's `min..=max` range.
fn native_value(property: Property, value: f64, min: i64, max: i64) -> Result<i64> {
    if !value.is_finite() {
        return Err(Error::Camera(format!("{property} value {value} is not finite")));
    }
    Ok(min + ((max - min) as f64 * value.clamp(0.0, 1.0)).round() as i64)
}

fn camera_error(context: &str, e: io::Error) -> Error {
    Error::Camera(format!("{context}: {e}"))
}

/// Video4Linux capture device delivering packed BGR3 frames.
///
/// Frame size may only be changed before the first frame is read; the
/// capture stream is started lazily by [`Camera::next_frame`]. Image
/// controls are mapped from `0.0..=1.0` onto each control's native range.
pub struct V4l2Camera {
    device: Device,
    stream: Option<MmapStream<'static>>,
    width: u32,
    height: u32,
}

impl V4l2Camera {
    /// Opens `/dev/video{index}`.
    pub fn open(index: usize) -> Result<Self> {
        let device = Device::new(index).map_err(|e| camera_error("open", e))?;
        Self::from_device(device, &format!("/dev/video{index}"))
    }

    /// Opens the capture device at `path`.
    pub fn open_path(path: &str) -> Result<Self> {
        let device = Device::with_path(path).map_err(|e| camera_error("open", e))?;
        Self::from_device(device, path)
    }

    fn from_device(device: Device, name: &str) -> Result<Self> {
        let fmt = device
            .format()
            .map_err(|e| camera_error("query format", e))?;
        info!("opened camera {} at {}x{} {}", name, fmt.width, fmt.height, fmt.fourcc);
        Ok(Self {
            device,
            stream: None,
            width: fmt.width,
            height: fmt.height,
        })
    }

    fn start(&mut self) -> Result<()> {
        let requested = Format::new(self.width, self.height, FourCC::new(&BGR3.0));
        let fmt = self
            .device
            .set_format(&requested)
            .map_err(|e| camera_error("set format", e))?;
        if fmt.fourcc != requested.fourcc {
            return Err(Error::Camera(format!(
                "device does not deliver {}, got {}",
                BGR3, fmt.fourcc
            )));
        }
        if fmt.stride != 0 && fmt.stride != fmt.width * 3 {
            return Err(Error::Camera(format!(
                "padded rows are not supported (stride {} for width {})",
                fmt.stride, fmt.width
            )));
        }
        if fmt.width != self.width || fmt.height != self.height {
            warn!(
                "requested {}x{} resolution but camera set {}x{}",
                self.width, self.height, fmt.width, fmt.height
            );
        }
        self.width = fmt.width;
        self.height = fmt.height;

        let stream = MmapStream::with_buffers(&self.device, Type::VideoCapture, BUFFER_COUNT)
            .map_err(|e| camera_error("start stream", e))?;
        self.stream = Some(stream);
        debug!("capture stream started with {} buffers", BUFFER_COUNT);
        Ok(())
    }

    fn control_range(&self, id: u32) -> Result<(i64, i64)> {
        let controls = self
            .device
            .query_controls()
            .map_err(|e| camera_error("query controls", e))?;
        controls
            .iter()
            .find(|c| c.id == id)
            .map(|c| (c.minimum, c.maximum))
            .ok_or_else(|| Error::Camera(format!("control {id:#x} not supported")))
    }
}

impl Camera for V4l2Camera {
    fn set_property(&mut self, property: Property, value: f64) -> Result<()> {
        let Some(id) = control_id(property) else {
            if self.stream.is_some() {
                return Err(Error::Camera(format!(
                    "{property} cannot change while capturing"
                )));
            }
            if !(1.0..=f64::from(u16::MAX)).contains(&value) {
                return Err(Error::Camera(format!("{property} {value} out of range")));
            }
            if property == Property::FrameWidth {
                self.width = value as u32;
            } else {
                self.height = value as u32;
            }
            return Ok(());
        };

        let (min, max) = self.control_range(id)?;
        let native = native_value(property, value, min, max)?;
        self.device
            .set_control(Control {
                id,
                value: Value::Integer(native),
            })
            .map_err(|e| camera_error("set control", e))?;
        debug!("{} set to {} ({} in {}..={})", property, value, native, min, max);
        Ok(())
    }

    fn property(&self, property: Property) -> Result<f64> {
        let Some(id) = control_id(property) else {
            return Ok(match property {
                Property::FrameWidth => f64::from(self.width),
                _ => f64::from(self.height),
            });
        };

        let (min, max) = self.control_range(id)?;
        let control = self
            .device
            .control(id)
            .map_err(|e| camera_error("get control", e))?;
        match control.value {
            Value::Integer(v) if max > min => Ok((v - min) as f64 / (max - min) as f64),
            Value::Integer(_) => Ok(0.0),
            other => Err(Error::Camera(format!(
                "{property} has non-integer value {other:?}"
            ))),
        }
    }

    fn next_frame(&mut self) -> Result<SourceRaster<'_>> {
        if self.stream.is_none() {
            self.start()?;
        }
        let (width, height) = (self.width, self.height);
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| Error::FrameAcquisition("capture stream not started".to_owned()))?;
        let (buf, meta) = stream
            .next()
            .map_err(|e| Error::FrameAcquisition(e.to_string()))?;
        let used = (meta.bytesused as usize).min(buf.len());
        SourceRaster::new(width, height, 3, &buf[..used])
            .map_err(|e| Error::FrameAcquisition(e.to_string()))
    }
}

impl Drop for V4l2Camera {
    fn drop(&mut self) {
        self.stream = None;
        debug!("camera closed");
    }
}
