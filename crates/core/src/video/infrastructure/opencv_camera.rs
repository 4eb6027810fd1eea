use opencv::core::Mat;
use opencv::prelude::*;
use opencv::{imgproc, videoio};

use crate::shared::frame::Frame;
use crate::video::domain::frame_source::{CaptureError, FrameSource};

/// Webcam access through OpenCV's `VideoCapture`.
///
/// Frames arrive in BGR order and are converted to RGB here so nothing
/// downstream has to care.
pub struct OpencvCamera {
    index: i32,
    capture: Option<videoio::VideoCapture>,
    frames_read: usize,
}

impl OpencvCamera {
    pub fn new(index: i32) -> Self {
        Self {
            index,
            capture: None,
            frames_read: 0,
        }
    }

    fn unavailable(&self, reason: impl Into<String>) -> CaptureError {
        CaptureError::DeviceUnavailable {
            device: self.describe(),
            reason: reason.into(),
        }
    }
}

fn mat_to_frame(bgr: &Mat, index: usize) -> Result<Frame, CaptureError> {
    let mut rgb = Mat::default();
    imgproc::cvt_color_def(bgr, &mut rgb, imgproc::COLOR_BGR2RGB)
        .map_err(|e| CaptureError::ReadFailed(e.to_string()))?;

    let width = rgb.cols() as u32;
    let height = rgb.rows() as u32;
    let data = if rgb.is_continuous() {
        rgb.data_bytes()
            .map_err(|e| CaptureError::ReadFailed(e.to_string()))?
            .to_vec()
    } else {
        let owned = rgb
            .try_clone()
            .map_err(|e| CaptureError::ReadFailed(e.to_string()))?;
        owned
            .data_bytes()
            .map_err(|e| CaptureError::ReadFailed(e.to_string()))?
            .to_vec()
    };

    if data.len() != (width as usize) * (height as usize) * 3 {
        return Err(CaptureError::ReadFailed(format!(
            "unexpected frame layout: {} bytes for {width}x{height}",
            data.len()
        )));
    }
    Ok(Frame::new(data, width, height, 3, index))
}

impl FrameSource for OpencvCamera {
    fn open(&mut self) -> Result<(), CaptureError> {
        if self.capture.is_some() {
            return Ok(());
        }
        let capture = videoio::VideoCapture::new(self.index, videoio::CAP_ANY)
            .map_err(|e| self.unavailable(e.to_string()))?;
        let opened = capture
            .is_opened()
            .map_err(|e| self.unavailable(e.to_string()))?;
        if !opened {
            return Err(self.unavailable("the device did not open; is a camera connected?"));
        }
        log::info!("Opened {}", self.describe());
        self.capture = Some(capture);
        self.frames_read = 0;
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        let capture = self
            .capture
            .as_mut()
            .ok_or_else(|| CaptureError::ReadFailed("camera is not open".into()))?;

        let mut bgr = Mat::default();
        let grabbed = capture
            .read(&mut bgr)
            .map_err(|e| CaptureError::ReadFailed(e.to_string()))?;
        if !grabbed || bgr.empty() {
            return Err(CaptureError::ReadFailed("device returned no frame".into()));
        }

        let frame = mat_to_frame(&bgr, self.frames_read)?;
        self.frames_read += 1;
        Ok(frame)
    }

    fn close(&mut self) {
        if let Some(mut capture) = self.capture.take() {
            if let Err(e) = capture.release() {
                log::warn!("Releasing {} failed: {e}", self.describe());
            } else {
                log::info!("Released {}", self.describe());
            }
        }
    }

    fn is_open(&self) -> bool {
        self.capture.is_some()
    }

    fn describe(&self) -> String {
        format!("camera #{}", self.index)
    }
}

impl Drop for OpencvCamera {
    fn drop(&mut self) {
        self.close();
    }
}
