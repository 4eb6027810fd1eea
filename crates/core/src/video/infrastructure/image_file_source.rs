use std::path::{Path, PathBuf};

use crate::shared::frame::Frame;
use crate::video::domain::frame_source::{CaptureError, FrameSource};

/// Serves a still image file as if it were a camera.
///
/// `open` decodes the file once; every read returns a copy of it with the
/// next capture index. Useful for driving the capture path without a
/// physical device.
pub struct ImageFileSource {
    path: PathBuf,
    frame: Option<Frame>,
    next_index: usize,
}

impl ImageFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            frame: None,
            next_index: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Decodes an image file into an RGB frame with index 0.
pub fn load_frame(path: &Path) -> Result<Frame, image::ImageError> {
    let rgb = image::open(path)?.to_rgb8();
    Ok(Frame::from_rgb_image(rgb, 0))
}

impl FrameSource for ImageFileSource {
    fn open(&mut self) -> Result<(), CaptureError> {
        let frame = load_frame(&self.path).map_err(|e| CaptureError::DeviceUnavailable {
            device: self.describe(),
            reason: e.to_string(),
        })?;
        log::info!(
            "Opened {} ({}x{})",
            self.describe(),
            frame.width(),
            frame.height()
        );
        self.frame = Some(frame);
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        let frame = self
            .frame
            .as_ref()
            .ok_or_else(|| CaptureError::ReadFailed("image source is not open".into()))?;
        let copy = frame.with_index(self.next_index);
        self.next_index += 1;
        Ok(copy)
    }

    fn close(&mut self) {
        self.frame = None;
    }

    fn is_open(&self) -> bool {
        self.frame.is_some()
    }

    fn describe(&self) -> String {
        format!("image file {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_test_image(dir: &Path, width: u32, height: u32) -> PathBuf {
        let path = dir.join("still.png");
        let mut img = image::RgbImage::new(width, height);
        for pixel in img.pixels_mut() {
            *pixel = image::Rgb([50, 100, 200]);
        }
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_open_and_read_returns_rgb_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), 40, 30);
        let mut source = ImageFileSource::new(&path);
        source.open().unwrap();

        let frame = source.read_frame().unwrap();
        assert_eq!(frame.width(), 40);
        assert_eq!(frame.height(), 30);
        assert_eq!(frame.channels(), 3);
        assert_eq!(frame.pixel(0, 0), Some([50, 100, 200]));
    }

    #[test]
    fn test_reads_advance_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), 4, 4);
        let mut source = ImageFileSource::new(&path);
        source.open().unwrap();

        let indices: Vec<usize> = (0..3).map(|_| source.read_frame().unwrap().index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_open_missing_file_is_device_unavailable() {
        let mut source = ImageFileSource::new("/nonexistent/still.png");
        let err = source.open().unwrap_err();
        assert!(matches!(err, CaptureError::DeviceUnavailable { .. }));
        assert!(!source.is_open());
    }

    #[test]
    fn test_read_without_open_is_read_failed() {
        let mut source = ImageFileSource::new("/nonexistent/still.png");
        assert!(matches!(
            source.read_frame(),
            Err(CaptureError::ReadFailed(_))
        ));
    }

    #[test]
    fn test_close_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), 4, 4);
        let mut source = ImageFileSource::new(&path);
        source.open().unwrap();
        source.close();
        source.close();
        assert!(!source.is_open());
    }

    #[test]
    fn test_reopen_after_close() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), 4, 4);
        let mut source = ImageFileSource::new(&path);
        source.open().unwrap();
        source.close();
        source.open().unwrap();
        assert!(source.read_frame().is_ok());
    }
}
