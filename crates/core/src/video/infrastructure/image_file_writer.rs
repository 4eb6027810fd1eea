use std::path::Path;

use crate::shared::frame::Frame;
use crate::video::domain::image_writer::ImageWriter;

/// Saves frames with the `image` crate, creating parent directories as needed.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn save(
        &self,
        path: &Path,
        frame: &Frame,
        max_width: Option<u32>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let img = frame.to_rgb_image();
        let img = match max_width {
            Some(max_w) if frame.width() > max_w && max_w > 0 => {
                let scale = max_w as f64 / frame.width() as f64;
                let h = ((frame.height() as f64 * scale) as u32).max(1);
                image::imageops::resize(&img, max_w, h, image::imageops::FilterType::Triangle)
            }
            _ => img,
        };

        img.save(path)?;
        log::debug!("Saved {}x{} image to {}", img.width(), img.height(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_frame(width: u32, height: u32, rgb: [u8; 3]) -> Frame {
        let data = rgb.repeat((width * height) as usize);
        Frame::new(data, width, height, 3, 0)
    }

    #[test]
    fn test_save_round_trips_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotated.png");
        let frame = make_frame(50, 40, [50, 100, 200]);
        ImageFileWriter::new().save(&path, &frame, None).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (50, 40));
        assert_eq!(img.get_pixel(0, 0).0, [50, 100, 200]);
    }

    #[test]
    fn test_save_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out").join("result.png");
        ImageFileWriter::new()
            .save(&path, &make_frame(8, 8, [0, 0, 0]), None)
            .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_max_width_keeps_aspect_ratio() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.png");
        let frame = make_frame(400, 300, [128, 128, 128]);
        ImageFileWriter::new()
            .save(&path, &frame, Some(200))
            .unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!(img.width(), 200);
        assert_eq!(img.height(), 150);
    }

    #[test]
    fn test_max_width_ignored_for_narrow_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("same.png");
        ImageFileWriter::new()
            .save(&path, &make_frame(100, 50, [1, 2, 3]), Some(640))
            .unwrap();
        assert_eq!(image::open(&path).unwrap().width(), 100);
    }

    #[test]
    fn test_unknown_extension_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.notanimage");
        assert!(ImageFileWriter::new()
            .save(&path, &make_frame(4, 4, [0, 0, 0]), None)
            .is_err());
    }
}
