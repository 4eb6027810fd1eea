use image::imageops::{self, FilterType};
use image::{GrayImage, RgbaImage};

use crate::shared::detection_box::DetectionBox;
use crate::shared::frame::Frame;

/// Single-channel intensity image of a frame.
pub fn to_gray(frame: &Frame) -> GrayImage {
    let (w, h) = (frame.width(), frame.height());
    match frame.channels() {
        1 => GrayImage::from_raw(w, h, frame.data().to_vec())
            .unwrap_or_else(|| GrayImage::new(w, h)),
        4 => RgbaImage::from_raw(w, h, frame.data().to_vec())
            .map(|rgba| imageops::grayscale(&rgba))
            .unwrap_or_else(|| GrayImage::new(w, h)),
        _ => imageops::grayscale(&frame.to_rgb_image()),
    }
}

/// Downscales `image` so its width is at most `max_width`.
///
/// Returns the working image and the applied scale (1.0 when no resize was
/// needed). Height is truncated the same way the width ratio dictates.
pub fn downscale_to_width(image: &GrayImage, max_width: u32) -> (GrayImage, f64) {
    let (w, h) = image.dimensions();
    if w <= max_width || max_width == 0 {
        return (image.clone(), 1.0);
    }
    let scale = max_width as f64 / w as f64;
    let new_h = ((h as f64 * scale) as u32).max(1);
    let resized = imageops::resize(image, max_width, new_h, FilterType::Triangle);
    (resized, scale)
}

/// Copies the part of `image` under `region`, clamped to the image.
///
/// Returns `None` when nothing of the box lies inside the image.
pub fn crop_region(image: &GrayImage, region: &DetectionBox) -> Option<GrayImage> {
    let clamped = region.clamp_to(image.width(), image.height());
    if clamped.is_empty() {
        return None;
    }
    Some(
        imageops::crop_imm(
            image,
            clamped.x as u32,
            clamped.y as u32,
            clamped.width as u32,
            clamped.height as u32,
        )
        .to_image(),
    )
}
