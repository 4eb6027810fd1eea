use std::time::Duration;

pub const FACE_CASCADE_NAME: &str = "haarcascade_frontalface_default.xml";
pub const FACE_ALT_CASCADE_NAME: &str = "haarcascade_frontalface_alt2.xml";
pub const EYE_CASCADE_NAME: &str = "haarcascade_eye.xml";

/// Share directories where OpenCV packages install their Haar cascades.
pub const SYSTEM_CASCADE_DIRS: &[&str] = &[
    "/usr/share/opencv4/haarcascades",
    "/usr/share/opencv/haarcascades",
    "/usr/local/share/opencv4/haarcascades",
    "/usr/local/share/opencv/haarcascades",
    "/opt/homebrew/share/opencv4/haarcascades",
];

pub const DEFAULT_CAMERA_INDEX: i32 = 0;

/// Delay after a successful capture tick.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(10);
/// Delay after a failed read before the next attempt.
pub const READ_RETRY_INTERVAL: Duration = Duration::from_millis(50);
/// Consecutive read failures between repeated warnings.
pub const READ_FAILURE_LOG_EVERY: usize = 100;

pub const CLAHE_CLIP_LIMIT: f64 = 2.0;
pub const CLAHE_TILE_GRID: u32 = 8;

/// Frames wider than this are downscaled before face detection.
pub const MAX_WORKING_WIDTH: u32 = 800;
pub const MIN_FACE_SIZE_FLOOR: u32 = 24;
pub const MIN_FACE_SIZE_RATIO: f64 = 0.05;
pub const EYE_MIN_SIZE: u32 = 15;

pub const BROAD_FACE_MIN_WIDTH: i32 = 300;
pub const LARGE_EYE_MIN_WIDTH: i32 = 40;
pub const MIN_EYES_FOR_SIZE: usize = 2;
pub const HIGH_NOSE_RATIO: f64 = 0.4;
pub const THIN_LIPS_RATIO: f64 = 0.15;

pub const NOSE_OFFSET: (f64, f64) = (0.5, 0.6);
pub const MOUTH_OFFSET: (f64, f64) = (0.5, 0.8);

pub const NO_FACE_MESSAGE: &str = "No face found. Please try again.";
pub const DISCLAIMER: &str = "For entertainment only. This reading has no scientific basis.";

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
