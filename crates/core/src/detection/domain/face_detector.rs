use image::GrayImage;

use crate::shared::constants::{EYE_MIN_SIZE, MIN_FACE_SIZE_FLOOR, MIN_FACE_SIZE_RATIO};
use crate::shared::detection_box::DetectionBox;

/// Which trained face model a detection pass uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaceModel {
    /// Default frontal-face cascade.
    Primary,
    /// Alternate frontal-face cascade, tried when the primary finds nothing.
    Alternate,
}

/// Multi-scale search parameters handed to the detector service.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectionParams {
    pub scale_factor: f64,
    pub min_neighbors: i32,
    /// Smallest square window, in pixels, that is searched.
    pub min_size: u32,
}

/// One attempt at face detection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectionPass {
    pub model: FaceModel,
    pub params: DetectionParams,
}

/// Minimum face window for an image of the given working width.
pub fn min_face_size(working_width: u32) -> u32 {
    MIN_FACE_SIZE_FLOOR.max((working_width as f64 * MIN_FACE_SIZE_RATIO) as u32)
}

/// Ordered fallback passes: primary, alternate, then primary with looser
/// parameters. Detection stops at the first pass that finds a face.
pub fn face_detection_passes(working_width: u32) -> [DetectionPass; 3] {
    let min_size = min_face_size(working_width);
    let conservative = DetectionParams {
        scale_factor: 1.1,
        min_neighbors: 5,
        min_size,
    };
    [
        DetectionPass {
            model: FaceModel::Primary,
            params: conservative,
        },
        DetectionPass {
            model: FaceModel::Alternate,
            params: conservative,
        },
        DetectionPass {
            model: FaceModel::Primary,
            params: DetectionParams {
                scale_factor: 1.05,
                min_neighbors: 4,
                min_size: min_size / 2,
            },
        },
    ]
}

pub const EYE_DETECTION_PARAMS: DetectionParams = DetectionParams {
    scale_factor: 1.1,
    min_neighbors: 4,
    min_size: EYE_MIN_SIZE,
};

/// Face-finding capability of the detector service.
///
/// Boxes are in the coordinate space of `image`.
pub trait FaceDetector: Send {
    fn detect_faces(
        &mut self,
        image: &GrayImage,
        pass: &DetectionPass,
    ) -> Result<Vec<DetectionBox>, Box<dyn std::error::Error>>;

    /// False when the underlying model failed to load; detection then
    /// always returns no boxes.
    fn is_available(&self) -> bool {
        true
    }
}

/// Eye-finding capability of the detector service.
///
/// `face_region` is the grayscale crop of one face; boxes are local to it.
pub trait EyeDetector: Send {
    fn detect_eyes(
        &mut self,
        face_region: &GrayImage,
        params: &DetectionParams,
    ) -> Result<Vec<DetectionBox>, Box<dyn std::error::Error>>;

    fn is_available(&self) -> bool {
        true
    }
}
