use image::GrayImage;

use crate::detection::domain::face_detector::{
    DetectionParams, DetectionPass, EyeDetector, FaceDetector,
};
use crate::shared::detection_box::DetectionBox;

/// Stands in for a detector whose model could not be loaded.
///
/// Always finds nothing, so dependent rules fall into their "not found"
/// branch instead of failing the analysis.
#[derive(Clone, Debug)]
pub struct UnavailableDetector {
    reason: String,
}

impl UnavailableDetector {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl FaceDetector for UnavailableDetector {
    fn detect_faces(
        &mut self,
        _image: &GrayImage,
        _pass: &DetectionPass,
    ) -> Result<Vec<DetectionBox>, Box<dyn std::error::Error>> {
        Ok(Vec::new())
    }

    fn is_available(&self) -> bool {
        false
    }
}

impl EyeDetector for UnavailableDetector {
    fn detect_eyes(
        &mut self,
        _face_region: &GrayImage,
        _params: &DetectionParams,
    ) -> Result<Vec<DetectionBox>, Box<dyn std::error::Error>> {
        Ok(Vec::new())
    }

    fn is_available(&self) -> bool {
        false
    }
}
