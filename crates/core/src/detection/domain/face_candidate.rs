//! A detected face with its eyes and estimated nose/mouth points.
//!
//! Nose and mouth are not detected. They are fixed fractional offsets into
//! the face box and should be read as rough placeholders.

use crate::shared::constants::{MOUTH_OFFSET, NOSE_OFFSET};
use crate::shared::detection_box::DetectionBox;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FacePoint {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FaceCandidate {
    /// Face box in full-frame coordinates.
    pub face: DetectionBox,
    /// Eye boxes in full-frame coordinates, in detector order.
    pub eyes: Vec<DetectionBox>,
}

impl FaceCandidate {
    /// Builds a candidate from eye boxes local to the face sub-region.
    pub fn from_local_eyes(face: DetectionBox, local_eyes: &[DetectionBox]) -> Self {
        let eyes = local_eyes
            .iter()
            .map(|eye| eye.translate(face.x, face.y))
            .collect();
        Self { face, eyes }
    }

    pub fn eye_count(&self) -> usize {
        self.eyes.len()
    }

    /// Estimated nose position.
    pub fn nose(&self) -> FacePoint {
        self.offset_point(NOSE_OFFSET)
    }

    /// Estimated mouth position.
    pub fn mouth(&self) -> FacePoint {
        self.offset_point(MOUTH_OFFSET)
    }

    fn offset_point(&self, (fx, fy): (f64, f64)) -> FacePoint {
        FacePoint {
            x: self.face.x + (self.face.width as f64 * fx) as i32,
            y: self.face.y + (self.face.height as f64 * fy) as i32,
        }
    }
}
