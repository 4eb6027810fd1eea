//! Fixed threshold rules that turn face geometry into remarks.
//!
//! Four independent rules run in a fixed order (face width, eyes, nose,
//! mouth) and each contributes exactly one remark per face.

use crate::detection::domain::face_candidate::FaceCandidate;
use crate::shared::constants::{
    BROAD_FACE_MIN_WIDTH, HIGH_NOSE_RATIO, LARGE_EYE_MIN_WIDTH, MIN_EYES_FOR_SIZE, THIN_LIPS_RATIO,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Remark {
    BroadFace,
    NarrowFace,
    LargeEyes,
    SmallEyes,
    EyesUnclear,
    HighNose,
    BalancedNose,
    ThinLips,
    FullLips,
}

impl Remark {
    pub fn label(self) -> &'static str {
        match self {
            Remark::BroadFace => "Broad face",
            Remark::NarrowFace => "Narrow face",
            Remark::LargeEyes => "Large eyes",
            Remark::SmallEyes => "Small eyes",
            Remark::EyesUnclear => "Eyes unclear",
            Remark::HighNose => "High nose",
            Remark::BalancedNose => "Balanced nose",
            Remark::ThinLips => "Thin lips",
            Remark::FullLips => "Full lips",
        }
    }

    pub fn reading(self) -> &'static str {
        match self {
            Remark::BroadFace => "generous, with a knack for leadership.",
            Remark::NarrowFace => "delicate, with an artistic streak.",
            Remark::LargeEyes => "emotional and endlessly curious.",
            Remark::SmallEyes => "careful and perceptive.",
            Remark::EyesUnclear => "the eyes could not be made out clearly.",
            Remark::HighNose => "proud, and chases ideals.",
            Remark::BalancedNose => "practical, with a good sense of balance.",
            Remark::ThinLips => "cool-headed and rational.",
            Remark::FullLips => "warm-hearted and affectionate.",
        }
    }
}

impl std::fmt::Display for Remark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.label(), self.reading())
    }
}

/// Thresholds of the rule table.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleThresholds {
    /// Faces strictly wider than this read as broad.
    pub broad_face_min_width: i32,
    /// First eye strictly wider than this reads as large.
    pub large_eye_min_width: i32,
    /// Eye count needed before eye size is judged.
    pub min_eyes_for_size: usize,
    /// Nose offset from the face top, as a fraction of face height.
    pub high_nose_ratio: f64,
    /// Mouth distance from the face bottom, as a fraction of face height.
    pub thin_lips_ratio: f64,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            broad_face_min_width: BROAD_FACE_MIN_WIDTH,
            large_eye_min_width: LARGE_EYE_MIN_WIDTH,
            min_eyes_for_size: MIN_EYES_FOR_SIZE,
            high_nose_ratio: HIGH_NOSE_RATIO,
            thin_lips_ratio: THIN_LIPS_RATIO,
        }
    }
}

impl RuleThresholds {
    /// Applies the rule table to one face, returning remarks in rule order.
    pub fn evaluate(&self, candidate: &FaceCandidate) -> Vec<Remark> {
        vec![
            self.face_width_rule(candidate),
            self.eye_rule(candidate),
            self.nose_rule(candidate),
            self.mouth_rule(candidate),
        ]
    }

    fn face_width_rule(&self, candidate: &FaceCandidate) -> Remark {
        if candidate.face.width > self.broad_face_min_width {
            Remark::BroadFace
        } else {
            Remark::NarrowFace
        }
    }

    fn eye_rule(&self, candidate: &FaceCandidate) -> Remark {
        if candidate.eye_count() < self.min_eyes_for_size.max(1) {
            return Remark::EyesUnclear;
        }
        match candidate.eyes.first() {
            Some(eye) if eye.width > self.large_eye_min_width => Remark::LargeEyes,
            Some(_) => Remark::SmallEyes,
            None => Remark::EyesUnclear,
        }
    }

    fn nose_rule(&self, candidate: &FaceCandidate) -> Remark {
        let h = candidate.face.height as f64;
        let offset = (candidate.nose().y - candidate.face.y) as f64;
        if offset < h * self.high_nose_ratio {
            Remark::HighNose
        } else {
            Remark::BalancedNose
        }
    }

    fn mouth_rule(&self, candidate: &FaceCandidate) -> Remark {
        let h = candidate.face.height as f64;
        let from_bottom = (candidate.face.bottom() - candidate.mouth().y) as f64;
        if from_bottom < h * self.thin_lips_ratio {
            Remark::ThinLips
        } else {
            Remark::FullLips
        }
    }
}
