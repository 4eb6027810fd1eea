use std::fmt;

use crate::detection::domain::face_candidate::FaceCandidate;
use crate::detection::domain::face_rules::{Remark, RuleThresholds};
use crate::shared::constants::NO_FACE_MESSAGE;
use crate::shared::detection_box::DetectionBox;

/// Remarks for one face, in rule order.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceVerdict {
    pub face: DetectionBox,
    pub eye_count: usize,
    pub remarks: Vec<Remark>,
}

impl FaceVerdict {
    pub fn evaluate(candidate: &FaceCandidate, thresholds: &RuleThresholds) -> Self {
        Self {
            face: candidate.face,
            eye_count: candidate.eye_count(),
            remarks: thresholds.evaluate(candidate),
        }
    }
}

/// Outcome of one analysis.
#[derive(Clone, Debug, PartialEq)]
pub enum AnalysisVerdict {
    NoFaceFound,
    Faces(Vec<FaceVerdict>),
}

impl AnalysisVerdict {
    /// Evaluates every candidate independently, keeping detection order.
    pub fn from_candidates(candidates: &[FaceCandidate], thresholds: &RuleThresholds) -> Self {
        if candidates.is_empty() {
            return AnalysisVerdict::NoFaceFound;
        }
        AnalysisVerdict::Faces(
            candidates
                .iter()
                .map(|c| FaceVerdict::evaluate(c, thresholds))
                .collect(),
        )
    }

    pub fn face_count(&self) -> usize {
        match self {
            AnalysisVerdict::NoFaceFound => 0,
            AnalysisVerdict::Faces(faces) => faces.len(),
        }
    }

    /// True if any face received `remark`.
    pub fn contains(&self, remark: Remark) -> bool {
        match self {
            AnalysisVerdict::NoFaceFound => false,
            AnalysisVerdict::Faces(faces) => faces.iter().any(|f| f.remarks.contains(&remark)),
        }
    }

    /// The multi-line verdict block shown to the user.
    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AnalysisVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisVerdict::NoFaceFound => f.write_str(NO_FACE_MESSAGE),
            AnalysisVerdict::Faces(faces) => {
                for (i, face) in faces.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "Face {} detected (eyes found: {})", i + 1, face.eye_count)?;
                    for remark in &face.remarks {
                        write!(f, "\n- {remark}")?;
                    }
                }
                Ok(())
            }
        }
    }
}
