//! Deterministic detectors that replay fixed answers.
//!
//! Used by tests and by callers that want to exercise the analysis
//! pipeline without a cascade backend.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use image::GrayImage;

use crate::detection::domain::face_detector::{
    DetectionParams, DetectionPass, EyeDetector, FaceDetector, FaceModel,
};
use crate::shared::detection_box::DetectionBox;

/// One recorded call to a scripted detector.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorCall {
    pub model: Option<FaceModel>,
    pub params: DetectionParams,
    pub image_size: (u32, u32),
}

/// Shared, cloneable view of the calls a scripted detector received.
#[derive(Clone, Debug, Default)]
pub struct CallLog(Arc<Mutex<Vec<DetectorCall>>>);

impl CallLog {
    fn push(&self, call: DetectorCall) {
        if let Ok(mut calls) = self.0.lock() {
            calls.push(call);
        }
    }

    pub fn calls(&self) -> Vec<DetectorCall> {
        self.0.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.0.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Returns a fixed set of boxes per pass, in pass order.
///
/// Pass `i` of each analysis gets `passes[i]`; missing entries find nothing.
/// The pass counter restarts whenever a `Primary` pass with the
/// conservative parameters is seen, so repeated analyses replay the script.
pub struct ScriptedFaceDetector {
    passes: Vec<Vec<DetectionBox>>,
    next_pass: usize,
    log: CallLog,
}

impl ScriptedFaceDetector {
    pub fn new(passes: Vec<Vec<DetectionBox>>) -> Self {
        Self {
            passes,
            next_pass: 0,
            log: CallLog::default(),
        }
    }

    /// Finds `boxes` on the first pass.
    pub fn always(boxes: Vec<DetectionBox>) -> Self {
        Self::new(vec![boxes])
    }

    pub fn none() -> Self {
        Self::new(Vec::new())
    }

    pub fn call_log(&self) -> CallLog {
        self.log.clone()
    }
}

impl FaceDetector for ScriptedFaceDetector {
    fn detect_faces(
        &mut self,
        image: &GrayImage,
        pass: &DetectionPass,
    ) -> Result<Vec<DetectionBox>, Box<dyn std::error::Error>> {
        if pass.model == FaceModel::Primary && pass.params.min_neighbors >= 5 {
            self.next_pass = 0;
        }
        self.log.push(DetectorCall {
            model: Some(pass.model),
            params: pass.params,
            image_size: image.dimensions(),
        });
        let boxes = self.passes.get(self.next_pass).cloned().unwrap_or_default();
        self.next_pass += 1;
        Ok(boxes)
    }
}

/// Returns queued eye boxes, one entry per face region, then repeats the
/// last entry.
pub struct ScriptedEyeDetector {
    queue: VecDeque<Vec<DetectionBox>>,
    last: Vec<DetectionBox>,
    log: CallLog,
}

impl ScriptedEyeDetector {
    pub fn new(per_face: Vec<Vec<DetectionBox>>) -> Self {
        Self {
            queue: per_face.into(),
            last: Vec::new(),
            log: CallLog::default(),
        }
    }

    /// Finds `eyes` in every face region.
    pub fn always(eyes: Vec<DetectionBox>) -> Self {
        Self {
            queue: VecDeque::new(),
            last: eyes,
            log: CallLog::default(),
        }
    }

    pub fn none() -> Self {
        Self::always(Vec::new())
    }

    pub fn call_log(&self) -> CallLog {
        self.log.clone()
    }
}

impl EyeDetector for ScriptedEyeDetector {
    fn detect_eyes(
        &mut self,
        face_region: &GrayImage,
        params: &DetectionParams,
    ) -> Result<Vec<DetectionBox>, Box<dyn std::error::Error>> {
        self.log.push(DetectorCall {
            model: None,
            params: *params,
            image_size: face_region.dimensions(),
        });
        if let Some(next) = self.queue.pop_front() {
            self.last = next;
        }
        Ok(self.last.clone())
    }
}
