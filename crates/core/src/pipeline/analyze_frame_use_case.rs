use std::time::Instant;

use thiserror::Error;

use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::detection::domain::face_candidate::FaceCandidate;
use crate::detection::domain::face_detector::{
    face_detection_passes, EyeDetector, FaceDetector, EYE_DETECTION_PARAMS,
};
use crate::detection::domain::face_rules::RuleThresholds;
use crate::detection::domain::verdict::AnalysisVerdict;
use crate::imaging::clahe::{apply_clahe, ClaheParams};
use crate::imaging::grayscale::{crop_region, downscale_to_width, to_gray};
use crate::pipeline::frame_slot::FrameReader;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::shared::constants::MAX_WORKING_WIDTH;
use crate::shared::detection_box::DetectionBox;
use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("no frame has been captured yet; start the camera first")]
    NoFrameAvailable,
    #[error("detection failed: {0}")]
    Detection(String),
    #[error("annotation failed: {0}")]
    Annotation(String),
}

/// Result of analyzing one frame.
#[derive(Clone, Debug)]
pub struct AnalysisReport {
    /// Copy of the input with boxes, markers and the face-count overlay.
    pub annotated: Frame,
    pub verdict: AnalysisVerdict,
    /// Faces in full-frame coordinates, in detection order.
    pub faces: Vec<FaceCandidate>,
    /// Scale applied before face detection (1.0 when not downscaled).
    pub scale: f64,
}

/// Analysis pipeline: equalize → detect faces (with fallbacks) → detect
/// eyes → apply rules → annotate.
pub struct AnalyzeFrameUseCase {
    faces: Box<dyn FaceDetector>,
    eyes: Box<dyn EyeDetector>,
    annotator: Box<dyn FrameAnnotator>,
    logger: Box<dyn PipelineLogger>,
    thresholds: RuleThresholds,
    clahe: ClaheParams,
    max_working_width: u32,
}

impl AnalyzeFrameUseCase {
    pub fn new(
        faces: Box<dyn FaceDetector>,
        eyes: Box<dyn EyeDetector>,
        annotator: Box<dyn FrameAnnotator>,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            faces,
            eyes,
            annotator,
            logger,
            thresholds: RuleThresholds::default(),
            clahe: ClaheParams::default(),
            max_working_width: MAX_WORKING_WIDTH,
        }
    }

    pub fn with_thresholds(mut self, thresholds: RuleThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Analyzes the most recent frame in the slot.
    pub fn analyze_latest(
        &mut self,
        reader: &mut FrameReader,
    ) -> Result<AnalysisReport, AnalysisError> {
        let frame = reader.latest().ok_or(AnalysisError::NoFrameAvailable)?;
        self.analyze(&frame)
    }

    pub fn analyze(&mut self, frame: &Frame) -> Result<AnalysisReport, AnalysisError> {
        let t0 = Instant::now();
        let equalized = apply_clahe(&to_gray(frame), &self.clahe);
        let (working, scale) = downscale_to_width(&equalized, self.max_working_width);
        self.logger.timing("preprocess", elapsed_ms(t0));

        let t1 = Instant::now();
        let found = self.detect_faces(&working)?;
        self.logger.timing("detect_faces", elapsed_ms(t1));

        let t2 = Instant::now();
        let mut candidates = Vec::with_capacity(found.len());
        for detection in &found {
            let face = detection
                .unscale(scale)
                .clamp_to(frame.width(), frame.height());
            if face.is_empty() {
                continue;
            }
            let local_eyes = match crop_region(&equalized, &face) {
                Some(region) => self
                    .eyes
                    .detect_eyes(&region, &EYE_DETECTION_PARAMS)
                    .map_err(|e| AnalysisError::Detection(e.to_string()))?,
                None => Vec::new(),
            };
            candidates.push(FaceCandidate::from_local_eyes(face, &local_eyes));
        }
        self.logger.timing("detect_eyes", elapsed_ms(t2));

        let verdict = AnalysisVerdict::from_candidates(&candidates, &self.thresholds);

        let t3 = Instant::now();
        let annotated = self
            .annotator
            .annotate(frame, &candidates)
            .map_err(|e| AnalysisError::Annotation(e.to_string()))?;
        self.logger.timing("annotate", elapsed_ms(t3));

        let eye_total: usize = candidates.iter().map(FaceCandidate::eye_count).sum();
        self.logger.metric("faces", candidates.len() as f64);
        self.logger.metric("eyes", eye_total as f64);
        self.logger.info(&format!(
            "Analyzed frame #{}: {} face(s), {} eye(s)",
            frame.index(),
            candidates.len(),
            eye_total
        ));

        Ok(AnalysisReport {
            annotated,
            verdict,
            faces: candidates,
            scale,
        })
    }

    /// Runs the fallback passes in order, stopping at the first hit.
    fn detect_faces(&mut self, working: &image::GrayImage) -> Result<Vec<DetectionBox>, AnalysisError> {
        for pass in face_detection_passes(working.width()) {
            let boxes = self
                .faces
                .detect_faces(working, &pass)
                .map_err(|e| AnalysisError::Detection(e.to_string()))?;
            log::debug!(
                "{:?} pass (scale {}, neighbours {}, min {}px): {} face(s)",
                pass.model,
                pass.params.scale_factor,
                pass.params.min_neighbors,
                pass.params.min_size,
                boxes.len()
            );
            if !boxes.is_empty() {
                return Ok(boxes);
            }
        }
        Ok(Vec::new())
    }

    /// Emits the logger's summary.
    pub fn finish(&self) {
        self.logger.summary();
    }
}

fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}
