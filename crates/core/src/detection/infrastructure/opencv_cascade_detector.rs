use std::path::Path;

use image::GrayImage;
use opencv::core::{Mat, Rect, Size, Vector};
use opencv::objdetect::CascadeClassifier;
use opencv::prelude::*;

use crate::detection::domain::face_detector::{
    DetectionParams, DetectionPass, EyeDetector, FaceDetector, FaceModel,
};
use crate::shared::detection_box::DetectionBox;

/// Loads a Haar cascade, rejecting files that parse to an empty classifier.
pub fn load_cascade(path: &Path) -> Result<CascadeClassifier, Box<dyn std::error::Error>> {
    let path_str = path
        .to_str()
        .ok_or_else(|| format!("cascade path is not valid UTF-8: {}", path.display()))?;
    let classifier = CascadeClassifier::new(path_str)?;
    if classifier.empty()? {
        return Err(format!("cascade at {} is empty or unreadable", path.display()).into());
    }
    log::info!("Loaded cascade {}", path.display());
    Ok(classifier)
}

fn run_cascade(
    cascade: &mut CascadeClassifier,
    image: &GrayImage,
    params: &DetectionParams,
) -> Result<Vec<DetectionBox>, Box<dyn std::error::Error>> {
    if image.width() == 0 || image.height() == 0 {
        return Ok(Vec::new());
    }
    let mat = Mat::new_rows_cols_with_data(
        image.height() as i32,
        image.width() as i32,
        image.as_raw().as_slice(),
    )?;
    let mut found = Vector::<Rect>::new();
    let min = params.min_size as i32;
    cascade.detect_multi_scale(
        &*mat,
        &mut found,
        params.scale_factor,
        params.min_neighbors,
        0,
        Size::new(min, min),
        Size::new(0, 0),
    )?;
    Ok(found
        .iter()
        .map(|r| DetectionBox::new(r.x, r.y, r.width, r.height))
        .collect())
}

/// Face detection with the primary and alternate frontal cascades.
///
/// Either cascade may be missing; a pass for a missing cascade finds
/// nothing.
pub struct OpencvFaceDetector {
    primary: Option<CascadeClassifier>,
    alternate: Option<CascadeClassifier>,
}

impl OpencvFaceDetector {
    pub fn new(primary: Option<CascadeClassifier>, alternate: Option<CascadeClassifier>) -> Self {
        Self { primary, alternate }
    }
}

impl FaceDetector for OpencvFaceDetector {
    fn detect_faces(
        &mut self,
        image: &GrayImage,
        pass: &DetectionPass,
    ) -> Result<Vec<DetectionBox>, Box<dyn std::error::Error>> {
        let cascade = match pass.model {
            FaceModel::Primary => self.primary.as_mut(),
            FaceModel::Alternate => self.alternate.as_mut(),
        };
        match cascade {
            Some(cascade) => run_cascade(cascade, image, &pass.params),
            None => Ok(Vec::new()),
        }
    }

    fn is_available(&self) -> bool {
        self.primary.is_some() || self.alternate.is_some()
    }
}

pub struct OpencvEyeDetector {
    cascade: CascadeClassifier,
}

impl OpencvEyeDetector {
    pub fn new(cascade: CascadeClassifier) -> Self {
        Self { cascade }
    }
}

impl EyeDetector for OpencvEyeDetector {
    fn detect_eyes(
        &mut self,
        face_region: &GrayImage,
        params: &DetectionParams,
    ) -> Result<Vec<DetectionBox>, Box<dyn std::error::Error>> {
        run_cascade(&mut self.cascade, face_region, params)
    }
}
