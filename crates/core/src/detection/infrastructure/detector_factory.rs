use std::path::Path;

use crate::detection::domain::face_detector::{EyeDetector, FaceDetector};

use super::unavailable_detector::UnavailableDetector;

/// Detectors for one session, plus any load problems to show the user once.
pub struct DetectorSet {
    pub faces: Box<dyn FaceDetector>,
    pub eyes: Box<dyn EyeDetector>,
    pub warnings: Vec<String>,
}

impl DetectorSet {
    pub fn faces_available(&self) -> bool {
        self.faces.is_available()
    }

    pub fn eyes_available(&self) -> bool {
        self.eyes.is_available()
    }
}

/// Creates the cascade detectors, degrading to unavailable stand-ins.
///
/// A load failure is never fatal: the affected capability finds nothing
/// for the rest of the session and a warning is logged and returned.
pub fn create_detectors(cascade_dir: Option<&Path>) -> DetectorSet {
    let set = build(cascade_dir);
    for warning in &set.warnings {
        log::warn!("{warning}");
    }
    log::info!(
        "Detectors ready (faces: {}, eyes: {})",
        availability(set.faces_available()),
        availability(set.eyes_available())
    );
    set
}

fn availability(available: bool) -> &'static str {
    if available {
        "available"
    } else {
        "unavailable"
    }
}

#[cfg(feature = "opencv")]
fn build(cascade_dir: Option<&Path>) -> DetectorSet {
    use super::cascade_resolver;
    use super::opencv_cascade_detector::{load_cascade, OpencvEyeDetector, OpencvFaceDetector};
    use crate::shared::constants::{EYE_CASCADE_NAME, FACE_ALT_CASCADE_NAME, FACE_CASCADE_NAME};

    let mut warnings = Vec::new();
    let mut load = |name: &str| {
        let loaded = cascade_resolver::resolve(name, cascade_dir)
            .map_err(|e| e.to_string())
            .and_then(|path| load_cascade(&path).map_err(|e| e.to_string()));
        match loaded {
            Ok(cascade) => Some(cascade),
            Err(e) => {
                warnings.push(format!("Could not load {name}: {e}"));
                None
            }
        }
    };

    let primary = load(FACE_CASCADE_NAME);
    let alternate = load(FACE_ALT_CASCADE_NAME);
    let eye = load(EYE_CASCADE_NAME);

    let faces: Box<dyn FaceDetector> = if primary.is_none() && alternate.is_none() {
        warnings.push("Face detection is disabled: no face cascade could be loaded.".into());
        Box::new(UnavailableDetector::new("no face cascade loaded"))
    } else {
        Box::new(OpencvFaceDetector::new(primary, alternate))
    };
    let eyes: Box<dyn EyeDetector> = match eye {
        Some(cascade) => Box::new(OpencvEyeDetector::new(cascade)),
        None => {
            warnings.push("Eye detection is disabled: every face will read as eyes unclear.".into());
            Box::new(UnavailableDetector::new("no eye cascade loaded"))
        }
    };

    DetectorSet {
        faces,
        eyes,
        warnings,
    }
}

#[cfg(not(feature = "opencv"))]
fn build(cascade_dir: Option<&Path>) -> DetectorSet {
    if let Some(dir) = cascade_dir {
        log::debug!("Ignoring cascade directory {}: no detector backend", dir.display());
    }
    let reason = "this build has no cascade backend (enable the `opencv` feature)";
    DetectorSet {
        faces: Box::new(UnavailableDetector::new(reason)),
        eyes: Box::new(UnavailableDetector::new(reason)),
        warnings: vec![
            format!("Face detection is disabled: {reason}."),
            format!("Eye detection is disabled: {reason}."),
        ],
    }
}
