use crate::detection::domain::face_candidate::FaceCandidate;
use crate::shared::frame::Frame;

/// Domain interface for drawing detection results onto a frame.
///
/// The input frame is left untouched; implementations return an annotated
/// copy. With no faces the copy equals the input.
pub trait FrameAnnotator: Send {
    fn annotate(
        &self,
        frame: &Frame,
        faces: &[FaceCandidate],
    ) -> Result<Frame, Box<dyn std::error::Error>>;
}
