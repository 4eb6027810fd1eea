use std::path::Path;

use crate::shared::frame::Frame;

/// Saves an (annotated) frame to disk. The format follows the path's extension.
pub trait ImageWriter: Send {
    /// When `max_width` is set and the frame is wider, the saved image is
    /// shrunk to that width with its aspect ratio kept.
    fn save(
        &self,
        path: &Path,
        frame: &Frame,
        max_width: Option<u32>,
    ) -> Result<(), Box<dyn std::error::Error>>;
}
