use crate::shared::display_image::DisplayImage;

/// Receives a presentation-ready copy of every captured frame.
///
/// Called from the capture worker thread; implementations must not block
/// for long or they stall the capture cadence.
pub trait FrameSink: Send {
    fn present(&mut self, image: DisplayImage);
}
