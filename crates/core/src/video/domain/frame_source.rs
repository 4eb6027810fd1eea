use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("camera {device} could not be opened: {reason}")]
    DeviceUnavailable { device: String, reason: String },
    #[error("frame read failed: {0}")]
    ReadFailed(String),
    #[error("capture is already running")]
    AlreadyStreaming,
    #[error("capture worker panicked; the device handle was lost")]
    WorkerPanicked,
}

/// Produces color frames from a camera-like device.
///
/// A read failure is transient: callers skip it and try again. `close`
/// must be safe to call any number of times.
pub trait FrameSource: Send {
    /// Acquires the device. Fails with [`CaptureError::DeviceUnavailable`].
    fn open(&mut self) -> Result<(), CaptureError>;

    /// Returns the next frame. Fails with [`CaptureError::ReadFailed`].
    fn read_frame(&mut self) -> Result<Frame, CaptureError>;

    /// Releases the device. Closing an already-closed source is a no-op.
    fn close(&mut self);

    fn is_open(&self) -> bool;

    /// Human-readable device name for logs and errors.
    fn describe(&self) -> String;
}
