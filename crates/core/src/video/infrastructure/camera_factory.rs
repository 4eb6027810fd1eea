use crate::video::domain::frame_source::FrameSource;
#[cfg(not(feature = "opencv"))]
use crate::{shared::frame::Frame, video::domain::frame_source::CaptureError};

/// Creates the frame source for the camera at `index`.
///
/// With the `opencv` feature this is a real webcam. Without it, a stand-in
/// whose `open` always reports the device as unavailable, so callers go
/// through the same error path as a missing camera.
pub fn default_camera(index: i32) -> Box<dyn FrameSource> {
    #[cfg(feature = "opencv")]
    {
        log::debug!("Using OpenCV capture backend for camera #{index}");
        Box::new(super::opencv_camera::OpencvCamera::new(index))
    }
    #[cfg(not(feature = "opencv"))]
    {
        log::debug!("No capture backend compiled in for camera #{index}");
        Box::new(UnsupportedCamera { index })
    }
}

/// Returns true when a real camera backend is compiled in.
pub fn camera_backend_available() -> bool {
    cfg!(feature = "opencv")
}

#[cfg(not(feature = "opencv"))]
struct UnsupportedCamera {
    index: i32,
}

#[cfg(not(feature = "opencv"))]
impl FrameSource for UnsupportedCamera {
    fn open(&mut self) -> Result<(), CaptureError> {
        Err(CaptureError::DeviceUnavailable {
            device: self.describe(),
            reason: "this build has no camera backend (enable the `opencv` feature)".into(),
        })
    }

    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        Err(CaptureError::ReadFailed("camera is not open".into()))
    }

    fn close(&mut self) {}

    fn is_open(&self) -> bool {
        false
    }

    fn describe(&self) -> String {
        format!("camera #{}", self.index)
    }
}

#[cfg(all(test, not(feature = "opencv")))]
mod tests {
    use super::*;

    #[test]
    fn test_open_reports_device_unavailable() {
        let mut camera = default_camera(0);
        let err = camera.open().unwrap_err();
        assert!(matches!(err, CaptureError::DeviceUnavailable { .. }));
        assert!(err.to_string().contains("camera #0"));
        assert!(!camera.is_open());
    }

    #[test]
    fn test_close_is_noop() {
        let mut camera = default_camera(1);
        camera.close();
        camera.close();
        assert!(!camera_backend_available());
    }
}
