pub mod cascade_resolver;
pub mod detector_factory;
#[cfg(feature = "opencv")]
pub mod opencv_cascade_detector;
pub mod scripted_detector;
pub mod unavailable_detector;
