pub mod camera_factory;
pub mod channel_frame_sink;
pub mod image_file_source;
pub mod image_file_writer;
#[cfg(feature = "opencv")]
pub mod opencv_camera;
