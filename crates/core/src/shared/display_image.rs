use crate::shared::frame::Frame;

/// Presentation-ready RGBA copy of a frame.
///
/// Toolkits such as iced take RGBA pixel buffers; converting once per tick
/// in the capture worker keeps that work off the UI thread.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
    pub frame_index: usize,
}

impl DisplayImage {
    pub fn from_frame(frame: &Frame) -> Self {
        let pixel_count = (frame.width() as usize) * (frame.height() as usize);
        let mut rgba = Vec::with_capacity(pixel_count * 4);
        match frame.channels() {
            1 => {
                for &v in frame.data() {
                    rgba.extend_from_slice(&[v, v, v, 255]);
                }
            }
            4 => rgba.extend_from_slice(frame.data()),
            _ => {
                for px in frame.data().chunks_exact(frame.channels() as usize) {
                    rgba.extend_from_slice(&[px[0], px[1], px[2], 255]);
                }
            }
        }
        Self {
            width: frame.width(),
            height: frame.height(),
            rgba,
            frame_index: frame.index(),
        }
    }
}
