use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::detection::domain::face_candidate::{FaceCandidate, FacePoint};
use crate::shared::detection_box::DetectionBox;
use crate::shared::frame::Frame;

use super::glyphs;

/// Colors and sizes used when drawing an analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationStyle {
    pub face_color: Rgb<u8>,
    pub eye_color: Rgb<u8>,
    pub nose_color: Rgb<u8>,
    pub mouth_color: Rgb<u8>,
    pub text_color: Rgb<u8>,
    /// Outline thickness of face and eye boxes.
    pub line_width: u32,
    pub marker_radius: i32,
    pub text_origin: (i32, i32),
    pub text_scale: u32,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            face_color: Rgb([0, 0, 255]),
            eye_color: Rgb([0, 255, 0]),
            nose_color: Rgb([255, 255, 0]),
            mouth_color: Rgb([255, 0, 0]),
            text_color: Rgb([0, 255, 0]),
            line_width: 2,
            marker_radius: 5,
            text_origin: (10, 10),
            text_scale: 2,
        }
    }
}

/// Draws boxes, markers and the face-count overlay with `imageproc`.
#[derive(Clone, Debug, Default)]
pub struct ImageprocAnnotator {
    style: AnnotationStyle,
}

impl ImageprocAnnotator {
    pub fn new(style: AnnotationStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &AnnotationStyle {
        &self.style
    }

    fn draw_box(&self, image: &mut RgbImage, detection: &DetectionBox, color: Rgb<u8>) {
        let clamped = detection.clamp_to(image.width(), image.height());
        for inset in 0..self.style.line_width as i32 {
            let w = clamped.width - 2 * inset;
            let h = clamped.height - 2 * inset;
            if w <= 0 || h <= 0 {
                break;
            }
            let rect = Rect::at(clamped.x + inset, clamped.y + inset).of_size(w as u32, h as u32);
            draw_hollow_rect_mut(image, rect, color);
        }
    }

    fn draw_marker(&self, image: &mut RgbImage, point: FacePoint, color: Rgb<u8>) {
        draw_filled_circle_mut(image, (point.x, point.y), self.style.marker_radius, color);
    }
}

impl FrameAnnotator for ImageprocAnnotator {
    fn annotate(
        &self,
        frame: &Frame,
        faces: &[FaceCandidate],
    ) -> Result<Frame, Box<dyn std::error::Error>> {
        if faces.is_empty() {
            return Ok(frame.clone());
        }
        if frame.channels() != 3 {
            return Err(format!("cannot annotate a {}-channel frame", frame.channels()).into());
        }

        let mut image = frame.to_rgb_image();
        glyphs::draw_text_mut(
            &mut image,
            &format!("Faces: {}", faces.len()),
            self.style.text_origin,
            self.style.text_scale,
            self.style.text_color,
        );
        for face in faces {
            self.draw_box(&mut image, &face.face, self.style.face_color);
            for eye in &face.eyes {
                self.draw_box(&mut image, eye, self.style.eye_color);
            }
            self.draw_marker(&mut image, face.nose(), self.style.nose_color);
            self.draw_marker(&mut image, face.mouth(), self.style.mouth_color);
        }
        Ok(Frame::from_rgb_image(image, frame.index()))
    }
}
