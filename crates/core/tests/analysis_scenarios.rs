//! End-to-end analysis scenarios with deterministic blob detectors.
//!
//! The detectors here treat bright connected regions as faces and dark
//! regions enclosed by a face as eyes. Scenes are drawn to match.

use std::time::Duration;

use image::{GrayImage, Rgb, RgbImage};

use face_reader_core::annotation::infrastructure::imageproc_annotator::ImageprocAnnotator;
use face_reader_core::detection::domain::face_detector::{
    DetectionParams, DetectionPass, EyeDetector, FaceDetector,
};
use face_reader_core::detection::domain::face_rules::Remark;
use face_reader_core::detection::domain::verdict::AnalysisVerdict;
use face_reader_core::pipeline::analyze_frame_use_case::{AnalysisError, AnalyzeFrameUseCase};
use face_reader_core::pipeline::capture_session::CaptureSession;
use face_reader_core::pipeline::frame_slot::frame_slot;
use face_reader_core::pipeline::pipeline_logger::NullPipelineLogger;
use face_reader_core::shared::detection_box::DetectionBox;
use face_reader_core::shared::frame::Frame;
use face_reader_core::video::infrastructure::channel_frame_sink::ChannelFrameSink;
use face_reader_core::video::infrastructure::image_file_source::ImageFileSource;

const THRESHOLD: u8 = 128;

/// Bounding boxes of 4-connected regions matching `pick`, in scan order.
fn components(image: &GrayImage, pick: impl Fn(u8) -> bool) -> Vec<(DetectionBox, bool)> {
    let (w, h) = image.dimensions();
    let mut seen = vec![false; (w * h) as usize];
    let mut found = Vec::new();
    for sy in 0..h {
        for sx in 0..w {
            let start = (sy * w + sx) as usize;
            if seen[start] || !pick(image.get_pixel(sx, sy).0[0]) {
                continue;
            }
            let (mut x0, mut y0, mut x1, mut y1) = (sx, sy, sx, sy);
            let mut touches_border = false;
            let mut stack = vec![(sx, sy)];
            seen[start] = true;
            while let Some((x, y)) = stack.pop() {
                x0 = x0.min(x);
                y0 = y0.min(y);
                x1 = x1.max(x);
                y1 = y1.max(y);
                if x == 0 || y == 0 || x == w - 1 || y == h - 1 {
                    touches_border = true;
                }
                let mut visit = |nx: u32, ny: u32| {
                    let idx = (ny * w + nx) as usize;
                    if !seen[idx] && pick(image.get_pixel(nx, ny).0[0]) {
                        seen[idx] = true;
                        stack.push((nx, ny));
                    }
                };
                if x > 0 {
                    visit(x - 1, y);
                }
                if y > 0 {
                    visit(x, y - 1);
                }
                if x + 1 < w {
                    visit(x + 1, y);
                }
                if y + 1 < h {
                    visit(x, y + 1);
                }
            }
            let bbox = DetectionBox::new(
                x0 as i32,
                y0 as i32,
                (x1 - x0 + 1) as i32,
                (y1 - y0 + 1) as i32,
            );
            found.push((bbox, touches_border));
        }
    }
    found
}

struct BrightBlobFaces;

impl FaceDetector for BrightBlobFaces {
    fn detect_faces(
        &mut self,
        image: &GrayImage,
        pass: &DetectionPass,
    ) -> Result<Vec<DetectionBox>, Box<dyn std::error::Error>> {
        let min = pass.params.min_size as i32;
        Ok(components(image, |v| v >= THRESHOLD)
            .into_iter()
            .map(|(b, _)| b)
            .filter(|b| b.width >= min && b.height >= min)
            .collect())
    }
}

struct DarkBlobEyes;

impl EyeDetector for DarkBlobEyes {
    fn detect_eyes(
        &mut self,
        face_region: &GrayImage,
        params: &DetectionParams,
    ) -> Result<Vec<DetectionBox>, Box<dyn std::error::Error>> {
        let min = params.min_size as i32;
        Ok(components(face_region, |v| v < THRESHOLD)
            .into_iter()
            .filter(|(b, touches_border)| !touches_border && b.width >= min && b.height >= min)
            .map(|(b, _)| b)
            .collect())
    }
}

fn use_case() -> AnalyzeFrameUseCase {
    AnalyzeFrameUseCase::new(
        Box::new(BrightBlobFaces),
        Box::new(DarkBlobEyes),
        Box::new(ImageprocAnnotator::default()),
        Box::new(NullPipelineLogger),
    )
}

fn fill(image: &mut RgbImage, b: DetectionBox, color: [u8; 3]) {
    for y in b.y..b.bottom() {
        for x in b.x..b.right() {
            image.put_pixel(x as u32, y as u32, Rgb(color));
        }
    }
}

/// A white face square with two black eye squares, on black.
fn draw_face(image: &mut RgbImage, face: DetectionBox, eye_size: i32) {
    fill(image, face, [255, 255, 255]);
    let eye_y = face.y + face.height / 3;
    fill(
        image,
        DetectionBox::new(face.x + face.width / 5, eye_y, eye_size, eye_size),
        [0, 0, 0],
    );
    fill(
        image,
        DetectionBox::new(face.x + face.width * 3 / 5, eye_y, eye_size, eye_size),
        [0, 0, 0],
    );
}

fn within_one(a: DetectionBox, b: DetectionBox) -> bool {
    (a.x - b.x).abs() <= 1
        && (a.y - b.y).abs() <= 1
        && (a.width - b.width).abs() <= 1
        && (a.height - b.height).abs() <= 1
}

#[test]
fn test_blank_frame_reports_no_face_and_draws_nothing() {
    let frame = Frame::new(vec![0; 640 * 480 * 3], 640, 480, 3, 0);
    let report = use_case().analyze(&frame).unwrap();

    assert_eq!(report.verdict, AnalysisVerdict::NoFaceFound);
    assert_eq!(report.verdict.text(), "No face found. Please try again.");
    assert_eq!(report.annotated, frame);
}

#[test]
fn test_narrow_face_with_small_eyes_reads_in_rule_order() {
    let mut image = RgbImage::new(640, 480);
    let face = DetectionBox::new(100, 80, 250, 250);
    draw_face(&mut image, face, 30);
    let frame = Frame::from_rgb_image(image, 0);

    let report = use_case().analyze(&frame).unwrap();
    let AnalysisVerdict::Faces(faces) = &report.verdict else {
        panic!("expected a face, got {:?}", report.verdict);
    };
    assert_eq!(faces.len(), 1);
    assert_eq!(faces[0].face, face);
    assert_eq!(faces[0].eye_count, 2);
    assert_eq!(report.faces[0].eyes[0].width, 30);

    let remarks = &faces[0].remarks;
    assert_eq!(remarks.len(), 4);
    assert_eq!(remarks[0], Remark::NarrowFace);
    assert_eq!(remarks[1], Remark::SmallEyes);
    assert!(matches!(remarks[2], Remark::HighNose | Remark::BalancedNose));
    assert!(matches!(remarks[3], Remark::ThinLips | Remark::FullLips));

    let text = report.verdict.text();
    assert!(text.starts_with("Face 1 detected (eyes found: 2)"));
    let narrow = text.find("Narrow face").unwrap();
    let small = text.find("Small eyes").unwrap();
    assert!(narrow < small);
    assert_ne!(report.annotated, frame);
}

#[test]
fn test_broad_face_with_large_eyes() {
    let mut image = RgbImage::new(800, 600);
    draw_face(&mut image, DetectionBox::new(150, 100, 360, 360), 50);
    let report = use_case()
        .analyze(&Frame::from_rgb_image(image, 0))
        .unwrap();
    assert!(report.verdict.contains(Remark::BroadFace));
    assert!(report.verdict.contains(Remark::LargeEyes));
    assert!(!report.verdict.contains(Remark::NarrowFace));
}

#[test]
fn test_face_without_eyes_reads_eyes_unclear() {
    let mut image = RgbImage::new(640, 480);
    fill(&mut image, DetectionBox::new(200, 100, 200, 200), [255, 255, 255]);
    let report = use_case()
        .analyze(&Frame::from_rgb_image(image, 0))
        .unwrap();
    assert!(report.verdict.contains(Remark::EyesUnclear));
    assert!(!report.verdict.contains(Remark::SmallEyes));
    assert!(!report.verdict.contains(Remark::LargeEyes));
}

#[test]
fn test_downscaled_detection_maps_back_to_frame_coordinates() {
    let mut image = RgbImage::new(1600, 1200);
    let face = DetectionBox::new(400, 300, 400, 400);
    fill(&mut image, face, [255, 255, 255]);

    let report = use_case()
        .analyze(&Frame::from_rgb_image(image, 0))
        .unwrap();
    assert_eq!(report.scale, 0.5);
    assert_eq!(report.faces.len(), 1);
    let found = report.faces[0].face;
    assert!(within_one(found, face), "expected ~{face:?}, got {found:?}");
}

#[test]
fn test_analyzing_twice_gives_identical_results() {
    let mut image = RgbImage::new(960, 540);
    draw_face(&mut image, DetectionBox::new(300, 120, 280, 280), 36);
    let frame = Frame::from_rgb_image(image, 4);

    let mut uc = use_case();
    let first = uc.analyze(&frame).unwrap();
    let second = uc.analyze(&frame).unwrap();
    assert_eq!(first.verdict, second.verdict);
    assert_eq!(first.faces, second.faces);
    assert_eq!(first.annotated, second.annotated);
}

#[test]
fn test_multiple_faces_are_reported_in_detection_order() {
    let mut image = RgbImage::new(720, 360);
    draw_face(&mut image, DetectionBox::new(40, 60, 200, 200), 30);
    fill(&mut image, DetectionBox::new(400, 60, 200, 200), [255, 255, 255]);

    let report = use_case()
        .analyze(&Frame::from_rgb_image(image, 0))
        .unwrap();
    assert_eq!(report.verdict.face_count(), 2);
    let text = report.verdict.text();
    assert!(text.contains("Face 1 detected (eyes found: 2)"));
    assert!(text.contains("Face 2 detected (eyes found: 0)"));
    assert!(text.find("Face 1").unwrap() < text.find("Face 2").unwrap());
}

#[test]
fn test_capture_then_analyze_latest_frame() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("portrait.png");
    let mut image = RgbImage::new(640, 480);
    draw_face(&mut image, DetectionBox::new(100, 80, 250, 250), 30);
    image.save(&path).unwrap();

    let (writer, mut reader) = frame_slot();
    let (sink, display) = ChannelFrameSink::bounded(4);
    let mut session = CaptureSession::new(Box::new(ImageFileSource::new(&path)), writer, Box::new(sink));
    let mut uc = use_case();

    assert!(matches!(
        uc.analyze_latest(&mut reader),
        Err(AnalysisError::NoFrameAvailable)
    ));

    session.start().unwrap();
    let first = display.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!((first.width, first.height), (640, 480));
    session.stop().unwrap();

    let report = uc.analyze_latest(&mut reader).unwrap();
    assert!(report.verdict.contains(Remark::NarrowFace));
    assert!(report.verdict.contains(Remark::SmallEyes));

    // Stop released the source, so an immediate restart succeeds.
    while display.try_recv().is_ok() {}
    session.start().unwrap();
    let again = display.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(again.frame_index > first.frame_index);
    session.stop().unwrap();
}
