use serde::Serialize;

use face_reader_core::detection::domain::face_candidate::FaceCandidate;
use face_reader_core::detection::domain::verdict::AnalysisVerdict;
use face_reader_core::pipeline::analyze_frame_use_case::AnalysisReport;
use face_reader_core::shared::constants::DISCLAIMER;
use face_reader_core::shared::detection_box::DetectionBox;

/// JSON shape of one analysis, printed with `--format json`.
#[derive(Serialize, Debug, PartialEq)]
pub struct JsonReport {
    pub frame_index: usize,
    pub width: u32,
    pub height: u32,
    pub face_count: usize,
    pub faces: Vec<JsonFace>,
    pub verdict: String,
    pub disclaimer: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct JsonFace {
    pub face: JsonBox,
    pub eyes: Vec<JsonBox>,
    pub nose: [i32; 2],
    pub mouth: [i32; 2],
    pub remarks: Vec<JsonRemark>,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct JsonRemark {
    pub label: &'static str,
    pub reading: &'static str,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct JsonBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl From<DetectionBox> for JsonBox {
    fn from(b: DetectionBox) -> Self {
        Self {
            x: b.x,
            y: b.y,
            width: b.width,
            height: b.height,
        }
    }
}

impl JsonReport {
    pub fn build(report: &AnalysisReport, output: Option<String>, warnings: Vec<String>) -> Self {
        let remarks: Vec<Vec<JsonRemark>> = match &report.verdict {
            AnalysisVerdict::NoFaceFound => Vec::new(),
            AnalysisVerdict::Faces(faces) => faces
                .iter()
                .map(|f| {
                    f.remarks
                        .iter()
                        .map(|r| JsonRemark {
                            label: r.label(),
                            reading: r.reading(),
                        })
                        .collect()
                })
                .collect(),
        };

        let faces = report
            .faces
            .iter()
            .zip(remarks)
            .map(|(candidate, remarks)| json_face(candidate, remarks))
            .collect();

        Self {
            frame_index: report.annotated.index(),
            width: report.annotated.width(),
            height: report.annotated.height(),
            face_count: report.verdict.face_count(),
            faces,
            verdict: report.verdict.text(),
            disclaimer: DISCLAIMER,
            output,
            warnings,
        }
    }
}

fn json_face(candidate: &FaceCandidate, remarks: Vec<JsonRemark>) -> JsonFace {
    let nose = candidate.nose();
    let mouth = candidate.mouth();
    JsonFace {
        face: candidate.face.into(),
        eyes: candidate.eyes.iter().copied().map(JsonBox::from).collect(),
        nose: [nose.x, nose.y],
        mouth: [mouth.x, mouth.y],
        remarks,
    }
}

/// Plain-text rendering: verdict block, blank line, disclaimer.
pub fn text_report(report: &AnalysisReport) -> String {
    format!("{}\n\n{DISCLAIMER}", report.verdict.text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use face_reader_core::detection::domain::face_rules::RuleThresholds;
    use face_reader_core::shared::constants::NO_FACE_MESSAGE;
    use face_reader_core::shared::frame::Frame;

    fn report(faces: Vec<FaceCandidate>) -> AnalysisReport {
        let verdict = AnalysisVerdict::from_candidates(&faces, &RuleThresholds::default());
        AnalysisReport {
            annotated: Frame::new(vec![0; 640 * 480 * 3], 640, 480, 3, 7),
            verdict,
            faces,
            scale: 1.0,
        }
    }

    #[test]
    fn test_no_face_report_has_message_and_no_faces() {
        let json = JsonReport::build(&report(Vec::new()), None, Vec::new());
        assert_eq!(json.face_count, 0);
        assert!(json.faces.is_empty());
        assert_eq!(json.verdict, NO_FACE_MESSAGE);
        assert_eq!(json.frame_index, 7);
    }

    #[test]
    fn test_face_report_lists_remarks_in_order() {
        let candidate = FaceCandidate::from_local_eyes(
            DetectionBox::new(100, 80, 250, 250),
            &[DetectionBox::new(50, 80, 30, 30), DetectionBox::new(150, 80, 30, 30)],
        );
        let json = JsonReport::build(&report(vec![candidate]), Some("out.png".into()), Vec::new());

        assert_eq!(json.face_count, 1);
        let face = &json.faces[0];
        assert_eq!(face.face, JsonBox { x: 100, y: 80, width: 250, height: 250 });
        assert_eq!(face.eyes[0], JsonBox { x: 150, y: 160, width: 30, height: 30 });
        let labels: Vec<_> = face.remarks.iter().map(|r| r.label).collect();
        assert_eq!(labels[..2], ["Narrow face", "Small eyes"]);
        assert_eq!(labels.len(), 4);
        assert_eq!(json.output.as_deref(), Some("out.png"));
    }

    #[test]
    fn test_json_omits_empty_optional_fields() {
        let json = JsonReport::build(&report(Vec::new()), None, Vec::new());
        let value = serde_json::to_value(&json).unwrap();
        assert!(value.get("output").is_none());
        assert!(value.get("warnings").is_none());
        assert_eq!(value["disclaimer"], DISCLAIMER);
    }

    #[test]
    fn test_text_report_ends_with_disclaimer() {
        let text = text_report(&report(Vec::new()));
        assert!(text.starts_with(NO_FACE_MESSAGE));
        assert!(text.ends_with(DISCLAIMER));
    }
}
