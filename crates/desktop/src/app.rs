use std::time::Duration;

use iced::widget::{button, column, container, image, row, text};
use iced::{Element, Length, Subscription, Task, Theme};

use face_reader_core::annotation::infrastructure::imageproc_annotator::ImageprocAnnotator;
use face_reader_core::detection::infrastructure::detector_factory::create_detectors;
use face_reader_core::pipeline::analyze_frame_use_case::AnalyzeFrameUseCase;
use face_reader_core::pipeline::pipeline_logger::NullPipelineLogger;
use face_reader_core::shared::constants::DEFAULT_CAMERA_INDEX;
use face_reader_core::shared::display_image::DisplayImage;
use face_reader_core::video::infrastructure::camera_factory::default_camera;

use crate::camera::CameraController;
use crate::theme;
use crate::widgets::live_view::{live_view, to_handle};
use crate::widgets::result_panel::{result_panel, AnalysisView};

const LIVE_VIEW_TICK: Duration = Duration::from_millis(30);

#[derive(Debug, Clone)]
pub enum Message {
    StartCamera,
    StopCamera,
    Analyze,
    Tick,
}

pub struct App {
    camera: CameraController,
    live: Option<image::Handle>,
    result: Option<AnalysisView>,
    /// Detector load problems, shown for the whole session.
    warnings: Vec<String>,
    /// Latest device or analysis message; replaced on each action.
    status: Option<String>,
    theme: Theme,
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        let detectors = create_detectors(None);
        let analyzer = AnalyzeFrameUseCase::new(
            detectors.faces,
            detectors.eyes,
            Box::new(ImageprocAnnotator::default()),
            Box::new(NullPipelineLogger),
        );
        let camera = CameraController::new(default_camera(DEFAULT_CAMERA_INDEX), analyzer);
        (Self::with_camera(camera, detectors.warnings), Task::none())
    }

    fn with_camera(camera: CameraController, warnings: Vec<String>) -> Self {
        Self {
            camera,
            live: None,
            result: None,
            warnings,
            status: None,
            theme: theme::resolve_theme(),
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::StartCamera => match self.camera.start() {
                Ok(()) => {
                    self.live = None;
                    self.status = None;
                }
                Err(e) => {
                    log::warn!("Could not start {}: {e}", self.camera.device());
                    self.status = Some(format!("Could not open the camera: {e}"));
                }
            },
            Message::StopCamera => match self.camera.stop() {
                Ok(_) => {
                    self.live = None;
                    self.status = Some("Camera stopped.".into());
                }
                Err(e) => {
                    log::error!("Stopping {} failed: {e}", self.camera.device());
                    self.status = Some(format!("Camera did not stop cleanly: {e}"));
                }
            },
            Message::Analyze => match self.camera.analyze() {
                Ok(report) => {
                    self.result = Some(AnalysisView {
                        annotated: to_handle(DisplayImage::from_frame(&report.annotated)),
                        verdict: report.verdict.text(),
                    });
                    self.status = None;
                }
                Err(e) => {
                    log::warn!("Analysis failed: {e}");
                    self.status = Some(e.to_string());
                }
            },
            Message::Tick => {
                if let Some(frame) = self.camera.poll() {
                    self.live = Some(to_handle(frame));
                }
            }
        }
        Task::none()
    }

    pub fn view(&self) -> Element<'_, Message> {
        let controls = row![
            button(text("Start Camera"))
                .on_press_maybe(self.camera.can_start().then_some(Message::StartCamera))
                .padding([6, 14])
                .style(button::primary),
            button(text("Analyze"))
                .on_press_maybe(self.camera.can_analyze().then_some(Message::Analyze))
                .padding([6, 14])
                .style(button::success),
            button(text("Stop Camera"))
                .on_press_maybe(self.camera.can_stop().then_some(Message::StopCamera))
                .padding([6, 14])
                .style(button::secondary),
        ]
        .spacing(8);

        let panels = row![
            live_view(self.live.as_ref(), self.camera.is_streaming()),
            result_panel(self.result.as_ref()),
        ]
        .spacing(12)
        .height(Length::Fill);

        let mut status = column![].spacing(2);
        for warning in &self.warnings {
            status = status.push(text(warning.clone()).size(12).style(text::danger));
        }
        if let Some(message) = &self.status {
            status = status.push(text(message.clone()).size(12).style(text::danger));
        }

        container(column![controls, panels, status].spacing(12))
            .padding(16)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    pub fn theme(&self) -> Theme {
        self.theme.clone()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        if self.camera.is_streaming() {
            iced::time::every(LIVE_VIEW_TICK).map(|_| Message::Tick)
        } else {
            Subscription::none()
        }
    }
}
