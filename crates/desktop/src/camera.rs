use crossbeam_channel::Receiver;

use face_reader_core::pipeline::analyze_frame_use_case::{
    AnalysisError, AnalysisReport, AnalyzeFrameUseCase,
};
use face_reader_core::pipeline::capture_loop::CaptureStats;
use face_reader_core::pipeline::capture_session::CaptureSession;
use face_reader_core::pipeline::frame_slot::{frame_slot, FrameReader};
use face_reader_core::shared::display_image::DisplayImage;
use face_reader_core::video::domain::frame_source::{CaptureError, FrameSource};
use face_reader_core::video::infrastructure::channel_frame_sink::ChannelFrameSink;

/// Display frames buffered between UI ticks; older ones are dropped.
const DISPLAY_BACKLOG: usize = 2;

/// UI-side owner of the capture session, the frame slot reader and the
/// analyzer. Holds the button enablement rules.
pub struct CameraController {
    session: CaptureSession,
    reader: FrameReader,
    display: Receiver<DisplayImage>,
    analyzer: AnalyzeFrameUseCase,
    has_frame: bool,
}

impl CameraController {
    pub fn new(source: Box<dyn FrameSource>, analyzer: AnalyzeFrameUseCase) -> Self {
        let (writer, reader) = frame_slot();
        let (sink, display) = ChannelFrameSink::bounded(DISPLAY_BACKLOG);
        Self {
            session: CaptureSession::new(source, writer, Box::new(sink)),
            reader,
            display,
            analyzer,
            has_frame: false,
        }
    }

    pub fn device(&self) -> &str {
        self.session.device()
    }

    pub fn is_streaming(&self) -> bool {
        self.session.is_streaming()
    }

    pub fn can_start(&self) -> bool {
        !self.is_streaming()
    }

    pub fn can_stop(&self) -> bool {
        self.is_streaming()
    }

    /// Analyze needs a running session that has captured at least once.
    pub fn can_analyze(&self) -> bool {
        self.is_streaming() && self.has_frame
    }

    /// Starts a fresh streaming session. Frames from an earlier session
    /// do not count towards enabling Analyze.
    pub fn start(&mut self) -> Result<(), CaptureError> {
        self.reader.clear();
        while self.display.try_recv().is_ok() {}
        self.has_frame = false;
        self.session.start()
    }

    pub fn stop(&mut self) -> Result<CaptureStats, CaptureError> {
        let stats = self.session.stop()?;
        self.has_frame = false;
        Ok(stats)
    }

    /// Drains pending display frames and returns the newest one, if any.
    pub fn poll(&mut self) -> Option<DisplayImage> {
        let newest = self.display.try_iter().last();
        if self.is_streaming() && !self.has_frame {
            self.has_frame = self.reader.has_frame();
        }
        newest
    }

    pub fn analyze(&mut self) -> Result<AnalysisReport, AnalysisError> {
        if !self.can_analyze() {
            return Err(AnalysisError::NoFrameAvailable);
        }
        self.analyzer.analyze_latest(&mut self.reader)
    }
}
