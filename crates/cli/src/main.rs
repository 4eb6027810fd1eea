mod report;

use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand, ValueEnum};
use crossbeam_channel::Receiver;

use face_reader_core::annotation::infrastructure::imageproc_annotator::ImageprocAnnotator;
use face_reader_core::detection::infrastructure::detector_factory::create_detectors;
use face_reader_core::pipeline::analyze_frame_use_case::{AnalysisReport, AnalyzeFrameUseCase};
use face_reader_core::pipeline::capture_session::CaptureSession;
use face_reader_core::pipeline::frame_slot::frame_slot;
use face_reader_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use face_reader_core::shared::constants::{DEFAULT_CAMERA_INDEX, IMAGE_EXTENSIONS};
use face_reader_core::shared::display_image::DisplayImage;
use face_reader_core::video::domain::frame_source::FrameSource;
use face_reader_core::video::domain::image_writer::ImageWriter;
use face_reader_core::video::infrastructure::camera_factory::default_camera;
use face_reader_core::video::infrastructure::channel_frame_sink::ChannelFrameSink;
use face_reader_core::video::infrastructure::image_file_source::{load_frame, ImageFileSource};
use face_reader_core::video::infrastructure::image_file_writer::ImageFileWriter;

use report::{text_report, JsonReport};

/// Display frames buffered while waiting for warmup; they are counted and dropped.
const DISPLAY_BACKLOG: usize = 4;

/// Rule-based face reading from an image or a webcam. For entertainment only.
#[derive(Parser, Debug)]
#[command(name = "face-reader")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a still image.
    Analyze {
        /// Input image file.
        image: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Stream from a camera, then analyze the latest captured frame.
    Capture {
        /// Camera index.
        #[arg(long, default_value_t = DEFAULT_CAMERA_INDEX, conflicts_with = "source")]
        camera: i32,

        /// Replay an image file instead of opening a camera.
        #[arg(long)]
        source: Option<PathBuf>,

        /// Frames to capture before analyzing.
        #[arg(long, default_value = "15")]
        warmup_frames: usize,

        /// Stop waiting for frames after this many seconds.
        #[arg(long, default_value = "10")]
        timeout_secs: u64,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Write the annotated image to this file.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Result format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Directory containing the Haar cascade XML files.
    #[arg(long)]
    cascade_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    match cli.command {
        Command::Analyze { image, output } => run_analyze(&image, &output),
        Command::Capture {
            camera,
            source,
            warmup_frames,
            timeout_secs,
            output,
        } => {
            let source: Box<dyn FrameSource> = match source {
                Some(path) => Box::new(ImageFileSource::new(path)),
                None => default_camera(camera),
            };
            run_capture(
                source,
                warmup_frames,
                Duration::from_secs(timeout_secs),
                &output,
            )
        }
    }
}

fn run_analyze(image: &Path, args: &OutputArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (mut use_case, warnings) = build_use_case(args.cascade_dir.as_deref());
    let frame = load_frame(image)?;
    log::info!(
        "Loaded {} ({}x{})",
        image.display(),
        frame.width(),
        frame.height()
    );

    let report = use_case.analyze(&frame)?;
    emit(&report, args, warnings)?;
    use_case.finish();
    Ok(())
}

fn run_capture(
    source: Box<dyn FrameSource>,
    warmup_frames: usize,
    timeout: Duration,
    args: &OutputArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let (mut use_case, warnings) = build_use_case(args.cascade_dir.as_deref());
    let (writer, mut reader) = frame_slot();
    let (sink, display) = ChannelFrameSink::bounded(DISPLAY_BACKLOG);
    let mut session = CaptureSession::new(source, writer, Box::new(sink));

    session.start()?;
    let seen = wait_for_frames(&display, warmup_frames, timeout);
    let stats = session.stop()?;
    if seen < warmup_frames {
        log::warn!(
            "Only {seen} of {warmup_frames} frames arrived within {}s ({} failed reads)",
            timeout.as_secs(),
            stats.read_failures
        );
    }

    let report = use_case.analyze_latest(&mut reader)?;
    emit(&report, args, warnings)?;
    use_case.finish();
    Ok(())
}

fn build_use_case(cascade_dir: Option<&Path>) -> (AnalyzeFrameUseCase, Vec<String>) {
    let detectors = create_detectors(cascade_dir);
    let use_case = AnalyzeFrameUseCase::new(
        detectors.faces,
        detectors.eyes,
        Box::new(ImageprocAnnotator::default()),
        Box::new(StdoutPipelineLogger::new()),
    );
    (use_case, detectors.warnings)
}

/// Counts display frames until `wanted` arrive or `timeout` runs out.
fn wait_for_frames(display: &Receiver<DisplayImage>, wanted: usize, timeout: Duration) -> usize {
    let deadline = Instant::now() + timeout;
    let mut seen = 0;
    while seen < wanted {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match display.recv_timeout(remaining) {
            Ok(_) => seen += 1,
            Err(_) => break,
        }
    }
    seen
}

fn emit(
    report: &AnalysisReport,
    args: &OutputArgs,
    warnings: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = &args.output {
        ImageFileWriter::new().save(path, &report.annotated, None)?;
        log::info!("Annotated image written to {}", path.display());
    }

    match args.format {
        Format::Text => println!("{}", text_report(report)),
        Format::Json => {
            let output = args.output.as_ref().map(|p| p.display().to_string());
            let json = JsonReport::build(report, output, warnings);
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let output = match &cli.command {
        Command::Analyze { image, output } => {
            if !image.exists() {
                return Err(format!("Input file not found: {}", image.display()).into());
            }
            output
        }
        Command::Capture {
            source,
            warmup_frames,
            timeout_secs,
            output,
            ..
        } => {
            if let Some(path) = source {
                if !path.exists() {
                    return Err(format!("Source file not found: {}", path.display()).into());
                }
            }
            if *warmup_frames == 0 {
                return Err("Warmup frames must be at least 1".into());
            }
            if *timeout_secs == 0 {
                return Err("Timeout must be at least 1 second".into());
            }
            output
        }
    };

    if let Some(path) = &output.output {
        if !is_image(path) {
            return Err(format!(
                "Output must be an image file ({}), got {}",
                IMAGE_EXTENSIONS.join(", "),
                path.display()
            )
            .into());
        }
    }
    if let Some(dir) = &output.cascade_dir {
        if !dir.is_dir() {
            return Err(format!("Cascade directory not found: {}", dir.display()).into());
        }
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
