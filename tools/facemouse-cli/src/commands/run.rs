//! Run the pointer controller.

use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, ValueEnum};
use facemouse_common::config::{AppConfig, ControllerConfig, LoggingConfig, ParameterDefaults};
use facemouse_controller::actuators::{VirtualActuator, XdotoolActuator};
use facemouse_controller::sources::{JsonlFrameSource, Paced, RecordedLandmarkDetector};
use facemouse_controller::status::HELP_LINES;
use facemouse_controller::writer::JsonlWriter;
use facemouse_controller::{
    Actuator, Controller, FrameSource, ParameterSnapshot, SharedParameters,
};
use facemouse_landmark_model::ScreenSize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ActuatorKind {
    /// Drive the X11 pointer with xdotool
    Xdotool,
    /// Simulated desktop; actions are written to --output
    Record,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Landmark JSONL file, or `-` for stdin
    #[arg(short, long, default_value = "-")]
    input: String,

    /// Deliver frames no faster than their timestamps
    #[arg(long)]
    realtime: bool,

    /// Pointer backend
    #[arg(long, value_enum, default_value = "xdotool")]
    actuator: ActuatorKind,

    /// Action log for the `record` backend
    #[arg(short, long, default_value = "facemouse-actions.jsonl")]
    output: PathBuf,

    /// Screen width for the `record` backend
    #[arg(long, default_value = "1920")]
    screen_width: u32,

    /// Screen height for the `record` backend
    #[arg(long, default_value = "1080")]
    screen_height: u32,

    /// Pointer sensitivity (1-20)
    #[arg(long, default_value = "5")]
    sensitivity: u32,

    /// Smoothness in tenths (0-20; 10 = no smoothing)
    #[arg(long, default_value = "5")]
    smoothness: u32,

    /// Landmarks come from an unmirrored camera image
    #[arg(long)]
    unmirrored: bool,

    /// Lip gap in pixels above which the mouth counts as open
    #[arg(long, default_value = "15")]
    mouth_threshold: u32,

    /// Keep gesture latches while the face or hand is out of view
    #[arg(long)]
    keep_latches_on_absence: bool,

    /// Consecutive capture failures to skip before stopping
    #[arg(long, default_value = "0")]
    max_capture_retries: u32,

    /// Start with tracking paused
    #[arg(long)]
    start_paused: bool,

    /// Write a JSONL report per frame (signals, decisions, status)
    #[arg(long)]
    status_out: Option<PathBuf>,
}

impl RunArgs {
    fn app_config(&self, logging: LoggingConfig) -> AppConfig {
        AppConfig {
            controller: ControllerConfig {
                mouth_open_threshold_px: self.mouth_threshold,
                mirrored: !self.unmirrored,
                reset_latches_on_absence: !self.keep_latches_on_absence,
                start_tracking: !self.start_paused,
                max_capture_retries: self.max_capture_retries,
            },
            parameters: ParameterDefaults {
                sensitivity: self.sensitivity,
                smoothness_raw: self.smoothness,
            },
            logging,
        }
    }

    fn open_source(&self) -> anyhow::Result<Box<dyn FrameSource>> {
        let source: Box<dyn FrameSource> = match (self.input.as_str(), self.realtime) {
            ("-", false) => Box::new(JsonlFrameSource::stdin()),
            ("-", true) => Box::new(Paced::new(JsonlFrameSource::stdin())),
            (path, false) => Box::new(JsonlFrameSource::from_path(path)?),
            (path, true) => Box::new(Paced::new(JsonlFrameSource::from_path(path)?)),
        };
        Ok(source)
    }

    fn open_actuator(&self) -> anyhow::Result<Box<dyn Actuator>> {
        match self.actuator {
            ActuatorKind::Xdotool => {
                let xdotool = XdotoolActuator::new();
                if !xdotool.is_available() {
                    anyhow::bail!("xdotool is not available; install it or use --actuator record");
                }
                Ok(Box::new(xdotool))
            }
            ActuatorKind::Record => {
                let screen = ScreenSize::new(self.screen_width, self.screen_height);
                let desktop = VirtualActuator::recording(screen, &self.output)
                    .with_context(|| format!("Failed to create {}", self.output.display()))?;
                Ok(Box::new(desktop))
            }
        }
    }
}

pub async fn run(args: RunArgs, logging: LoggingConfig) -> anyhow::Result<()> {
    let config = args.app_config(logging);
    config.validate()?;

    let source = args.open_source()?;
    let actuator = args.open_actuator()?;
    let params = Arc::new(SharedParameters::new(ParameterSnapshot::from(
        &config.parameters,
    )));
    let mut status_writer = args
        .status_out
        .as_ref()
        .map(JsonlWriter::create)
        .transpose()?;

    let mut controller = Controller::new(
        &config.controller,
        source,
        Box::new(RecordedLandmarkDetector::new()),
        actuator,
        Box::new(params),
    );

    for line in HELP_LINES {
        eprintln!("  {line}");
    }
    eprintln!();

    let stop = controller.stop_flag();
    let quit = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Quit requested");
            stop.store(true, Ordering::SeqCst);
        }
    });

    let summary = tokio::task::spawn_blocking(move || {
        controller.run_with(|report| {
            if let Some(writer) = status_writer.as_mut() {
                if let Err(e) = writer.write_record(report) {
                    tracing::warn!(error = %e, "Failed to write frame report");
                }
            }
        })
    })
    .await
    .context("Controller task panicked")??;
    quit.abort();

    println!("Frames:  {}", summary.frames);
    println!("Clicks:  {}", summary.clicks);
    println!("Toggles: {}", summary.toggles);
    println!("Stopped: {}", summary.stop_reason);
    if args.actuator == ActuatorKind::Record {
        println!("Actions: {}", args.output.display());
    }

    Ok(())
}
