//! Human Amplifier runner (default binary).
//!
//! Without GPIO drivers attached this runs the full state machine against
//! simulated audio, with the LED strips drawn in the terminal. Pass
//! `--keyboard` to drive the buttons from the keyboard and `--headless` to skip
//! the preview.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::runtime::Runtime;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use human_amplifier::audio::{EffectCatalog, MockAudio, TrackRegistry};
use human_amplifier::core::{ButtonReader, ButtonSampler, MonotonicClock};
use human_amplifier::engine::{AppConfig, GameManager, ShutdownSignal, StripRole};
use human_amplifier::input::{KeyboardSampler, ScriptedSampler};
use human_amplifier::term::{FrameBuffer, PreviewStatus, PreviewStrip, StripPreview, TerminalRenderer};
use human_amplifier::types::{LedStrip, Pixel, PixelBuffer};

const DEFAULT_LOG_FILE: &str = "human-amplifier.log";

#[derive(Parser)]
#[command(name = "human-amplifier", version, about = "Button, LED and music installation controller")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the installation (default).
    Run(RunArgs),
    /// Load and validate a config, then exit.
    CheckConfig {
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the effective config as JSON.
    PrintConfig {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args, Default)]
struct RunArgs {
    /// JSON config file; built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// No terminal preview.
    #[arg(long)]
    headless: bool,
    /// Digit keys toggle buttons, q quits.
    #[arg(long)]
    keyboard: bool,
    /// Override the config seed.
    #[arg(long)]
    seed: Option<u32>,
    /// Write logs here. With the preview on, logs go to human-amplifier.log
    /// unless this is set.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Run(RunArgs::default())) {
        Command::Run(args) => run(args),
        Command::CheckConfig { config } => {
            init_tracing(None)?;
            let config = load_config(config.as_deref())?;
            if config.audio.verify_assets {
                build_audio(&config, MonotonicClock::new())?;
            }
            println!(
                "config ok: {} buttons, {} strips, {} ms frames",
                config.button_count(),
                config.strips.len(),
                config.timing.frame_ms
            );
            Ok(())
        }
        Command::PrintConfig { config } => {
            let config = load_config(config.as_deref())?;
            println!("{}", config.to_json_pretty()?);
            Ok(())
        }
    }
}

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => {
            AppConfig::load(path).with_context(|| format!("loading config {}", path.display()))
        }
        None => Ok(AppConfig::default()),
    }
}

fn build_audio(config: &AppConfig, clock: MonotonicClock) -> Result<MockAudio<MonotonicClock>> {
    let sounds = &config.audio.sounds_dir;
    if config.audio.verify_assets {
        EffectCatalog::verify(sounds)?;
    }
    let mut audio = MockAudio::new(clock)
        .with_seed(config.seed)
        .with_track_ms(config.audio.track_ms);
    match &config.audio.registry {
        Some(path) => {
            let registry = TrackRegistry::load(path, config.code.length)
                .with_context(|| format!("loading track registry {}", path.display()))?;
            if config.audio.verify_assets {
                EffectCatalog::verify_tracks(sounds, &registry)?;
            }
            audio = audio.with_registry(registry);
        }
        None => warn!("no track registry configured, every code will be rejected"),
    }
    Ok(audio)
}

/// Keeps a runtime alive that flips the stop flag on Ctrl-C.
struct SignalWatcher {
    _rt: Runtime,
}

impl SignalWatcher {
    fn start(signal: ShutdownSignal) -> Result<Self> {
        let rt = Runtime::new().context("creating signal runtime")?;
        rt.spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupt received, stopping");
                signal.request();
            }
        });
        Ok(Self { _rt: rt })
    }
}

fn run(args: RunArgs) -> Result<()> {
    let preview = !args.headless;
    let log_file = match (&args.log_file, preview) {
        (Some(path), _) => Some(path.clone()),
        (None, true) => Some(PathBuf::from(DEFAULT_LOG_FILE)),
        (None, false) => None,
    };
    init_tracing(log_file.as_deref())?;

    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let signal = ShutdownSignal::new();
    let _watcher = SignalWatcher::start(signal.clone())?;
    let clock = MonotonicClock::new();
    let audio = build_audio(&config, clock)?;

    if args.keyboard {
        let mut sampler = KeyboardSampler::new(config.button_count(), signal.shared_flag());
        if preview {
            sampler = sampler.without_raw_mode();
        }
        drive(&config, sampler, audio, clock, preview, &signal)
    } else {
        warn!("no button hardware backend in this build, buttons stay released");
        let (sampler, _handle) = ScriptedSampler::new(config.button_count());
        drive(&config, sampler, audio, clock, preview, &signal)
    }
}

fn drive<S: ButtonSampler>(
    config: &AppConfig,
    sampler: S,
    audio: MockAudio<MonotonicClock>,
    clock: MonotonicClock,
    preview: bool,
    signal: &ShutdownSignal,
) -> Result<()> {
    let reader = ButtonReader::new(sampler)?;

    if !preview {
        let strips: Vec<Box<dyn LedStrip>> = config
            .strips
            .iter()
            .map(|s| Box::new(PixelBuffer::new(s.pixels)) as Box<dyn LedStrip>)
            .collect();
        let mut manager = GameManager::new(config, reader, strips, audio, clock)?;
        manager.run(signal.flag())?;
        return Ok(());
    }

    let mut strips: Vec<Box<dyn LedStrip>> = Vec::with_capacity(config.strips.len());
    let mut views = Vec::with_capacity(config.strips.len());
    for s in &config.strips {
        let strip = PreviewStrip::new(s.pixels);
        views.push(strip.view());
        strips.push(Box::new(strip));
    }
    let labels = config
        .strips
        .iter()
        .map(|s| match s.role {
            StripRole::Buttons => "buttons".to_string(),
            StripRole::Pyramid => "pyramid".to_string(),
        })
        .collect();
    let layout = StripPreview::new(labels);
    let mut manager = GameManager::new(config, reader, strips, audio, clock)?;

    let mut term = TerminalRenderer::new();
    term.enter()?;
    let mut fb = FrameBuffer::new(80, layout.height(views.len()));
    let mut pixels: Vec<Vec<Pixel>> = vec![Vec::new(); views.len()];

    let result = manager.run_with(signal.flag(), |report| -> Result<()> {
        let (width, _) = crossterm::terminal::size().unwrap_or((80, 24));
        fb.resize(width, layout.height(views.len()));
        for (view, out) in views.iter().zip(pixels.iter_mut()) {
            view.copy_into(out);
        }
        layout.render(
            &mut fb,
            &pixels,
            PreviewStatus {
                state: report.state,
                frame: report.frame,
                held: &report.pressed,
            },
        );
        term.draw(&fb)
    });

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}
