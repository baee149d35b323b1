use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    time::Duration,
};

use clap::{Args, Parser, Subcommand, ValueEnum};
use sceneplay_core::{
    parse_payload, render_frame, render_idle, resolve, AppConfig, FrameStyle, PlaybackController,
    PropertySet, QueueScheduler, RecordingSurface, Scene, ScenePlayError, Surface, SvgSurface,
    SystemClock,
};
use tracing_subscriber::EnvFilter;

fn main() -> sceneplay_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AppConfig::from_json_file(path)?,
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Render {
            source,
            time,
            format,
            output,
        } => run_render(&config, &source, time, format, output.as_deref()),
        Commands::Play { source, svg_dir } => run_play(&config, &source, svg_dir.as_deref()),
        Commands::Inspect { source, time } => run_inspect(&source, time),
    }
}

fn run_render(
    config: &AppConfig,
    source: &SceneSource,
    time: f64,
    format: OutputFormat,
    output: Option<&Path>,
) -> sceneplay_core::Result<()> {
    let scene = source.load()?;
    let style = FrameStyle::from(&config.canvas);
    tracing::info!(time, ?format, idle = scene.is_none(), "rendering single frame");

    let document = match format {
        OutputFormat::Json => {
            let mut surface = RecordingSurface::new();
            draw(&mut surface, scene.as_ref(), time, &style)?;
            serde_json::to_string_pretty(surface.commands())?
        }
        OutputFormat::Svg => {
            let mut surface = SvgSurface::new(style.width, style.height);
            draw(&mut surface, scene.as_ref(), time, &style)?;
            surface.document()
        }
    };

    match output {
        Some(path) => std::fs::write(path, document)?,
        None => println!("{document}"),
    }
    Ok(())
}

fn run_play(
    config: &AppConfig,
    source: &SceneSource,
    svg_dir: Option<&Path>,
) -> sceneplay_core::Result<()> {
    let scene = source
        .load()?
        .ok_or_else(|| ScenePlayError::msg("play needs a scene: pass --scene or --preset"))?;
    let interval = Duration::from_secs_f64(1.0 / f64::from(scene.frame_rate.max(1)));
    tracing::info!(frame_rate = scene.frame_rate, "starting headless playback");

    match svg_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let surface = SvgSurface::new(config.canvas.width, config.canvas.height);
            let mut controller =
                PlaybackController::new(surface, QueueScheduler::new(), SystemClock::start(), config);
            controller.load(scene)?;
            let mut index = 0usize;
            drive(&mut controller, interval, |surface| {
                let path = dir.join(format!("frame_{index:05}.svg"));
                index += 1;
                std::fs::write(path, surface.take_document())?;
                Ok(())
            })
        }
        None => {
            let mut controller = PlaybackController::new(
                RecordingSurface::new(),
                QueueScheduler::new(),
                SystemClock::start(),
                config,
            );
            controller.load(scene)?;
            drive(&mut controller, interval, |surface| {
                tracing::debug!(commands = surface.commands().len(), "frame drawn");
                surface.clear();
                Ok(())
            })
        }
    }
}

/// Host loop: plays from the start and hands every painted frame to
/// `on_frame` until playback parks on its last frame.
fn drive<S: Surface>(
    controller: &mut PlaybackController<S, QueueScheduler, SystemClock>,
    interval: Duration,
    mut on_frame: impl FnMut(&mut S) -> sceneplay_core::Result<()>,
) -> sceneplay_core::Result<()> {
    controller.play();
    on_frame(controller.surface_mut())?;

    while controller.pump()? {
        on_frame(controller.surface_mut())?;
        tracing::debug!(readout = %controller.readout(), "tick");
        if controller.is_playing() {
            std::thread::sleep(interval);
        }
    }

    tracing::info!(
        readout = %controller.readout(),
        frames = controller.frames_rendered(),
        "playback finished"
    );
    Ok(())
}

fn run_inspect(source: &SceneSource, time: f64) -> sceneplay_core::Result<()> {
    let Some(scene) = source.load()? else {
        println!("{{}}");
        return Ok(());
    };
    let resolved: BTreeMap<String, PropertySet> = scene
        .layers
        .iter()
        .map(|layer| (layer.id.clone(), resolve(layer, time)))
        .collect();
    println!("{}", serde_json::to_string_pretty(&resolved)?);
    Ok(())
}

fn draw<S: Surface>(
    surface: &mut S,
    scene: Option<&Scene>,
    time: f64,
    style: &FrameStyle,
) -> sceneplay_core::Result<()> {
    match scene {
        Some(scene) => render_frame(surface, scene, time, style),
        None => render_idle(surface, style),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Declarative scene animation player", long_about = None)]
struct Cli {
    /// JSON configuration file (canvas size, background, autoplay).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a single frame at a given time.
    Render {
        #[command(flatten)]
        source: SceneSource,
        /// Scene time in milliseconds.
        #[arg(short, long, default_value_t = 0.0)]
        time: f64,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Write to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Play a scene in real time until it completes.
    Play {
        #[command(flatten)]
        source: SceneSource,
        /// Write every painted frame as an SVG file into this directory.
        #[arg(long)]
        svg_dir: Option<PathBuf>,
    },
    /// Print the resolved properties of every layer at a given time.
    Inspect {
        #[command(flatten)]
        source: SceneSource,
        #[arg(short, long, default_value_t = 0.0)]
        time: f64,
    },
}

#[derive(Args, Debug)]
struct SceneSource {
    /// Scene description file. Bare scenes and answer envelopes are accepted.
    #[arg(short, long, conflicts_with = "preset")]
    scene: Option<PathBuf>,
    /// Built-in demo scene: basic, hydrogen or water.
    #[arg(short, long)]
    preset: Option<String>,
}

impl SceneSource {
    fn load(&self) -> sceneplay_core::Result<Option<Scene>> {
        if let Some(path) = &self.scene {
            let raw = std::fs::read_to_string(path)?;
            return Ok(parse_payload(&raw)?.map(Scene::from_description));
        }
        match &self.preset {
            Some(name) => Scene::preset(name).map(Some).ok_or_else(|| {
                ScenePlayError::msg(format!(
                    "unknown preset `{name}` (available: {})",
                    Scene::preset_names().join(", ")
                ))
            }),
            None => Ok(None),
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Svg,
}
