use anyhow::{Context, Result};
use barseg_core::{GlobalConfig, IconPosition, IconStyle, MouseButton, WaybarRenderer};
use barseg_segments::{SegmentKind, SegmentSet};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod click;
mod pipeline;

#[derive(Parser)]
#[command(name = "barseg")]
#[command(about = "Status bar segments for Waybar")]
#[command(version)]
struct Args {
    /// Config file (default: ~/.config/barseg/config.ron)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(flatten)]
    display: DisplayArgs,

    #[command(subcommand)]
    command: Command,
}

/// Overrides for the icon settings in the config file.
#[derive(clap::Args, Debug, Clone, Default)]
struct DisplayArgs {
    /// Icon style (nerdfont, none)
    #[arg(long, global = true)]
    icon_style: Option<IconStyle>,

    /// Icon position relative to the text (before, after)
    #[arg(long, global = true)]
    icon_position: Option<IconPosition>,
}

#[derive(Subcommand)]
enum Command {
    /// Render metric snapshots read as JSON lines from stdin
    Render {
        /// Exit after the first rendered line
        #[arg(short, long)]
        once: bool,
    },
    /// Print the clock segment on an interval
    Clock {
        /// Update interval in milliseconds
        #[arg(
            short = 't',
            long,
            default_value = "1000",
            value_parser = clap::value_parser!(u64).range(100..)
        )]
        interval: u64,

        /// One-shot mode (don't loop)
        #[arg(short, long)]
        once: bool,
    },
    /// Launch the click command of a segment (load, memory, clock)
    Click {
        segment: SegmentKind,

        /// Button that was clicked (left, middle, right)
        #[arg(short, long, default_value = "left")]
        button: MouseButton,
    },
    /// Generate example config file and exit
    GenerateConfig {
        /// Where to write it (default: ~/.config/barseg/config.ron)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "barseg=info,barseg_core=info,barseg_segments=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load the config, falling back to defaults if it cannot be read, then
/// apply the command line overrides.
fn load_config(path: Option<&Path>, display: &DisplayArgs) -> GlobalConfig {
    let loaded = match path {
        Some(path) => GlobalConfig::load_from_file(path),
        None => GlobalConfig::load(),
    };
    let mut config = loaded.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load config, using defaults");
        GlobalConfig::default()
    });

    if let Some(style) = display.icon_style {
        config.icon_style = style;
    }
    if let Some(position) = display.icon_position {
        config.icon_position = position;
    }
    config
}

fn segment_set(config: &GlobalConfig) -> SegmentSet {
    SegmentSet::from_config(config).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "invalid segment policy, using defaults");
        SegmentSet::default()
    })
}

fn generate_config(path: Option<PathBuf>) -> Result<()> {
    let path = path
        .or_else(GlobalConfig::default_config_path)
        .context("Could not determine config directory")?;
    GlobalConfig::save_example_config_to_file(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Generated example config at: {}", path.display());
    println!("\nYou can now edit this file to customize colors, icons and thresholds.");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let config_path = args.config.as_deref();
    let mut stdout = std::io::stdout();

    match args.command {
        Command::Render { once } => {
            let config = load_config(config_path, &args.display);
            let renderer = WaybarRenderer::from_config(&config);
            let segments = segment_set(&config);
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            pipeline::render_stream(stdin, &mut stdout, &segments, &renderer, once).await?;
        }
        Command::Clock { interval, once } => {
            let config = load_config(config_path, &args.display);
            let renderer = WaybarRenderer::from_config(&config);
            let segments = segment_set(&config);
            pipeline::tick_clock(
                &mut stdout,
                &segments.clock,
                &renderer,
                Duration::from_millis(interval),
                once,
            )
            .await?;
        }
        Command::Click { segment, button } => {
            let config = load_config(config_path, &args.display);
            let action = segment
                .click_action(&config.commands)
                .with_context(|| format!("Segment '{segment}' has no click action"))?;
            click::dispatch(action, button)?;
        }
        Command::GenerateConfig { path } => generate_config(path)?,
    }

    Ok(())
}
