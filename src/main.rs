use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use ytsrt::config::{ClientProfile, Config};
use ytsrt::interactive;
use ytsrt::pipeline::{self, PipelineConfig};
use ytsrt::source::{CaptionSource, YouTubeClient};

#[derive(Parser)]
#[command(name = "ytsrt")]
#[command(version, about = "Download YouTube captions as SRT subtitles")]
#[command(long_about = "Download a caption track of a YouTube video and convert it from YouTube's timed-text XML to SubRip (.srt).")]
struct Cli {
    /// Video URL or id
    video: String,

    /// Output subtitle file (defaults to captions.srt)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Caption language code (e.g., en, a.en, ja); defaults to the first track
    #[arg(short, long)]
    language: Option<String>,

    /// List available caption tracks and exit
    #[arg(long)]
    list: bool,

    /// Choose the caption track from a menu
    #[arg(short, long)]
    interactive: bool,

    /// InnerTube client: android, ios, web, android_music, ios_music
    #[arg(long)]
    client: Option<String>,

    /// Override the InnerTube client version
    #[arg(long)]
    client_version: Option<String>,

    /// Save the effective client, language and output settings as defaults
    #[arg(long)]
    save_config: bool,

    /// Disable progress spinners
    #[arg(long)]
    no_progress: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// `RUST_LOG` takes precedence over the `--verbose` level.
fn log_filter(verbose: bool) -> EnvFilter {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy()
}

fn init_logging(verbose: bool) {
    FmtSubscriber::builder()
        .with_env_filter(log_filter(verbose))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

/// Layer CLI flags over the loaded configuration.
fn apply_cli(config: &mut Config, cli: &Cli) -> Result<()> {
    if let Some(ref client) = cli.client {
        config.client.profile = client
            .parse::<ClientProfile>()
            .map_err(|e: String| anyhow::anyhow!(e))?;
    }
    if let Some(ref version) = cli.client_version {
        config.client.version = Some(version.clone());
    }
    if let Some(ref language) = cli.language {
        config.default_language = Some(language.clone());
    }
    if let Some(ref output) = cli.output {
        config.output = output.clone();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let mut config = Config::load().context("Failed to load configuration")?;
    apply_cli(&mut config, &cli)?;
    config
        .validate()
        .context("Configuration validation failed")?;

    if cli.save_config {
        let path = config.save().context("Failed to save configuration")?;
        info!("Saved configuration to {}", path.display());
    }

    info!("Video:    {}", cli.video);
    info!(
        "Client:   {} {}",
        config.client.profile,
        config.client.effective_version()
    );

    let client = YouTubeClient::new(
        config.client.clone(),
        Duration::from_secs(config.timeout_secs),
    )
    .context("Failed to create YouTube client")?;

    if cli.list {
        let tracks = pipeline::list_captions(&client, &cli.video)
            .await
            .context("Failed to list caption tracks")?;
        interactive::print_tracks(&cli.video, &tracks);
        return Ok(());
    }

    let pipeline_config = PipelineConfig {
        show_progress: !cli.no_progress,
    };

    let result = if cli.interactive {
        let tracks = client
            .list_available_captions(&cli.video)
            .await
            .context("Failed to list caption tracks")?;
        let track = interactive::choose_track(&tracks, config.default_language.as_deref())?;

        if !interactive::confirm_overwrite(&config.output)? {
            anyhow::bail!("Cancelled by user");
        }

        info!("Output:   {}", config.output.display());
        pipeline::download_track(&client, track, tracks.len(), &config.output, &pipeline_config)
            .await
    } else {
        info!(
            "Language: {}",
            config.default_language.as_deref().unwrap_or("first available")
        );
        info!("Output:   {}", config.output.display());
        pipeline::download_captions(
            &client,
            &cli.video,
            config.default_language.as_deref(),
            &config.output,
            &pipeline_config,
        )
        .await
    }
    .with_context(|| format!("Failed to download captions for {}", cli.video))?;

    pipeline::print_summary(&result);

    Ok(())
}
