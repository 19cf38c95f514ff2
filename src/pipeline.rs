use crate::error::Result;
use crate::source::{select_track, CaptionSource, CaptionTrack};
use crate::subtitle::{parse, render, CaptionDocument};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Number of raw XML characters shown in debug output.
const XML_PREVIEW_CHARS: usize = 500;

/// Configuration for the caption download pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Show progress spinners.
    pub show_progress: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
        }
    }
}

/// Statistics from one caption download.
#[derive(Debug, Clone)]
pub struct PipelineStats {
    /// Total time taken for the entire pipeline.
    pub total_time: Duration,
    /// Time spent listing and downloading from the caption source.
    pub download_time: Duration,
    /// Number of tracks the video offers.
    pub tracks_available: usize,
    /// Number of captions kept after parsing.
    pub captions_parsed: usize,
    /// Size of the written SRT file.
    pub srt_bytes: usize,
}

/// Result of the caption download pipeline.
#[derive(Debug)]
pub struct PipelineResult {
    /// Path to the written SRT file.
    pub output_path: PathBuf,
    /// Track that was downloaded.
    pub track: CaptionTrack,
    /// Parsed captions.
    pub document: CaptionDocument,
    pub stats: PipelineStats,
}

/// Download a caption track for `video` and save it as SRT.
///
/// Steps:
/// 1. List the tracks offered for the video
/// 2. Pick the one matching `language`, or the first track
/// 3. Download its timed-text XML
/// 4. Parse and render as SRT
/// 5. Write the output file
///
/// Any failure aborts before the output file is touched.
pub async fn download_captions(
    source: &dyn CaptionSource,
    video: &str,
    language: Option<&str>,
    output: &Path,
    config: &PipelineConfig,
) -> Result<PipelineResult> {
    let start_time = Instant::now();

    info!("Fetching caption tracks for {} from {}", video, source.name());
    let spinner = spinner(config.show_progress, "Fetching caption tracks...");

    let tracks = source.list_available_captions(video).await?;
    log_tracks(&tracks);

    let track = select_track(&tracks, language, video)?.clone();

    save_track(source, track, tracks.len(), output, spinner, start_time).await
}

/// Download an already chosen track and save it as SRT.
///
/// Skips the track listing; `tracks_available` is only reported in the
/// stats.
pub async fn download_track(
    source: &dyn CaptionSource,
    track: CaptionTrack,
    tracks_available: usize,
    output: &Path,
    config: &PipelineConfig,
) -> Result<PipelineResult> {
    let start_time = Instant::now();
    let spinner = spinner(config.show_progress, "Preparing download...");
    save_track(source, track, tracks_available, output, spinner, start_time).await
}

async fn save_track(
    source: &dyn CaptionSource,
    track: CaptionTrack,
    tracks_available: usize,
    output: &Path,
    spinner: Option<ProgressBar>,
    start_time: Instant,
) -> Result<PipelineResult> {
    info!("Selected track: {} ({})", track.code, track.name);

    if let Some(pb) = &spinner {
        pb.set_message(format!("Downloading {} captions...", track.code));
    }

    let xml = source.download_track(&track).await?;
    let download_time = start_time.elapsed();
    debug!("Raw XML captions: {}", xml_preview(&xml));

    let document = parse(&xml)?;
    let srt = render(&document);

    write_text_file(output, &srt).await?;

    if let Some(pb) = spinner {
        pb.finish_with_message(format!("✓ Saved {} captions", document.len()));
    }

    info!("Captions saved to {}", output.display());
    info!("Total captions parsed: {}", document.len());

    let stats = PipelineStats {
        total_time: start_time.elapsed(),
        download_time,
        tracks_available,
        captions_parsed: document.len(),
        srt_bytes: srt.len(),
    };

    Ok(PipelineResult {
        output_path: output.to_path_buf(),
        track,
        document,
        stats,
    })
}

/// List the caption tracks of a video and log them.
pub async fn list_captions(source: &dyn CaptionSource, video: &str) -> Result<Vec<CaptionTrack>> {
    let tracks = source.list_available_captions(video).await?;
    log_tracks(&tracks);
    Ok(tracks)
}

/// Persist rendered subtitle text.
pub async fn write_text_file(path: &Path, content: &str) -> Result<()> {
    debug!("Writing {} bytes to {:?}", content.len(), path);
    tokio::fs::write(path, content).await?;
    Ok(())
}

fn log_tracks(tracks: &[CaptionTrack]) {
    info!("Available captions: {}", tracks.len());
    for track in tracks {
        info!("  Code: {}, Language: {}", track.code, track.name);
    }
}

fn xml_preview(xml: &str) -> String {
    if xml.chars().count() > XML_PREVIEW_CHARS {
        let head: String = xml.chars().take(XML_PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        xml.to_string()
    }
}

fn spinner(enabled: bool, message: &str) -> Option<ProgressBar> {
    if !enabled {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

/// Print a summary of the pipeline results.
pub fn print_summary(result: &PipelineResult) {
    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("                     Caption Download Complete                  ");
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    println!("  Output:     {}", result.output_path.display());
    println!("  Track:      {} ({})", result.track.code, result.track.name);
    println!("  Captions:   {}", result.stats.captions_parsed);
    println!("  Tracks:     {} available", result.stats.tracks_available);
    println!("  Covers:     {:.1}s", result.document.duration());
    println!("  Size:       {} bytes", result.stats.srt_bytes);
    println!();
    println!("  Timing:");
    println!(
        "    Download:    {:.2}s",
        result.stats.download_time.as_secs_f64()
    );
    println!(
        "    Total:       {:.2}s",
        result.stats.total_time.as_secs_f64()
    );
    println!();
    println!("═══════════════════════════════════════════════════════════════");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_config_default() {
        let config = PipelineConfig::default();
        assert!(config.show_progress);
    }

    #[test]
    fn test_xml_preview_truncates() {
        let xml = "x".repeat(600);
        let preview = xml_preview(&xml);
        assert_eq!(preview.len(), XML_PREVIEW_CHARS + 3);
        assert!(preview.ends_with("..."));

        assert_eq!(xml_preview("<timedtext/>"), "<timedtext/>");
    }

    #[test]
    fn test_spinner_disabled() {
        assert!(spinner(false, "quiet").is_none());
    }
}
