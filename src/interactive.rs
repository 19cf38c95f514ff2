use crate::source::CaptionTrack;
use console::style;
use dialoguer::{Confirm, Select};
use std::path::Path;

/// Print the caption tracks of a video as a table.
pub fn print_tracks(video: &str, tracks: &[CaptionTrack]) {
    println!();
    println!("{} {}", style("Available captions for").bold(), style(video).cyan());

    if tracks.is_empty() {
        println!("  {} No caption tracks", style("!").yellow());
        println!();
        return;
    }

    for track in tracks {
        println!("  {:<12} {}", style(&track.code).green(), track.name);
    }
    println!();
}

/// Let the user choose one of the tracks.
pub fn choose_track(tracks: &[CaptionTrack], preferred: Option<&str>) -> anyhow::Result<CaptionTrack> {
    if tracks.is_empty() {
        anyhow::bail!("No caption tracks to choose from");
    }

    let items: Vec<String> = tracks
        .iter()
        .map(|t| format!("{} ({})", t.name, t.code))
        .collect();

    let selection = Select::new()
        .with_prompt("Select caption track")
        .items(&items)
        .default(default_index(tracks, preferred))
        .interact()?;

    Ok(tracks[selection].clone())
}

/// Ask before replacing an existing file. Missing files need no confirmation.
pub fn confirm_overwrite(path: &Path) -> anyhow::Result<bool> {
    if !path.exists() {
        return Ok(true);
    }

    Ok(Confirm::new()
        .with_prompt(format!("{} exists. Overwrite?", path.display()))
        .default(false)
        .interact()?)
}

fn default_index(tracks: &[CaptionTrack], preferred: Option<&str>) -> usize {
    preferred
        .and_then(|code| tracks.iter().position(|t| t.code == code))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(code: &str) -> CaptionTrack {
        CaptionTrack {
            code: code.to_string(),
            name: code.to_uppercase(),
            url: String::new(),
        }
    }

    #[test]
    fn test_default_index() {
        let tracks = vec![track("en"), track("ja"), track("a.en")];
        assert_eq!(default_index(&tracks, Some("ja")), 1);
        assert_eq!(default_index(&tracks, Some("fr")), 0);
        assert_eq!(default_index(&tracks, None), 0);
    }

    #[test]
    fn test_confirm_overwrite_missing_file() {
        let path = Path::new("/nonexistent/dir/captions.srt");
        assert!(confirm_overwrite(path).unwrap());
    }
}
