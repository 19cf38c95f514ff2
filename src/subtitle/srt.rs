// SRT subtitle format
use super::CaptionDocument;

/// Render a caption document as SubRip text.
///
/// Entries are numbered from 1 in document order. Every entry, including
/// the last, is followed by a blank line.
pub fn render(document: &CaptionDocument) -> String {
    let mut output = String::new();

    for (i, record) in document.iter().enumerate() {
        output.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            format_time(record.start_time),
            format_time(record.end_time),
            record.text
        ));
    }

    output
}

/// Format seconds as an SRT timecode (`HH:MM:SS,mmm`).
///
/// Every field is truncated, never rounded. Hours are not wrapped and widen
/// past two digits.
pub fn format_time(seconds: f64) -> String {
    let hours = (seconds / 3600.0).floor() as i64;
    let minutes = (seconds.rem_euclid(3600.0) / 60.0).floor() as i64;
    let secs = seconds.rem_euclid(60.0) as i64;
    let millis = ((seconds - seconds.trunc()) * 1000.0) as i64;
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}
