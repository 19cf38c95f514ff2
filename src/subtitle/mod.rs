pub mod srt;
pub mod timed_text;

pub use srt::{format_time, render};
pub use timed_text::parse;

use crate::error::Result;

/// A single timed caption cue. Times are in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionRecord {
    pub start_time: f64,
    pub end_time: f64,
    pub text: String,
}

/// Caption cues in source document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptionDocument {
    pub records: Vec<CaptionRecord>,
}

impl CaptionDocument {
    pub fn new(records: Vec<CaptionRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CaptionRecord> {
        self.records.iter()
    }

    /// End time of the last cue, or zero for an empty document.
    pub fn duration(&self) -> f64 {
        self.records.last().map(|r| r.end_time).unwrap_or(0.0)
    }
}

impl<'a> IntoIterator for &'a CaptionDocument {
    type Item = &'a CaptionRecord;
    type IntoIter = std::slice::Iter<'a, CaptionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Parse timed-text XML and render it as SRT in one step.
pub fn convert_xml_to_srt(xml: &str) -> Result<String> {
    let document = parse(xml)?;
    Ok(render(&document))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_xml_to_srt() {
        let xml = r#"<timedtext format="3"><body><p t="1500" d="2500"><s>Test line</s></p></body></timedtext>"#;
        let srt = convert_xml_to_srt(xml).unwrap();
        assert_eq!(srt, "1\n00:00:01,500 --> 00:00:04,000\nTest line\n\n");
    }

    #[test]
    fn test_convert_propagates_malformed_input() {
        assert!(convert_xml_to_srt("<timedtext><p t=\"1\">").is_err());
    }

    #[test]
    fn test_document_duration() {
        assert_eq!(CaptionDocument::default().duration(), 0.0);

        let doc = CaptionDocument::new(vec![CaptionRecord {
            start_time: 1.0,
            end_time: 3.5,
            text: "Hi".to_string(),
        }]);
        assert_eq!(doc.duration(), 3.5);
        assert_eq!(doc.len(), 1);
    }
}
