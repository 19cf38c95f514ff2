// Timed-text (srv3) caption XML
//
// <timedtext format="3">
//   <body>
//     <p t="1500" d="2500"><s>Hello</s><s t="400"> world</s></p>
//   </body>
// </timedtext>
//
// `p` is a cue with start offset `t` and duration `d` in milliseconds, `s`
// holds one text segment of the cue.
use super::{CaptionDocument, CaptionRecord};
use crate::error::{Result, YtsrtError};
use tracing::debug;
use xml::attribute::OwnedAttribute;
use xml::reader::{ParserConfig, XmlEvent};

const CUE_ELEMENT: &str = "p";
const SEGMENT_ELEMENT: &str = "s";
const START_ATTRIBUTE: &str = "t";
const DURATION_ATTRIBUTE: &str = "d";

/// A `p` element whose end tag has not been seen yet.
struct OpenCue {
    /// Position reserved in the output so nested cues keep document order.
    slot: usize,
    depth: usize,
    start_ms: i64,
    duration_ms: i64,
    segments: Vec<String>,
}

/// An `s` element whose end tag has not been seen yet.
struct OpenSegment {
    depth: usize,
    text: String,
    /// Set once a child element starts; only leading character data counts.
    text_closed: bool,
}

/// Parse timed-text caption XML into a caption document.
///
/// Cues are found at any depth below the document element. Only direct
/// `s` children of a cue contribute text; each segment is trimmed and the
/// segments are joined with a single space. Cues whose joined text is
/// empty are dropped.
///
/// Fails with [`YtsrtError::MalformedInput`] if the XML is not well-formed
/// or a timing attribute is present but not an integer.
pub fn parse(xml: &str) -> Result<CaptionDocument> {
    let reader = ParserConfig::new()
        .trim_whitespace(false)
        .whitespace_to_characters(true)
        .cdata_to_characters(true)
        .ignore_comments(true)
        .allow_multiple_root_elements(false)
        .create_reader(xml.as_bytes());

    let mut slots: Vec<Option<CaptionRecord>> = Vec::new();
    let mut cues: Vec<OpenCue> = Vec::new();
    let mut segments: Vec<OpenSegment> = Vec::new();
    let mut depth = 0usize;

    for event in reader {
        let event = event.map_err(|e| YtsrtError::MalformedInput(e.to_string()))?;

        match event {
            XmlEvent::StartElement {
                name, attributes, ..
            } => {
                depth += 1;

                if let Some(segment) = segments.last_mut() {
                    segment.text_closed = true;
                }

                // The document element itself is never a cue.
                if name.local_name == CUE_ELEMENT && depth > 1 {
                    cues.push(OpenCue {
                        slot: slots.len(),
                        depth,
                        start_ms: parse_millis(&attributes, START_ATTRIBUTE)?,
                        duration_ms: parse_millis(&attributes, DURATION_ATTRIBUTE)?,
                        segments: Vec::new(),
                    });
                    slots.push(None);
                } else if name.local_name == SEGMENT_ELEMENT
                    && cues.last().is_some_and(|cue| cue.depth + 1 == depth)
                {
                    segments.push(OpenSegment {
                        depth,
                        text: String::new(),
                        text_closed: false,
                    });
                }
            }
            XmlEvent::Characters(text) => {
                if let Some(segment) = segments.last_mut() {
                    if segment.depth == depth && !segment.text_closed {
                        segment.text.push_str(&text);
                    }
                }
            }
            XmlEvent::EndElement { .. } => {
                if segments.last().is_some_and(|s| s.depth == depth) {
                    if let (Some(segment), Some(cue)) = (segments.pop(), cues.last_mut()) {
                        cue.segments.push(segment.text.trim().to_string());
                    }
                } else if cues.last().is_some_and(|c| c.depth == depth) {
                    if let Some(cue) = cues.pop() {
                        let slot = cue.slot;
                        slots[slot] = close_cue(cue);
                    }
                }
                depth = depth.saturating_sub(1);
            }
            _ => {}
        }
    }

    let records: Vec<CaptionRecord> = slots.into_iter().flatten().collect();
    debug!("Parsed {} captions from timed-text XML", records.len());

    Ok(CaptionDocument::new(records))
}

/// Turn a finished cue into a record, or `None` if it has no text.
fn close_cue(cue: OpenCue) -> Option<CaptionRecord> {
    let text = cue.segments.join(" ");
    let text = text.trim();

    if text.is_empty() {
        return None;
    }

    let start_time = cue.start_ms as f64 / 1000.0;
    let duration = cue.duration_ms as f64 / 1000.0;

    Some(CaptionRecord {
        start_time,
        end_time: start_time + duration,
        text: text.to_string(),
    })
}

/// Read an integer millisecond attribute. Absent means 0.
fn parse_millis(attributes: &[OwnedAttribute], name: &str) -> Result<i64> {
    match attributes.iter().find(|a| a.name.local_name == name) {
        None => Ok(0),
        Some(attr) => attr.value.trim().parse::<i64>().map_err(|_| {
            YtsrtError::MalformedInput(format!(
                "attribute '{}' is not an integer: {:?}",
                name, attr.value
            ))
        }),
    }
}
