pub mod config;
pub mod error;
pub mod interactive;
pub mod pipeline;
pub mod source;
pub mod subtitle;

pub use config::Config;
pub use error::{Result, YtsrtError};
pub use pipeline::{download_captions, print_summary, PipelineConfig, PipelineResult, PipelineStats};
pub use source::{CaptionSource, CaptionTrack, YouTubeClient};
pub use subtitle::{convert_xml_to_srt, CaptionDocument, CaptionRecord};
