//! Integration tests for ytsrt
//!
//! These tests exercise the caption conversion pipeline and configuration
//! without network access.

use ytsrt::config::{ClientConfig, ClientProfile, Config};
use ytsrt::subtitle::{convert_xml_to_srt, format_time, parse, render, CaptionRecord};
use ytsrt::YtsrtError;

// ============================================================================
// Conversion Tests
// ============================================================================

mod conversion_tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8" ?>
<timedtext format="3">
<head>
  <ws id="0"/>
</head>
<body>
<p t="0" d="2400" w="1"><s ac="0">Recently,</s><s t="480" ac="0"> my</s><s t="800" ac="0"> podcast</s></p>
<p t="2400" d="60" w="1" a="1">
</p>
<p t="2460" d="3000" w="1"><s ac="0">team</s><s t="400" ac="0"> was in</s><s t="900" ac="0"> Australia</s></p>
<p t="5460" d="1000"><s>   </s></p>
<p t="3723004"><s>Much later</s></p>
</body>
</timedtext>"#;

    #[test]
    fn test_realistic_track() {
        let doc = parse(SAMPLE).unwrap();

        assert_eq!(doc.len(), 3);
        assert_eq!(doc.records[0].text, "Recently, my podcast");
        assert_eq!(doc.records[1].text, "team was in Australia");
        assert_eq!(doc.records[1].start_time, 2.46);
        assert_eq!(doc.records[2].start_time, doc.records[2].end_time);
    }

    #[test]
    fn test_realistic_track_to_srt() {
        let srt = convert_xml_to_srt(SAMPLE).unwrap();

        // Milliseconds are truncated from the binary value, so 2.4s is 02,399.
        let expected = "1\n00:00:00,000 --> 00:00:02,399\nRecently, my podcast\n\n\
                        2\n00:00:02,459 --> 00:00:05,459\nteam was in Australia\n\n\
                        3\n01:02:03,003 --> 01:02:03,003\nMuch later\n\n";
        assert_eq!(srt, expected);
    }

    #[test]
    fn test_dropped_cues_leave_no_index_gaps() {
        let xml = r#"<timedtext><body>
            <p t="0" d="1000"><s>one</s></p>
            <p t="1000" d="1000"><s></s><s>  </s></p>
            <p t="2000" d="1000"><s>two</s></p>
        </body></timedtext>"#;

        let srt = convert_xml_to_srt(xml).unwrap();

        assert!(srt.starts_with("1\n"));
        assert!(srt.contains("\n\n2\n00:00:02,000 --> 00:00:03,000\ntwo\n\n"));
        assert!(!srt.contains("\n\n\n"));
        assert!(!srt.contains("3\n"));
    }

    #[test]
    fn test_empty_track() {
        let doc = parse("<timedtext format=\"3\"><body></body></timedtext>").unwrap();
        assert!(doc.is_empty());
        assert_eq!(render(&doc), "");
    }

    #[test]
    fn test_malformed_attribute_is_not_zeroed() {
        let result = convert_xml_to_srt(r#"<timedtext><p t="abc" d="100"><s>x</s></p></timedtext>"#);
        assert!(matches!(result, Err(YtsrtError::MalformedInput(_))));
    }

    #[test]
    fn test_broken_xml_is_rejected() {
        let result = convert_xml_to_srt("<timedtext><body><p t=\"0\"><s>cut off");
        assert!(matches!(result, Err(YtsrtError::MalformedInput(_))));
    }

    #[test]
    fn test_render_is_repeatable() {
        let doc = parse(SAMPLE).unwrap();
        assert_eq!(render(&doc), render(&doc));
    }

    #[test]
    fn test_record_values() {
        let doc = parse(r#"<timedtext><p t="1500" d="2500"><s>Test line</s></p></timedtext>"#).unwrap();
        assert_eq!(
            doc.records[0],
            CaptionRecord {
                start_time: 1.5,
                end_time: 4.0,
                text: "Test line".to_string(),
            }
        );
    }

    #[test]
    fn test_format_time_shape() {
        for ms in [0u64, 1, 999, 1000, 59_999, 60_000, 3_599_999, 3_600_000, 86_399_000] {
            let formatted = format_time(ms as f64 / 1000.0);
            assert_eq!(formatted.len(), 12, "{}", formatted);
            assert_eq!(&formatted[2..3], ":");
            assert_eq!(&formatted[5..6], ":");
            assert_eq!(&formatted[8..9], ",");
        }
    }
}

// ============================================================================
// Config Integration Tests
// ============================================================================

mod config_tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
default_language = "a.en"
output = "talk.srt"
timeout_secs = 10

[client]
profile = "web"
version = "2.20250101.00.00"
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();

        assert_eq!(config.default_language.as_deref(), Some("a.en"));
        assert_eq!(config.output.to_str(), Some("talk.srt"));
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.client.profile, ClientProfile::Web);
        assert_eq!(config.client.effective_version(), "2.20250101.00.00");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timeout_secs = \"soon\"").unwrap();

        let result = Config::from_file(file.path());
        assert!(matches!(result, Err(YtsrtError::Config(_))));
    }

    #[test]
    fn test_saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ytsrt").join("config.toml");

        let mut config = Config::default();
        config.client = ClientConfig::new(ClientProfile::IosMusic).with_version("7.02");
        config.default_language = Some("ja".to_string());
        config.output = "episode.srt".into();
        config.timeout_secs = 12;

        config.save_to(&path).unwrap();
        let loaded = Config::from_file(&path).unwrap();

        assert_eq!(loaded.client, config.client);
        assert_eq!(loaded.default_language.as_deref(), Some("ja"));
        assert_eq!(loaded.output.to_str(), Some("episode.srt"));
        assert_eq!(loaded.timeout_secs, 12);
    }

    #[test]
    fn test_client_config_default_version() {
        let client = ClientConfig::new(ClientProfile::Android);
        assert_eq!(client.effective_version(), "19.08.35");
        assert_eq!(client.profile.client_name(), "ANDROID");
    }
}
