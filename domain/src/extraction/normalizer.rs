//! Transcript normalization.
//!
//! Bot platforms have shipped several transcript payload shapes over time;
//! this module resolves a raw JSON payload into the single canonical
//! "Speaker: text" line form the rest of the pipeline consumes.

use serde_json::Value;

/// Emitted when no shape yields any readable text
pub const NO_CONTENT_SENTINEL: &str = "No readable transcript content found";

/// The known transcript payload shapes, resolved by ordered predicates.
///
/// A segments-based shape only claims the payload when its segments render
/// to at least one non-empty line; otherwise detection falls through to the
/// next shape in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptShape {
    /// `{"data": {"segments": [...]}}`
    NestedSegments(Vec<String>),
    /// `{"segments": [...]}`
    FlatSegments(Vec<String>),
    /// `{"transcript": [...]}`
    TranscriptList(Vec<String>),
    /// A bare JSON string payload, used verbatim
    BareText(String),
    /// `{"text": "..."}` fallback, used verbatim
    TextField(String),
    /// Nothing readable anywhere in the payload
    Unreadable,
}

impl TranscriptShape {
    pub fn detect(raw: &Value) -> Self {
        if let Some(lines) = nested_segments(raw).map(segment_lines).filter(has_lines) {
            return TranscriptShape::NestedSegments(lines);
        }
        if let Some(lines) = flat_segments(raw).map(segment_lines).filter(has_lines) {
            return TranscriptShape::FlatSegments(lines);
        }
        if let Some(lines) = transcript_list(raw).map(segment_lines).filter(has_lines) {
            return TranscriptShape::TranscriptList(lines);
        }
        if let Value::String(text) = raw {
            if !text.trim().is_empty() {
                return TranscriptShape::BareText(text.clone());
            }
        }
        if let Some(text) = raw.get("text").and_then(Value::as_str) {
            if !text.trim().is_empty() {
                return TranscriptShape::TextField(text.to_string());
            }
        }
        TranscriptShape::Unreadable
    }
}

fn nested_segments(raw: &Value) -> Option<&Vec<Value>> {
    raw.get("data")?.get("segments")?.as_array()
}

fn flat_segments(raw: &Value) -> Option<&Vec<Value>> {
    raw.get("segments")?.as_array()
}

fn transcript_list(raw: &Value) -> Option<&Vec<Value>> {
    raw.get("transcript")?.as_array()
}

fn has_lines(lines: &Vec<String>) -> bool {
    !lines.is_empty()
}

/// Renders segments to "Speaker: text" lines, preserving order.
/// Segments with blank text are skipped silently; a missing speaker becomes
/// "Unknown".
fn segment_lines(segments: &Vec<Value>) -> Vec<String> {
    segments
        .iter()
        .filter_map(|segment| {
            let text = segment.get("text").and_then(Value::as_str).unwrap_or("");
            if text.trim().is_empty() {
                return None;
            }
            let speaker = segment
                .get("speaker")
                .and_then(Value::as_str)
                .unwrap_or("Unknown");
            Some(format!("{speaker}: {text}"))
        })
        .collect()
}

/// Converts a raw transcript payload of unknown shape into canonical
/// speaker-attributed text.
///
/// Total function: malformed or unrecognized payloads yield the sentinel
/// string rather than an error, and the result is deterministic for a given
/// payload.
pub fn normalize(raw: &Value) -> String {
    match TranscriptShape::detect(raw) {
        TranscriptShape::NestedSegments(lines)
        | TranscriptShape::FlatSegments(lines)
        | TranscriptShape::TranscriptList(lines) => lines.join("\n"),
        TranscriptShape::BareText(text) | TranscriptShape::TextField(text) => text,
        TranscriptShape::Unreadable => NO_CONTENT_SENTINEL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_segments_render_in_order() {
        let raw = json!({
            "data": {
                "segments": [
                    {"speaker": "Amy", "text": "We need the report by Friday."},
                    {"speaker": "Bob", "text": "I can take that."}
                ]
            }
        });

        assert_eq!(
            normalize(&raw),
            "Amy: We need the report by Friday.\nBob: I can take that."
        );
    }

    #[test]
    fn flat_segments_are_accepted() {
        let raw = json!({
            "segments": [{"speaker": "Amy", "text": "hello"}]
        });

        assert_eq!(normalize(&raw), "Amy: hello");
    }

    #[test]
    fn transcript_list_is_accepted() {
        let raw = json!({
            "transcript": [{"speaker": "Amy", "text": "hello"}]
        });

        assert_eq!(normalize(&raw), "Amy: hello");
    }

    #[test]
    fn blank_segments_are_dropped_silently() {
        let raw = json!({
            "segments": [
                {"speaker": "Amy", "text": "first"},
                {"speaker": "Bob", "text": "   "},
                {"speaker": "Cal", "text": ""},
                {"speaker": "Dee", "text": "last"}
            ]
        });

        assert_eq!(normalize(&raw), "Amy: first\nDee: last");
    }

    #[test]
    fn missing_speaker_defaults_to_unknown() {
        let raw = json!({"segments": [{"text": "who said this"}]});

        assert_eq!(normalize(&raw), "Unknown: who said this");
    }

    #[test]
    fn all_blank_segments_fall_through_to_the_text_field() {
        let raw = json!({
            "segments": [{"speaker": "Amy", "text": "  "}],
            "text": "verbatim fallback"
        });

        assert_eq!(normalize(&raw), "verbatim fallback");
    }

    #[test]
    fn bare_string_payload_is_used_verbatim() {
        let raw = Value::String("just a wall of text".to_string());

        assert_eq!(normalize(&raw), "just a wall of text");
    }

    #[test]
    fn garbage_payloads_yield_the_sentinel_and_never_panic() {
        for raw in [
            json!(null),
            json!(42),
            json!([1, 2, 3]),
            json!({"unexpected": {"nested": true}}),
            json!({"segments": "not-a-list"}),
            json!(""),
            json!({}),
        ] {
            assert_eq!(normalize(&raw), NO_CONTENT_SENTINEL);
        }
    }

    #[test]
    fn normalization_is_deterministic() {
        let raw = json!({
            "data": {"segments": [
                {"speaker": "Amy", "text": "one"},
                {"speaker": "Bob", "text": "two"}
            ]}
        });

        assert_eq!(normalize(&raw), normalize(&raw));
    }
}
