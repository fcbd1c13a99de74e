//! Recovery chain for free-form model output.
//!
//! When generation runs without schema constraints the model is *asked* for
//! bare JSON but routinely wraps it in fences, quotes, or prose. This module
//! applies a layered cleanup strategy to salvage the JSON payload:
//!
//! 1. trim surrounding whitespace
//! 2. extract the interior of a fenced code block (with or without a tag)
//! 3. strip stray leading/trailing quote and newline characters
//! 4. regex-match a balanced-looking `{...}` or `[...]` span
//!    (one level of nesting tolerated)
//! 5. failing that, scan from the first opening bracket counting depth
//! 6. parse the surviving substring
//!
//! Parse failures surface an error carrying a bounded excerpt of the
//! original content; they are never retried here.

use crate::error::{DomainErrorKind, Error, ExternalErrorKind};
use crate::extraction::contract::ExtractionResponse;
use regex::Regex;
use serde_json::Value;

const EXCERPT_LIMIT: usize = 200;

const OBJECT_SPAN: &str = r"\{(?:[^{}]|\{[^{}]*\})*\}";
const ARRAY_SPAN: &str = r"\[(?:[^\[\]]|\[[^\[\]]*\])*\]";

/// Salvages an [`ExtractionResponse`] from free-form model text.
///
/// A parsed object without a `tasks` key yields an empty task list, not an
/// error; a parsed top-level array is taken to be the task list itself.
pub fn recover_extraction(content: &str) -> Result<ExtractionResponse, Error> {
    let candidate = candidate_json(content);

    let value: Value =
        serde_json::from_str(&candidate).map_err(|err| parse_error(content, err))?;

    decode_tasks(value).map_err(|err| parse_error(content, err))
}

/// Runs cleanup steps 1-5, returning the best JSON candidate substring.
fn candidate_json(content: &str) -> String {
    let trimmed = content.trim();
    let unfenced = strip_code_fence(trimmed);
    let cleaned =
        unfenced.trim_matches(|c: char| c == '"' || c == '\'' || c == '`' || c.is_whitespace());

    if let Some(span) = regex_span(cleaned) {
        return span.to_string();
    }
    if let Some(span) = bracket_scan(cleaned) {
        return span.to_string();
    }

    cleaned.to_string()
}

/// Extracts the interior of the first fenced code block, tolerating an
/// optional language tag on the opening fence.
fn strip_code_fence(content: &str) -> &str {
    let Some(start) = content.find("```") else {
        return content;
    };
    let rest = &content[start + 3..];
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    match body.find("```") {
        Some(idx) => &body[..idx],
        None => body,
    }
}

/// Finds the earliest span that looks like a balanced object or array,
/// tolerating one level of nesting.
fn regex_span(content: &str) -> Option<&str> {
    let object = Regex::new(OBJECT_SPAN).ok()?;
    let array = Regex::new(ARRAY_SPAN).ok()?;

    match (object.find(content), array.find(content)) {
        (Some(obj), Some(arr)) => {
            if obj.start() <= arr.start() {
                Some(obj.as_str())
            } else {
                Some(arr.as_str())
            }
        }
        (Some(obj), None) => Some(obj.as_str()),
        (None, Some(arr)) => Some(arr.as_str()),
        (None, None) => None,
    }
}

/// Scans from the first opening bracket, counting depth until it balances.
fn bracket_scan(content: &str) -> Option<&str> {
    let start = content.find(['{', '['])?;
    let bytes = content.as_bytes();
    let (open, close) = match bytes[start] {
        b'{' => (b'{', b'}'),
        _ => (b'[', b']'),
    };

    let mut depth = 0usize;
    for (offset, byte) in content[start..].bytes().enumerate() {
        if byte == open {
            depth += 1;
        } else if byte == close {
            depth -= 1;
            if depth == 0 {
                return Some(&content[start..start + offset + 1]);
            }
        }
    }

    None
}

/// Locates the task list within a parsed JSON value.
fn decode_tasks(value: Value) -> Result<ExtractionResponse, serde_json::Error> {
    match value {
        Value::Object(mut map) => match map.remove("tasks") {
            Some(tasks) => Ok(ExtractionResponse {
                tasks: serde_json::from_value(tasks)?,
            }),
            None => Ok(ExtractionResponse::default()),
        },
        Value::Array(items) => Ok(ExtractionResponse {
            tasks: serde_json::from_value(Value::Array(items))?,
        }),
        other => serde_json::from_value(other),
    }
}

fn parse_error(content: &str, err: serde_json::Error) -> Error {
    Error {
        source: Some(Box::new(err)),
        error_kind: DomainErrorKind::External(ExternalErrorKind::ModelResponse(format!(
            "Could not parse a task list from model output beginning with: {}",
            excerpt(content)
        ))),
    }
}

/// Bounded prefix of the offending content, safe on UTF-8 boundaries.
pub(crate) fn excerpt(content: &str) -> &str {
    match content.char_indices().nth(EXCERPT_LIMIT) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_TASK: &str = r#"{"tasks": [{"title": "Report", "description": "Send report", "assignee": "Amy", "priority": "High", "deadline": "2024-05-01"}]}"#;

    #[test]
    fn plain_json_parses_directly() {
        let response = recover_extraction(ONE_TASK).unwrap();

        assert_eq!(response.tasks.len(), 1);
        assert_eq!(response.tasks[0].assignee, "Amy");
    }

    #[test]
    fn fenced_block_with_language_tag_is_unwrapped() {
        let content = format!("```json\n{ONE_TASK}\n```");
        let response = recover_extraction(&content).unwrap();

        assert_eq!(response.tasks.len(), 1);
    }

    #[test]
    fn fenced_block_without_language_tag_is_unwrapped() {
        let content = "```\n{\"tasks\": []}\n```";
        let response = recover_extraction(content).unwrap();

        assert!(response.tasks.is_empty());
    }

    #[test]
    fn stray_quotes_and_newlines_are_stripped() {
        let content = "\n\"\n{\"tasks\": []}\n\"\n";
        let response = recover_extraction(content).unwrap();

        assert!(response.tasks.is_empty());
    }

    #[test]
    fn json_embedded_in_prose_is_recovered() {
        let content = format!("Here are the extracted tasks:\n\n{ONE_TASK}\n\nLet me know!");
        let response = recover_extraction(&content).unwrap();

        assert_eq!(response.tasks.len(), 1);
        assert_eq!(response.tasks[0].title, "Report");
    }

    #[test]
    fn object_without_tasks_key_yields_an_empty_list() {
        let response = recover_extraction(r#"{"result": "nothing actionable"}"#).unwrap();

        assert!(response.tasks.is_empty());
    }

    #[test]
    fn top_level_array_is_taken_as_the_task_list() {
        let content = r#"[{"title": "Report", "description": "Send report", "assignee": "Amy", "priority": "High"}]"#;
        let response = recover_extraction(content).unwrap();

        assert_eq!(response.tasks.len(), 1);
    }

    #[test]
    fn unparseable_content_errors_with_a_bounded_excerpt() {
        let content = r#"{"tasks": [{"title": "Report", "description""#;
        let err = recover_extraction(content).unwrap_err();

        match err.error_kind {
            DomainErrorKind::External(ExternalErrorKind::ModelResponse(message)) => {
                assert!(message.contains(r#"{"tasks": [{"title""#));
            }
            other => panic!("expected a model response error, got {other:?}"),
        }
    }

    #[test]
    fn excerpt_is_bounded_for_long_content() {
        let content = "x".repeat(5000);
        assert_eq!(excerpt(&content).len(), 200);
    }

    #[test]
    fn bracket_scan_finds_the_balanced_close() {
        let content = r#"noise {"a": {"b": {"c": 1}}} trailing"#;
        assert_eq!(bracket_scan(content), Some(r#"{"a": {"b": {"c": 1}}}"#));

        assert_eq!(bracket_scan("no brackets here"), None);
        assert_eq!(bracket_scan(r#"{"never": "closed""#), None);
    }
}
