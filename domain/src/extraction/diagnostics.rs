//! Best-effort capture of pipeline artifacts for offline debugging.
//!
//! Every invocation records the raw transcript, the raw model response, and
//! the final task list. Recording is fire-and-forget: any I/O failure is
//! logged and swallowed, and must never change the pipeline's outcome.

use async_trait::async_trait;
use entity_api::task::NewTask;
use log::*;
use std::path::PathBuf;
use tokio::fs;

const BANNER: &str =
    "================================================================================";

/// Append-only sink for pipeline artifacts, keyed by meeting id and time.
#[async_trait]
pub trait DiagnosticSink: Send + Sync {
    /// Records the raw transcript before any model call
    async fn record_transcript(&self, meeting_id: &str, transcript: &str);

    /// Records the raw model response before parsing
    async fn record_model_response(&self, meeting_id: &str, response: &str);

    /// Records the combined transcript / response / derived task view
    async fn record_extraction(
        &self,
        meeting_id: &str,
        transcript: &str,
        response: &str,
        tasks: &[NewTask],
    );
}

/// Sink that writes timestamped text files under a configured directory.
pub struct FileDiagnosticSink {
    output_dir: PathBuf,
}

impl FileDiagnosticSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    async fn write(&self, prefix: &str, meeting_id: &str, body: String) {
        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
        let path = self
            .output_dir
            .join(format!("{prefix}_{meeting_id}_{timestamp}.txt"));

        if let Err(err) = fs::create_dir_all(&self.output_dir).await {
            warn!(
                "Could not create diagnostics directory {}: {err:?}",
                self.output_dir.display()
            );
            return;
        }

        match fs::write(&path, body).await {
            Ok(()) => debug!("Diagnostics written to: {}", path.display()),
            Err(err) => warn!("Could not write diagnostics to {}: {err:?}", path.display()),
        }
    }

    fn framed(title: &str, meeting_id: &str, body: &str) -> String {
        let generated = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S");
        format!(
            "{BANNER}\n{title}\nGenerated on: {generated}\nMeeting ID: {meeting_id}\n{BANNER}\n\n{body}\n\n{BANNER}\n"
        )
    }
}

#[async_trait]
impl DiagnosticSink for FileDiagnosticSink {
    async fn record_transcript(&self, meeting_id: &str, transcript: &str) {
        let body = Self::framed("RAW TRANSCRIPT", meeting_id, transcript);
        self.write("raw_transcript", meeting_id, body).await;
    }

    async fn record_model_response(&self, meeting_id: &str, response: &str) {
        let body = Self::framed("MODEL RAW RESPONSE", meeting_id, response);
        self.write("model_response", meeting_id, body).await;
    }

    async fn record_extraction(
        &self,
        meeting_id: &str,
        transcript: &str,
        response: &str,
        tasks: &[NewTask],
    ) {
        let mut task_lines = String::new();
        for (index, task) in tasks.iter().enumerate() {
            task_lines.push_str(&format!(
                "Task {}:\n  Assignee: {}\n  Description: {}\n  Deadline: {}\n  Priority: {}\n\n",
                index + 1,
                task.assignee_name,
                task.task_description,
                task.deadline.as_deref().unwrap_or("Not specified"),
                task.priority
                    .as_ref()
                    .map(|priority| priority.to_string())
                    .unwrap_or_else(|| "Not specified".to_string()),
            ));
        }

        let body = Self::framed(
            "MEETING TRANSCRIPT AND TASK EXTRACTION",
            meeting_id,
            &format!(
                "ORIGINAL TRANSCRIPT:\n{transcript}\n\nMODEL RAW RESPONSE:\n{response}\n\nEXTRACTED TASKS:\n{task_lines}"
            ),
        );
        self.write("extraction", meeting_id, body).await;
    }
}

/// Sink that records nothing; used in tests and when diagnostics are disabled.
pub struct NoopDiagnosticSink;

#[async_trait]
impl DiagnosticSink for NoopDiagnosticSink {
    async fn record_transcript(&self, _meeting_id: &str, _transcript: &str) {}

    async fn record_model_response(&self, _meeting_id: &str, _response: &str) {}

    async fn record_extraction(
        &self,
        _meeting_id: &str,
        _transcript: &str,
        _response: &str,
        _tasks: &[NewTask],
    ) {
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity::task_priority::TaskPriority;

    fn sample_tasks() -> Vec<NewTask> {
        vec![NewTask {
            assignee_name: "Amy".to_string(),
            task_description: "Send the report".to_string(),
            deadline: None,
            priority: Some(TaskPriority::High),
        }]
    }

    #[tokio::test]
    async fn records_land_in_the_output_directory() {
        let dir = std::env::temp_dir().join(format!("diag-sink-{}", uuid::Uuid::new_v4()));
        let sink = FileDiagnosticSink::new(&dir);

        sink.record_transcript("abc-defg-hij", "Amy: hello").await;
        sink.record_extraction("abc-defg-hij", "Amy: hello", "{\"tasks\":[]}", &sample_tasks())
            .await;

        let mut names = Vec::new();
        let mut entries = fs::read_dir(&dir).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().to_string());
        }

        assert_eq!(names.len(), 2);
        assert!(names.iter().any(|name| name.starts_with("raw_transcript_abc-defg-hij")));
        assert!(names.iter().any(|name| name.starts_with("extraction_abc-defg-hij")));

        fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn unwritable_target_is_swallowed() {
        // /dev/null cannot be used as a directory; every write must fail
        // without surfacing an error to the caller.
        let sink = FileDiagnosticSink::new("/dev/null/diagnostics");

        sink.record_transcript("abc", "transcript").await;
        sink.record_model_response("abc", "response").await;
        sink.record_extraction("abc", "transcript", "response", &sample_tasks())
            .await;
    }
}
