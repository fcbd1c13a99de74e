//! Transcript-to-task extraction pipeline.
//!
//! One request drives one pipeline run: normalize the raw transcript, build
//! a prompt, invoke the configured model strategy, map the decoded contract
//! onto persistable task records, and record artifacts along the way. Runs
//! share no mutable state; everything a run needs arrives as a parameter.

pub mod contract;
pub mod diagnostics;
pub mod invocation;
pub mod normalizer;
pub mod prompt;
pub mod recovery;

use crate::error::Error;
use diagnostics::DiagnosticSink;
use entity_api::task::NewTask;
use invocation::ModelInvocation;
use log::*;

/// Successful pipeline output: the complete reconciled task list and the raw
/// model text it came from. Never partially populated.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub tasks: Vec<NewTask>,
    pub raw_response: String,
}

/// Extracts action items from a canonical transcript.
///
/// Diagnostics are recorded best-effort around the model call; their failures
/// never change the result. Model and parse failures propagate as errors, so
/// an empty task list is only ever a genuine "nothing actionable" outcome.
pub async fn extract(
    model: &dyn ModelInvocation,
    sink: &dyn DiagnosticSink,
    meeting_id: &str,
    transcript: &str,
    additional_context: Option<&str>,
) -> Result<Extraction, Error> {
    sink.record_transcript(meeting_id, transcript).await;

    let prompt = prompt::extraction_prompt(transcript, additional_context);
    let invocation = model.invoke(&prompt).await?;

    sink.record_model_response(meeting_id, &invocation.raw).await;

    let tasks = invocation.response.into_new_tasks();
    sink.record_extraction(meeting_id, transcript, &invocation.raw, &tasks)
        .await;

    info!(
        "Extracted {} task(s) for meeting {meeting_id} ({} mode)",
        tasks.len(),
        model.mode()
    );

    Ok(Extraction {
        tasks,
        raw_response: invocation.raw,
    })
}

/// Re-runs the pipeline with the modification prompt: the current task set
/// and a free-text request produce a complete replacement set.
///
/// Persisting the replacement (full delete-then-insert) is the caller's
/// step, paired with `task::replace_for_meeting`.
pub async fn modify(
    model: &dyn ModelInvocation,
    sink: &dyn DiagnosticSink,
    meeting_id: &str,
    transcript: &str,
    existing_tasks: &[NewTask],
    modification_request: &str,
    additional_context: Option<&str>,
) -> Result<Extraction, Error> {
    let prompt = prompt::modification_prompt(
        transcript,
        existing_tasks,
        modification_request,
        additional_context,
    );
    let invocation = model.invoke(&prompt).await?;

    sink.record_model_response(meeting_id, &invocation.raw).await;

    let tasks = invocation.response.into_new_tasks();
    sink.record_extraction(meeting_id, transcript, &invocation.raw, &tasks)
        .await;

    info!(
        "Modification produced {} task(s) for meeting {meeting_id} ({} mode)",
        tasks.len(),
        model.mode()
    );

    Ok(Extraction {
        tasks,
        raw_response: invocation.raw,
    })
}
