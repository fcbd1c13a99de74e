//! Prompt construction for task extraction and modification.
//!
//! Both builders are pure string construction; the embedded rules mirror the
//! output contract in [`super::contract`].

use super::contract;
use entity_api::task::NewTask;

/// Builds the instruction text for an initial task extraction pass.
pub fn extraction_prompt(transcript: &str, additional_context: Option<&str>) -> String {
    format!(
        r#"You are an expert AI assistant specialized in analyzing meeting transcripts to extract actionable tasks.

Your job is to:
1. Identify clear action items that require someone to DO something
2. Extract the person responsible (assignee) from the conversation
3. Determine priority based on urgency discussed
4. Set reasonable deadlines based on context mentioned
5. Create clear, actionable task descriptions

Rules:
- Only extract tasks that are explicitly actionable (not just discussions)
- Use exact names mentioned in the transcript
- If no assignee is clear, use "Unassigned"
- Priority should be "High", "Medium", or "Low"
- Deadline format: YYYY-MM-DD or null if not mentioned
- Make task descriptions specific and actionable

Meeting Transcript:
{transcript}
{context}
{format_instructions}
"#,
        transcript = transcript,
        context = context_section(additional_context),
        format_instructions = contract::format_instructions(),
    )
}

/// Builds the instruction text for a user-directed task modification pass.
///
/// The current task set is embedded as structured text and the model is told
/// to return the complete replacement set, keeping tasks the request does
/// not touch.
pub fn modification_prompt(
    transcript: &str,
    existing_tasks: &[NewTask],
    modification_request: &str,
    additional_context: Option<&str>,
) -> String {
    let existing = serde_json::to_string_pretty(existing_tasks).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"You are an AI assistant updating the task assignments extracted from a meeting transcript based on user feedback.

Original Meeting Transcript:
{transcript}

Current Task Assignments:
{existing}

User's Modification Request:
{modification_request}

Apply the requested modification and return the COMPLETE updated task list, not a diff:
- Keep every task the request does not affect exactly as it is
- Apply the requested change to the task(s) it targets
- Only include actionable tasks assigned to specific people, or "Unassigned"
{context}
{format_instructions}
"#,
        transcript = transcript,
        existing = existing,
        modification_request = modification_request,
        context = context_section(additional_context),
        format_instructions = contract::format_instructions(),
    )
}

fn context_section(additional_context: Option<&str>) -> String {
    match additional_context {
        Some(context) if !context.trim().is_empty() => {
            format!("\nAdditional context from the organizer:\n{context}\n")
        }
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity::task_priority::TaskPriority;

    #[test]
    fn extraction_prompt_embeds_transcript_and_format_instructions() {
        let prompt = extraction_prompt("Amy: send the report", None);

        assert!(prompt.contains("Amy: send the report"));
        assert!(prompt.contains("\"tasks\""));
        assert!(prompt.contains("Unassigned"));
        assert!(prompt.contains("YYYY-MM-DD"));
    }

    #[test]
    fn extraction_prompt_includes_context_only_when_present() {
        let with = extraction_prompt("t", Some("board meeting"));
        let without = extraction_prompt("t", None);
        let blank = extraction_prompt("t", Some("   "));

        assert!(with.contains("board meeting"));
        assert!(!without.contains("Additional context"));
        assert!(!blank.contains("Additional context"));
    }

    #[test]
    fn modification_prompt_embeds_tasks_and_request() {
        let existing = vec![NewTask {
            assignee_name: "Amy".to_string(),
            task_description: "Send the report".to_string(),
            deadline: Some("2024-05-01".to_string()),
            priority: Some(TaskPriority::High),
        }];

        let prompt = modification_prompt(
            "Amy: send the report",
            &existing,
            "Reassign the report to Bob",
            None,
        );

        assert!(prompt.contains("Amy"));
        assert!(prompt.contains("Send the report"));
        assert!(prompt.contains("Reassign the report to Bob"));
        assert!(prompt.contains("COMPLETE updated task list"));
        assert!(prompt.contains("\"tasks\""));
    }
}
