//! Structured output contract between the language model and the task store.
//!
//! The model-facing task shape uses `assignee`/`description`; persistence
//! uses `assignee_name`/`task_description`. This module owns that rename so
//! neither side leaks into the other.

use entity::task_priority::TaskPriority;
use entity_api::task::NewTask;
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_status() -> String {
    "pending".to_string()
}

fn default_category() -> String {
    "action_item".to_string()
}

/// One task as the model is instructed to emit it.
/// `description`, `assignee` and `priority` are mandatory; `status` and
/// `category` default, `deadline` is null when unspecified.
///
/// The modification prompt shows the model the persisted task shape, and
/// models echo its field names back often enough that decoding accepts the
/// `assignee_name`/`task_description` spellings as aliases.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFields {
    #[serde(default)]
    pub title: String,
    #[serde(alias = "task_description")]
    pub description: String,
    #[serde(alias = "assignee_name")]
    pub assignee: String,
    pub priority: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default = "default_category")]
    pub category: String,
}

/// The complete extraction response wrapping zero or more tasks
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResponse {
    #[serde(default)]
    pub tasks: Vec<TaskFields>,
}

impl TaskFields {
    /// Maps the model-facing shape onto the persisted task shape, applying
    /// the field renames and folding unusable deadline/priority values to
    /// `None`.
    pub fn into_new_task(self) -> NewTask {
        NewTask {
            assignee_name: self.assignee,
            task_description: self.description,
            deadline: self
                .deadline
                .filter(|deadline| !deadline.trim().is_empty() && deadline.trim() != "null"),
            priority: TaskPriority::from_label(&self.priority),
        }
    }
}

impl ExtractionResponse {
    pub fn into_new_tasks(self) -> Vec<NewTask> {
        self.tasks
            .into_iter()
            .map(TaskFields::into_new_task)
            .collect()
    }
}

/// Response schema handed to the model backend in schema-constrained mode.
/// Must stay in lockstep with [`TaskFields`].
pub fn response_schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "tasks": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "title": {"type": "string"},
                        "description": {"type": "string"},
                        "assignee": {"type": "string"},
                        "priority": {"type": "string", "enum": ["High", "Medium", "Low"]},
                        "status": {"type": "string"},
                        "deadline": {"type": "string", "nullable": true},
                        "category": {"type": "string"}
                    },
                    "required": ["title", "description", "assignee", "priority"]
                }
            }
        },
        "required": ["tasks"]
    })
}

/// Machine-readable output instructions appended to every prompt, kept
/// consistent with [`TaskFields`] and [`response_schema`].
pub fn format_instructions() -> &'static str {
    r#"Return ONLY a JSON object with this exact structure, with no markdown fences or commentary:
{
  "tasks": [
    {
      "title": "Clear, concise title of the task",
      "description": "Detailed, actionable description of what needs to be done",
      "assignee": "Name of the person assigned to the task, or 'Unassigned'",
      "priority": "High, Medium, or Low",
      "status": "pending",
      "deadline": "YYYY-MM-DD or null if not specified",
      "category": "action_item"
    }
  ]
}"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_new_task_renames_the_boundary_fields() {
        let fields = TaskFields {
            title: "Quarterly report".to_string(),
            description: "Send report".to_string(),
            assignee: "Amy".to_string(),
            priority: "High".to_string(),
            status: "pending".to_string(),
            deadline: Some("2024-05-01".to_string()),
            category: "action_item".to_string(),
        };

        let task = fields.into_new_task();

        assert_eq!(task.assignee_name, "Amy");
        assert_eq!(task.task_description, "Send report");
        assert_eq!(task.deadline, Some("2024-05-01".to_string()));
        assert_eq!(task.priority, Some(TaskPriority::High));
    }

    #[test]
    fn unusable_deadline_and_priority_fold_to_none() {
        let fields = TaskFields {
            title: "t".to_string(),
            description: "d".to_string(),
            assignee: "Unassigned".to_string(),
            priority: "whenever".to_string(),
            status: "pending".to_string(),
            deadline: Some("null".to_string()),
            category: "action_item".to_string(),
        };

        let task = fields.into_new_task();

        assert_eq!(task.deadline, None);
        assert_eq!(task.priority, None);
    }

    #[test]
    fn status_and_category_default_when_absent() {
        let response: ExtractionResponse = serde_json::from_str(
            r#"{"tasks": [{"title": "t", "description": "d", "assignee": "Amy", "priority": "Low"}]}"#,
        )
        .unwrap();

        assert_eq!(response.tasks[0].status, "pending");
        assert_eq!(response.tasks[0].category, "action_item");
        assert_eq!(response.tasks[0].deadline, None);
    }

    #[test]
    fn mandatory_fields_are_enforced() {
        let result: Result<ExtractionResponse, _> =
            serde_json::from_str(r#"{"tasks": [{"title": "t", "description": "d"}]}"#);

        assert!(result.is_err());
    }

    #[test]
    fn persisted_field_spellings_are_accepted_as_aliases() {
        let response: ExtractionResponse = serde_json::from_str(
            r#"{"tasks": [{"assignee_name": "Amy", "task_description": "Send report", "deadline": "2024-05-01", "priority": "High"}]}"#,
        )
        .unwrap();

        let tasks = response.into_new_tasks();

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].assignee_name, "Amy");
        assert_eq!(tasks[0].task_description, "Send report");
        assert_eq!(tasks[0].deadline, Some("2024-05-01".to_string()));
        assert_eq!(tasks[0].priority, Some(TaskPriority::High));
    }
}
