use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Three-level priority scale for extracted tasks.
///
/// Serialized with the capitalized labels the extraction contract uses
/// ("High", "Medium", "Low"); stored lowercase in the database enum.
#[derive(Debug, Clone, Eq, PartialEq, EnumIter, Deserialize, Serialize, DeriveActiveEnum, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "task_priority")]
pub enum TaskPriority {
    #[sea_orm(string_value = "high")]
    High,
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "low")]
    Low,
}

impl TaskPriority {
    /// Parses a model-produced priority label, tolerating case differences.
    /// Labels outside the three-level scale map to `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "high" => Some(TaskPriority::High),
            "medium" => Some(TaskPriority::Medium),
            "low" => Some(TaskPriority::Low),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskPriority::High => write!(fmt, "High"),
            TaskPriority::Medium => write!(fmt, "Medium"),
            TaskPriority::Low => write!(fmt, "Low"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_label_accepts_any_casing() {
        assert_eq!(TaskPriority::from_label("High"), Some(TaskPriority::High));
        assert_eq!(TaskPriority::from_label("HIGH"), Some(TaskPriority::High));
        assert_eq!(
            TaskPriority::from_label(" medium "),
            Some(TaskPriority::Medium)
        );
        assert_eq!(TaskPriority::from_label("low"), Some(TaskPriority::Low));
    }

    #[test]
    fn from_label_rejects_unknown_scales() {
        assert_eq!(TaskPriority::from_label("urgent"), None);
        assert_eq!(TaskPriority::from_label(""), None);
    }
}
