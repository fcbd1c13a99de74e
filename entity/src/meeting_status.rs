use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Status of a meeting through its bot-recording lifecycle.
#[derive(
    Debug, Clone, Eq, PartialEq, EnumIter, Deserialize, Default, Serialize, DeriveActiveEnum,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "meeting_status")]
pub enum MeetingStatus {
    /// Meeting has been registered but no bot has joined yet
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    /// Bot is in the meeting and capturing the transcript
    #[sea_orm(string_value = "active")]
    Active,
    /// Meeting ended and the bot was removed
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Bot could not join or was dropped from the meeting
    #[sea_orm(string_value = "failed")]
    Failed,
}

impl std::fmt::Display for MeetingStatus {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeetingStatus::Pending => write!(fmt, "pending"),
            MeetingStatus::Active => write!(fmt, "active"),
            MeetingStatus::Completed => write!(fmt, "completed"),
            MeetingStatus::Failed => write!(fmt, "failed"),
        }
    }
}
