pub use entity::{meeting_status, meetings, task_priority, tasks, transcripts, Id};

pub mod error;
pub mod meeting;
pub mod task;
pub mod transcript;
