//! Business logic for the meeting task extraction service.
//!
//! Re-exports the entity types the `web` layer needs so that consumers of
//! the `domain` crate do not depend on `entity_api` directly; the underlying
//! implementation details stay behind this crate's modules.
pub use entity_api::{meeting_status, meetings, task_priority, tasks, transcripts, Id};

pub mod error;
pub mod extraction;
pub mod gateway;
pub mod meeting;
pub mod task;
pub mod transcript;
