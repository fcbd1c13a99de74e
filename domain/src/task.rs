use crate::error::Error;
use crate::tasks::Model;
use entity::Id;
use sea_orm::DatabaseConnection;

pub use entity_api::task::NewTask;

pub async fn create_many(
    db: &DatabaseConnection,
    meeting_id: Id,
    new_tasks: Vec<NewTask>,
) -> Result<Vec<Model>, Error> {
    Ok(entity_api::task::create_many(db, meeting_id, new_tasks).await?)
}

/// Full-replace write used by the modification flow: the meeting's task set
/// is deleted and re-inserted atomically, serialized per meeting.
pub async fn replace_for_meeting(
    db: &DatabaseConnection,
    meeting_id: Id,
    new_tasks: Vec<NewTask>,
) -> Result<Vec<Model>, Error> {
    Ok(entity_api::task::replace_for_meeting(db, meeting_id, new_tasks).await?)
}

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    Ok(entity_api::task::find_by_id(db, id).await?)
}

pub async fn find_by_meeting_id(
    db: &DatabaseConnection,
    meeting_id: Id,
) -> Result<Vec<Model>, Error> {
    Ok(entity_api::task::find_by_meeting_id(db, meeting_id).await?)
}

pub async fn mark_completed(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    Ok(entity_api::task::mark_completed(db, id).await?)
}
