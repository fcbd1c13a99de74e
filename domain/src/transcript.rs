use crate::error::Error;
use crate::transcripts::Model;
use entity::Id;
use sea_orm::DatabaseConnection;

pub async fn create_or_replace(
    db: &DatabaseConnection,
    meeting_id: Id,
    raw_payload: &str,
    processed_text: &str,
    additional_context: Option<String>,
) -> Result<Model, Error> {
    Ok(entity_api::transcript::create_or_replace(
        db,
        meeting_id,
        raw_payload,
        processed_text,
        additional_context,
    )
    .await?)
}

pub async fn find_by_meeting_id(
    db: &DatabaseConnection,
    meeting_id: Id,
) -> Result<Option<Model>, Error> {
    Ok(entity_api::transcript::find_by_meeting_id(db, meeting_id).await?)
}
