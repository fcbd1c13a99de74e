//! CRUD operations for the transcripts table.

use super::error::Error;
use entity::transcripts::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{
    entity::prelude::*,
    ActiveValue::{Set, Unchanged},
    DatabaseConnection, TryIntoModel,
};

/// Stores the transcript for a meeting, replacing any previously stored one.
/// A meeting holds at most one transcript row; re-processing overwrites it.
pub async fn create_or_replace(
    db: &DatabaseConnection,
    meeting_id: Id,
    raw_payload: &str,
    processed_text: &str,
    additional_context: Option<String>,
) -> Result<Model, Error> {
    let existing = find_by_meeting_id(db, meeting_id).await?;

    match existing {
        Some(transcript) => {
            debug!("Replacing stored transcript for meeting: {meeting_id}");

            let active_model = ActiveModel {
                id: Unchanged(transcript.id),
                meeting_id: Unchanged(transcript.meeting_id),
                raw_payload: Set(raw_payload.to_string()),
                processed_text: Set(processed_text.to_string()),
                additional_context: Set(additional_context),
                created_at: Unchanged(transcript.created_at),
            };

            Ok(active_model.update(db).await?.try_into_model()?)
        }
        None => {
            debug!("Storing new transcript for meeting: {meeting_id}");

            let active_model = ActiveModel {
                meeting_id: Set(meeting_id),
                raw_payload: Set(raw_payload.to_string()),
                processed_text: Set(processed_text.to_string()),
                additional_context: Set(additional_context),
                created_at: Set(chrono::Utc::now().into()),
                ..Default::default()
            };

            Ok(active_model.save(db).await?.try_into_model()?)
        }
    }
}

/// Finds the stored transcript for a meeting
pub async fn find_by_meeting_id(
    db: &DatabaseConnection,
    meeting_id: Id,
) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::MeetingId.eq(meeting_id))
        .one(db)
        .await?)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn create_or_replace_inserts_when_no_transcript_exists() -> Result<(), Error> {
        let now = chrono::Utc::now();
        let meeting_id = Id::new_v4();

        let transcript = Model {
            id: Id::new_v4(),
            meeting_id,
            raw_payload: "{\"segments\":[]}".to_string(),
            processed_text: "Amy: hello".to_string(),
            additional_context: None,
            created_at: now.into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .append_query_results(vec![vec![transcript.clone()]])
            .into_connection();

        let stored = create_or_replace(
            &db,
            meeting_id,
            &transcript.raw_payload,
            &transcript.processed_text,
            None,
        )
        .await?;

        assert_eq!(stored.id, transcript.id);
        assert_eq!(stored.processed_text, "Amy: hello");

        Ok(())
    }

    #[tokio::test]
    async fn create_or_replace_updates_existing_row() -> Result<(), Error> {
        let now = chrono::Utc::now();
        let meeting_id = Id::new_v4();

        let existing = Model {
            id: Id::new_v4(),
            meeting_id,
            raw_payload: "{}".to_string(),
            processed_text: "old".to_string(),
            additional_context: None,
            created_at: now.into(),
        };

        let mut replaced = existing.clone();
        replaced.processed_text = "new".to_string();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![existing.clone()]])
            .append_query_results(vec![vec![replaced.clone()]])
            .into_connection();

        let stored = create_or_replace(&db, meeting_id, "{}", "new", None).await?;

        assert_eq!(stored.id, existing.id);
        assert_eq!(stored.processed_text, "new");

        Ok(())
    }
}
