//! CRUD operations for the meetings table.

use super::error::{EntityApiErrorKind, Error};
use entity::meeting_status::MeetingStatus;
use entity::meetings::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{
    entity::prelude::*,
    ActiveValue::{Set, Unchanged},
    DatabaseConnection, QueryOrder, TryIntoModel,
};

/// Creates a new meeting record after a bot has successfully joined.
pub async fn create(
    db: &DatabaseConnection,
    platform_meeting_id: &str,
    meeting_url: &str,
    bot_name: &str,
) -> Result<Model, Error> {
    debug!("Creating new meeting for platform id: {platform_meeting_id}");

    let now = chrono::Utc::now();

    let active_model = ActiveModel {
        platform_meeting_id: Set(platform_meeting_id.to_string()),
        meeting_url: Set(meeting_url.to_string()),
        bot_name: Set(bot_name.to_string()),
        status: Set(MeetingStatus::Active),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(active_model.save(db).await?.try_into_model()?)
}

/// Updates the lifecycle status of a meeting
pub async fn update_status(
    db: &DatabaseConnection,
    id: Id,
    status: MeetingStatus,
) -> Result<Model, Error> {
    let result = Entity::find_by_id(id).one(db).await?;

    match result {
        Some(existing) => {
            debug!("Updating meeting status to {status}: {id}");

            let active_model = ActiveModel {
                id: Unchanged(existing.id),
                platform_meeting_id: Unchanged(existing.platform_meeting_id),
                meeting_url: Unchanged(existing.meeting_url),
                bot_name: Unchanged(existing.bot_name),
                status: Set(status),
                created_at: Unchanged(existing.created_at),
                completed_at: Unchanged(existing.completed_at),
                updated_at: Set(chrono::Utc::now().into()),
            };

            Ok(active_model.update(db).await?.try_into_model()?)
        }
        None => Err(Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        }),
    }
}

/// Marks a meeting completed and stamps the completion time.
pub async fn complete(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    let result = Entity::find_by_id(id).one(db).await?;

    match result {
        Some(existing) => {
            debug!("Completing meeting: {id}");

            let now = chrono::Utc::now();

            let active_model = ActiveModel {
                id: Unchanged(existing.id),
                platform_meeting_id: Unchanged(existing.platform_meeting_id),
                meeting_url: Unchanged(existing.meeting_url),
                bot_name: Unchanged(existing.bot_name),
                status: Set(MeetingStatus::Completed),
                created_at: Unchanged(existing.created_at),
                completed_at: Set(Some(now.into())),
                updated_at: Set(now.into()),
            };

            Ok(active_model.update(db).await?.try_into_model()?)
        }
        None => Err(Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        }),
    }
}

/// Finds a meeting by ID
pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id).one(db).await?.ok_or_else(|| Error {
        source: None,
        error_kind: EntityApiErrorKind::RecordNotFound,
    })
}

/// Finds a meeting by its native platform meeting id
pub async fn find_by_platform_meeting_id(
    db: &DatabaseConnection,
    platform_meeting_id: &str,
) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::PlatformMeetingId.eq(platform_meeting_id))
        .one(db)
        .await?)
}

/// Returns all meetings, newest first
pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .order_by_desc(Column::CreatedAt)
        .all(db)
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

    fn meeting_model(status: MeetingStatus) -> Model {
        let now = chrono::Utc::now();

        Model {
            id: Id::new_v4(),
            platform_meeting_id: "abc-defg-hij".to_string(),
            meeting_url: "https://meet.google.com/abc-defg-hij".to_string(),
            bot_name: "MeetingBot".to_string(),
            status,
            created_at: now.into(),
            completed_at: None,
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn create_returns_a_new_meeting_model() -> Result<(), Error> {
        let meeting = meeting_model(MeetingStatus::Active);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![meeting.clone()]])
            .into_connection();

        let created = create(
            &db,
            &meeting.platform_meeting_id,
            &meeting.meeting_url,
            &meeting.bot_name,
        )
        .await?;

        assert_eq!(created.id, meeting.id);
        assert_eq!(created.status, MeetingStatus::Active);

        Ok(())
    }

    #[tokio::test]
    async fn complete_stamps_completion_time() -> Result<(), Error> {
        let meeting = meeting_model(MeetingStatus::Active);

        let mut completed = meeting.clone();
        completed.status = MeetingStatus::Completed;
        completed.completed_at = Some(chrono::Utc::now().into());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![meeting.clone()], vec![completed.clone()]])
            .into_connection();

        let result = complete(&db, meeting.id).await?;

        assert_eq!(result.status, MeetingStatus::Completed);
        assert!(result.completed_at.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn update_status_returns_error_when_meeting_not_found() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();

        let result = update_status(&db, Id::new_v4(), MeetingStatus::Failed).await;

        assert!(result.is_err());

        Ok(())
    }
}
