use crate::error::Error;
use crate::meetings::Model;
use entity::meeting_status::MeetingStatus;
use entity::Id;
use sea_orm::DatabaseConnection;

pub async fn create(
    db: &DatabaseConnection,
    platform_meeting_id: &str,
    meeting_url: &str,
    bot_name: &str,
) -> Result<Model, Error> {
    Ok(entity_api::meeting::create(db, platform_meeting_id, meeting_url, bot_name).await?)
}

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    Ok(entity_api::meeting::find_by_id(db, id).await?)
}

pub async fn find_by_platform_meeting_id(
    db: &DatabaseConnection,
    platform_meeting_id: &str,
) -> Result<Option<Model>, Error> {
    Ok(entity_api::meeting::find_by_platform_meeting_id(db, platform_meeting_id).await?)
}

pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<Model>, Error> {
    Ok(entity_api::meeting::find_all(db).await?)
}

pub async fn update_status(
    db: &DatabaseConnection,
    id: Id,
    status: MeetingStatus,
) -> Result<Model, Error> {
    Ok(entity_api::meeting::update_status(db, id, status).await?)
}

pub async fn complete(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    Ok(entity_api::meeting::complete(db, id).await?)
}
