//! CRUD operations for the tasks table, including the transactional
//! full-replace write used by the task modification flow.

use super::error::{EntityApiErrorKind, Error};
use entity::meetings;
use entity::task_priority::TaskPriority;
use entity::tasks::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{
    entity::prelude::*,
    ActiveValue::{Set, Unchanged},
    DatabaseConnection, QuerySelect, TransactionError, TransactionTrait, TryIntoModel,
};
use serde::{Deserialize, Serialize};

/// Insertable task shape produced by extraction and modification.
/// Ids and timestamps are assigned at write time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub assignee_name: String,
    pub task_description: String,
    pub deadline: Option<String>,
    pub priority: Option<TaskPriority>,
}

fn insertable(meeting_id: Id, task: NewTask) -> ActiveModel {
    let now = chrono::Utc::now();

    ActiveModel {
        meeting_id: Set(meeting_id),
        assignee_name: Set(task.assignee_name),
        task_description: Set(task.task_description),
        deadline: Set(task.deadline),
        priority: Set(task.priority),
        is_completed: Set(false),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
}

/// Appends newly extracted tasks to a meeting.
pub async fn create_many(
    db: &DatabaseConnection,
    meeting_id: Id,
    new_tasks: Vec<NewTask>,
) -> Result<Vec<Model>, Error> {
    debug!(
        "Inserting {} extracted task(s) for meeting: {meeting_id}",
        new_tasks.len()
    );

    let mut models = Vec::with_capacity(new_tasks.len());
    for task in new_tasks {
        models.push(insertable(meeting_id, task).save(db).await?.try_into_model()?);
    }

    Ok(models)
}

/// Replaces the entire task set of a meeting with a new one.
///
/// Runs in a single transaction that first takes a row lock on the meeting,
/// so concurrent replacements for the same meeting serialize instead of
/// interleaving their delete/insert steps. There is no task-id continuity
/// across a replacement.
pub async fn replace_for_meeting(
    db: &DatabaseConnection,
    meeting_id: Id,
    new_tasks: Vec<NewTask>,
) -> Result<Vec<Model>, Error> {
    debug!(
        "Replacing task set for meeting {meeting_id} with {} task(s)",
        new_tasks.len()
    );

    db.transaction::<_, Vec<Model>, Error>(|txn| {
        Box::pin(async move {
            meetings::Entity::find_by_id(meeting_id)
                .lock_exclusive()
                .one(txn)
                .await?
                .ok_or_else(|| Error {
                    source: None,
                    error_kind: EntityApiErrorKind::RecordNotFound,
                })?;

            Entity::delete_many()
                .filter(Column::MeetingId.eq(meeting_id))
                .exec(txn)
                .await?;

            let mut models = Vec::with_capacity(new_tasks.len());
            for task in new_tasks {
                models.push(insertable(meeting_id, task).save(txn).await?.try_into_model()?);
            }

            Ok(models)
        })
    })
    .await
    .map_err(|err| match err {
        TransactionError::Connection(db_err) => Error::from(db_err),
        TransactionError::Transaction(err) => err,
    })
}

/// Marks a task as completed
pub async fn mark_completed(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    let result = Entity::find_by_id(id).one(db).await?;

    match result {
        Some(task) => {
            debug!("Marking task completed: {id}");

            let active_model = ActiveModel {
                id: Unchanged(task.id),
                meeting_id: Unchanged(task.meeting_id),
                assignee_name: Unchanged(task.assignee_name),
                task_description: Unchanged(task.task_description),
                deadline: Unchanged(task.deadline),
                priority: Unchanged(task.priority),
                is_completed: Set(true),
                created_at: Unchanged(task.created_at),
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

/// Finds a task by ID
pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id).one(db).await?.ok_or_else(|| Error {
        source: None,
        error_kind: EntityApiErrorKind::RecordNotFound,
    })
}

/// Returns all tasks belonging to a meeting, oldest first
pub async fn find_by_meeting_id(
    db: &DatabaseConnection,
    meeting_id: Id,
) -> Result<Vec<Model>, Error> {
    use sea_orm::QueryOrder;

    Ok(Entity::find()
        .filter(Column::MeetingId.eq(meeting_id))
        .order_by_asc(Column::CreatedAt)
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
    use entity::meeting_status::MeetingStatus;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn task_model(meeting_id: Id, assignee: &str) -> Model {
        let now = chrono::Utc::now();

        Model {
            id: Id::new_v4(),
            meeting_id,
            assignee_name: assignee.to_string(),
            task_description: "Send the quarterly report".to_string(),
            deadline: Some("2025-07-11".to_string()),
            priority: Some(TaskPriority::High),
            is_completed: false,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn meeting_model(id: Id) -> meetings::Model {
        let now = chrono::Utc::now();

        meetings::Model {
            id,
            platform_meeting_id: "abc-defg-hij".to_string(),
            meeting_url: "https://meet.google.com/abc-defg-hij".to_string(),
            bot_name: "MeetingBot".to_string(),
            status: MeetingStatus::Active,
            created_at: now.into(),
            completed_at: None,
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn create_many_inserts_each_task() -> Result<(), Error> {
        let meeting_id = Id::new_v4();
        let first = task_model(meeting_id, "Amy");
        let second = task_model(meeting_id, "Bob");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![first.clone()], vec![second.clone()]])
            .into_connection();

        let new_tasks = vec![
            NewTask {
                assignee_name: "Amy".to_string(),
                task_description: "Send the quarterly report".to_string(),
                deadline: Some("2025-07-11".to_string()),
                priority: Some(TaskPriority::High),
            },
            NewTask {
                assignee_name: "Bob".to_string(),
                task_description: "Send the quarterly report".to_string(),
                deadline: Some("2025-07-11".to_string()),
                priority: Some(TaskPriority::High),
            },
        ];

        let models = create_many(&db, meeting_id, new_tasks).await?;

        assert_eq!(models.len(), 2);
        assert_eq!(models[0].assignee_name, "Amy");
        assert_eq!(models[1].assignee_name, "Bob");

        Ok(())
    }

    #[tokio::test]
    async fn replace_for_meeting_locks_deletes_then_inserts() -> Result<(), Error> {
        let meeting_id = Id::new_v4();
        let replacement = task_model(meeting_id, "Bob");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // The row lock on the meeting
            .append_query_results(vec![vec![meeting_model(meeting_id)]])
            // Deleting the previous task set
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 3,
            }])
            // Inserting the replacement set
            .append_query_results(vec![vec![replacement.clone()]])
            .into_connection();

        let models = replace_for_meeting(
            &db,
            meeting_id,
            vec![NewTask {
                assignee_name: "Bob".to_string(),
                task_description: "Send the quarterly report".to_string(),
                deadline: Some("2025-07-11".to_string()),
                priority: Some(TaskPriority::High),
            }],
        )
        .await?;

        assert_eq!(models.len(), 1);
        assert_eq!(models[0].assignee_name, "Bob");

        Ok(())
    }

    #[tokio::test]
    async fn replace_for_meeting_fails_when_meeting_missing() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<meetings::Model>::new()])
            .into_connection();

        let result = replace_for_meeting(&db, Id::new_v4(), vec![]).await;

        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );

        Ok(())
    }

    #[tokio::test]
    async fn mark_completed_sets_the_flag() -> Result<(), Error> {
        let meeting_id = Id::new_v4();
        let task = task_model(meeting_id, "Amy");

        let mut completed = task.clone();
        completed.is_completed = true;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![task.clone()], vec![completed.clone()]])
            .into_connection();

        let result = mark_completed(&db, task.id).await?;

        assert!(result.is_completed);

        Ok(())
    }
}
