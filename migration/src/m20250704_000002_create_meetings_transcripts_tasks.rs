use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create meeting_status enum
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE TYPE meeting_tasks.meeting_status AS ENUM (
                    'pending',
                    'active',
                    'completed',
                    'failed'
                )",
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared("ALTER TYPE meeting_tasks.meeting_status OWNER TO meeting_tasks")
            .await?;

        // Create task_priority enum
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE TYPE meeting_tasks.task_priority AS ENUM (
                    'high',
                    'medium',
                    'low'
                )",
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared("ALTER TYPE meeting_tasks.task_priority OWNER TO meeting_tasks")
            .await?;

        // Create meetings table
        let create_meetings_sql = r#"
            CREATE TABLE IF NOT EXISTS meeting_tasks.meetings (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                platform_meeting_id VARCHAR(255) NOT NULL,
                meeting_url TEXT NOT NULL,
                bot_name VARCHAR(255) NOT NULL DEFAULT 'MeetingBot',
                status meeting_tasks.meeting_status NOT NULL DEFAULT 'pending',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                completed_at TIMESTAMPTZ,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

                CONSTRAINT meetings_platform_meeting_id_unique UNIQUE(platform_meeting_id)
            )
        "#;

        manager
            .get_connection()
            .execute_unprepared(create_meetings_sql)
            .await?;

        manager
            .get_connection()
            .execute_unprepared("ALTER TABLE meeting_tasks.meetings OWNER TO meeting_tasks")
            .await?;

        // Create transcripts table (one per meeting)
        let create_transcripts_sql = r#"
            CREATE TABLE IF NOT EXISTS meeting_tasks.transcripts (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                meeting_id UUID NOT NULL
                    REFERENCES meeting_tasks.meetings(id) ON DELETE CASCADE,
                raw_payload TEXT NOT NULL,
                processed_text TEXT NOT NULL,
                additional_context TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

                CONSTRAINT transcripts_meeting_unique UNIQUE(meeting_id)
            )
        "#;

        manager
            .get_connection()
            .execute_unprepared(create_transcripts_sql)
            .await?;

        manager
            .get_connection()
            .execute_unprepared("ALTER TABLE meeting_tasks.transcripts OWNER TO meeting_tasks")
            .await?;

        // Create tasks table
        let create_tasks_sql = r#"
            CREATE TABLE IF NOT EXISTS meeting_tasks.tasks (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                meeting_id UUID NOT NULL
                    REFERENCES meeting_tasks.meetings(id) ON DELETE CASCADE,
                assignee_name VARCHAR(255) NOT NULL,
                task_description TEXT NOT NULL,
                deadline VARCHAR(255),
                priority meeting_tasks.task_priority,
                is_completed BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#;

        manager
            .get_connection()
            .execute_unprepared(create_tasks_sql)
            .await?;

        manager
            .get_connection()
            .execute_unprepared("ALTER TABLE meeting_tasks.tasks OWNER TO meeting_tasks")
            .await?;

        // Create indexes for efficient querying
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS idx_transcripts_meeting
                 ON meeting_tasks.transcripts(meeting_id)",
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS idx_tasks_meeting
                 ON meeting_tasks.tasks(meeting_id)",
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS idx_meetings_created_at
                 ON meeting_tasks.meetings(created_at)",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order of creation (respecting foreign key dependencies)
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS meeting_tasks.tasks")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS meeting_tasks.transcripts")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS meeting_tasks.meetings")
            .await?;

        // Drop enum types
        manager
            .get_connection()
            .execute_unprepared("DROP TYPE IF EXISTS meeting_tasks.task_priority")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP TYPE IF EXISTS meeting_tasks.meeting_status")
            .await?;

        Ok(())
    }
}
