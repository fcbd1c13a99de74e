use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create the service's schema
        manager
            .get_connection()
            .execute_unprepared("CREATE SCHEMA IF NOT EXISTS meeting_tasks;")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("SET search_path TO meeting_tasks, public;")
            .await?;

        // Grant the service DB user access to everything created in the schema
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DO $$ BEGIN
                    GRANT ALL PRIVILEGES ON DATABASE meeting_tasks TO meeting_tasks;
                    GRANT ALL ON SCHEMA meeting_tasks TO meeting_tasks;

                    ALTER DEFAULT PRIVILEGES IN SCHEMA meeting_tasks GRANT ALL ON TABLES TO meeting_tasks;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA meeting_tasks GRANT ALL ON SEQUENCES TO meeting_tasks;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA meeting_tasks GRANT ALL ON FUNCTIONS TO meeting_tasks;
                END $$;
            "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Revoke default privileges first
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DO $$ BEGIN
                    ALTER DEFAULT PRIVILEGES IN SCHEMA meeting_tasks REVOKE ALL ON FUNCTIONS FROM meeting_tasks;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA meeting_tasks REVOKE ALL ON SEQUENCES FROM meeting_tasks;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA meeting_tasks REVOKE ALL ON TABLES FROM meeting_tasks;
                    REVOKE ALL ON SCHEMA meeting_tasks FROM meeting_tasks;
                    REVOKE ALL PRIVILEGES ON DATABASE meeting_tasks FROM meeting_tasks;
                END $$;
            "#,
            )
            .await?;

        // Drop the schema (CASCADE will remove all objects in it)
        manager
            .get_connection()
            .execute_unprepared("DROP SCHEMA IF EXISTS meeting_tasks CASCADE;")
            .await?;

        Ok(())
    }
}
