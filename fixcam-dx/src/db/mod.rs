//! Database access for fixcam-dx

pub mod items;
pub mod projects;
pub mod steps;

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use proper SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Initialize fixcam-dx tables
///
/// Steps and items live in their own tables so the two partial-update
/// operations (ownership toggle, generated-image attachment) are single
/// conditional UPDATEs rather than document rewrites.
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS projects (
            project_id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            hardware_identified TEXT NOT NULL,
            issue_type TEXT NOT NULL,
            skill_level INTEGER NOT NULL,
            skill_level_name TEXT NOT NULL,
            estimated_time TEXT NOT NULL,
            primary_image TEXT NOT NULL,
            thumbnail_image TEXT NOT NULL,
            safety_warnings TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS project_steps (
            step_id TEXT PRIMARY KEY,
            project_id TEXT NOT NULL,
            position INTEGER NOT NULL,
            step_number INTEGER NOT NULL,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            warning TEXT,
            image_hint TEXT,
            generated_images TEXT NOT NULL DEFAULT '[]',
            images_generating INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS project_items (
            item_id TEXT PRIMARY KEY,
            project_id TEXT NOT NULL,
            position INTEGER NOT NULL,
            name TEXT NOT NULL,
            category TEXT NOT NULL CHECK (category IN ('material', 'tool')),
            estimated_cost TEXT NOT NULL,
            already_owned INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_project_steps_project ON project_steps(project_id)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_project_items_project ON project_items(project_id)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (projects, project_steps, project_items)");

    Ok(())
}
