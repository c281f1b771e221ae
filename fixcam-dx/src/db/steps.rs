//! Step-level partial updates for asset generation
//!
//! Generated images are attached via a targeted UPDATE keyed by project id
//! plus step id, never a full-project rewrite. The `images_generating`
//! column is advisory only; it signals in-flight generation to clients but
//! provides no mutual exclusion.

use fixcam_common::{Error, Result};
use sqlx::{Row, SqlitePool};

/// Read the generated images for one step
pub async fn get_step_images(
    pool: &SqlitePool,
    project_id: &str,
    step_id: &str,
) -> Result<Vec<String>> {
    let row = sqlx::query(
        "SELECT generated_images FROM project_steps WHERE project_id = ? AND step_id = ?",
    )
    .bind(project_id)
    .bind(step_id)
    .fetch_optional(pool)
    .await?;

    let row = row.ok_or_else(|| {
        Error::NotFound(format!("Project {} has no step {}", project_id, step_id))
    })?;

    let images: String = row.get("generated_images");
    serde_json::from_str(&images)
        .map_err(|e| Error::Internal(format!("Failed to deserialize step images: {}", e)))
}

/// Set or clear the advisory in-flight flag
pub async fn set_images_generating(
    pool: &SqlitePool,
    project_id: &str,
    step_id: &str,
    generating: bool,
) -> Result<()> {
    let result = sqlx::query(
        "UPDATE project_steps SET images_generating = ? WHERE project_id = ? AND step_id = ?",
    )
    .bind(generating as i64)
    .bind(project_id)
    .bind(step_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!(
            "Project {} has no step {}",
            project_id, step_id
        )));
    }

    Ok(())
}

/// Attach generated images to a step and clear the in-flight flag
pub async fn attach_generated_images(
    pool: &SqlitePool,
    project_id: &str,
    step_id: &str,
    images: &[String],
) -> Result<()> {
    let images_json = serde_json::to_string(images)
        .map_err(|e| Error::Internal(format!("Failed to serialize step images: {}", e)))?;

    let result = sqlx::query(
        "UPDATE project_steps SET generated_images = ?, images_generating = 0 \
         WHERE project_id = ? AND step_id = ?",
    )
    .bind(&images_json)
    .bind(project_id)
    .bind(step_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!(
            "Project {} has no step {}",
            project_id, step_id
        )));
    }

    Ok(())
}
