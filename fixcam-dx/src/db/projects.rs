//! Project persistence
//!
//! Insert is all-or-nothing: the project row and every step/item row are
//! written in a single transaction, so a failed diagnosis request never
//! leaves a partially persisted project behind.

use sqlx::{Row, SqlitePool};
use fixcam_common::{Error, Result};

use crate::models::{skill_level_name, InstructionStep, ItemCategory, MaterialOrTool, Project};

/// Maximum number of projects returned by the list view
const LIST_LIMIT: i64 = 100;

/// Persist a fully assembled project atomically
pub async fn insert_project(pool: &SqlitePool, project: &Project) -> Result<()> {
    let safety_warnings = serde_json::to_string(&project.safety_warnings)
        .map_err(|e| Error::Internal(format!("Failed to serialize safety warnings: {}", e)))?;

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO projects (
            project_id, title, description, hardware_identified, issue_type,
            skill_level, skill_level_name, estimated_time,
            primary_image, thumbnail_image, safety_warnings, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&project.id)
    .bind(&project.title)
    .bind(&project.description)
    .bind(&project.hardware_identified)
    .bind(&project.issue_type)
    .bind(project.skill_level)
    .bind(&project.skill_level_name)
    .bind(&project.estimated_time)
    .bind(&project.primary_image)
    .bind(&project.thumbnail_image)
    .bind(&safety_warnings)
    .bind(project.created_at.to_rfc3339())
    .execute(&mut *tx)
    .await?;

    for (position, step) in project.steps.iter().enumerate() {
        let generated_images = serde_json::to_string(&step.generated_images)
            .map_err(|e| Error::Internal(format!("Failed to serialize step images: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO project_steps (
                step_id, project_id, position, step_number, title, description,
                warning, image_hint, generated_images, images_generating
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&step.id)
        .bind(&project.id)
        .bind(position as i64)
        .bind(step.step_number)
        .bind(&step.title)
        .bind(&step.description)
        .bind(&step.warning)
        .bind(&step.image_hint)
        .bind(&generated_images)
        .bind(step.images_generating as i64)
        .execute(&mut *tx)
        .await?;
    }

    for (position, item) in project
        .materials
        .iter()
        .chain(project.tools.iter())
        .enumerate()
    {
        sqlx::query(
            r#"
            INSERT INTO project_items (
                item_id, project_id, position, name, category, estimated_cost, already_owned
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&item.id)
        .bind(&project.id)
        .bind(position as i64)
        .bind(&item.name)
        .bind(item.category.as_str())
        .bind(&item.estimated_cost)
        .bind(item.already_owned as i64)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(())
}

/// Fetch a full project by id
pub async fn find_project(pool: &SqlitePool, project_id: &str) -> Result<Project> {
    let row = sqlx::query(
        r#"
        SELECT project_id, title, description, hardware_identified, issue_type,
               skill_level, skill_level_name, estimated_time,
               primary_image, thumbnail_image, safety_warnings, created_at
        FROM projects
        WHERE project_id = ?
        "#,
    )
    .bind(project_id)
    .fetch_optional(pool)
    .await?;

    let row = row.ok_or_else(|| Error::NotFound(format!("Project not found: {}", project_id)))?;

    let mut project = project_from_row(&row)?;
    project.steps = load_steps(pool, project_id).await?;
    let (materials, tools) = load_items(pool, project_id).await?;
    project.materials = materials;
    project.tools = tools;

    Ok(project)
}

/// List projects newest-first for the history view
///
/// The heavyweight primary image is excluded from list rows (clients render
/// the thumbnail); the field is backfilled as an empty string.
pub async fn list_projects(pool: &SqlitePool) -> Result<Vec<Project>> {
    let rows = sqlx::query(
        r#"
        SELECT project_id, title, description, hardware_identified, issue_type,
               skill_level, skill_level_name, estimated_time,
               '' AS primary_image, thumbnail_image, safety_warnings, created_at
        FROM projects
        ORDER BY created_at DESC
        LIMIT ?
        "#,
    )
    .bind(LIST_LIMIT)
    .fetch_all(pool)
    .await?;

    let mut projects = Vec::with_capacity(rows.len());
    for row in &rows {
        let mut project = project_from_row(row)?;
        let project_id = project.id.clone();
        project.steps = load_steps(pool, &project_id).await?;
        let (materials, tools) = load_items(pool, &project_id).await?;
        project.materials = materials;
        project.tools = tools;
        projects.push(project);
    }

    Ok(projects)
}

/// Delete a project and its sub-entities. Unconditional and irreversible.
pub async fn delete_project(pool: &SqlitePool, project_id: &str) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM project_steps WHERE project_id = ?")
        .bind(project_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM project_items WHERE project_id = ?")
        .bind(project_id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM projects WHERE project_id = ?")
        .bind(project_id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Project not found: {}", project_id)));
    }

    tx.commit().await?;

    Ok(())
}

fn project_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Project> {
    let safety_warnings: String = row.get("safety_warnings");
    let safety_warnings: Vec<String> = serde_json::from_str(&safety_warnings)
        .map_err(|e| Error::Internal(format!("Failed to deserialize safety warnings: {}", e)))?;

    let created_at: String = row.get("created_at");
    let created_at = chrono::DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| Error::Internal(format!("Failed to parse created_at: {}", e)))?
        .with_timezone(&chrono::Utc);

    let skill_level: i64 = row.get("skill_level");

    Ok(Project {
        id: row.get("project_id"),
        title: row.get("title"),
        description: row.get("description"),
        hardware_identified: row.get("hardware_identified"),
        issue_type: row.get("issue_type"),
        skill_level,
        // Re-derive rather than trust the stored label
        skill_level_name: skill_level_name(skill_level).to_string(),
        estimated_time: row.get("estimated_time"),
        primary_image: row.get("primary_image"),
        thumbnail_image: row.get("thumbnail_image"),
        steps: Vec::new(),
        materials: Vec::new(),
        tools: Vec::new(),
        safety_warnings,
        created_at,
    })
}

async fn load_steps(pool: &SqlitePool, project_id: &str) -> Result<Vec<InstructionStep>> {
    let rows = sqlx::query(
        r#"
        SELECT step_id, step_number, title, description, warning, image_hint,
               generated_images, images_generating
        FROM project_steps
        WHERE project_id = ?
        ORDER BY position ASC
        "#,
    )
    .bind(project_id)
    .fetch_all(pool)
    .await?;

    let mut steps = Vec::with_capacity(rows.len());
    for row in rows {
        let generated_images: String = row.get("generated_images");
        let generated_images: Vec<String> = serde_json::from_str(&generated_images)
            .map_err(|e| Error::Internal(format!("Failed to deserialize step images: {}", e)))?;

        steps.push(InstructionStep {
            id: row.get("step_id"),
            step_number: row.get("step_number"),
            title: row.get("title"),
            description: row.get("description"),
            warning: row.get("warning"),
            image_hint: row.get("image_hint"),
            generated_images,
            images_generating: row.get::<i64, _>("images_generating") != 0,
        });
    }

    Ok(steps)
}

async fn load_items(
    pool: &SqlitePool,
    project_id: &str,
) -> Result<(Vec<MaterialOrTool>, Vec<MaterialOrTool>)> {
    let rows = sqlx::query(
        r#"
        SELECT item_id, name, category, estimated_cost, already_owned
        FROM project_items
        WHERE project_id = ?
        ORDER BY position ASC
        "#,
    )
    .bind(project_id)
    .fetch_all(pool)
    .await?;

    let mut materials = Vec::new();
    let mut tools = Vec::new();
    for row in rows {
        let category: String = row.get("category");
        let category = ItemCategory::from_str(&category)
            .ok_or_else(|| Error::Internal(format!("Unknown item category: {}", category)))?;

        let item = MaterialOrTool {
            id: row.get("item_id"),
            name: row.get("name"),
            category,
            estimated_cost: row.get("estimated_cost"),
            already_owned: row.get::<i64, _>("already_owned") != 0,
        };

        match category {
            ItemCategory::Material => materials.push(item),
            ItemCategory::Tool => tools.push(item),
        }
    }

    Ok((materials, tools))
}
