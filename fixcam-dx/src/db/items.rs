//! Material/tool ownership toggle
//!
//! The toggle is a single conditional UPDATE scoped by project id plus item
//! id. Concurrent toggles on different items of one project cannot lose
//! updates; same-item races are last-write-wins at row granularity.

use fixcam_common::{Error, Result};
use sqlx::SqlitePool;

/// Set the `already_owned` flag on one material or tool
///
/// Matches zero rows when the project/item pair does not exist, which is
/// surfaced as NotFound; nothing else is touched in that case.
pub async fn set_item_owned(
    pool: &SqlitePool,
    project_id: &str,
    item_id: &str,
    owned: bool,
) -> Result<()> {
    let result = sqlx::query(
        "UPDATE project_items SET already_owned = ? WHERE project_id = ? AND item_id = ?",
    )
    .bind(owned as i64)
    .bind(project_id)
    .bind(item_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!(
            "Project {} has no material or tool {}",
            project_id, item_id
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixcam_common::ids::new_entity_id;

    async fn test_pool_with_item() -> (SqlitePool, String, String) {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        crate::db::init_tables(&pool).await.unwrap();

        let project_id = new_entity_id();
        let item_id = new_entity_id();
        sqlx::query(
            "INSERT INTO projects (project_id, title, description, hardware_identified, \
             issue_type, skill_level, skill_level_name, estimated_time, primary_image, \
             thumbnail_image, safety_warnings, created_at) \
             VALUES (?, 't', 'd', 'h', 'i', 2, 'Beginner', '1-2 hours', '', '', '[]', ?)",
        )
        .bind(&project_id)
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(&pool)
        .await
        .unwrap();

        sqlx::query(
            "INSERT INTO project_items (item_id, project_id, position, name, category, \
             estimated_cost, already_owned) VALUES (?, ?, 0, 'Wrench', 'tool', 'varies', 0)",
        )
        .bind(&item_id)
        .bind(&project_id)
        .execute(&pool)
        .await
        .unwrap();

        (pool, project_id, item_id)
    }

    #[tokio::test]
    async fn test_toggle_item() {
        let (pool, project_id, item_id) = test_pool_with_item().await;

        set_item_owned(&pool, &project_id, &item_id, true)
            .await
            .unwrap();

        let owned: i64 = sqlx::query_scalar(
            "SELECT already_owned FROM project_items WHERE item_id = ?",
        )
        .bind(&item_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(owned, 1);
    }

    #[tokio::test]
    async fn test_toggle_unknown_item_is_not_found() {
        let (pool, project_id, _item_id) = test_pool_with_item().await;

        let result = set_item_owned(&pool, &project_id, "missing-item", true).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_toggle_wrong_project_is_not_found() {
        let (pool, _project_id, item_id) = test_pool_with_item().await;

        let result = set_item_owned(&pool, "other-project", &item_id, true).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
