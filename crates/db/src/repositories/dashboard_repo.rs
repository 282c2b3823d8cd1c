//! Repository for the `dashboards` table.

use sqlx::PgPool;
use widgetboard_core::types::DbId;

use crate::models::dashboard::{CreateDashboard, DashboardRow};

/// Column list for `dashboards` queries.
const COLUMNS: &str = "id, name, label, owner_id, created_at, updated_at";

/// Provides CRUD operations for dashboards.
pub struct DashboardRepo;

impl DashboardRepo {
    /// Insert a new dashboard, returning the created row.
    ///
    /// Fails with a unique violation on `uq_dashboards_name` if the name is
    /// already taken.
    pub async fn create(pool: &PgPool, input: &CreateDashboard) -> Result<DashboardRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO dashboards (name, label, owner_id) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DashboardRow>(&query)
            .bind(&input.name)
            .bind(&input.label)
            .bind(input.owner_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<DashboardRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dashboards WHERE id = $1");
        sqlx::query_as::<_, DashboardRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<DashboardRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dashboards WHERE name = $1");
        sqlx::query_as::<_, DashboardRow>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Delete a dashboard. Its widgets go with it (`ON DELETE CASCADE`).
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM dashboards WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
