//! Repository for the `dashboard_widgets` table.

use sqlx::{PgPool, Postgres, Transaction};
use widgetboard_core::dashboard::LayoutChange;
use widgetboard_core::store::CreateWidget;
use widgetboard_core::types::DbId;

use crate::models::widget::WidgetRow;

/// Column list for `dashboard_widgets` queries.
const COLUMNS: &str =
    "id, dashboard_id, name, options, layout_column, position, expanded, created_at, updated_at";

/// Provides CRUD operations for widgets placed on dashboards.
pub struct WidgetRepo;

impl WidgetRepo {
    /// Insert a widget, shifting its siblings first, within one transaction.
    pub async fn place(
        pool: &PgPool,
        input: &CreateWidget,
        shifts: &[LayoutChange],
    ) -> Result<WidgetRow, sqlx::Error> {
        let mut tx = pool.begin().await?;

        for shift in shifts {
            Self::update_layout(&mut tx, shift.widget_id, shift.layout_column, shift.position)
                .await?;
        }
        let row = Self::create(&mut tx, input).await?;

        tx.commit().await?;
        Ok(row)
    }

    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        input: &CreateWidget,
    ) -> Result<WidgetRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO dashboard_widgets \
                (dashboard_id, name, options, layout_column, position, expanded) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WidgetRow>(&query)
            .bind(input.dashboard_id)
            .bind(&input.name)
            .bind(serde_json::Value::Object(input.options.clone()))
            .bind(input.layout_column)
            .bind(input.position)
            .bind(input.expanded)
            .fetch_one(&mut **tx)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<WidgetRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dashboard_widgets WHERE id = $1");
        sqlx::query_as::<_, WidgetRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All widgets of a dashboard, ordered by position.
    pub async fn list_by_dashboard(
        pool: &PgPool,
        dashboard_id: DbId,
    ) -> Result<Vec<WidgetRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM dashboard_widgets \
             WHERE dashboard_id = $1 \
             ORDER BY position ASC, id ASC"
        );
        sqlx::query_as::<_, WidgetRow>(&query)
            .bind(dashboard_id)
            .fetch_all(pool)
            .await
    }

    /// Move a widget to a new column and position.
    pub async fn update_layout(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        layout_column: i32,
        position: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE dashboard_widgets \
             SET layout_column = $2, position = $3, updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(layout_column)
        .bind(position)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
