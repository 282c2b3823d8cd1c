//! Postgres-backed [`DashboardStore`].

use async_trait::async_trait;
use sqlx::PgPool;
use widgetboard_core::dashboard::{Dashboard, LayoutChange, Widget};
use widgetboard_core::error::CoreError;
use widgetboard_core::store::{CreateWidget, DashboardStore};
use widgetboard_core::types::DbId;

use crate::repositories::{DashboardRepo, WidgetRepo};

#[derive(Debug, Clone)]
pub struct PgDashboardStore {
    pool: PgPool,
}

impl PgDashboardStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DashboardStore for PgDashboardStore {
    async fn find_dashboard(&self, id: DbId) -> Result<Option<Dashboard>, CoreError> {
        let Some(row) = DashboardRepo::find_by_id(&self.pool, id).await.map_err(to_core)? else {
            return Ok(None);
        };
        let widgets = WidgetRepo::list_by_dashboard(&self.pool, id)
            .await
            .map_err(to_core)?
            .into_iter()
            .map(Widget::from)
            .collect();
        Ok(Some(row.into_dashboard(widgets)))
    }

    async fn find_widget(&self, id: DbId) -> Result<Option<Widget>, CoreError> {
        let row = WidgetRepo::find_by_id(&self.pool, id).await.map_err(to_core)?;
        Ok(row.map(Widget::from))
    }

    async fn place_widget(
        &self,
        input: &CreateWidget,
        shifts: &[LayoutChange],
    ) -> Result<Widget, CoreError> {
        let row = WidgetRepo::place(&self.pool, input, shifts)
            .await
            .map_err(to_core)?;
        Ok(row.into())
    }

    async fn remove_dashboard(&self, id: DbId) -> Result<bool, CoreError> {
        DashboardRepo::delete(&self.pool, id).await.map_err(to_core)
    }

    async fn health_check(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool).await.map_err(to_core)
    }
}

/// Map a sqlx error onto the domain error type.
///
/// Unique constraint violations (constraint name starting with `uq_`) become
/// [`CoreError::Conflict`]; everything else is logged and reported as
/// internal.
fn to_core(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        // PostgreSQL unique constraint violation: error code 23505
        if db_err.code().as_deref() == Some("23505") {
            let constraint = db_err.constraint().unwrap_or("unknown");
            if constraint.starts_with("uq_") {
                return CoreError::Conflict(format!(
                    "Duplicate value violates unique constraint: {constraint}"
                ));
            }
        }
    }
    tracing::error!(error = %err, "Database error");
    CoreError::Internal(format!("Database error: {err}"))
}
