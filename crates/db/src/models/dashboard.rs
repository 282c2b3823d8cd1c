//! Dashboard entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use widgetboard_core::dashboard::{Dashboard, Widget};
use widgetboard_core::types::{DbId, Timestamp};

/// A row from the `dashboards` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DashboardRow {
    pub id: DbId,
    pub name: String,
    pub label: String,
    pub owner_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DashboardRow {
    /// Build the domain aggregate from this row and its widgets.
    pub fn into_dashboard(self, widgets: Vec<Widget>) -> Dashboard {
        let mut dashboard = Dashboard::new(self.id, self.name, self.label);
        dashboard.owner_id = self.owner_id;
        dashboard.with_widgets(widgets)
    }
}

/// DTO for creating a dashboard.
#[derive(Debug, Deserialize)]
pub struct CreateDashboard {
    pub name: String,
    pub label: String,
    pub owner_id: Option<DbId>,
}
