//! Dashboard widget entity model.

use serde::Serialize;
use sqlx::FromRow;
use widgetboard_core::dashboard::Widget;
use widgetboard_core::types::{DbId, Timestamp};

/// A row from the `dashboard_widgets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WidgetRow {
    pub id: DbId,
    pub dashboard_id: DbId,
    pub name: String,
    pub options: serde_json::Value,
    pub layout_column: i32,
    pub position: i32,
    pub expanded: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<WidgetRow> for Widget {
    fn from(row: WidgetRow) -> Self {
        let options = match row.options {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        Widget {
            id: row.id,
            dashboard_id: Some(row.dashboard_id),
            name: row.name,
            options,
            position: row.position,
            layout_column: row.layout_column,
            expanded: row.expanded,
        }
    }
}
