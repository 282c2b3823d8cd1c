//! Persistence boundary for dashboards and widgets.
//!
//! The HTTP layer and the options resolver only talk to [`DashboardStore`];
//! the Postgres implementation lives in the db crate.

use async_trait::async_trait;
use serde::Deserialize;

use crate::dashboard::{Dashboard, LayoutChange, Widget};
use crate::error::CoreError;
use crate::types::{DbId, OptionMap};

/// Input for inserting a widget row.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWidget {
    pub dashboard_id: DbId,
    pub name: String,
    #[serde(default)]
    pub options: OptionMap,
    pub layout_column: i32,
    pub position: i32,
    pub expanded: bool,
}

#[async_trait]
pub trait DashboardStore: Send + Sync {
    /// Load a dashboard together with its widgets ordered by position.
    async fn find_dashboard(&self, id: DbId) -> Result<Option<Dashboard>, CoreError>;

    async fn find_widget(&self, id: DbId) -> Result<Option<Widget>, CoreError>;

    /// Insert a widget and apply the layout changes of its siblings.
    ///
    /// All writes land together or not at all.
    async fn place_widget(
        &self,
        input: &CreateWidget,
        shifts: &[LayoutChange],
    ) -> Result<Widget, CoreError>;

    /// Delete a dashboard and, by cascade, its widgets. Returns `false` if it
    /// does not exist.
    async fn remove_dashboard(&self, id: DbId) -> Result<bool, CoreError>;

    /// Check that the backing storage is reachable.
    async fn health_check(&self) -> Result<(), CoreError> {
        Ok(())
    }
}
