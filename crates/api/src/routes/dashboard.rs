//! Route definitions for dashboards and dashboard widgets.
//!
//! All endpoints require authentication.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{dashboard, widget};
use crate::state::AppState;

/// Routes mounted at `/dashboard`.
///
/// ```text
/// GET    /{id}                          -> get_dashboard
/// DELETE /{id}                          -> delete_dashboard
/// GET    /widget_configs                -> list_widget_configs
/// GET    /widgets/{name}/attributes     -> widget_attributes
/// GET    /widgets/{name}/items          -> widget_items
/// GET    /widgets/{name}/items_data     -> widget_items_data
/// GET    /widget/{id}/form_values       -> widget_form_values
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(dashboard::get_dashboard).delete(dashboard::delete_dashboard),
        )
        .route("/widget_configs", get(widget::list_widget_configs))
        .route("/widgets/{name}/attributes", get(widget::widget_attributes))
        .route("/widgets/{name}/items", get(widget::widget_items))
        .route("/widgets/{name}/items_data", get(widget::widget_items_data))
        .route("/widget/{id}/form_values", get(widget::widget_form_values))
}

/// Routes mounted at `/dashboard_widget`.
///
/// ```text
/// POST /add_widget   -> add_widget
/// ```
pub fn widget_router() -> Router<AppState> {
    Router::new().route("/add_widget", post(widget::add_widget))
}
