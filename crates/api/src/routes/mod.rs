pub mod dashboard;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /dashboard/{id}                                  get, delete
/// /dashboard/widget_configs                        visible widget configs
/// /dashboard/widgets/{name}/attributes             template attributes
/// /dashboard/widgets/{name}/items                  visible items
/// /dashboard/widgets/{name}/items_data             visible data items with values
/// /dashboard/widget/{id}/form_values               configuration form values
///
/// /dashboard_widget/add_widget                     place a widget (POST, form)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/dashboard", dashboard::router())
        .nest("/dashboard_widget", dashboard::widget_router())
}
