//! Handlers for dashboards.
//!
//! Existence is checked before permissions, so a missing dashboard is a 404
//! for every caller.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use widgetboard_core::dashboard::Dashboard;
use widgetboard_core::error::CoreError;
use widgetboard_core::permissions::{DASHBOARD_DELETE, DASHBOARD_VIEW};
use widgetboard_core::types::DbId;
use widgetboard_core::widget_model::{widget_models, WidgetModel};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// A dashboard with the widgets visible to the caller.
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub id: DbId,
    pub name: String,
    pub label: String,
    pub owner_id: Option<DbId>,
    pub widgets: Vec<WidgetModel>,
}

/// Load a dashboard or fail with 404.
pub(crate) async fn find_dashboard(state: &AppState, id: DbId) -> AppResult<Dashboard> {
    state
        .store
        .find_dashboard(id)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "Dashboard",
                id,
            }
            .into()
        })
}

/// GET /api/v1/dashboard/{id}
pub async fn get_dashboard(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DashboardView>>> {
    let dashboard = find_dashboard(&state, id).await?;
    user.require(DASHBOARD_VIEW)?;

    let widgets = widget_models(&dashboard, &state.configs, &user.permissions);
    Ok(Json(DataResponse {
        data: DashboardView {
            id: dashboard.id,
            name: dashboard.name,
            label: dashboard.label,
            owner_id: dashboard.owner_id,
            widgets,
        },
    }))
}

/// DELETE /api/v1/dashboard/{id}
///
/// Removes the dashboard and, by cascade, its widgets.
pub async fn delete_dashboard(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    find_dashboard(&state, id).await?;
    user.require(DASHBOARD_DELETE)?;

    if !state.store.remove_dashboard(id).await? {
        // Deleted concurrently between the lookup and the delete.
        return Err(CoreError::NotFound {
            entity: "Dashboard",
            id,
        }
        .into());
    }

    tracing::info!(dashboard_id = id, user_id = user.user_id, "Dashboard deleted");
    Ok(StatusCode::NO_CONTENT)
}
