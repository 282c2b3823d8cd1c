//! Handlers for placing widgets and reading widget configuration.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::{Map, Value};
use widgetboard_core::access_filter::{AccessFilter, Selection};
use widgetboard_core::dashboard::Widget;
use widgetboard_core::error::CoreError;
use widgetboard_core::permissions::{DASHBOARD_UPDATE, DASHBOARD_VIEW};
use widgetboard_core::store::CreateWidget;
use widgetboard_core::types::{DbId, OptionMap};
use widgetboard_core::widget_config::WidgetConfig;
use widgetboard_core::widget_configs::{RequestScope, VisibleEntries};

use super::dashboard::find_dashboard;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Form body of `POST /dashboard_widget/add_widget`.
#[derive(Debug, Deserialize)]
pub struct AddWidgetForm {
    #[serde(rename = "widgetName")]
    pub widget_name: String,
    #[serde(rename = "dashboardId")]
    pub dashboard_id: DbId,
    #[serde(rename = "targetColumn", default)]
    pub target_column: i32,
}

/// Query params carrying the widget whose options drive a read.
#[derive(Debug, Default, Deserialize)]
pub struct WidgetScopeQuery {
    #[serde(rename = "_widgetId")]
    pub widget_id: Option<DbId>,
}

impl From<WidgetScopeQuery> for RequestScope {
    fn from(query: WidgetScopeQuery) -> Self {
        RequestScope {
            widget_id: query.widget_id,
        }
    }
}

fn require_config<'a>(state: &'a AppState, name: &str) -> AppResult<&'a WidgetConfig> {
    state
        .configs
        .get(name)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown widget '{name}'")))
}

/// Fail with 403 unless the caller may see the widget configuration `name`.
fn ensure_visible(
    state: &AppState,
    user: &AuthUser,
    name: &str,
    config: &WidgetConfig,
) -> AppResult<()> {
    let filter = AccessFilter::new(&user.permissions, state.resolver.as_ref());
    if filter.is_visible(name, config, Selection::All) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!("Widget '{name}' is not available")).into())
    }
}

/// Load a placed widget the caller may read.
///
/// A missing widget or dashboard is a 404 before any permission check. The
/// caller then needs `dashboard_view` and must be able to see the widget's
/// configuration.
async fn find_readable_widget(state: &AppState, user: &AuthUser, id: DbId) -> AppResult<Widget> {
    let not_found = || CoreError::NotFound {
        entity: "Widget",
        id,
    };
    let widget = state.store.find_widget(id).await?.ok_or_else(not_found)?;
    let dashboard_id = widget.dashboard_id.ok_or_else(not_found)?;
    find_dashboard(state, dashboard_id).await?;
    user.require(DASHBOARD_VIEW)?;

    let config = require_config(state, &widget.name)?;
    ensure_visible(state, user, &widget.name, config)?;
    Ok(widget)
}

/// Checks shared by the reads addressed by widget name.
///
/// The widget named by `_widgetId` goes through [`find_readable_widget`]
/// before its options are used.
async fn authorize_named_read(
    state: &AppState,
    user: &AuthUser,
    name: &str,
    query: &WidgetScopeQuery,
) -> AppResult<()> {
    let config = require_config(state, name)?;
    if let Some(widget_id) = query.widget_id {
        find_readable_widget(state, user, widget_id).await?;
    }
    user.require(DASHBOARD_VIEW)?;
    ensure_visible(state, user, name, config)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/dashboard_widget/add_widget
///
/// Places a new, expanded widget with empty options at the top of the target
/// column. Widgets already in that column move down by one.
pub async fn add_widget(
    user: AuthUser,
    State(state): State<AppState>,
    Form(input): Form<AddWidgetForm>,
) -> AppResult<(StatusCode, Json<DataResponse<Widget>>)> {
    let config = require_config(&state, &input.widget_name)?;
    let mut dashboard = find_dashboard(&state, input.dashboard_id).await?;
    user.require(DASHBOARD_UPDATE)?;
    ensure_visible(&state, &user, &input.widget_name, config)?;

    let shifts = dashboard.shift_column(input.target_column);
    let created = state
        .store
        .place_widget(
            &CreateWidget {
                dashboard_id: dashboard.id,
                name: input.widget_name.clone(),
                options: OptionMap::new(),
                layout_column: input.target_column,
                position: 0,
                expanded: true,
            },
            &shifts,
        )
        .await?;

    tracing::info!(
        widget_id = created.id,
        dashboard_id = dashboard.id,
        widget_name = %created.name,
        shifted = shifts.len(),
        user_id = user.user_id,
        "Widget added to dashboard"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/dashboard/widget_configs
pub async fn list_widget_configs(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<VisibleEntries>>> {
    user.require(DASHBOARD_VIEW)?;
    let configs = state.widget_configs(&user.permissions, RequestScope::default());
    Ok(Json(DataResponse {
        data: configs.widget_configs(),
    }))
}

/// GET /api/v1/dashboard/widgets/{name}/attributes
pub async fn widget_attributes(
    user: AuthUser,
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<WidgetScopeQuery>,
) -> AppResult<Json<DataResponse<Map<String, Value>>>> {
    authorize_named_read(&state, &user, &name, &query).await?;
    let configs = state.widget_configs(&user.permissions, query.into());
    let attributes = configs.widget_attributes_for_template(&name).await?;
    Ok(Json(DataResponse { data: attributes }))
}

/// GET /api/v1/dashboard/widgets/{name}/items
pub async fn widget_items(
    user: AuthUser,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<DataResponse<VisibleEntries>>> {
    authorize_named_read(&state, &user, &name, &WidgetScopeQuery::default()).await?;
    let configs = state.widget_configs(&user.permissions, RequestScope::default());
    Ok(Json(DataResponse {
        data: configs.widget_items(&name)?,
    }))
}

/// GET /api/v1/dashboard/widgets/{name}/items_data
pub async fn widget_items_data(
    user: AuthUser,
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<WidgetScopeQuery>,
) -> AppResult<Json<DataResponse<VisibleEntries>>> {
    authorize_named_read(&state, &user, &name, &query).await?;
    let configs = state.widget_configs(&user.permissions, query.into());
    let items = configs.widget_items_data(&name, None).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/dashboard/widget/{id}/form_values
pub async fn widget_form_values(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<OptionMap>>> {
    let widget = find_readable_widget(&state, &user, id).await?;
    let configs = state.widget_configs(&user.permissions, RequestScope { widget_id: Some(id) });
    Ok(Json(DataResponse {
        data: configs.form_values(&widget)?,
    }))
}
