#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use widgetboard_api::auth::jwt::{generate_access_token, JwtConfig};
use widgetboard_api::auth::permissions::RolePermissions;
use widgetboard_api::config::ServerConfig;
use widgetboard_api::router::build_app_router;
use widgetboard_api::state::AppState;
use widgetboard_core::dashboard::{Dashboard, LayoutChange, Widget};
use widgetboard_core::error::CoreError;
use widgetboard_core::expression::ProviderResolver;
use widgetboard_core::store::{CreateWidget, DashboardStore};
use widgetboard_core::translation::CatalogTranslator;
use widgetboard_core::types::DbId;
use widgetboard_core::widget_config::ConfigDocument;

pub const JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Widget configuration used by the API tests.
pub const TEST_CONFIG: &str = r#"{
    "widgets": {
        "quick_launchpad": {
            "label": "widget.quick_launchpad",
            "route": "dashboard_widget_launchpad",
            "icon": "rocket",
            "configuration": {
                "title": { "type": "widget_title" }
            },
            "items": {
                "accounts": { "label": "Accounts", "acl": "account_view" },
                "contacts": { "label": "Contacts", "acl": "contact_view" }
            }
        },
        "sales_overview": {
            "label": "widget.sales_overview",
            "acl": "sales_view",
            "configuration": {
                "title": { "type": "widget_title" },
                "subWidgets": { "type": "widget_items_choice" },
                "period": { "type": "widget_date_range" }
            },
            "data_items": {
                "revenue": { "label": "Revenue", "data_provider": "@sales.revenue" },
                "orders": { "label": "Orders", "data_provider": "@sales.orders" },
                "selected": { "label": "Selected", "data_provider": "$widgetOptions.subWidgets" }
            }
        },
        "hidden_widget": {
            "label": "Hidden",
            "applicable": "@feature.off"
        },
        "broken_widget": {
            "label": "Broken",
            "configuration": { "trend": { "type": "sparkline" } }
        }
    },
    "translations": { "widget.sales_overview": "Sales overview" },
    "role_permissions": {
        "admin": ["dashboard_view", "dashboard_update", "dashboard_delete", "account_view", "sales_view"],
        "editor": ["dashboard_view", "dashboard_update"],
        "viewer": ["dashboard_view"]
    }
}"#;

// ---------------------------------------------------------------------------
// In-memory dashboard store
// ---------------------------------------------------------------------------

#[derive(Default)]
struct StoreData {
    dashboards: HashMap<DbId, Dashboard>,
    widgets: HashMap<DbId, Widget>,
    next_widget_id: DbId,
    fail_writes: bool,
}

/// Dashboard store kept in memory, shared between the app and the test body.
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<StoreData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let store = Self::default();
        store.data.lock().unwrap().next_widget_id = 100;
        store
    }

    pub fn insert_dashboard(&self, id: DbId, name: &str) {
        let mut data = self.data.lock().unwrap();
        data.dashboards.insert(id, Dashboard::new(id, name, name));
    }

    pub fn insert_widget(&self, widget: Widget) {
        let mut data = self.data.lock().unwrap();
        data.widgets.insert(widget.id, widget);
    }

    /// Make every later write fail with an internal error.
    pub fn fail_writes(&self) {
        self.data.lock().unwrap().fail_writes = true;
    }

    pub fn has_dashboard(&self, id: DbId) -> bool {
        self.data.lock().unwrap().dashboards.contains_key(&id)
    }

    pub fn widget(&self, id: DbId) -> Option<Widget> {
        self.data.lock().unwrap().widgets.get(&id).cloned()
    }

    pub fn widget_count(&self) -> usize {
        self.data.lock().unwrap().widgets.len()
    }
}

#[async_trait]
impl DashboardStore for MemoryStore {
    async fn find_dashboard(&self, id: DbId) -> Result<Option<Dashboard>, CoreError> {
        let data = self.data.lock().unwrap();
        Ok(data.dashboards.get(&id).map(|dashboard| {
            let mut widgets: Vec<Widget> = data
                .widgets
                .values()
                .filter(|w| w.dashboard_id == Some(id))
                .cloned()
                .collect();
            widgets.sort_by_key(|w| (w.position, w.id));
            dashboard.clone().with_widgets(widgets)
        }))
    }

    async fn find_widget(&self, id: DbId) -> Result<Option<Widget>, CoreError> {
        Ok(self.widget(id))
    }

    async fn place_widget(
        &self,
        input: &CreateWidget,
        shifts: &[LayoutChange],
    ) -> Result<Widget, CoreError> {
        let mut data = self.data.lock().unwrap();
        if data.fail_writes {
            return Err(CoreError::Internal("storage unavailable".into()));
        }

        for shift in shifts {
            if let Some(widget) = data.widgets.get_mut(&shift.widget_id) {
                widget.layout_column = shift.layout_column;
                widget.position = shift.position;
            }
        }

        data.next_widget_id += 1;
        let widget = Widget {
            id: data.next_widget_id,
            dashboard_id: Some(input.dashboard_id),
            name: input.name.clone(),
            options: input.options.clone(),
            position: input.position,
            layout_column: input.layout_column,
            expanded: input.expanded,
        };
        data.widgets.insert(widget.id, widget.clone());
        Ok(widget)
    }

    async fn remove_dashboard(&self, id: DbId) -> Result<bool, CoreError> {
        let mut data = self.data.lock().unwrap();
        if data.fail_writes {
            return Err(CoreError::Internal("storage unavailable".into()));
        }
        let removed = data.dashboards.remove(&id).is_some();
        data.widgets.retain(|_, w| w.dashboard_id != Some(id));
        Ok(removed)
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
        widget_config_path: "config/widgets.json".into(),
    }
}

fn test_resolver() -> ProviderResolver {
    let mut resolver = ProviderResolver::new();
    resolver
        .register_constant("sales.revenue", json!(1200))
        .register_constant("sales.orders", json!(34))
        .register_constant("feature.off", json!(false));
    resolver
}

/// Build the full application router over `store`, using the same middleware
/// stack as production.
pub fn build_test_app(store: MemoryStore) -> Router {
    let config = test_config();
    let (configs, translations, role_permissions) = ConfigDocument::from_json_str(TEST_CONFIG)
        .expect("test config should parse")
        .into_parts();

    let state = AppState {
        store: Arc::new(store),
        configs: Arc::new(configs),
        resolver: Arc::new(test_resolver()),
        translator: Arc::new(CatalogTranslator::new(translations)),
        role_permissions: Arc::new(RolePermissions::new(role_permissions)),
        config: Arc::new(config.clone()),
    };

    build_app_router(state, &config)
}

/// A valid access token for a user with `role`.
pub fn token_for(role: &str) -> String {
    generate_access_token(1, role, &test_config().jwt).expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// POST an `application/x-www-form-urlencoded` body.
pub async fn post_form_auth(app: Router, uri: &str, form: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}
