use std::sync::Arc;

use widgetboard_core::expression::ProviderResolver;
use widgetboard_core::security::PermissionChecker;
use widgetboard_core::store::DashboardStore;
use widgetboard_core::translation::CatalogTranslator;
use widgetboard_core::widget_config::WidgetConfigStore;
use widgetboard_core::widget_configs::{RequestScope, WidgetConfigs};

use crate::auth::permissions::RolePermissions;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Dashboard and widget persistence.
    pub store: Arc<dyn DashboardStore>,
    /// Widget configuration, loaded once at startup.
    pub configs: Arc<WidgetConfigStore>,
    /// Resolver for `applicable` and `data_provider` expressions.
    pub resolver: Arc<ProviderResolver>,
    pub translator: Arc<CatalogTranslator>,
    pub role_permissions: Arc<RolePermissions>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Build a request-scoped options resolver for a caller.
    pub fn widget_configs<'a>(
        &'a self,
        security: &'a dyn PermissionChecker,
        scope: RequestScope,
    ) -> WidgetConfigs<'a> {
        WidgetConfigs::new(
            &self.configs,
            security,
            self.resolver.as_ref(),
            self.store.as_ref(),
            self.translator.as_ref(),
        )
        .with_request(scope)
    }
}
