//! Widget instances paired with their configuration for display.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::dashboard::{Dashboard, Widget};
use crate::security::PermissionChecker;
use crate::widget_config::WidgetConfigStore;

#[derive(Debug, Clone, Serialize)]
pub struct WidgetModel {
    #[serde(flatten)]
    pub widget: Widget,
    /// Widget configuration attributes.
    pub config: Map<String, Value>,
}

/// Build a model for every widget of `dashboard` the caller may see.
///
/// Widgets whose configuration declares an acl that is not granted are left
/// out. Widgets without a configuration are skipped.
pub fn widget_models(
    dashboard: &Dashboard,
    configs: &WidgetConfigStore,
    security: &dyn PermissionChecker,
) -> Vec<WidgetModel> {
    dashboard
        .widgets()
        .iter()
        .filter_map(|widget| {
            let Some(config) = configs.get(&widget.name) else {
                tracing::warn!(
                    widget_id = widget.id,
                    widget_name = %widget.name,
                    "Widget has no configuration, skipping"
                );
                return None;
            };

            if let Some(acl) = config.acl.as_deref() {
                if !security.is_granted(acl) {
                    return None;
                }
            }

            Some(WidgetModel {
                widget: widget.clone(),
                config: config.to_attributes(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::security::GrantedPermissions;
    use crate::widget_config::ConfigDocument;

    fn store() -> WidgetConfigStore {
        let raw = json!({
            "widgets": {
                "quick_launchpad": { "label": "Launchpad" },
                "sales_overview": { "label": "Sales", "acl": "sales_view" }
            }
        });
        let (store, _, _) = ConfigDocument::from_json_str(&raw.to_string())
            .unwrap()
            .into_parts();
        store
    }

    fn dashboard() -> Dashboard {
        let widget = |id, name: &str, position| Widget {
            position,
            ..Widget::new(id, name)
        };
        Dashboard::new(1, "main", "Main").with_widgets([
            widget(10, "sales_overview", 0),
            widget(11, "removed_widget", 1),
            widget(12, "quick_launchpad", 2),
        ])
    }

    #[test]
    fn keeps_granted_widgets_in_order() {
        let security = GrantedPermissions::new(["sales_view"]);
        let models = widget_models(&dashboard(), &store(), &security);
        let ids: Vec<i64> = models.iter().map(|m| m.widget.id).collect();
        assert_eq!(ids, vec![10, 12]);
        assert_eq!(models[0].config["label"], json!("Sales"));
    }

    #[test]
    fn hides_widgets_with_denied_acl() {
        let models = widget_models(&dashboard(), &store(), &GrantedPermissions::default());
        let ids: Vec<i64> = models.iter().map(|m| m.widget.id).collect();
        assert_eq!(ids, vec![12]);
    }

    #[test]
    fn serializes_widget_fields_flat() {
        let models = widget_models(&dashboard(), &store(), &GrantedPermissions::default());
        let value = serde_json::to_value(&models[0]).unwrap();
        assert_eq!(value["id"], json!(12));
        assert_eq!(value["name"], json!("quick_launchpad"));
        assert_eq!(value["dashboard_id"], json!(1));
        assert_eq!(value["config"]["label"], json!("Launchpad"));
    }
}
