//! Declarative widget configuration and the immutable configuration store.
//!
//! The store is loaded once at startup from a JSON document and shared by
//! reference with every consumer:
//!
//! ```json
//! {
//!   "widgets": {
//!     "sales_overview": {
//!       "label": "dashboard.widget.sales_overview.label",
//!       "route": "dashboard_widget_sales",
//!       "acl": "sales_report_view",
//!       "configuration": {
//!         "title": { "type": "widget_title" },
//!         "subWidgets": { "type": "widget_items_choice" }
//!       },
//!       "data_items": {
//!         "revenue": { "label": "Revenue", "data_provider": "@sales.revenue" }
//!       }
//!     }
//!   },
//!   "translations": { "dashboard.widget.sales_overview.label": "Sales overview" },
//!   "role_permissions": { "admin": ["dashboard_view", "dashboard_delete"] }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Keys that only drive access filtering and are never shown to callers.
pub const ACCESS_CONTROL_KEYS: &[&str] = &["acl", "applicable", "enabled"];

fn enabled_by_default() -> bool {
    true
}

/// Access rules shared by top-level widgets, `items` and `data_items`.
#[derive(Debug, Clone, Copy)]
pub struct AccessRules<'a> {
    pub acl: Option<&'a str>,
    pub applicable: Option<&'a str>,
    pub enabled: bool,
}

/// Entries that can be narrowed by the access filter.
pub trait AccessControlled {
    fn access_rules(&self) -> AccessRules<'_>;

    /// Consume the entry, returning its attributes without the access
    /// control keys.
    fn into_visible(self) -> Map<String, Value>;
}

/// A sub-entry (`items` or `data_items`) of a widget configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicable: Option<String>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Everything else (label, icon, data_provider, ...).
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl AccessControlled for ConfigEntry {
    fn access_rules(&self) -> AccessRules<'_> {
        AccessRules {
            acl: self.acl.as_deref(),
            applicable: self.applicable.as_deref(),
            enabled: self.enabled,
        }
    }

    fn into_visible(self) -> Map<String, Value> {
        self.attributes
    }
}

/// Declaration of one widget option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionDeclaration {
    /// Option type tag, resolved against the closed set in
    /// [`crate::option_value::OptionType`] at conversion time.
    #[serde(rename = "type")]
    pub type_tag: String,
    /// Type-specific metadata (`choices`, `default`, form options, ...).
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl OptionDeclaration {
    pub fn new(type_tag: impl Into<String>) -> Self {
        Self {
            type_tag: type_tag.into(),
            metadata: Map::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// The declared default value, if any.
    pub fn default_value(&self) -> Option<&Value> {
        self.metadata.get("default")
    }
}

/// Configuration of a single widget type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetConfig {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub route_parameters: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicable: Option<String>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub configuration: IndexMap<String, OptionDeclaration>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub items: IndexMap<String, ConfigEntry>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub data_items: IndexMap<String, ConfigEntry>,
    /// Free-form attributes (icon, description, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WidgetConfig {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            route: None,
            route_parameters: Map::new(),
            acl: None,
            applicable: None,
            enabled: true,
            configuration: IndexMap::new(),
            items: IndexMap::new(),
            data_items: IndexMap::new(),
            extra: Map::new(),
        }
    }

    /// Serialize the configuration into an ordered attribute map.
    pub fn to_attributes(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

impl AccessControlled for WidgetConfig {
    fn access_rules(&self) -> AccessRules<'_> {
        AccessRules {
            acl: self.acl.as_deref(),
            applicable: self.applicable.as_deref(),
            enabled: self.enabled,
        }
    }

    fn into_visible(self) -> Map<String, Value> {
        let mut attributes = self.to_attributes();
        for key in ACCESS_CONTROL_KEYS {
            attributes.remove(*key);
        }
        attributes
    }
}

/// On-disk shape of the configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigDocument {
    #[serde(default)]
    pub widgets: IndexMap<String, WidgetConfig>,
    #[serde(default)]
    pub translations: HashMap<String, String>,
    #[serde(default)]
    pub role_permissions: HashMap<String, Vec<String>>,
}

/// Immutable registry of widget configurations keyed by widget name.
#[derive(Debug, Clone, Default)]
pub struct WidgetConfigStore {
    widgets: IndexMap<String, WidgetConfig>,
}

impl WidgetConfigStore {
    pub fn new(widgets: IndexMap<String, WidgetConfig>) -> Self {
        Self { widgets }
    }

    pub fn get(&self, name: &str) -> Option<&WidgetConfig> {
        self.widgets.get(name)
    }

    /// Like [`get`](Self::get) but reports a missing widget as a config error.
    pub fn require(&self, name: &str) -> Result<&WidgetConfig, ConfigError> {
        self.get(name)
            .ok_or_else(|| ConfigError::UnknownWidget(name.to_string()))
    }

    /// All widget configurations in declaration order.
    pub fn all(&self) -> &IndexMap<String, WidgetConfig> {
        &self.widgets
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}

impl ConfigDocument {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Load(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&raw)
    }

    /// Split the document into the widget store, leaving translations and
    /// role permissions for the caller.
    pub fn into_parts(
        self,
    ) -> (
        WidgetConfigStore,
        HashMap<String, String>,
        HashMap<String, Vec<String>>,
    ) {
        (
            WidgetConfigStore::new(self.widgets),
            self.translations,
            self.role_permissions,
        )
    }
}
