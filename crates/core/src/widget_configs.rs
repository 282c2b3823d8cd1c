//! Widget options resolution.
//!
//! [`WidgetConfigs`] is built per request. It combines the configuration
//! store with the caller's permissions, the expression resolver, the
//! dashboard store and the translator to produce access-filtered
//! configuration, resolved option bags, form values and template attributes.

use indexmap::IndexMap;
use serde_json::{json, Map, Value};

use crate::access_filter::{AccessFilter, Selection};
use crate::dashboard::Widget;
use crate::error::{ConfigError, CoreError};
use crate::expression::ExpressionResolver;
use crate::naming::template_attribute_name;
use crate::option_bag::WidgetOptionBag;
use crate::option_value::{to_form_value, to_stored_value, to_view_value, OptionType};
use crate::security::PermissionChecker;
use crate::store::DashboardStore;
use crate::translation::Translator;
use crate::types::{DbId, OptionMap};
use crate::widget_config::{WidgetConfig, WidgetConfigStore};

/// Option that selects which data items a widget shows.
pub const SUB_WIDGETS_OPTION: &str = "subWidgets";
/// Option holding the widget title.
pub const TITLE_OPTION: &str = "title";

/// Configuration keys never exposed to templates.
const TEMPLATE_HIDDEN_KEYS: &[&str] = &["route", "route_parameters", "acl", "items"];

/// Request-scoped context.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestScope {
    /// Widget id implied by the request (the `_widgetId` query parameter).
    pub widget_id: Option<DbId>,
}

/// Visible configuration entries keyed by name.
pub type VisibleEntries = IndexMap<String, Map<String, Value>>;

pub struct WidgetConfigs<'a> {
    configs: &'a WidgetConfigStore,
    security: &'a dyn PermissionChecker,
    resolver: &'a dyn ExpressionResolver,
    store: &'a dyn DashboardStore,
    translator: &'a dyn Translator,
    request: Option<RequestScope>,
}

impl<'a> WidgetConfigs<'a> {
    pub fn new(
        configs: &'a WidgetConfigStore,
        security: &'a dyn PermissionChecker,
        resolver: &'a dyn ExpressionResolver,
        store: &'a dyn DashboardStore,
        translator: &'a dyn Translator,
    ) -> Self {
        Self {
            configs,
            security,
            resolver,
            store,
            translator,
            request: None,
        }
    }

    pub fn with_request(mut self, scope: RequestScope) -> Self {
        self.request = Some(scope);
        self
    }

    fn access_filter(&self) -> AccessFilter<'a> {
        AccessFilter::new(self.security, self.resolver)
    }

    /// Every top-level widget configuration visible to the caller.
    pub fn widget_configs(&self) -> VisibleEntries {
        self.access_filter()
            .filter(self.configs.all().clone(), Selection::All)
    }

    /// The visible `items` of one widget.
    pub fn widget_items(&self, widget_name: &str) -> Result<VisibleEntries, ConfigError> {
        let config = self.configs.require(widget_name)?;
        Ok(self
            .access_filter()
            .filter(config.items.clone(), Selection::All))
    }

    /// The visible `data_items` of one widget, each with its provider value.
    ///
    /// When the widget declares a `subWidgets` items-choice option, only the
    /// items selected in that option are returned.
    pub async fn widget_items_data(
        &self,
        widget_name: &str,
        widget_id: Option<DbId>,
    ) -> Result<VisibleEntries, CoreError> {
        let config = self.configs.require(widget_name)?;
        let options = self.widget_options(widget_id).await?;

        let selected = options.string_list(SUB_WIDGETS_OPTION);
        let selection = if selects_sub_widgets(config) {
            Selection::Only(&selected)
        } else {
            Selection::All
        };

        let mut items = self
            .access_filter()
            .filter(config.data_items.clone(), selection);

        let context = json!({ "widgetOptions": options.all() });
        for (name, attributes) in items.iter_mut() {
            let value = match attributes.get("data_provider").and_then(Value::as_str) {
                Some(expression) => self
                    .resolver
                    .resolve(&[expression], &context)
                    .map_err(|e| ConfigError::DataProvider {
                        item: name.clone(),
                        message: e.to_string(),
                    })?
                    .into_iter()
                    .next()
                    .unwrap_or(Value::Null),
                None => Value::Null,
            };
            attributes.insert("value".to_string(), value);
        }

        Ok(items)
    }

    /// Options of the widget `widget_id`, or of the widget implied by the
    /// request when no id is given.
    ///
    /// Without a request scope, without any id, or when the widget no longer
    /// exists, the bag is empty.
    pub async fn widget_options(&self, widget_id: Option<DbId>) -> Result<WidgetOptionBag, CoreError> {
        let Some(scope) = self.request else {
            return Ok(WidgetOptionBag::default());
        };
        let Some(id) = widget_id.or(scope.widget_id) else {
            return Ok(WidgetOptionBag::default());
        };

        match self.store.find_widget(id).await? {
            Some(widget) => Ok(self.resolve_options(&widget)?),
            None => {
                tracing::debug!(widget_id = id, "Widget not found, using empty options");
                Ok(WidgetOptionBag::default())
            }
        }
    }

    /// Convert every declared option of `widget` to its stored form.
    ///
    /// Undeclared stored options are passed through unchanged.
    pub fn resolve_options(&self, widget: &Widget) -> Result<WidgetOptionBag, ConfigError> {
        let config = self.configs.require(&widget.name)?;
        let mut options = widget.options.clone();

        for (name, declaration) in &config.configuration {
            let option_type = OptionType::of(name, declaration)?;
            let raw = widget.options.get(name).unwrap_or(&Value::Null);
            let value = to_stored_value(config, option_type, raw, declaration, &widget.options);
            options.insert(name.clone(), value);
        }

        Ok(WidgetOptionBag::new(options))
    }

    /// Values used to populate the widget's configuration form.
    ///
    /// The title tracks the translated widget label until the user sets a
    /// custom one: an empty title or `useDefault: true` resets it to the label.
    pub fn form_values(&self, widget: &Widget) -> Result<OptionMap, ConfigError> {
        let config = self.configs.require(&widget.name)?;
        let mut options = widget.options.clone();

        for (name, declaration) in &config.configuration {
            let option_type = OptionType::of(name, declaration)?;
            let raw = widget.options.get(name).unwrap_or(&Value::Null);
            options.insert(name.clone(), to_form_value(option_type, declaration, raw));
        }

        self.apply_default_title(&mut options, config);
        Ok(options)
    }

    fn apply_default_title(&self, options: &mut OptionMap, config: &WidgetConfig) {
        let title = options
            .entry(TITLE_OPTION)
            .or_insert_with(|| json!({}));
        if !title.is_object() {
            *title = json!({ "title": title.clone() });
        }

        let is_empty = match title.get("title") {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(_) => false,
        };
        let use_default = title
            .get("useDefault")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        if is_empty || use_default {
            title["title"] = Value::String(self.translator.translate(&config.label));
            title["useDefault"] = Value::Bool(true);
        }
    }

    /// Widget configuration prepared for a template.
    ///
    /// Routing and access keys are dropped, each declared option gets its
    /// display `value`, and every key is renamed with
    /// [`template_attribute_name`].
    pub async fn widget_attributes_for_template(
        &self,
        widget_name: &str,
    ) -> Result<Map<String, Value>, CoreError> {
        let config = self.configs.require(widget_name)?;
        let options = self.widget_options(None).await?;

        let mut widget = config.to_attributes();
        for key in TEMPLATE_HIDDEN_KEYS {
            widget.remove(*key);
        }

        let mut configuration = Map::new();
        for (name, declaration) in &config.configuration {
            let option_type = OptionType::of(name, declaration)?;
            let value = to_view_value(option_type, options.get(name).unwrap_or(&Value::Null));
            let mut entry = match serde_json::to_value(declaration) {
                Ok(Value::Object(map)) => map,
                _ => Map::new(),
            };
            entry.insert("value".to_string(), Value::String(value));
            configuration.insert(name.clone(), Value::Object(entry));
        }
        widget.insert("configuration".to_string(), Value::Object(configuration));

        let mut result = Map::new();
        result.insert("widgetName".to_string(), Value::String(widget_name.to_string()));
        for (key, value) in widget {
            result.insert(template_attribute_name(&key), value);
        }
        Ok(result)
    }
}

fn selects_sub_widgets(config: &WidgetConfig) -> bool {
    config
        .configuration
        .get(SUB_WIDGETS_OPTION)
        .and_then(|decl| OptionType::parse(&decl.type_tag))
        == Some(OptionType::WidgetItemsChoice)
}
