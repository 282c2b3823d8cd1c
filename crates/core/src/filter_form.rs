//! Query filter form shown on configurable dashboard widgets.
//!
//! The form carries a hidden `entity` field and an optional hidden
//! `definition`. The actual filter builder is attached on pre-submit, once the
//! submitted entity is known.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

pub const FORM_NAME: &str = "dashboard_query_filter";
pub const FILTER_FIELD: &str = "filter";

/// Options accepted by the filter form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterFormOptions {
    pub widget_type: Option<String>,
    pub entity: Option<String>,
    pub collapsible: bool,
    pub collapsed: bool,
}

impl Default for FilterFormOptions {
    fn default() -> Self {
        Self {
            widget_type: None,
            entity: None,
            collapsible: false,
            collapsed: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormField {
    pub name: String,
    pub field_type: &'static str,
    pub required: bool,
    pub data: Value,
    pub options: Map<String, Value>,
}

impl FormField {
    fn hidden(name: &str, data: Value, required: bool) -> Self {
        Self {
            name: name.to_string(),
            field_type: "hidden",
            required,
            data,
            options: Map::new(),
        }
    }
}

/// Variables exposed to the rendered form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterFormView {
    pub widget_type: Option<String>,
    pub collapsible: bool,
    pub collapsed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct WidgetFilterForm {
    name: &'static str,
    options: FilterFormOptions,
    fields: Vec<FormField>,
}

impl WidgetFilterForm {
    pub fn new(options: FilterFormOptions) -> Self {
        let entity = options
            .entity
            .clone()
            .map(Value::String)
            .unwrap_or(Value::Null);
        let fields = vec![
            FormField::hidden("entity", entity, true),
            FormField::hidden("definition", Value::Null, false),
        ];
        Self {
            name: FORM_NAME,
            options,
            fields,
        }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn options(&self) -> &FilterFormOptions {
        &self.options
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Attach the `filter` child for the submitted entity.
    ///
    /// A repeated submit replaces the previous `filter` child.
    pub fn pre_submit(&mut self, submitted: &Map<String, Value>) {
        let entity = submitted
            .get("entity")
            .filter(|v| v.is_string())
            .cloned()
            .unwrap_or(Value::Null);

        let options = match json!({
            "mapped": false,
            "column_choice_type": null,
            "entity": entity,
            "auto_initialize": false,
        }) {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        self.fields.retain(|f| f.name != FILTER_FIELD);
        self.fields.push(FormField {
            name: FILTER_FIELD.to_string(),
            field_type: "query_filter",
            required: false,
            data: Value::Null,
            options,
        });
    }

    pub fn view(&self) -> FilterFormView {
        FilterFormView {
            widget_type: self.options.widget_type.clone(),
            collapsible: self.options.collapsible,
            collapsed: self.options.collapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_defaults() {
        let options: FilterFormOptions = serde_json::from_value(json!({})).unwrap();
        assert_eq!(options, FilterFormOptions::default());
        assert!(options.collapsed);
        assert!(!options.collapsible);
    }

    #[test]
    fn builds_hidden_fields() {
        let form = WidgetFilterForm::new(FilterFormOptions {
            entity: Some("Order".into()),
            ..Default::default()
        });
        assert_eq!(form.name(), "dashboard_query_filter");
        assert_eq!(form.fields().len(), 2);
        assert_eq!(form.field("entity").unwrap().data, json!("Order"));
        assert!(!form.field("definition").unwrap().required);
        assert!(form.field(FILTER_FIELD).is_none());
    }

    #[test]
    fn pre_submit_adds_filter_for_submitted_entity() {
        let mut form = WidgetFilterForm::new(FilterFormOptions::default());
        let submitted = json!({ "entity": "Invoice", "definition": "{}" });
        form.pre_submit(submitted.as_object().unwrap());

        let filter = form.field(FILTER_FIELD).unwrap();
        assert_eq!(
            Value::Object(filter.options.clone()),
            json!({
                "mapped": false,
                "column_choice_type": null,
                "entity": "Invoice",
                "auto_initialize": false
            })
        );
    }

    #[test]
    fn pre_submit_without_entity_and_twice() {
        let mut form = WidgetFilterForm::new(FilterFormOptions::default());
        form.pre_submit(&Map::new());
        form.pre_submit(&Map::new());

        let filters = form.fields().iter().filter(|f| f.name == FILTER_FIELD).count();
        assert_eq!(filters, 1);
        assert_eq!(form.field(FILTER_FIELD).unwrap().options["entity"], Value::Null);
    }

    #[test]
    fn view_exposes_layout_flags() {
        let form = WidgetFilterForm::new(FilterFormOptions {
            widget_type: Some("sales_overview".into()),
            collapsible: true,
            collapsed: false,
            entity: None,
        });
        let view = serde_json::to_value(form.view()).unwrap();
        assert_eq!(
            view,
            json!({ "widgetType": "sales_overview", "collapsible": true, "collapsed": false })
        );
    }
}
