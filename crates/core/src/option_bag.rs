//! Resolved, request-scoped widget options.

use serde::Serialize;
use serde_json::Value;

use crate::types::OptionMap;

/// Immutable mapping of option name to resolved value.
///
/// Built once per resolution call; serializes as a plain JSON object so it
/// can be handed to data providers as `widgetOptions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WidgetOptionBag {
    options: OptionMap,
}

impl WidgetOptionBag {
    pub fn new(options: OptionMap) -> Self {
        Self { options }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.options.get(name)
    }

    /// The value of `name`, or `default` when the option is absent or null.
    pub fn get_or(&self, name: &str, default: Value) -> Value {
        match self.options.get(name) {
            Some(Value::Null) | None => default,
            Some(value) => value.clone(),
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    /// The value of `name` as a list of strings; non-list values yield an
    /// empty list.
    pub fn string_list(&self, name: &str) -> Vec<String> {
        match self.options.get(name) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn all(&self) -> &OptionMap {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn bag() -> WidgetOptionBag {
        let mut options = OptionMap::new();
        options.insert("limit".into(), json!(5));
        options.insert("owner".into(), Value::Null);
        options.insert("subWidgets".into(), json!(["a", "c", 3]));
        WidgetOptionBag::new(options)
    }

    #[test]
    fn get_and_defaults() {
        let bag = bag();
        assert_eq!(bag.get("limit"), Some(&json!(5)));
        assert_eq!(bag.get("missing"), None);
        assert_eq!(bag.get_or("limit", json!(10)), json!(5));
        assert_eq!(bag.get_or("owner", json!("me")), json!("me"));
        assert_eq!(bag.get_or("missing", json!([])), json!([]));
        assert!(bag.has("owner"));
        assert_eq!(bag.len(), 3);
    }

    #[test]
    fn string_list_skips_non_strings() {
        let bag = bag();
        assert_eq!(bag.string_list("subWidgets"), vec!["a", "c"]);
        assert!(bag.string_list("limit").is_empty());
    }

    #[test]
    fn serializes_as_plain_object() {
        let value = serde_json::to_value(bag()).unwrap();
        assert_eq!(value["limit"], json!(5));
        assert!(WidgetOptionBag::default().is_empty());
    }
}
