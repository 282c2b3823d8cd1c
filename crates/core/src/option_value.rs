//! Widget option type tags and value conversions.
//!
//! Every declared option carries a type tag. Each tag maps to exactly one
//! [`OptionType`] and each conversion handles every variant; an unknown tag
//! is a configuration error, never a silent pass-through.

use chrono::NaiveDate;
use serde_json::{json, Map, Value};

use crate::error::ConfigError;
use crate::types::OptionMap;
use crate::widget_config::{OptionDeclaration, WidgetConfig};

pub const TYPE_TEXT: &str = "text";
pub const TYPE_CHECKBOX: &str = "checkbox";
pub const TYPE_INTEGER: &str = "integer";
pub const TYPE_CHOICE: &str = "choice";
pub const TYPE_WIDGET_TITLE: &str = "widget_title";
pub const TYPE_WIDGET_ITEMS_CHOICE: &str = "widget_items_choice";
pub const TYPE_WIDGET_DATE_RANGE: &str = "widget_date_range";

pub const VALID_OPTION_TYPES: &[&str] = &[
    TYPE_TEXT,
    TYPE_CHECKBOX,
    TYPE_INTEGER,
    TYPE_CHOICE,
    TYPE_WIDGET_TITLE,
    TYPE_WIDGET_ITEMS_CHOICE,
    TYPE_WIDGET_DATE_RANGE,
];

/// Input/output format for date range bounds.
const DATE_FORMAT: &str = "%Y-%m-%d";
/// Human-readable date format used in view values.
const VIEW_DATE_FORMAT: &str = "%d %b %Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionType {
    Text,
    Checkbox,
    Integer,
    Choice,
    WidgetTitle,
    WidgetItemsChoice,
    WidgetDateRange,
}

impl OptionType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            TYPE_TEXT => Some(Self::Text),
            TYPE_CHECKBOX => Some(Self::Checkbox),
            TYPE_INTEGER => Some(Self::Integer),
            TYPE_CHOICE => Some(Self::Choice),
            TYPE_WIDGET_TITLE => Some(Self::WidgetTitle),
            TYPE_WIDGET_ITEMS_CHOICE => Some(Self::WidgetItemsChoice),
            TYPE_WIDGET_DATE_RANGE => Some(Self::WidgetDateRange),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => TYPE_TEXT,
            Self::Checkbox => TYPE_CHECKBOX,
            Self::Integer => TYPE_INTEGER,
            Self::Choice => TYPE_CHOICE,
            Self::WidgetTitle => TYPE_WIDGET_TITLE,
            Self::WidgetItemsChoice => TYPE_WIDGET_ITEMS_CHOICE,
            Self::WidgetDateRange => TYPE_WIDGET_DATE_RANGE,
        }
    }

    /// Resolve the type of a declared option, failing on unknown tags.
    pub fn of(option: &str, declaration: &OptionDeclaration) -> Result<Self, ConfigError> {
        Self::parse(&declaration.type_tag).ok_or_else(|| ConfigError::UnknownOptionType {
            option: option.to_string(),
            type_tag: declaration.type_tag.clone(),
        })
    }
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convert a stored option value into its display string.
pub fn to_view_value(option_type: OptionType, value: &Value) -> String {
    match option_type {
        OptionType::Text => scalar_to_string(value),
        OptionType::Checkbox => {
            if as_bool(value) {
                "Yes".to_string()
            } else {
                "No".to_string()
            }
        }
        OptionType::Integer => as_i64(value).map(|n| n.to_string()).unwrap_or_default(),
        OptionType::Choice => match value {
            Value::Object(map) => map.get("label").map(scalar_to_string).unwrap_or_default(),
            other => scalar_to_string(other),
        },
        OptionType::WidgetTitle => match value {
            Value::Object(map) => map.get("title").map(scalar_to_string).unwrap_or_default(),
            other => scalar_to_string(other),
        },
        OptionType::WidgetItemsChoice => string_list(value).join(", "),
        OptionType::WidgetDateRange => {
            let (start, end) = date_range_bounds(value);
            match (start, end) {
                (None, None) => String::new(),
                (start, end) => format!(
                    "{} - {}",
                    start.map(|d| d.format(VIEW_DATE_FORMAT).to_string()).unwrap_or_default(),
                    end.map(|d| d.format(VIEW_DATE_FORMAT).to_string()).unwrap_or_default(),
                ),
            }
        }
    }
}

/// Convert a raw stored value into its canonical in-memory form.
///
/// `widget_config` gives access to sibling context: the items choice falls
/// back to every data item of the widget when nothing was stored.
/// `_all_options` is the full raw option map; no built-in type reads it.
pub fn to_stored_value(
    widget_config: &WidgetConfig,
    option_type: OptionType,
    raw: &Value,
    declaration: &OptionDeclaration,
    _all_options: &OptionMap,
) -> Value {
    let default = || declaration.default_value().cloned().unwrap_or(Value::Null);

    match option_type {
        OptionType::Text => match raw {
            Value::Null => match default() {
                Value::Null => Value::String(String::new()),
                d => d,
            },
            other => Value::String(scalar_to_string(other)),
        },
        OptionType::Checkbox => match raw {
            Value::Null => Value::Bool(declaration.default_value().is_some_and(as_bool)),
            other => Value::Bool(as_bool(other)),
        },
        OptionType::Integer => match as_i64(raw) {
            Some(n) => json!(n),
            None => default(),
        },
        OptionType::Choice => {
            let resolved = choice_key(raw)
                .and_then(|key| choice_label(declaration, &key).map(|label| (key, label)))
                .or_else(|| {
                    declaration.default_value().map(|d| {
                        let key = scalar_to_string(d);
                        let label = choice_label(declaration, &key).unwrap_or_default();
                        (key, label)
                    })
                });
            match resolved {
                Some((key, label)) => json!({ "key": key, "label": label }),
                None => Value::Null,
            }
        }
        OptionType::WidgetTitle => title_value(raw),
        OptionType::WidgetItemsChoice => match raw {
            Value::Null => Value::Array(
                widget_config
                    .data_items
                    .keys()
                    .map(|k| Value::String(k.clone()))
                    .collect(),
            ),
            other => Value::Array(string_list(other).into_iter().map(Value::String).collect()),
        },
        OptionType::WidgetDateRange => date_range_value(raw),
    }
}

/// Convert a raw stored value into the shape used to populate a form field.
pub fn to_form_value(option_type: OptionType, declaration: &OptionDeclaration, raw: &Value) -> Value {
    match option_type {
        OptionType::Text => match raw {
            Value::Null => Value::String(String::new()),
            other => Value::String(scalar_to_string(other)),
        },
        OptionType::Checkbox => Value::Bool(as_bool(raw)),
        OptionType::Integer => as_i64(raw).map(|n| json!(n)).unwrap_or(Value::Null),
        OptionType::Choice => match choice_key(raw) {
            Some(k) if choice_label(declaration, &k).is_some() => Value::String(k),
            _ => declaration.default_value().cloned().unwrap_or(Value::Null),
        },
        OptionType::WidgetTitle => title_value(raw),
        OptionType::WidgetItemsChoice => {
            Value::Array(string_list(raw).into_iter().map(Value::String).collect())
        }
        OptionType::WidgetDateRange => date_range_value(raw),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn as_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64().is_some_and(|i| i != 0),
        Value::String(s) => matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        _ => false,
    }
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter(|v| !v.is_null())
            .map(scalar_to_string)
            .collect(),
        Value::Null => Vec::new(),
        other => vec![scalar_to_string(other)],
    }
}

fn choice_key(raw: &Value) -> Option<String> {
    match raw {
        Value::Null => None,
        Value::Object(map) => map.get("key").map(scalar_to_string),
        other => Some(scalar_to_string(other)),
    }
}

fn choice_label(declaration: &OptionDeclaration, key: &str) -> Option<String> {
    declaration
        .metadata
        .get("choices")
        .and_then(Value::as_object)
        .and_then(|choices| choices.get(key))
        .map(scalar_to_string)
}

fn title_value(raw: &Value) -> Value {
    let (title, use_default) = match raw {
        Value::Object(map) => (
            map.get("title").map(scalar_to_string).unwrap_or_default(),
            map.get("useDefault").map(as_bool).unwrap_or(false),
        ),
        Value::Null => (String::new(), true),
        other => (scalar_to_string(other), false),
    };
    json!({ "title": title, "useDefault": use_default })
}

fn parse_date(value: Option<&Value>) -> Option<NaiveDate> {
    value
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok())
}

fn date_range_bounds(value: &Value) -> (Option<NaiveDate>, Option<NaiveDate>) {
    match value {
        Value::Object(map) => (parse_date(map.get("start")), parse_date(map.get("end"))),
        _ => (None, None),
    }
}

fn date_range_value(raw: &Value) -> Value {
    let (start, end) = date_range_bounds(raw);
    let mut range = Map::new();
    range.insert(
        "start".to_string(),
        start.map(|d| json!(d.format(DATE_FORMAT).to_string())).unwrap_or(Value::Null),
    );
    range.insert(
        "end".to_string(),
        end.map(|d| json!(d.format(DATE_FORMAT).to_string())).unwrap_or(Value::Null),
    );
    Value::Object(range)
}
