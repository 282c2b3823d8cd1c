//! Expression resolution for `applicable` conditions and data providers.
//!
//! Expressions are short strings stored in the widget configuration:
//!
//! - `@name` calls the data provider registered under `name` with the
//!   resolution context.
//! - `$path.to.value` reads a value out of the context (e.g.
//!   `$widgetOptions.subWidgets`). Missing paths resolve to `null`.
//! - Anything else is parsed as a JSON literal (`true`, `42`, `"text"`), and
//!   falls back to the raw string when it is not valid JSON.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use serde_json::Value;

static PROVIDER_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^@([A-Za-z_][\w.]*)$").expect("valid regex"));

static CONTEXT_PATH_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^\$([A-Za-z_]\w*(?:\.\w+)*)$").expect("valid regex"));

#[derive(Debug, thiserror::Error)]
pub enum ExpressionError {
    #[error("Unknown data provider '{0}'")]
    UnknownProvider(String),
}

/// Resolves a batch of expressions against a context value.
///
/// Results are returned in the same order as `expressions`.
pub trait ExpressionResolver: Send + Sync {
    fn resolve(&self, expressions: &[&str], context: &Value) -> Result<Vec<Value>, ExpressionError>;
}

/// A data provider callable from an `@name` expression.
pub type DataProvider = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Expression resolver backed by a registry of named data providers.
#[derive(Clone, Default)]
pub struct ProviderResolver {
    providers: HashMap<String, DataProvider>,
}

impl ProviderResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `provider` under `name`, replacing any previous registration.
    pub fn register<F>(&mut self, name: impl Into<String>, provider: F) -> &mut Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.providers.insert(name.into(), Arc::new(provider));
        self
    }

    /// Register a provider that ignores the context and returns `value`.
    pub fn register_constant(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        self.register(name, move |_| value.clone())
    }

    fn resolve_one(&self, expression: &str, context: &Value) -> Result<Value, ExpressionError> {
        let expression = expression.trim();

        if let Some(caps) = PROVIDER_RE.captures(expression) {
            let name = &caps[1];
            let provider = self
                .providers
                .get(name)
                .ok_or_else(|| ExpressionError::UnknownProvider(name.to_string()))?;
            return Ok(provider(context));
        }

        if let Some(caps) = CONTEXT_PATH_RE.captures(expression) {
            return Ok(lookup_path(context, &caps[1]));
        }

        Ok(serde_json::from_str(expression).unwrap_or_else(|_| Value::String(expression.to_string())))
    }
}

impl std::fmt::Debug for ProviderResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.providers.keys().collect();
        names.sort();
        f.debug_struct("ProviderResolver")
            .field("providers", &names)
            .finish()
    }
}

impl ExpressionResolver for ProviderResolver {
    fn resolve(&self, expressions: &[&str], context: &Value) -> Result<Vec<Value>, ExpressionError> {
        expressions
            .iter()
            .map(|expr| self.resolve_one(expr, context))
            .collect()
    }
}

fn lookup_path(context: &Value, path: &str) -> Value {
    let mut current = context;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => match map.get(segment) {
                Some(next) => next,
                None => return Value::Null,
            },
            Value::Array(items) => match segment.parse::<usize>().ok().and_then(|i| items.get(i)) {
                Some(next) => next,
                None => return Value::Null,
            },
            _ => return Value::Null,
        };
    }
    current.clone()
}

/// Interpret a resolved value as a boolean condition.
///
/// `null`, `false`, `0`, `""`, `"0"`, `"false"`, and empty arrays/objects are
/// falsy; everything else is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false")),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
