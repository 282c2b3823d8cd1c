//! Built-in data providers available to `@name` expressions.
//!
//! Widget configurations reference these from `applicable` conditions and
//! `data_provider` entries. Deployments register further providers next to
//! these before the server starts.

use serde_json::{json, Value};
use widgetboard_core::expression::ProviderResolver;

/// Build the resolver with every built-in provider registered.
pub fn default_resolver() -> ProviderResolver {
    let mut resolver = ProviderResolver::new();
    resolver
        .register("dashboard.today", |_| {
            json!(chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string())
        })
        .register("dashboard.widget_options", |ctx| {
            ctx.get("widgetOptions").cloned().unwrap_or(Value::Null)
        })
        .register("dashboard.selected_items_count", |ctx| {
            let count = ctx
                .pointer("/widgetOptions/subWidgets")
                .and_then(Value::as_array)
                .map_or(0, Vec::len);
            json!(count)
        })
        .register_constant("dashboard.always", Value::Bool(true));
    resolver
}
