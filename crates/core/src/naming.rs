//! Template attribute naming.
//!
//! Widget configuration keys are written in snake or kebab case
//! (`data_items`, `icon-class`). Templates receive them as camel-case
//! attributes prefixed with `widget`.

/// Prefix applied to every template attribute derived from a config key.
pub const TEMPLATE_ATTRIBUTE_PREFIX: &str = "widget";

/// Convert a configuration key into its template attribute name.
///
/// Hyphens are treated as underscores, the key is split on underscores and
/// every part gets its first character upper-cased. Empty parts (from
/// doubled separators) contribute nothing.
///
/// # Examples
///
/// ```
/// use widgetboard_core::naming::template_attribute_name;
///
/// assert_eq!(template_attribute_name("data_items"), "widgetDataItems");
/// assert_eq!(template_attribute_name("icon-class"), "widgetIconClass");
/// assert_eq!(template_attribute_name("label"), "widgetLabel");
/// ```
pub fn template_attribute_name(key: &str) -> String {
    let mut name = String::from(TEMPLATE_ATTRIBUTE_PREFIX);
    for part in key.replace('-', "_").split('_') {
        name.push_str(&upper_first(part));
    }
    name
}

fn upper_first(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
