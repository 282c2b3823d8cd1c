//! Visibility narrowing for widget configuration entries.
//!
//! An entry survives when it is enabled, its `acl` (if any) is granted, its
//! `applicable` expression (if any) resolves truthy, and, when a selection
//! is active, its key is part of the selection. Input order is preserved and
//! the access control keys are stripped from every survivor.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::expression::{is_truthy, ExpressionResolver};
use crate::security::PermissionChecker;
use crate::widget_config::AccessControlled;

/// Explicit user selection restricting which entries may be shown.
#[derive(Debug, Clone, Copy, Default)]
pub enum Selection<'a> {
    /// Every entry passing the access rules is shown.
    #[default]
    All,
    /// Only entries whose key appears in the list are shown.
    Only(&'a [String]),
}

impl Selection<'_> {
    fn admits(&self, key: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(keys) => keys.iter().any(|k| k == key),
        }
    }
}

pub struct AccessFilter<'a> {
    security: &'a dyn PermissionChecker,
    resolver: &'a dyn ExpressionResolver,
}

impl<'a> AccessFilter<'a> {
    pub fn new(security: &'a dyn PermissionChecker, resolver: &'a dyn ExpressionResolver) -> Self {
        Self { security, resolver }
    }

    /// Filter `entries`, returning the visible attributes of each survivor.
    pub fn filter<E>(
        &self,
        entries: IndexMap<String, E>,
        selection: Selection<'_>,
    ) -> IndexMap<String, Map<String, Value>>
    where
        E: AccessControlled,
    {
        entries
            .into_iter()
            .filter(|(key, entry)| self.is_visible(key, entry, selection))
            .map(|(key, entry)| (key, entry.into_visible()))
            .collect()
    }

    /// Whether the entry stored under `key` passes every rule.
    pub fn is_visible<E>(&self, key: &str, entry: &E, selection: Selection<'_>) -> bool
    where
        E: AccessControlled,
    {
        let rules = entry.access_rules();

        if !selection.admits(key) || !rules.enabled {
            return false;
        }

        if let Some(acl) = rules.acl {
            if !self.security.is_granted(acl) {
                return false;
            }
        }

        match rules.applicable {
            Some(expression) => self.is_applicable(key, expression),
            None => true,
        }
    }

    fn is_applicable(&self, key: &str, expression: &str) -> bool {
        match self.resolver.resolve(&[expression], &Value::Null) {
            Ok(results) => results.first().is_some_and(is_truthy),
            Err(err) => {
                tracing::warn!(entry = key, expression, error = %err, "Applicable expression failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::expression::ProviderResolver;
    use crate::security::GrantedPermissions;
    use crate::widget_config::{ConfigEntry, ACCESS_CONTROL_KEYS};

    fn entry(attrs: Value) -> ConfigEntry {
        serde_json::from_value(attrs).unwrap()
    }

    fn resolver() -> ProviderResolver {
        let mut resolver = ProviderResolver::new();
        resolver
            .register_constant("yes", json!(true))
            .register_constant("no", json!(false))
            .register_constant("weird", json!({}));
        resolver
    }

    fn entries() -> IndexMap<String, ConfigEntry> {
        IndexMap::from([
            ("a".to_string(), entry(json!({ "label": "A", "acl": "perm_a" }))),
            ("b".to_string(), entry(json!({ "label": "B", "acl": "perm_b" }))),
            ("c".to_string(), entry(json!({ "label": "C" }))),
            ("d".to_string(), entry(json!({ "label": "D", "acl": "perm_d" }))),
        ])
    }

    fn keys(filtered: &IndexMap<String, Map<String, Value>>) -> Vec<&str> {
        filtered.keys().map(String::as_str).collect()
    }

    #[test]
    fn excludes_exactly_denied_acl_entries_keeping_order() {
        let security = GrantedPermissions::new(["perm_a", "perm_d"]);
        let resolver = resolver();
        let filter = AccessFilter::new(&security, &resolver);

        let out = filter.filter(entries(), Selection::All);
        assert_eq!(keys(&out), ["a", "c", "d"]);
    }

    #[test]
    fn strips_access_keys_from_survivors() {
        let security = GrantedPermissions::new(["perm_a", "perm_b", "perm_d"]);
        let resolver = resolver();
        let filter = AccessFilter::new(&security, &resolver);

        let mut input = entries();
        input.insert(
            "e".to_string(),
            entry(json!({ "label": "E", "applicable": "@yes", "enabled": true })),
        );

        let out = filter.filter(input, Selection::All);
        assert_eq!(out.len(), 5);
        for attrs in out.values() {
            for key in ACCESS_CONTROL_KEYS {
                assert!(!attrs.contains_key(*key), "{key} leaked into {attrs:?}");
            }
            assert!(attrs.contains_key("label"));
        }
    }

    #[test]
    fn disabled_entries_are_excluded() {
        let security = GrantedPermissions::default();
        let resolver = resolver();
        let filter = AccessFilter::new(&security, &resolver);

        let input = IndexMap::from([
            ("on".to_string(), entry(json!({ "enabled": true }))),
            ("off".to_string(), entry(json!({ "enabled": false }))),
        ]);
        assert_eq!(keys(&filter.filter(input, Selection::All)), ["on"]);
    }

    #[test]
    fn applicable_expression_decides_visibility() {
        let security = GrantedPermissions::default();
        let resolver = resolver();
        let filter = AccessFilter::new(&security, &resolver);

        let input = IndexMap::from([
            ("yes".to_string(), entry(json!({ "applicable": "@yes" }))),
            ("no".to_string(), entry(json!({ "applicable": "@no" }))),
            ("literal".to_string(), entry(json!({ "applicable": "true" }))),
            ("weird".to_string(), entry(json!({ "applicable": "@weird" }))),
            ("broken".to_string(), entry(json!({ "applicable": "@missing" }))),
        ]);
        assert_eq!(keys(&filter.filter(input, Selection::All)), ["yes", "literal"]);
    }

    #[test]
    fn selection_restricts_by_key() {
        let security = GrantedPermissions::new(["perm_a", "perm_b", "perm_d"]);
        let resolver = resolver();
        let filter = AccessFilter::new(&security, &resolver);

        let selected = vec!["d".to_string(), "a".to_string()];
        let out = filter.filter(entries(), Selection::Only(&selected));
        // Input order wins over selection order.
        assert_eq!(keys(&out), ["a", "d"]);
    }

    #[test]
    fn empty_selection_hides_everything() {
        let security = GrantedPermissions::new(["perm_a", "perm_b", "perm_d"]);
        let resolver = resolver();
        let filter = AccessFilter::new(&security, &resolver);

        let out = filter.filter(entries(), Selection::Only(&[]));
        assert!(out.is_empty());
    }
}
