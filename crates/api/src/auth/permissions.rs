//! Role to permission mapping.
//!
//! Permissions are resolved per request from the role carried in the access
//! token. Unknown roles hold no permissions.

use std::collections::HashMap;

use widgetboard_core::security::GrantedPermissions;

#[derive(Debug, Clone, Default)]
pub struct RolePermissions {
    roles: HashMap<String, GrantedPermissions>,
}

impl RolePermissions {
    pub fn new(table: HashMap<String, Vec<String>>) -> Self {
        let roles = table
            .into_iter()
            .map(|(role, permissions)| (role, GrantedPermissions::new(permissions)))
            .collect();
        Self { roles }
    }

    /// Permissions granted to `role`.
    pub fn for_role(&self, role: &str) -> GrantedPermissions {
        self.roles.get(role).cloned().unwrap_or_default()
    }

    pub fn role_count(&self) -> usize {
        self.roles.len()
    }
}
