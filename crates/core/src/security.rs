//! Permission checks consumed by the access filter and the HTTP layer.

use std::collections::HashSet;

/// Decides whether the current caller holds a permission.
pub trait PermissionChecker: Send + Sync {
    fn is_granted(&self, permission: &str) -> bool;
}

/// A fixed set of granted permission ids.
///
/// The API builds one per request from the caller's role.
#[derive(Debug, Clone, Default)]
pub struct GrantedPermissions {
    granted: HashSet<String>,
}

impl GrantedPermissions {
    pub fn new<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            granted: permissions.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.granted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.granted.is_empty()
    }
}

impl PermissionChecker for GrantedPermissions {
    fn is_granted(&self, permission: &str) -> bool {
        self.granted.contains(permission)
    }
}
