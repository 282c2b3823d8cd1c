//! Well-known permission identifiers.
//!
//! Widget configuration `acl` entries may reference any permission id; these
//! are the ones the dashboard endpoints check themselves.

pub const DASHBOARD_VIEW: &str = "dashboard_view";
pub const DASHBOARD_UPDATE: &str = "dashboard_update";
pub const DASHBOARD_DELETE: &str = "dashboard_delete";
