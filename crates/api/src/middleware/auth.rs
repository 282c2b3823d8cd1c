//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use widgetboard_core::error::CoreError;
use widgetboard_core::security::{GrantedPermissions, PermissionChecker};
use widgetboard_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     user.require(DASHBOARD_VIEW)?;
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// The user's role name.
    pub role: String,
    /// Permissions granted to `role`.
    pub permissions: GrantedPermissions,
}

impl AuthUser {
    /// Fail with 403 unless the user holds `permission`.
    pub fn require(&self, permission: &str) -> Result<(), CoreError> {
        if self.permissions.is_granted(permission) {
            Ok(())
        } else {
            tracing::debug!(user_id = self.user_id, role = %self.role, permission, "Permission denied");
            Err(CoreError::Forbidden(format!("Missing permission: {permission}")))
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let permissions = state.role_permissions.for_role(&claims.role);

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
            permissions,
        })
    }
}
