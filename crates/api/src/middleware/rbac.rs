//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does
//! not meet the minimum requirement. Use these in route handlers to
//! enforce authorization at the type level.

use atelier_core::error::CoreError;
use atelier_core::roles::is_operator;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` or `facilitator` role. Rejects with 403 Forbidden
/// otherwise.
///
/// ```ignore
/// async fn console_only(RequireOperator(user): RequireOperator) -> AppResult<Json<()>> {
///     // user is guaranteed to be an operator here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireOperator(pub AuthUser);

impl FromRequestParts<AppState> for RequireOperator {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !is_operator(&user.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin or Facilitator role required".into(),
            )));
        }
        Ok(RequireOperator(user))
    }
}
