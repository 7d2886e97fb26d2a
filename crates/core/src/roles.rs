//! Well-known role name constants.
//!
//! These must match the CHECK constraint in the users migration.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_FACILITATOR: &str = "facilitator";
pub const ROLE_PARTICIPANT: &str = "participant";

/// Operator roles may use the `/admin` surface.
pub fn is_operator(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_FACILITATOR
}
