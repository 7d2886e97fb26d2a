//! Authentication primitives: JWT tokens, password hashing, and the
//! session cookie helpers.

pub mod cookie;
pub mod jwt;
pub mod password;
