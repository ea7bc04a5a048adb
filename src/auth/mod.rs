//! Session handling for the protected JSON routes.
//!
//! Sessions are issued elsewhere through [set_auth_cookie]; this module only
//! reads, validates and extends them.

mod cookie;
mod middleware;
mod token;

pub use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use middleware::{AuthState, auth_guard};

#[cfg(test)]
pub use cookie::COOKIE_TOKEN;
