//! Authentication module

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod session;

pub use jwt::{ClaimSet, JwtService};
pub use middleware::{session_auth_middleware, CurrentUser};
pub use password::PasswordHasher;
pub use session::{extract_bearer, SessionResolver};
