mod helpers;
mod middleware;
mod password;
mod token;

pub use middleware::{AuthError, RequireAdmin, RequireSession};
pub use password::{hash_password, verify_password};
pub use token::{IssuedToken, SessionTokens, token_lookup};
