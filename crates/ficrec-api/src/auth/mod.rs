//! Authentication and authorization
//!
//! Password hashing, JWT issuance and validation, the bearer-token
//! middleware, and the ownership guard used by every mutating handler.

pub mod guard;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod service;

pub use guard::{can_mutate, ensure_owner};
pub use jwt::{issue_token, verify_token, Claims, JwtError};
pub use middleware::{auth_middleware, CurrentUser};
pub use password::{hash_password, verify_password, PasswordError};
pub use service::{AuthService, RegisterRequest, TokenForm, TokenResponse, UserUpdate};
