//! Authentication: JWT issuing/verification, password hashing, and the
//! axum extractors that gate protected routes.

pub mod extractor;
pub mod jwt;
pub mod password;

pub use extractor::{AuthUser, MaybeAuthUser};
pub use jwt::{Claims, TokenType};
