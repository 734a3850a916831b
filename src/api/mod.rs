//! HTTP API handlers and route builders.

pub mod auth;
pub mod docs;
pub mod health;
pub mod lessons;
pub mod public;

pub use auth::auth_routes;
pub use docs::docs_routes;
pub use health::health_routes;
pub use lessons::lesson_routes;
pub use public::public_routes;
