//! Domain ports (traits)
//!
//! Port traits define interfaces that the use-cases require.
//! Adapters provide concrete implementations of these traits.

pub mod auth;
pub mod repositories;
pub mod storage;

pub use auth::AuthService;
pub use repositories::{ProductRepository, UserRepository};
pub use storage::KeyValueStorage;
