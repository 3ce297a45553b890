//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod http;
pub mod storage;

pub use http::{ApiClient, HttpAuthService, HttpProductRepository, HttpUserRepository};
pub use storage::{FileStorage, InMemoryStorage, SessionStore};
