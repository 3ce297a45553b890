//! Bazaar marketplace client
//!
//! Client-side core for a classified-ads marketplace: sign in, browse and
//! manage listings, and edit your profile against the Bazaar REST API.
//! Uses hexagonal (ports & adapters) architecture: use-cases in `app` depend
//! only on the traits in `domain::ports`, and `container` wires them to the
//! HTTP and local-storage adapters.

pub mod adapters;
pub mod app;
pub mod config;
pub mod container;
pub mod domain;
pub mod error;



pub use config::Config;
pub use container::{keys, Container};
pub use domain::entities::*;
pub use error::{ApiError, ConfigError, ContainerError, DomainError, StorageError};
