//! Domain layer
//!
//! Contains pure business logic with no knowledge of HTTP or storage.
//! - `entities`: Domain models representing core business concepts
//! - `ports`: Trait definitions for external dependencies

pub mod entities;
pub mod ports;
