//! Domain entities
//!
//! Immutable value objects validated at construction time. They serialize to
//! the camelCase JSON used by the REST API and the local store.

pub mod auth;
pub mod filter;
pub mod image;
pub mod product;
pub mod user;

pub use auth::{AuthSession, AuthTokens, Credentials, SessionEvent, SignUpData};
pub use filter::{ProductFilter, ProductPage, ProductSort};
pub use image::ImageUpload;
pub use product::{NewProduct, Product, ProductId, ProductStatus, ProductUpdate};
pub use user::{User, UserId, UserUpdate};
