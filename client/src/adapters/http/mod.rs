//! HTTP adapter
//!
//! REST client for the marketplace backend and the ports built on it.

pub mod auth_service;
pub mod client;
pub mod product_repo;
pub mod user_repo;

pub use auth_service::HttpAuthService;
pub use client::ApiClient;
pub use product_repo::HttpProductRepository;
pub use user_repo::HttpUserRepository;
