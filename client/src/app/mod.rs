//! Application layer
//!
//! Use-cases: one struct per business operation. Each validates its input,
//! delegates to ports, and rewraps unexpected failures into a user-facing
//! `DomainError::Unexpected`.

pub mod auth;
pub mod products;
pub mod profile;

pub use auth::{GetCurrentUserUseCase, SignInUseCase, SignOutUseCase, SignUpUseCase};
pub use products::{
    CreateProductInput, CreateProductUseCase, DeleteProductUseCase, GetMyProductsUseCase,
    GetProductUseCase, GetProductsUseCase, MarkProductSoldUseCase, PublishProductUseCase,
    UnpublishProductUseCase, UpdateProductUseCase,
};
pub use profile::{UpdateProfileUseCase, UploadAvatarUseCase};
