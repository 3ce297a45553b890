//! Repository port traits
//!
//! These traits define the interface for product and user persistence.
//! Implementations are provided by adapters (REST API, local storage).

use async_trait::async_trait;

use crate::domain::entities::{
    ImageUpload, NewProduct, Product, ProductFilter, ProductId, ProductPage, ProductStatus,
    ProductUpdate, User, UserUpdate,
};
use crate::error::DomainError;

/// Repository for Product entities
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Search published products
    async fn list(&self, filter: &ProductFilter) -> Result<ProductPage, DomainError>;

    /// Find a product by ID
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, DomainError>;

    /// Products owned by the signed-in user, optionally by status
    async fn list_mine(&self, status: Option<ProductStatus>) -> Result<Vec<Product>, DomainError>;

    /// Create a new product (as a draft)
    async fn create(&self, product: &NewProduct) -> Result<Product, DomainError>;

    /// Update editable fields
    async fn update(&self, id: &ProductId, changes: &ProductUpdate)
        -> Result<Product, DomainError>;

    /// Change listing status (publish, unpublish, sold)
    async fn set_status(&self, id: &ProductId, status: ProductStatus)
        -> Result<Product, DomainError>;

    /// Attach images to a product
    async fn upload_images(
        &self,
        id: &ProductId,
        images: &[ImageUpload],
    ) -> Result<Product, DomainError>;

    /// Delete a product
    async fn delete(&self, id: &ProductId) -> Result<(), DomainError>;
}

/// Repository for the signed-in user's profile
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch the profile from the backend
    async fn current_user(&self) -> Result<User, DomainError>;

    /// The profile cached on the device, if any
    async fn cached_user(&self) -> Result<Option<User>, DomainError>;

    /// Replace the cached profile
    async fn cache_user(&self, user: &User) -> Result<(), DomainError>;

    /// Update profile fields
    async fn update_profile(&self, changes: &UserUpdate) -> Result<User, DomainError>;

    /// Upload a new avatar image
    async fn upload_avatar(&self, image: &ImageUpload) -> Result<User, DomainError>;
}
