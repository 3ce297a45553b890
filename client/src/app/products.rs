//! Product use-cases
//!
//! Browsing is open to everyone; creating and managing ads requires a session,
//! and changes to an existing ad are limited to its owner.

use std::sync::Arc;

use super::auth::require_session;
use crate::domain::entities::{
    ImageUpload, NewProduct, Product, ProductFilter, ProductId, ProductPage, ProductStatus,
    ProductUpdate,
};
use crate::domain::ports::{AuthService, ProductRepository};
use crate::error::DomainError;

const LIST_FAILED: &str = "Unable to load products. Please try again.";
const LOAD_FAILED: &str = "Unable to load this product. Please try again.";
const SAVE_FAILED: &str = "Unable to save your ad. Please try again.";
const STATUS_FAILED: &str = "Unable to update the ad status. Please try again.";
const DELETE_FAILED: &str = "Unable to delete your ad. Please try again.";

/// Load a product the signed-in user owns
async fn owned_product<A, P>(
    auth: &A,
    products: &P,
    id: &ProductId,
) -> Result<Product, DomainError>
where
    A: AuthService + ?Sized,
    P: ProductRepository + ?Sized,
{
    let session = require_session(auth).await?;
    let product = products
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Product {} not found", id)))?;

    if !product.is_owned_by(&session.user.id) {
        return Err(DomainError::Unauthorized(
            "You can only manage your own ads".to_string(),
        ));
    }
    Ok(product)
}

pub struct GetProductsUseCase<P: ProductRepository> {
    products: Arc<P>,
}

impl<P: ProductRepository> GetProductsUseCase<P> {
    pub fn new(products: Arc<P>) -> Self {
        Self { products }
    }

    pub async fn execute(&self, filter: ProductFilter) -> Result<ProductPage, DomainError> {
        let filter = filter.normalized();
        filter.validate()?;

        self.products
            .list(&filter)
            .await
            .map_err(|e| e.or_fallback(LIST_FAILED))
    }
}

pub struct GetProductUseCase<P: ProductRepository> {
    products: Arc<P>,
}

impl<P: ProductRepository> GetProductUseCase<P> {
    pub fn new(products: Arc<P>) -> Self {
        Self { products }
    }

    pub async fn execute(&self, id: &ProductId) -> Result<Product, DomainError> {
        self.products
            .find_by_id(id)
            .await
            .map_err(|e| e.or_fallback(LOAD_FAILED))?
            .ok_or_else(|| DomainError::NotFound(format!("Product {} not found", id)))
    }
}

/// Input for creating an ad
#[derive(Debug, Clone)]
pub struct CreateProductInput {
    pub product: NewProduct,
    pub images: Vec<ImageUpload>,
    /// Publish right away instead of leaving a draft
    pub publish: bool,
}

pub struct CreateProductUseCase<A: AuthService, P: ProductRepository> {
    auth: Arc<A>,
    products: Arc<P>,
}

impl<A: AuthService, P: ProductRepository> CreateProductUseCase<A, P> {
    pub fn new(auth: Arc<A>, products: Arc<P>) -> Self {
        Self { auth, products }
    }

    pub async fn execute(&self, input: CreateProductInput) -> Result<Product, DomainError> {
        input.product.validate()?;
        for image in &input.images {
            image.validate()?;
        }

        self.create(input)
            .await
            .map_err(|e| e.or_fallback(SAVE_FAILED))
    }

    async fn create(&self, input: CreateProductInput) -> Result<Product, DomainError> {
        require_session(self.auth.as_ref()).await?;

        let mut product = self.products.create(&input.product).await?;
        tracing::info!(product_id = %product.id, "Product created");

        if !input.images.is_empty() {
            product = self
                .products
                .upload_images(&product.id, &input.images)
                .await?;
        }
        if input.publish {
            product.publish()?;
            product = self
                .products
                .set_status(&product.id, ProductStatus::Published)
                .await?;
        }
        Ok(product)
    }
}

pub struct UpdateProductUseCase<A: AuthService, P: ProductRepository> {
    auth: Arc<A>,
    products: Arc<P>,
}

impl<A: AuthService, P: ProductRepository> UpdateProductUseCase<A, P> {
    pub fn new(auth: Arc<A>, products: Arc<P>) -> Self {
        Self { auth, products }
    }

    pub async fn execute(
        &self,
        id: &ProductId,
        changes: ProductUpdate,
    ) -> Result<Product, DomainError> {
        if changes.is_empty() {
            return Err(DomainError::Validation("Nothing to update".to_string()));
        }

        self.update(id, &changes)
            .await
            .map_err(|e| e.or_fallback(SAVE_FAILED))
    }

    async fn update(
        &self,
        id: &ProductId,
        changes: &ProductUpdate,
    ) -> Result<Product, DomainError> {
        let current = owned_product(self.auth.as_ref(), self.products.as_ref(), id).await?;
        // Validate locally before the round trip
        current.update(changes)?;
        self.products.update(id, changes).await
    }
}

/// Shared flow for status changes: ownership, local transition check, remote call
async fn change_status<A, P>(
    auth: &A,
    products: &P,
    id: &ProductId,
    transition: fn(&Product) -> Result<Product, DomainError>,
) -> Result<Product, DomainError>
where
    A: AuthService + ?Sized,
    P: ProductRepository + ?Sized,
{
    let current = owned_product(auth, products, id).await?;
    let next = transition(&current)?;
    let saved = products.set_status(id, next.status).await?;
    tracing::info!(product_id = %id, status = %saved.status, "Product status changed");
    Ok(saved)
}

pub struct PublishProductUseCase<A: AuthService, P: ProductRepository> {
    auth: Arc<A>,
    products: Arc<P>,
}

impl<A: AuthService, P: ProductRepository> PublishProductUseCase<A, P> {
    pub fn new(auth: Arc<A>, products: Arc<P>) -> Self {
        Self { auth, products }
    }

    pub async fn execute(&self, id: &ProductId) -> Result<Product, DomainError> {
        change_status(self.auth.as_ref(), self.products.as_ref(), id, Product::publish)
            .await
            .map_err(|e| e.or_fallback(STATUS_FAILED))
    }
}

pub struct UnpublishProductUseCase<A: AuthService, P: ProductRepository> {
    auth: Arc<A>,
    products: Arc<P>,
}

impl<A: AuthService, P: ProductRepository> UnpublishProductUseCase<A, P> {
    pub fn new(auth: Arc<A>, products: Arc<P>) -> Self {
        Self { auth, products }
    }

    pub async fn execute(&self, id: &ProductId) -> Result<Product, DomainError> {
        change_status(
            self.auth.as_ref(),
            self.products.as_ref(),
            id,
            Product::unpublish,
        )
        .await
        .map_err(|e| e.or_fallback(STATUS_FAILED))
    }
}

pub struct MarkProductSoldUseCase<A: AuthService, P: ProductRepository> {
    auth: Arc<A>,
    products: Arc<P>,
}

impl<A: AuthService, P: ProductRepository> MarkProductSoldUseCase<A, P> {
    pub fn new(auth: Arc<A>, products: Arc<P>) -> Self {
        Self { auth, products }
    }

    pub async fn execute(&self, id: &ProductId) -> Result<Product, DomainError> {
        change_status(
            self.auth.as_ref(),
            self.products.as_ref(),
            id,
            Product::mark_sold,
        )
        .await
        .map_err(|e| e.or_fallback(STATUS_FAILED))
    }
}

pub struct DeleteProductUseCase<A: AuthService, P: ProductRepository> {
    auth: Arc<A>,
    products: Arc<P>,
}

impl<A: AuthService, P: ProductRepository> DeleteProductUseCase<A, P> {
    pub fn new(auth: Arc<A>, products: Arc<P>) -> Self {
        Self { auth, products }
    }

    pub async fn execute(&self, id: &ProductId) -> Result<(), DomainError> {
        self.delete(id)
            .await
            .map_err(|e| e.or_fallback(DELETE_FAILED))
    }

    async fn delete(&self, id: &ProductId) -> Result<(), DomainError> {
        owned_product(self.auth.as_ref(), self.products.as_ref(), id).await?;
        self.products.delete(id).await?;
        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }
}

pub struct GetMyProductsUseCase<A: AuthService, P: ProductRepository> {
    auth: Arc<A>,
    products: Arc<P>,
}

impl<A: AuthService, P: ProductRepository> GetMyProductsUseCase<A, P> {
    pub fn new(auth: Arc<A>, products: Arc<P>) -> Self {
        Self { auth, products }
    }

    pub async fn execute(
        &self,
        status: Option<ProductStatus>,
    ) -> Result<Vec<Product>, DomainError> {
        self.list(status)
            .await
            .map_err(|e| e.or_fallback(LIST_FAILED))
    }

    async fn list(&self, status: Option<ProductStatus>) -> Result<Vec<Product>, DomainError> {
        require_session(self.auth.as_ref()).await?;
        self.products.list_mine(status).await
    }
}
