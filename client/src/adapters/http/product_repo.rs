//! REST implementation of the product repository

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use super::client::ApiClient;
use crate::domain::entities::{
    ImageUpload, NewProduct, Product, ProductFilter, ProductId, ProductPage, ProductStatus,
    ProductUpdate,
};
use crate::domain::ports::ProductRepository;
use crate::error::{ApiError, DomainError};

pub struct HttpProductRepository {
    api: Arc<ApiClient>,
}

impl HttpProductRepository {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ProductRepository for HttpProductRepository {
    async fn list(&self, filter: &ProductFilter) -> Result<ProductPage, DomainError> {
        Ok(self.api.get_query("/products", filter).await?)
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, DomainError> {
        match self.api.get(&format!("/products/{}", id)).await {
            Ok(product) => Ok(Some(product)),
            Err(ApiError::Api { status: 404, .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_mine(&self, status: Option<ProductStatus>) -> Result<Vec<Product>, DomainError> {
        Ok(self
            .api
            .get_query("/users/me/products", &MineQuery { status })
            .await?)
    }

    async fn create(&self, product: &NewProduct) -> Result<Product, DomainError> {
        Ok(self.api.post("/products", product).await?)
    }

    async fn update(
        &self,
        id: &ProductId,
        changes: &ProductUpdate,
    ) -> Result<Product, DomainError> {
        Ok(self.api.patch(&format!("/products/{}", id), changes).await?)
    }

    async fn set_status(
        &self,
        id: &ProductId,
        status: ProductStatus,
    ) -> Result<Product, DomainError> {
        Ok(self
            .api
            .put(
                &format!("/products/{}/status", id),
                &StatusRequest { status },
            )
            .await?)
    }

    async fn upload_images(
        &self,
        id: &ProductId,
        images: &[ImageUpload],
    ) -> Result<Product, DomainError> {
        Ok(self
            .api
            .upload(&format!("/products/{}/images", id), "images", images)
            .await?)
    }

    async fn delete(&self, id: &ProductId) -> Result<(), DomainError> {
        Ok(self.api.delete(&format!("/products/{}", id)).await?)
    }
}

// --- Request Types ---

#[derive(Debug, Serialize)]
struct MineQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<ProductStatus>,
}

#[derive(Debug, Serialize)]
struct StatusRequest {
    status: ProductStatus,
}
