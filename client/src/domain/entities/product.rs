//! Product domain entity
//!
//! A classified ad. Like `User`, products are immutable values: editing and
//! status transitions return new instances.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserId;
use crate::error::DomainError;

/// Unique identifier for a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub Uuid);

impl ProductId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ProductId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ProductId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| DomainError::Validation(format!("Invalid product id: {}", s)))
    }
}

/// Listing status of an ad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    /// Saved but not visible to other users
    Draft,
    /// Visible in search results
    Published,
    /// Sold; no longer editable
    Sold,
    /// Hidden by the owner
    Archived,
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductStatus::Draft => write!(f, "draft"),
            ProductStatus::Published => write!(f, "published"),
            ProductStatus::Sold => write!(f, "sold"),
            ProductStatus::Archived => write!(f, "archived"),
        }
    }
}

impl std::str::FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(ProductStatus::Draft),
            "published" => Ok(ProductStatus::Published),
            "sold" => Ok(ProductStatus::Sold),
            "archived" => Ok(ProductStatus::Archived),
            _ => Err(format!("Unknown product status: {}", s)),
        }
    }
}

/// A classified ad
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Validate field rules shared by products and product input
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_listing(&self.title, &self.description, self.price, &self.category)
    }

    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.owner_id == *user
    }

    /// Apply an edit, returning the updated product
    pub fn update(&self, changes: &ProductUpdate) -> Result<Self, DomainError> {
        if self.status == ProductStatus::Sold {
            return Err(DomainError::Conflict(
                "Sold products cannot be edited".to_string(),
            ));
        }

        let updated = Self {
            title: changes.title.clone().unwrap_or_else(|| self.title.clone()),
            description: changes
                .description
                .clone()
                .unwrap_or_else(|| self.description.clone()),
            price: changes.price.unwrap_or(self.price),
            category: changes
                .category
                .clone()
                .unwrap_or_else(|| self.category.clone()),
            location: changes.location.clone().or_else(|| self.location.clone()),
            updated_at: Utc::now(),
            ..self.clone()
        };
        updated.validate()?;
        Ok(updated)
    }

    /// Make the ad visible in search results
    pub fn publish(&self) -> Result<Self, DomainError> {
        match self.status {
            ProductStatus::Draft | ProductStatus::Archived => {
                Ok(self.with_status(ProductStatus::Published))
            }
            ProductStatus::Published => Err(DomainError::Conflict(format!(
                "Product {} is already published",
                self.id
            ))),
            ProductStatus::Sold => Err(DomainError::Validation(
                "Sold products cannot be published again".to_string(),
            )),
        }
    }

    /// Take a published ad back to draft
    pub fn unpublish(&self) -> Result<Self, DomainError> {
        match self.status {
            ProductStatus::Published => Ok(self.with_status(ProductStatus::Draft)),
            other => Err(DomainError::Conflict(format!(
                "Only published products can be unpublished (status: {})",
                other
            ))),
        }
    }

    pub fn mark_sold(&self) -> Result<Self, DomainError> {
        match self.status {
            ProductStatus::Published => Ok(self.with_status(ProductStatus::Sold)),
            other => Err(DomainError::Conflict(format!(
                "Only published products can be marked sold (status: {})",
                other
            ))),
        }
    }

    fn with_status(&self, status: ProductStatus) -> Self {
        Self {
            status,
            updated_at: Utc::now(),
            ..self.clone()
        }
    }
}

/// Data needed to create a new product
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl NewProduct {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_listing(&self.title, &self.description, self.price, &self.category)
    }
}

/// Editable product fields; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.location.is_none()
    }
}

fn validate_listing(
    title: &str,
    description: &str,
    price: f64,
    category: &str,
) -> Result<(), DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::Validation("Title is required".to_string()));
    }
    if description.trim().is_empty() {
        return Err(DomainError::Validation(
            "Description is required".to_string(),
        ));
    }
    if category.trim().is_empty() {
        return Err(DomainError::Validation("Category is required".to_string()));
    }
    if !price.is_finite() || price < 0.0 {
        return Err(DomainError::Validation(
            "Price must be a non-negative number".to_string(),
        ));
    }
    Ok(())
}
