//! Product search filters and paging

use serde::{Deserialize, Serialize};

use super::product::{Product, ProductStatus};
use crate::error::DomainError;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Sort order for product listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    #[default]
    Newest,
    Oldest,
    PriceAsc,
    PriceDesc,
}

impl std::str::FromStr for ProductSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "newest" => Ok(ProductSort::Newest),
            "oldest" => Ok(ProductSort::Oldest),
            "price_asc" => Ok(ProductSort::PriceAsc),
            "price_desc" => Ok(ProductSort::PriceDesc),
            _ => Err(format!("Unknown sort order: {}", s)),
        }
    }
}

/// Filters sent as the query string of `GET /products`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
    pub sort: ProductSort,
    pub page: u32,
    pub limit: u32,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
            min_price: None,
            max_price: None,
            location: None,
            status: None,
            sort: ProductSort::default(),
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ProductFilter {
    pub fn validate(&self) -> Result<(), DomainError> {
        for (name, price) in [("minPrice", self.min_price), ("maxPrice", self.max_price)] {
            if let Some(p) = price {
                if !p.is_finite() || p < 0.0 {
                    return Err(DomainError::Validation(format!(
                        "{} must be a non-negative number",
                        name
                    )));
                }
            }
        }
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(DomainError::Validation(
                    "minPrice cannot be greater than maxPrice".to_string(),
                ));
            }
        }
        if self.page == 0 {
            return Err(DomainError::Validation("page starts at 1".to_string()));
        }
        if self.limit == 0 || self.limit > MAX_PAGE_SIZE {
            return Err(DomainError::Validation(format!(
                "limit must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        Ok(())
    }

    /// Blank search terms are treated as no filter
    pub fn normalized(mut self) -> Self {
        let blank = |v: &Option<String>| v.as_deref().map(str::trim).unwrap_or("").is_empty();
        if blank(&self.search) {
            self.search = None;
        }
        if blank(&self.category) {
            self.category = None;
        }
        if blank(&self.location) {
            self.location = None;
        }
        self
    }
}

/// One page of a product listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl ProductPage {
    pub fn has_more(&self) -> bool {
        u64::from(self.page) * u64::from(self.limit) < self.total
    }
}
