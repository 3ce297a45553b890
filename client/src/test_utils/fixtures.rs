//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use chrono::Utc;

use crate::domain::entities::{
    AuthSession, AuthTokens, NewProduct, Product, ProductId, ProductStatus, User, UserId,
};

/// Create a test user with default values
pub fn test_user() -> User {
    User {
        id: UserId::new(),
        name: "Amina".to_string(),
        email: "amina@example.com".to_string(),
        phone: None,
        avatar_url: None,
        created_at: Utc::now(),
    }
}

/// Tokens the fake backend rejects until they are refreshed
pub fn stale_tokens() -> AuthTokens {
    AuthTokens {
        access_token: "stale".to_string(),
        refresh_token: "refresh-1".to_string(),
        expires_at: None,
    }
}

/// Create a session for a user
pub fn test_session(user: User) -> AuthSession {
    AuthSession {
        user,
        tokens: AuthTokens {
            access_token: "access-1".to_string(),
            refresh_token: "refresh-1".to_string(),
            expires_at: None,
        },
    }
}

/// Create a draft product owned by `owner`
pub fn test_product(owner: UserId) -> Product {
    let now = Utc::now();
    Product {
        id: ProductId::new(),
        owner_id: owner,
        title: "Bike".to_string(),
        description: "Red city bike".to_string(),
        price: 120.0,
        category: "sports".to_string(),
        location: Some("Nairobi".to_string()),
        images: vec![],
        status: ProductStatus::Draft,
        created_at: now,
        updated_at: now,
    }
}

/// Create valid product input
pub fn test_new_product() -> NewProduct {
    NewProduct {
        title: "Bike".to_string(),
        description: "Red city bike".to_string(),
        price: 120.0,
        category: "sports".to_string(),
        location: Some("Nairobi".to_string()),
    }
}
