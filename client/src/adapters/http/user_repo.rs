//! User repository: profile over REST, cached copy in local storage

use std::sync::Arc;

use async_trait::async_trait;

use super::client::ApiClient;
use crate::domain::entities::{ImageUpload, User, UserUpdate};
use crate::domain::ports::UserRepository;
use crate::error::DomainError;

pub struct HttpUserRepository {
    api: Arc<ApiClient>,
}

impl HttpUserRepository {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Server responses refresh the cached profile
    async fn remember(&self, user: User) -> Result<User, DomainError> {
        user.validate()?;
        self.api.session().save_user(&user).await?;
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for HttpUserRepository {
    async fn current_user(&self) -> Result<User, DomainError> {
        let user: User = self.api.get("/users/me").await?;
        self.remember(user).await
    }

    async fn cached_user(&self) -> Result<Option<User>, DomainError> {
        Ok(self.api.session().user().await?)
    }

    async fn cache_user(&self, user: &User) -> Result<(), DomainError> {
        Ok(self.api.session().save_user(user).await?)
    }

    async fn update_profile(&self, changes: &UserUpdate) -> Result<User, DomainError> {
        let user: User = self.api.patch("/users/me", changes).await?;
        self.remember(user).await
    }

    async fn upload_avatar(&self, image: &ImageUpload) -> Result<User, DomainError> {
        let user: User = self
            .api
            .upload("/users/me/avatar", "avatar", std::slice::from_ref(image))
            .await?;
        self.remember(user).await
    }
}
