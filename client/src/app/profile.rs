//! Profile use-cases

use std::sync::Arc;

use super::auth::require_session;
use crate::domain::entities::{ImageUpload, User, UserUpdate};
use crate::domain::ports::{AuthService, UserRepository};
use crate::error::DomainError;

const PROFILE_FAILED: &str = "Unable to update your profile. Please try again.";
const AVATAR_FAILED: &str = "Unable to upload your photo. Please try again.";

pub struct UpdateProfileUseCase<A: AuthService, U: UserRepository> {
    auth: Arc<A>,
    users: Arc<U>,
}

impl<A: AuthService, U: UserRepository> UpdateProfileUseCase<A, U> {
    pub fn new(auth: Arc<A>, users: Arc<U>) -> Self {
        Self { auth, users }
    }

    pub async fn execute(&self, changes: UserUpdate) -> Result<User, DomainError> {
        let changes = UserUpdate {
            name: changes.name.map(|n| n.trim().to_string()),
            email: changes.email.map(|e| e.trim().to_lowercase()),
            phone: changes.phone.map(|p| p.trim().to_string()),
        };
        if changes.is_empty() {
            return Err(DomainError::Validation("Nothing to update".to_string()));
        }

        self.update(&changes)
            .await
            .map_err(|e| e.or_fallback(PROFILE_FAILED))
    }

    async fn update(&self, changes: &UserUpdate) -> Result<User, DomainError> {
        let session = require_session(self.auth.as_ref()).await?;
        session.user.update(changes)?;
        self.users.update_profile(changes).await
    }
}

pub struct UploadAvatarUseCase<A: AuthService, U: UserRepository> {
    auth: Arc<A>,
    users: Arc<U>,
}

impl<A: AuthService, U: UserRepository> UploadAvatarUseCase<A, U> {
    pub fn new(auth: Arc<A>, users: Arc<U>) -> Self {
        Self { auth, users }
    }

    pub async fn execute(&self, image: ImageUpload) -> Result<User, DomainError> {
        image.validate()?;

        self.upload(&image)
            .await
            .map_err(|e| e.or_fallback(AVATAR_FAILED))
    }

    async fn upload(&self, image: &ImageUpload) -> Result<User, DomainError> {
        require_session(self.auth.as_ref()).await?;
        let user = self.users.upload_avatar(image).await?;
        tracing::info!(user_id = %user.id, "Avatar updated");
        Ok(user)
    }
}
