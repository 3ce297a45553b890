//! Authentication use-cases
//!
//! Sign in, sign up, sign out and resolving the current user.

use std::sync::Arc;

use crate::domain::entities::{AuthSession, Credentials, SignUpData, User};
use crate::domain::ports::{AuthService, UserRepository};
use crate::error::DomainError;

const SIGN_IN_FAILED: &str = "Unable to sign in right now. Please try again.";
const SIGN_UP_FAILED: &str = "Unable to create your account right now. Please try again.";
const SIGN_OUT_FAILED: &str = "Unable to sign out cleanly. Please try again.";
const LOAD_USER_FAILED: &str = "Unable to load your profile. Please try again.";

/// Require a stored session, returning it
pub(crate) async fn require_session<A: AuthService + ?Sized>(
    auth: &A,
) -> Result<AuthSession, DomainError> {
    auth.current_session()
        .await?
        .ok_or_else(|| DomainError::Unauthorized("You need to sign in first".to_string()))
}

pub struct SignInUseCase<A: AuthService> {
    auth: Arc<A>,
}

impl<A: AuthService> SignInUseCase<A> {
    pub fn new(auth: Arc<A>) -> Self {
        Self { auth }
    }

    pub async fn execute(&self, email: &str, password: &str) -> Result<AuthSession, DomainError> {
        let credentials = Credentials::new(email, password);
        credentials.validate()?;

        self.auth
            .sign_in(&credentials)
            .await
            .map_err(|e| e.or_fallback(SIGN_IN_FAILED))
    }
}

pub struct SignUpUseCase<A: AuthService> {
    auth: Arc<A>,
}

impl<A: AuthService> SignUpUseCase<A> {
    pub fn new(auth: Arc<A>) -> Self {
        Self { auth }
    }

    pub async fn execute(&self, data: SignUpData) -> Result<AuthSession, DomainError> {
        let data = SignUpData {
            name: data.name.trim().to_string(),
            email: data.email.trim().to_lowercase(),
            phone: data.phone.map(|p| p.trim().to_string()),
            password: data.password,
        };
        data.validate()?;

        self.auth
            .sign_up(&data)
            .await
            .map_err(|e| e.or_fallback(SIGN_UP_FAILED))
    }
}

pub struct SignOutUseCase<A: AuthService> {
    auth: Arc<A>,
}

impl<A: AuthService> SignOutUseCase<A> {
    pub fn new(auth: Arc<A>) -> Self {
        Self { auth }
    }

    pub async fn execute(&self) -> Result<(), DomainError> {
        self.auth
            .sign_out()
            .await
            .map_err(|e| e.or_fallback(SIGN_OUT_FAILED))
    }
}

pub struct GetCurrentUserUseCase<A: AuthService, U: UserRepository> {
    auth: Arc<A>,
    users: Arc<U>,
}

impl<A: AuthService, U: UserRepository> GetCurrentUserUseCase<A, U> {
    pub fn new(auth: Arc<A>, users: Arc<U>) -> Self {
        Self { auth, users }
    }

    /// The cached profile, or the remote one when `refresh` is set or nothing
    /// is cached yet
    pub async fn execute(&self, refresh: bool) -> Result<User, DomainError> {
        self.load(refresh)
            .await
            .map_err(|e| e.or_fallback(LOAD_USER_FAILED))
    }

    async fn load(&self, refresh: bool) -> Result<User, DomainError> {
        require_session(self.auth.as_ref()).await?;

        if !refresh {
            if let Some(cached) = self.users.cached_user().await? {
                return Ok(cached);
            }
        }
        // The repository caches what it fetches
        self.users.current_user().await
    }
}
