//! Dependency container
//!
//! A registry of factories keyed by string. Each dependency is built on first
//! `resolve` and the same `Arc` is handed out afterwards. Factories receive the
//! container so they can resolve their own dependencies; they must not form
//! cycles.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::adapters::{
    ApiClient, FileStorage, HttpAuthService, HttpProductRepository, HttpUserRepository,
    SessionStore,
};
use crate::app::{
    CreateProductUseCase, DeleteProductUseCase, GetCurrentUserUseCase, GetMyProductsUseCase,
    GetProductUseCase, GetProductsUseCase, MarkProductSoldUseCase, PublishProductUseCase,
    SignInUseCase, SignOutUseCase, SignUpUseCase, UnpublishProductUseCase, UpdateProductUseCase,
    UpdateProfileUseCase, UploadAvatarUseCase,
};
use crate::config::Config;
use crate::domain::ports::KeyValueStorage;
use crate::error::ContainerError;

type Instance = Arc<dyn Any + Send + Sync>;
type Factory = Arc<dyn Fn(&Container) -> Result<Instance, ContainerError> + Send + Sync>;

/// Registration keys used by `Container::bootstrap`
pub mod keys {
    pub const SESSION_STORE: &str = "sessionStore";
    pub const API_CLIENT: &str = "apiClient";
    pub const AUTH_SERVICE: &str = "authService";
    pub const PRODUCT_REPOSITORY: &str = "productRepository";
    pub const USER_REPOSITORY: &str = "userRepository";

    pub const SIGN_IN: &str = "signInUseCase";
    pub const SIGN_UP: &str = "signUpUseCase";
    pub const SIGN_OUT: &str = "signOutUseCase";
    pub const GET_CURRENT_USER: &str = "getCurrentUserUseCase";

    pub const GET_PRODUCTS: &str = "getProductsUseCase";
    pub const GET_PRODUCT: &str = "getProductUseCase";
    pub const CREATE_PRODUCT: &str = "createProductUseCase";
    pub const UPDATE_PRODUCT: &str = "updateProductUseCase";
    pub const PUBLISH_PRODUCT: &str = "publishProductUseCase";
    pub const UNPUBLISH_PRODUCT: &str = "unpublishProductUseCase";
    pub const MARK_PRODUCT_SOLD: &str = "markProductSoldUseCase";
    pub const DELETE_PRODUCT: &str = "deleteProductUseCase";
    pub const GET_MY_PRODUCTS: &str = "getMyProductsUseCase";

    pub const UPDATE_PROFILE: &str = "updateProfileUseCase";
    pub const UPLOAD_AVATAR: &str = "uploadAvatarUseCase";
}

// Concrete use-case types wired by `bootstrap`
pub type SignIn = SignInUseCase<HttpAuthService>;
pub type SignUp = SignUpUseCase<HttpAuthService>;
pub type SignOut = SignOutUseCase<HttpAuthService>;
pub type GetCurrentUser = GetCurrentUserUseCase<HttpAuthService, HttpUserRepository>;
pub type GetProducts = GetProductsUseCase<HttpProductRepository>;
pub type GetProduct = GetProductUseCase<HttpProductRepository>;
pub type CreateProduct = CreateProductUseCase<HttpAuthService, HttpProductRepository>;
pub type UpdateProduct = UpdateProductUseCase<HttpAuthService, HttpProductRepository>;
pub type PublishProduct = PublishProductUseCase<HttpAuthService, HttpProductRepository>;
pub type UnpublishProduct = UnpublishProductUseCase<HttpAuthService, HttpProductRepository>;
pub type MarkProductSold = MarkProductSoldUseCase<HttpAuthService, HttpProductRepository>;
pub type DeleteProduct = DeleteProductUseCase<HttpAuthService, HttpProductRepository>;
pub type GetMyProducts = GetMyProductsUseCase<HttpAuthService, HttpProductRepository>;
pub type UpdateProfile = UpdateProfileUseCase<HttpAuthService, HttpUserRepository>;
pub type UploadAvatar = UploadAvatarUseCase<HttpAuthService, HttpUserRepository>;

#[derive(Default)]
pub struct Container {
    factories: RwLock<HashMap<&'static str, Factory>>,
    instances: RwLock<HashMap<&'static str, Instance>>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a lazily built singleton. Re-registering a key replaces the
    /// factory and drops any instance already built.
    pub fn register<T, F>(&self, key: &'static str, factory: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&Container) -> Result<T, ContainerError> + Send + Sync + 'static,
    {
        let factory: Factory =
            Arc::new(move |c: &Container| factory(c).map(|v| Arc::new(v) as Instance));
        self.factories.write().insert(key, factory);
        self.instances.write().remove(key);
    }

    /// Register an already built value
    pub fn register_instance<T: Send + Sync + 'static>(&self, key: &'static str, value: Arc<T>) {
        let instance: Instance = value;
        let cached = instance.clone();
        let factory: Factory =
            Arc::new(move |_: &Container| Ok::<_, ContainerError>(cached.clone()));
        self.factories.write().insert(key, factory);
        self.instances.write().insert(key, instance);
    }

    pub fn is_registered(&self, key: &str) -> bool {
        self.factories.read().contains_key(key)
    }

    pub fn resolve<T: Send + Sync + 'static>(&self, key: &str) -> Result<Arc<T>, ContainerError> {
        let cached = self.instances.read().get(key).cloned();

        let instance = match cached {
            Some(instance) => instance,
            None => {
                let (key, factory) = self
                    .factories
                    .read()
                    .get_key_value(key)
                    .map(|(k, f)| (*k, f.clone()))
                    .ok_or_else(|| ContainerError::NotRegistered(key.to_string()))?;

                // Built without holding a lock so the factory can resolve its dependencies
                let built = factory(self)?;
                tracing::debug!(key, "Constructed dependency");

                // A concurrent resolve may have won the race; keep the first instance
                self.instances.write().entry(key).or_insert(built).clone()
            }
        };

        instance
            .downcast::<T>()
            .map_err(|_| ContainerError::TypeMismatch {
                key: key.to_string(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// Wire the full client with file-backed storage from `config`
    pub fn bootstrap(config: &Config) -> Self {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(FileStorage::new(&config.storage_dir));
        Self::with_storage(config, storage)
    }

    /// Wire the full client on top of the given storage
    pub fn with_storage(config: &Config, storage: Arc<dyn KeyValueStorage>) -> Self {
        let container = Self::new();

        container.register(keys::SESSION_STORE, move |_| {
            Ok(SessionStore::new(storage.clone()))
        });

        let base_url = config.api_base_url.clone();
        let timeout = config.request_timeout;
        container.register(keys::API_CLIENT, move |c| {
            let session = c.resolve::<SessionStore>(keys::SESSION_STORE)?;
            ApiClient::new(&base_url, timeout, session.as_ref().clone()).map_err(|e| {
                ContainerError::Construction {
                    key: keys::API_CLIENT.to_string(),
                    message: e.to_string(),
                }
            })
        });

        container.register(keys::AUTH_SERVICE, |c| {
            Ok(HttpAuthService::new(c.resolve(keys::API_CLIENT)?))
        });
        container.register(keys::PRODUCT_REPOSITORY, |c| {
            Ok(HttpProductRepository::new(c.resolve(keys::API_CLIENT)?))
        });
        container.register(keys::USER_REPOSITORY, |c| {
            Ok(HttpUserRepository::new(c.resolve(keys::API_CLIENT)?))
        });

        register_use_cases(&container);
        container
    }
}

fn register_use_cases(c: &Container) {
    c.register(keys::SIGN_IN, |c| {
        Ok(SignIn::new(c.resolve(keys::AUTH_SERVICE)?))
    });
    c.register(keys::SIGN_UP, |c| {
        Ok(SignUp::new(c.resolve(keys::AUTH_SERVICE)?))
    });
    c.register(keys::SIGN_OUT, |c| {
        Ok(SignOut::new(c.resolve(keys::AUTH_SERVICE)?))
    });
    c.register(keys::GET_CURRENT_USER, |c| {
        Ok(GetCurrentUser::new(
            c.resolve(keys::AUTH_SERVICE)?,
            c.resolve(keys::USER_REPOSITORY)?,
        ))
    });

    c.register(keys::GET_PRODUCTS, |c| {
        Ok(GetProducts::new(c.resolve(keys::PRODUCT_REPOSITORY)?))
    });
    c.register(keys::GET_PRODUCT, |c| {
        Ok(GetProduct::new(c.resolve(keys::PRODUCT_REPOSITORY)?))
    });
    c.register(keys::CREATE_PRODUCT, |c| {
        Ok(CreateProduct::new(
            c.resolve(keys::AUTH_SERVICE)?,
            c.resolve(keys::PRODUCT_REPOSITORY)?,
        ))
    });
    c.register(keys::UPDATE_PRODUCT, |c| {
        Ok(UpdateProduct::new(
            c.resolve(keys::AUTH_SERVICE)?,
            c.resolve(keys::PRODUCT_REPOSITORY)?,
        ))
    });
    c.register(keys::PUBLISH_PRODUCT, |c| {
        Ok(PublishProduct::new(
            c.resolve(keys::AUTH_SERVICE)?,
            c.resolve(keys::PRODUCT_REPOSITORY)?,
        ))
    });
    c.register(keys::UNPUBLISH_PRODUCT, |c| {
        Ok(UnpublishProduct::new(
            c.resolve(keys::AUTH_SERVICE)?,
            c.resolve(keys::PRODUCT_REPOSITORY)?,
        ))
    });
    c.register(keys::MARK_PRODUCT_SOLD, |c| {
        Ok(MarkProductSold::new(
            c.resolve(keys::AUTH_SERVICE)?,
            c.resolve(keys::PRODUCT_REPOSITORY)?,
        ))
    });
    c.register(keys::DELETE_PRODUCT, |c| {
        Ok(DeleteProduct::new(
            c.resolve(keys::AUTH_SERVICE)?,
            c.resolve(keys::PRODUCT_REPOSITORY)?,
        ))
    });
    c.register(keys::GET_MY_PRODUCTS, |c| {
        Ok(GetMyProducts::new(
            c.resolve(keys::AUTH_SERVICE)?,
            c.resolve(keys::PRODUCT_REPOSITORY)?,
        ))
    });

    c.register(keys::UPDATE_PROFILE, |c| {
        Ok(UpdateProfile::new(
            c.resolve(keys::AUTH_SERVICE)?,
            c.resolve(keys::USER_REPOSITORY)?,
        ))
    });
    c.register(keys::UPLOAD_AVATAR, |c| {
        Ok(UploadAvatar::new(
            c.resolve(keys::AUTH_SERVICE)?,
            c.resolve(keys::USER_REPOSITORY)?,
        ))
    });
}
