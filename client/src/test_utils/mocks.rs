//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use tokio::sync::broadcast;

use super::fixtures::test_session;
use crate::adapters::InMemoryStorage;
use crate::domain::entities::{
    AuthSession, Credentials, ImageUpload, NewProduct, Product, ProductFilter, ProductId,
    ProductPage, ProductSort, ProductStatus, ProductUpdate, SessionEvent, SignUpData, User,
    UserId, UserUpdate,
};
use crate::domain::ports::{AuthService, KeyValueStorage, ProductRepository, UserRepository};
use crate::error::{DomainError, StorageError};

fn mock_failure() -> DomainError {
    DomainError::Unexpected("Mock failure".to_string())
}

// ============================================================================
// Storage whose removals fail
// ============================================================================

/// Reads and writes work, but `remove` and `clear` always fail
#[derive(Default)]
pub struct StickyStorage {
    inner: InMemoryStorage,
}

impl StickyStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sticky_failure() -> StorageError {
    StorageError::Io(std::io::Error::new(
        std::io::ErrorKind::PermissionDenied,
        "storage is read-only",
    ))
}

#[async_trait]
impl KeyValueStorage for StickyStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set(key, value).await
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(sticky_failure())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        Err(sticky_failure())
    }
}

// ============================================================================
// Mock Auth Service
// ============================================================================

pub struct MockAuthService {
    /// email -> (user, password)
    accounts: RwLock<HashMap<String, (User, String)>>,
    session: RwLock<Option<AuthSession>>,
    should_fail: bool,
    calls: AtomicUsize,
    events: broadcast::Sender<SessionEvent>,
}

impl Default for MockAuthService {
    fn default() -> Self {
        let (events, _) = broadcast::channel(8);
        Self {
            accounts: RwLock::new(HashMap::new()),
            session: RwLock::new(None),
            should_fail: false,
            calls: AtomicUsize::new(0),
            events,
        }
    }
}

impl MockAuthService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Register an account that can sign in
    pub fn with_account(self, user: &User, password: &str) -> Self {
        self.accounts
            .write()
            .unwrap()
            .insert(user.email.clone(), (user.clone(), password.to_string()));
        self
    }

    /// Start with a stored session
    pub fn signed_in_as(self, user: &User) -> Self {
        *self.session.write().unwrap() = Some(test_session(user.clone()));
        self
    }

    /// Number of sign-in/sign-up calls that reached the service
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn start(&self, user: User) -> AuthSession {
        let session = test_session(user);
        *self.session.write().unwrap() = Some(session.clone());
        let _ = self.events.send(SessionEvent::SignedIn);
        session
    }
}

#[async_trait]
impl AuthService for MockAuthService {
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(mock_failure());
        }

        let account = self
            .accounts
            .read()
            .unwrap()
            .get(&credentials.email)
            .cloned();
        match account {
            Some((user, password)) if password == credentials.password => Ok(self.start(user)),
            _ => Err(DomainError::Unauthorized(
                "Invalid email or password".to_string(),
            )),
        }
    }

    async fn sign_up(&self, data: &SignUpData) -> Result<AuthSession, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(mock_failure());
        }
        if self.accounts.read().unwrap().contains_key(&data.email) {
            return Err(DomainError::Conflict(format!(
                "{} is already registered",
                data.email
            )));
        }

        let user = User::new(
            UserId::new(),
            data.name.clone(),
            data.email.clone(),
            data.phone.clone(),
            None,
            Utc::now(),
        )?;
        self.accounts
            .write()
            .unwrap()
            .insert(user.email.clone(), (user.clone(), data.password.clone()));
        Ok(self.start(user))
    }

    async fn sign_out(&self) -> Result<(), DomainError> {
        *self.session.write().unwrap() = None;
        let _ = self.events.send(SessionEvent::SignedOut);
        Ok(())
    }

    async fn current_session(&self) -> Result<Option<AuthSession>, DomainError> {
        Ok(self.session.read().unwrap().clone())
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

// ============================================================================
// In-Memory Product Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryProductRepository {
    products: RwLock<HashMap<ProductId, Product>>,
    /// The signed-in user as seen by the "server"
    owner: Option<UserId>,
    should_fail: bool,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn owned_by(self, owner: UserId) -> Self {
        Self {
            owner: Some(owner),
            ..self
        }
    }

    pub fn with_product(self, product: Product) -> Self {
        self.insert(product);
        self
    }

    pub fn insert(&self, product: Product) {
        self.products.write().unwrap().insert(product.id, product);
    }

    pub fn get(&self, id: &ProductId) -> Option<Product> {
        self.products.read().unwrap().get(id).cloned()
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.should_fail {
            Err(mock_failure())
        } else {
            Ok(())
        }
    }

    fn owner(&self) -> Result<UserId, DomainError> {
        self.owner
            .ok_or_else(|| DomainError::Unauthorized("Not signed in".to_string()))
    }

    fn modify(
        &self,
        id: &ProductId,
        f: impl FnOnce(&Product) -> Result<Product, DomainError>,
    ) -> Result<Product, DomainError> {
        let mut products = self.products.write().unwrap();
        let current = products
            .get(id)
            .ok_or_else(|| DomainError::NotFound(format!("Product {} not found", id)))?;
        let next = f(current)?;
        products.insert(*id, next.clone());
        Ok(next)
    }
}

fn matches_filter(product: &Product, filter: &ProductFilter) -> bool {
    let contains = |haystack: &str, needle: &str| {
        haystack.to_lowercase().contains(&needle.to_lowercase())
    };

    product.status == filter.status.unwrap_or(ProductStatus::Published)
        && filter
            .category
            .as_deref()
            .map_or(true, |c| product.category.eq_ignore_ascii_case(c))
        && filter.search.as_deref().map_or(true, |s| {
            contains(&product.title, s) || contains(&product.description, s)
        })
        && filter.min_price.map_or(true, |min| product.price >= min)
        && filter.max_price.map_or(true, |max| product.price <= max)
        && filter.location.as_deref().map_or(true, |l| {
            product.location.as_deref().is_some_and(|pl| contains(pl, l))
        })
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list(&self, filter: &ProductFilter) -> Result<ProductPage, DomainError> {
        self.check()?;

        let mut items: Vec<Product> = self
            .products
            .read()
            .unwrap()
            .values()
            .filter(|p| matches_filter(p, filter))
            .cloned()
            .collect();
        match filter.sort {
            ProductSort::Newest => items.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            ProductSort::Oldest => items.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            ProductSort::PriceAsc => items.sort_by(|a, b| a.price.total_cmp(&b.price)),
            ProductSort::PriceDesc => items.sort_by(|a, b| b.price.total_cmp(&a.price)),
        }

        let total = items.len() as u64;
        let skip = ((filter.page - 1) * filter.limit) as usize;
        Ok(ProductPage {
            items: items
                .into_iter()
                .skip(skip)
                .take(filter.limit as usize)
                .collect(),
            total,
            page: filter.page,
            limit: filter.limit,
        })
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, DomainError> {
        self.check()?;
        Ok(self.get(id))
    }

    async fn list_mine(&self, status: Option<ProductStatus>) -> Result<Vec<Product>, DomainError> {
        self.check()?;
        let owner = self.owner()?;
        Ok(self
            .products
            .read()
            .unwrap()
            .values()
            .filter(|p| p.is_owned_by(&owner) && status.map_or(true, |s| p.status == s))
            .cloned()
            .collect())
    }

    async fn create(&self, new_product: &NewProduct) -> Result<Product, DomainError> {
        self.check()?;
        let now = Utc::now();
        let product = Product {
            id: ProductId::new(),
            owner_id: self.owner()?,
            title: new_product.title.clone(),
            description: new_product.description.clone(),
            price: new_product.price,
            category: new_product.category.clone(),
            location: new_product.location.clone(),
            images: vec![],
            status: ProductStatus::Draft,
            created_at: now,
            updated_at: now,
        };
        self.insert(product.clone());
        Ok(product)
    }

    async fn update(
        &self,
        id: &ProductId,
        changes: &ProductUpdate,
    ) -> Result<Product, DomainError> {
        self.check()?;
        self.modify(id, |p| p.update(changes))
    }

    async fn set_status(
        &self,
        id: &ProductId,
        status: ProductStatus,
    ) -> Result<Product, DomainError> {
        self.check()?;
        self.modify(id, |p| {
            Ok(Product {
                status,
                updated_at: Utc::now(),
                ..p.clone()
            })
        })
    }

    async fn upload_images(
        &self,
        id: &ProductId,
        images: &[ImageUpload],
    ) -> Result<Product, DomainError> {
        self.check()?;
        self.modify(id, |p| {
            let mut next = p.clone();
            next.images.extend(
                images
                    .iter()
                    .map(|i| format!("https://cdn.bazaar.test/{}/{}", id, i.file_name)),
            );
            Ok(next)
        })
    }

    async fn delete(&self, id: &ProductId) -> Result<(), DomainError> {
        self.check()?;
        self.products
            .write()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DomainError::NotFound(format!("Product {} not found", id)))
    }
}

// ============================================================================
// In-Memory User Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserRepository {
    /// Profile as stored by the "server"
    remote: RwLock<Option<User>>,
    /// Profile cached on the device
    cached: RwLock<Option<User>>,
    should_fail: bool,
    update_calls: AtomicUsize,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn with_remote(self, user: User) -> Self {
        *self.remote.write().unwrap() = Some(user);
        self
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    fn remote(&self) -> Result<User, DomainError> {
        if self.should_fail {
            return Err(mock_failure());
        }
        self.remote
            .read()
            .unwrap()
            .clone()
            .ok_or_else(|| DomainError::Unauthorized("Not signed in".to_string()))
    }

    fn store(&self, user: User) -> User {
        *self.remote.write().unwrap() = Some(user.clone());
        *self.cached.write().unwrap() = Some(user.clone());
        user
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn current_user(&self) -> Result<User, DomainError> {
        let user = self.remote()?;
        Ok(self.store(user))
    }

    async fn cached_user(&self) -> Result<Option<User>, DomainError> {
        Ok(self.cached.read().unwrap().clone())
    }

    async fn cache_user(&self, user: &User) -> Result<(), DomainError> {
        *self.cached.write().unwrap() = Some(user.clone());
        Ok(())
    }

    async fn update_profile(&self, changes: &UserUpdate) -> Result<User, DomainError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        let updated = self.remote()?.update(changes)?;
        Ok(self.store(updated))
    }

    async fn upload_avatar(&self, image: &ImageUpload) -> Result<User, DomainError> {
        let updated = self.remote()?.with_avatar(format!(
            "https://cdn.bazaar.test/avatars/{}",
            image.file_name
        ));
        Ok(self.store(updated))
    }
}
