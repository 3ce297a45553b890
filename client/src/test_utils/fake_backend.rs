//! In-process marketplace backend for exercising the HTTP adapters
//!
//! Only the access token `fresh-1` is accepted. Any other bearer token gets a
//! 401, and `/auth/refresh` trades `refresh-1` for `fresh-1`.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, Path, RawQuery, State};
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use super::fixtures::{test_product, test_user};
use crate::domain::entities::{
    AuthSession, AuthTokens, Product, ProductPage, ProductStatus, User, UserId,
};

pub const FRESH_TOKEN: &str = "fresh-1";
pub const VALID_REFRESH_TOKEN: &str = "refresh-1";
pub const ROTATED_REFRESH_TOKEN: &str = "refresh-2";
pub const PASSWORD: &str = "correct-horse";

pub struct BackendState {
    pub refresh_calls: AtomicUsize,
    pub refresh_fails: AtomicBool,
    /// Reject every token, even a freshly issued one
    pub always_reject: AtomicBool,
    pub last_query: Mutex<Option<String>>,
    /// JSON body of the last signup/PATCH/PUT request
    pub last_body: Mutex<Option<Value>>,
    pub avatar_files: Mutex<Vec<String>>,
    pub image_files: Mutex<Vec<String>>,
    pub deleted: Mutex<Vec<String>>,
    pub user: User,
    pub product: Product,
}

impl Default for BackendState {
    fn default() -> Self {
        let user = test_user();
        let product = test_product(user.id);
        Self {
            refresh_calls: AtomicUsize::new(0),
            refresh_fails: AtomicBool::new(false),
            always_reject: AtomicBool::new(false),
            last_query: Mutex::new(None),
            last_body: Mutex::new(None),
            avatar_files: Mutex::new(vec![]),
            image_files: Mutex::new(vec![]),
            deleted: Mutex::new(vec![]),
            user,
            product,
        }
    }
}

impl BackendState {
    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn last_body(&self) -> Option<Value> {
        self.last_body.lock().unwrap().clone()
    }

    fn record(&self, body: &Value) {
        *self.last_body.lock().unwrap() = Some(body.clone());
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        if self.always_reject.load(Ordering::SeqCst) {
            return false;
        }
        headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == format!("Bearer {}", FRESH_TOKEN))
    }
}

/// Serve on an ephemeral port, returning the base URL
pub async fn spawn(state: Arc<BackendState>) -> String {
    let app = Router::new()
        .route("/auth/signin", post(sign_in))
        .route("/auth/signup", post(sign_up))
        .route("/auth/refresh", post(refresh))
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/:id",
            get(get_product).patch(update_product).delete(delete_product),
        )
        .route("/products/:id/status", put(set_status))
        .route("/products/:id/images", post(upload_images))
        .route("/users/me", get(get_me).patch(update_me))
        .route("/users/me/products", get(my_products))
        .route("/users/me/avatar", post(upload_avatar))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn unauthorized() -> Response {
    error(StatusCode::UNAUTHORIZED, "Token expired")
}

#[derive(Deserialize)]
struct SignInBody {
    email: String,
    password: String,
}

async fn sign_in(
    State(state): State<Arc<BackendState>>,
    Json(body): Json<SignInBody>,
) -> Response {
    if body.email != state.user.email || body.password != PASSWORD {
        return error(StatusCode::UNAUTHORIZED, "Invalid email or password");
    }
    Json(AuthSession {
        user: state.user.clone(),
        tokens: AuthTokens {
            access_token: FRESH_TOKEN.to_string(),
            refresh_token: VALID_REFRESH_TOKEN.to_string(),
            expires_at: None,
        },
    })
    .into_response()
}

async fn sign_up(State(state): State<Arc<BackendState>>, Json(body): Json<Value>) -> Response {
    state.record(&body);
    let email = body["email"].as_str().unwrap_or_default();
    if email == state.user.email {
        return error(StatusCode::CONFLICT, "Email already registered");
    }
    let user = User {
        id: UserId::new(),
        name: body["name"].as_str().unwrap_or_default().to_string(),
        email: email.to_string(),
        phone: body["phone"].as_str().map(str::to_string),
        avatar_url: None,
        created_at: state.user.created_at,
    };
    Json(AuthSession {
        user,
        tokens: AuthTokens {
            access_token: FRESH_TOKEN.to_string(),
            refresh_token: VALID_REFRESH_TOKEN.to_string(),
            expires_at: None,
        },
    })
    .into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshBody {
    refresh_token: String,
}

async fn refresh(
    State(state): State<Arc<BackendState>>,
    Json(body): Json<RefreshBody>,
) -> Response {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);
    // Long enough for concurrent callers to pile up behind the gate
    tokio::time::sleep(Duration::from_millis(50)).await;

    if state.refresh_fails.load(Ordering::SeqCst) || body.refresh_token != VALID_REFRESH_TOKEN {
        return error(StatusCode::UNAUTHORIZED, "Refresh token expired");
    }
    Json(json!({
        "accessToken": FRESH_TOKEN,
        "refreshToken": ROTATED_REFRESH_TOKEN,
    }))
    .into_response()
}

async fn list_products(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    *state.last_query.lock().unwrap() = query;
    if !state.authorized(&headers) {
        return unauthorized();
    }
    Json(ProductPage {
        items: vec![state.product.clone()],
        total: 1,
        page: 1,
        limit: 20,
    })
    .into_response()
}

async fn create_product(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    error(StatusCode::CONFLICT, "You already listed this item")
}

async fn get_product(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    match known_product(&state, &id) {
        Ok(product) => Json(product).into_response(),
        Err(response) => response,
    }
}

/// The seeded product when `id` names it, otherwise a 404 response
fn known_product(state: &BackendState, id: &str) -> Result<Product, Response> {
    if id == state.product.id.to_string() {
        Ok(state.product.clone())
    } else {
        Err(error(StatusCode::NOT_FOUND, "Product not found"))
    }
}

async fn update_product(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    let mut product = match known_product(&state, &id) {
        Ok(product) => product,
        Err(response) => return response,
    };
    state.record(&body);
    if let Some(title) = body["title"].as_str() {
        product.title = title.to_string();
    }
    if let Some(price) = body["price"].as_f64() {
        product.price = price;
    }
    Json(product).into_response()
}

async fn delete_product(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    if let Err(response) = known_product(&state, &id) {
        return response;
    }
    state.deleted.lock().unwrap().push(id);
    StatusCode::NO_CONTENT.into_response()
}

#[derive(Deserialize)]
struct StatusBody {
    status: ProductStatus,
}

async fn set_status(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    let product = match known_product(&state, &id) {
        Ok(product) => product,
        Err(response) => return response,
    };
    state.record(&body);
    let Ok(StatusBody { status }) = serde_json::from_value(body) else {
        return error(StatusCode::BAD_REQUEST, "Unknown status");
    };
    Json(Product { status, ..product }).into_response()
}

async fn upload_images(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Response {
    let mut files = vec![];
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("images") {
            files.push(field.file_name().unwrap_or_default().to_string());
        }
        let _ = field.bytes().await;
    }

    if !state.authorized(&headers) {
        return unauthorized();
    }
    let mut product = match known_product(&state, &id) {
        Ok(product) => product,
        Err(response) => return response,
    };
    if files.is_empty() {
        return error(StatusCode::BAD_REQUEST, "images field is required");
    }

    product.images.extend(
        files
            .iter()
            .map(|f| format!("https://cdn.bazaar.test/{}/{}", id, f)),
    );
    state.image_files.lock().unwrap().extend(files);
    Json(product).into_response()
}

async fn my_products(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    *state.last_query.lock().unwrap() = query;
    if !state.authorized(&headers) {
        return unauthorized();
    }
    Json(vec![state.product.clone()]).into_response()
}

async fn update_me(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    state.record(&body);
    let mut user = state.user.clone();
    if let Some(name) = body["name"].as_str() {
        user.name = name.to_string();
    }
    if let Some(phone) = body["phone"].as_str() {
        user.phone = Some(phone.to_string());
    }
    Json(user).into_response()
}

async fn get_me(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    Json(state.user.clone()).into_response()
}

async fn upload_avatar(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    // Drain the body first so the client never sees a reset connection
    let mut file_name = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("avatar") {
            file_name = field.file_name().map(str::to_string);
        }
        let _ = field.bytes().await;
    }

    if !state.authorized(&headers) {
        return unauthorized();
    }
    let Some(file_name) = file_name else {
        return error(StatusCode::BAD_REQUEST, "avatar field is required");
    };

    state.avatar_files.lock().unwrap().push(file_name.clone());
    Json(
        state
            .user
            .with_avatar(format!("https://cdn.bazaar.test/avatars/{}", file_name)),
    )
    .into_response()
}
