//! HTTP client for the marketplace REST API
//!
//! Every authenticated request carries the stored bearer token. When the
//! backend answers 401, the request waits on a single refresh gate: the first
//! waiter refreshes the token pair, the rest find the new token already stored
//! and replay with it. If the refresh fails the session is dropped, a
//! `SessionEvent::Expired` is broadcast, and all waiters fail with
//! `ApiError::SessionExpired`. Each request is replayed at most once.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, Mutex};

use crate::adapters::storage::SessionStore;
use crate::domain::entities::{AuthTokens, ImageUpload, SessionEvent};
use crate::error::ApiError;

const EVENT_CAPACITY: usize = 16;

pub struct ApiClient {
    http: Client,
    base_url: String,
    session: SessionStore,
    /// Held while a token refresh is in flight
    refresh_gate: Mutex<()>,
    events: broadcast::Sender<SessionEvent>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration, session: SessionStore) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            refresh_gate: Mutex::new(()),
            events,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub(crate) fn notify(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // --- Unauthenticated calls (never trigger a refresh) ---

    pub async fn post_public<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        tracing::debug!(path, "POST (public)");
        let response = self.http.post(self.url(path)).json(body).send().await?;
        handle_response(response).await
    }

    // --- Authenticated calls ---

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!(path, "GET");
        let response = self.send(|http| Ok(http.get(&url))).await?;
        handle_response(response).await
    }

    pub async fn get_query<Q: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!(path, "GET");
        let response = self.send(|http| Ok(http.get(&url).query(query))).await?;
        handle_response(response).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!(path, "POST");
        let response = self.send(|http| Ok(http.post(&url).json(body))).await?;
        handle_response(response).await
    }

    /// POST without a response body
    pub async fn post_empty<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let url = self.url(path);
        tracing::debug!(path, "POST");
        let response = self.send(|http| Ok(http.post(&url).json(body))).await?;
        handle_empty_response(response).await
    }

    pub async fn patch<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!(path, "PATCH");
        let response = self.send(|http| Ok(http.patch(&url).json(body))).await?;
        handle_response(response).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!(path, "PUT");
        let response = self.send(|http| Ok(http.put(&url).json(body))).await?;
        handle_response(response).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url(path);
        tracing::debug!(path, "DELETE");
        let response = self.send(|http| Ok(http.delete(&url))).await?;
        handle_empty_response(response).await
    }

    /// Multipart upload; every image is sent under the same form field
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        field: &str,
        images: &[ImageUpload],
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!(path, count = images.len(), "POST (multipart)");
        let response = self
            .send(|http| {
                // Forms are single-use streams, so a replay rebuilds it
                let mut form = Form::new();
                for image in images {
                    let part = Part::bytes(image.bytes.clone())
                        .file_name(image.file_name.clone())
                        .mime_str(&image.content_type)?;
                    form = form.part(field.to_string(), part);
                }
                Ok(http.post(&url).multipart(form))
            })
            .await?;
        handle_response(response).await
    }

    // --- Token handling ---

    async fn send<F>(&self, build: F) -> Result<Response, ApiError>
    where
        F: Fn(&Client) -> Result<RequestBuilder, ApiError>,
    {
        let token = self.session.access_token().await?;
        let response = authorize(build(&self.http)?, token.as_deref())
            .send()
            .await?;

        let Some(rejected) = token else {
            return Ok(response);
        };
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        tracing::debug!(url = %response.url(), "Access token rejected");
        let fresh = self.refresh_after_rejection(&rejected).await?;
        let replayed = authorize(build(&self.http)?, Some(&fresh)).send().await?;
        Ok(replayed)
    }

    async fn refresh_after_rejection(&self, rejected: &str) -> Result<String, ApiError> {
        let _gate = self.refresh_gate.lock().await;

        let Some(tokens) = self.session.tokens().await? else {
            // Signed out (or a refresh failed) while we were waiting
            return Err(ApiError::SessionExpired);
        };
        if tokens.access_token != rejected {
            return Ok(tokens.access_token);
        }

        match self.refresh(&tokens).await {
            Ok(fresh) => {
                self.session.save_tokens(&fresh).await?;
                tracing::info!("Access token refreshed");
                Ok(fresh.access_token)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh failed, signing out");
                if let Err(e) = self.session.clear().await {
                    tracing::error!(error = %e, "Failed to clear the expired session");
                }
                self.notify(SessionEvent::Expired);
                Err(ApiError::SessionExpired)
            }
        }
    }

    async fn refresh(&self, current: &AuthTokens) -> Result<AuthTokens, ApiError> {
        let response: RefreshResponse = self
            .post_public(
                "/auth/refresh",
                &RefreshRequest {
                    refresh_token: &current.refresh_token,
                },
            )
            .await?;

        Ok(AuthTokens {
            access_token: response.access_token,
            // Servers that don't rotate refresh tokens omit it
            refresh_token: response
                .refresh_token
                .unwrap_or_else(|| current.refresh_token.clone()),
            expires_at: response.expires_at,
        })
    }
}

fn authorize(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();

    if status.is_success() {
        response
            .json()
            .await
            .map_err(|e| ApiError::Deserialization(e.to_string()))
    } else {
        Err(error_from(status, response).await)
    }
}

async fn handle_empty_response(response: Response) -> Result<(), ApiError> {
    let status = response.status();

    if status.is_success() {
        Ok(())
    } else {
        Err(error_from(status, response).await)
    }
}

async fn error_from(status: StatusCode, response: Response) -> ApiError {
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string()
    });

    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized(message),
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited,
        _ => ApiError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

/// Pull a readable message out of an error body (`{"message": ...}`,
/// `{"error": ...}`, or plain text)
fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.message.or(parsed.error),
        Err(_) => Some(body.to_string()),
    }
}

// --- Wire Types ---

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}
