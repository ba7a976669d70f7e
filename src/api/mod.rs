//! REST client for the Biblioteca backend
//!
//! One [`ApiClient`] (base URL, fixed timeout, JSON) shared by the resource
//! facades. Clones share the bearer token, so a login or logout seen through
//! one facade applies to every other one. Every failed call is converted into
//! an [`AppError`] whose message prefers the backend's own text over the
//! per-call fallback.

pub mod auth;
pub mod books;
pub mod loans;
pub mod reservations;
pub mod users;

use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::{Arc, RwLock};

use crate::{
    config::ApiConfig,
    error::{AppError, AppResult},
};

/// HTTP client bound to one backend
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| AppError::Validation(format!("Invalid API base URL {}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Validation(format!(
                "Invalid API base URL {}",
                config.base_url
            )));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let http = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| AppError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            token: Arc::default(),
        })
    }

    /// Send `Authorization: Bearer <token>` on every later call, from this
    /// client and all its clones. `None` or an empty token stops sending it.
    pub fn set_token(&self, token: Option<&str>) {
        let token = token.filter(|t| !t.is_empty()).map(str::to_string);
        // a poisoned lock still holds a consistent Option
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = token;
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `{base}/{segments...}`; each segment is percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        tracing::debug!("{} {}", method, url.path());
        let builder = self.http.request(method, url);
        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send and turn any non-success status into [`AppError::Backend`]
    async fn execute(&self, builder: RequestBuilder, fallback: &str) -> AppResult<Response> {
        let response = builder.send().await.map_err(|e| {
            tracing::error!("Request failed without response: {}", e);
            AppError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = AppError::from_response(status, &body, fallback);
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "Backend error: {}", err.user_message());
        } else {
            tracing::warn!(status = status.as_u16(), "Backend rejected request: {}", err.user_message());
        }
        Err(err)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        fallback: &str,
    ) -> AppResult<T> {
        let response = self.execute(self.request(Method::GET, segments), fallback).await?;
        decode_json(response).await
    }

    pub(crate) async fn send_json<B, T>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
        fallback: &str,
    ) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(method, segments).json(body);
        let response = self.execute(builder, fallback).await?;
        decode_json(response).await
    }

    /// Call an endpoint answering with a plain message. `None` for 204.
    pub(crate) async fn send_for_message<B>(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, &str)],
        body: Option<&B>,
        fallback: &str,
    ) -> AppResult<Option<String>>
    where
        B: Serialize + ?Sized,
    {
        let mut builder = self.request(method, segments);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = self.execute(builder, fallback).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let text = response.text().await?;
        Ok(Some(message_text(&text)))
    }

    /// Same as [`send_for_message`](Self::send_for_message) with an empty
    /// body, treating 204 as an empty message
    pub(crate) async fn message(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, &str)],
        fallback: &str,
    ) -> AppResult<String> {
        Ok(self
            .send_for_message::<Value>(method, segments, query, None, fallback)
            .await?
            .unwrap_or_default())
    }
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> AppResult<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| AppError::Decode(e.to_string()))
}

/// Success bodies are either plain text or a JSON-encoded string
fn message_text(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::String(s)) => s,
        Ok(Value::Object(map)) => map
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string()),
        _ => body.trim().to_string(),
    }
}

/// All resource facades over one client
#[derive(Clone, Debug)]
pub struct Api {
    pub auth: auth::AuthApi,
    pub books: books::BooksApi,
    pub loans: loans::LoansApi,
    pub reservations: reservations::ReservationsApi,
    pub users: users::UsersApi,
}

impl Api {
    pub fn new(client: ApiClient) -> Self {
        Self {
            auth: auth::AuthApi::new(client.clone()),
            books: books::BooksApi::new(client.clone()),
            loans: loans::LoansApi::new(client.clone()),
            reservations: reservations::ReservationsApi::new(client.clone()),
            users: users::UsersApi::new(client),
        }
    }
}
