//! Error types for the Biblioteca client

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Message shown when no response was received from the backend
pub const NETWORK_FAILURE: &str = "Erro de rede ou servidor";

/// Message shown when an operation needs an authenticated principal
pub const NOT_AUTHENTICATED: &str = "Usuário não autenticado. Por favor, faça login.";

/// Main client error type
#[derive(Error, Debug)]
pub enum AppError {
    /// No response received (connection refused, DNS, timeout)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Backend answered with a non-success status
    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    /// Client-side validation failure, raised before any request is issued
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not authenticated")]
    Unauthenticated,

    /// Durable session storage could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// A successful response whose body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),
}

impl AppError {
    /// Build a backend error from a response status and raw body, preferring
    /// the backend's own message text over `fallback`.
    pub fn from_response(status: StatusCode, body: &str, fallback: &str) -> Self {
        AppError::Backend {
            status: status.as_u16(),
            message: extract_message(body).unwrap_or_else(|| fallback.to_string()),
        }
    }

    /// Single display-ready message for this error
    pub fn user_message(&self) -> String {
        match self {
            AppError::Transport(_) => NETWORK_FAILURE.to_string(),
            AppError::Backend { message, .. } => message.clone(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Unauthenticated => NOT_AUTHENTICATED.to_string(),
            AppError::Storage(msg) => msg.clone(),
            AppError::Decode(_) => "Resposta inesperada do servidor.".to_string(),
        }
    }

    /// HTTP status of a backend-reported error
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            AppError::Decode(e.to_string())
        } else {
            AppError::Transport(e.to_string())
        }
    }
}

/// Pull a human-readable message out of an error body.
///
/// Accepts `{"message": "..."}`, a bare JSON string, or non-empty plain text.
pub fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => map
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.trim().is_empty())
            .map(str::to_string),
        Ok(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Ok(Value::String(_)) | Ok(Value::Null) => None,
        Ok(other) => Some(other.to_string()),
        Err(_) => Some(trimmed.to_string()),
    }
}

/// Result type alias for client operations
pub type AppResult<T> = Result<T, AppError>;
