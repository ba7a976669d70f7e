//! Biblioteca client
//!
//! Client-side core of the Biblioteca library system: a typed REST client
//! for the backend, a persisted login session, and the list views
//! (filtering, pagination, local removal) behind each page.

pub mod api;
pub mod config;
pub mod error;
pub mod listing;
pub mod models;
pub mod services;
pub mod session;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use api::{Api, ApiClient};
use services::Services;
use session::{SessionStorage, SessionStore};

/// Everything one front-end instance holds: configuration, the session and
/// the page controllers
pub struct App<S: SessionStorage> {
    pub config: AppConfig,
    pub session: SessionStore<S>,
    pub services: Services,
}

impl<S: SessionStorage> App<S> {
    /// Restore the session from `storage` and wire the services. The
    /// current principal's token is sent with every request; `auth` login
    /// and logout keep it in step with the session.
    pub fn new(config: AppConfig, storage: S) -> AppResult<Self> {
        let mut session = SessionStore::new(storage);
        session.initialize();

        let client = ApiClient::new(&config.api)?;
        client.set_token(session.current().map(|p| p.token.as_str()));
        let services = Services::new(&Api::new(client), &config.pagination);

        Ok(Self {
            config,
            session,
            services,
        })
    }
}
