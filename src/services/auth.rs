//! Login and logout

use crate::{
    api::auth::AuthApi,
    error::{AppError, AppResult},
    models::Principal,
    session::{SessionStorage, SessionStore},
};

const EMPTY_FIELDS: &str = "Por favor, preencha todos os campos.";

#[derive(Clone, Debug)]
pub struct AuthService {
    api: AuthApi,
}

impl AuthService {
    pub fn new(api: AuthApi) -> Self {
        Self { api }
    }

    /// Authenticate, store the principal in the session and send its token
    /// from now on. Blank credentials are rejected without contacting the
    /// backend.
    pub async fn login<S: SessionStorage>(
        &self,
        session: &mut SessionStore<S>,
        username: &str,
        password: &str,
    ) -> AppResult<Principal> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AppError::Validation(EMPTY_FIELDS.to_string()));
        }

        let principal = self.api.login(username.trim(), password).await?;
        session.set_principal(principal.clone())?;
        self.api.set_token(Some(&principal.token));
        tracing::info!(username = %principal.username, "Logged in");
        Ok(principal)
    }

    /// Forget the principal; later requests carry no token
    pub fn logout<S: SessionStorage>(&self, session: &mut SessionStore<S>) -> AppResult<()> {
        self.api.set_token(None);
        session.clear()
    }
}
