//! Login endpoint

use reqwest::Method;

use super::ApiClient;
use crate::{error::AppResult, models::user::Principal};

#[derive(Clone, Debug)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `POST /login?username=..&senha=..`; the response body is the principal
    pub async fn login(&self, username: &str, password: &str) -> AppResult<Principal> {
        let builder = self
            .client
            .request(Method::POST, &["login"])
            .query(&[("username", username), ("senha", password)]);
        let response = self.client.execute(builder, "Erro ao fazer login.").await?;
        super::decode_json(response).await
    }

    /// Token sent by every facade built over the same client
    pub fn set_token(&self, token: Option<&str>) {
        self.client.set_token(token);
    }
}
