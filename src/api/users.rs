//! User management endpoints (`/usuarios`)

use reqwest::Method;

use super::ApiClient;
use crate::{
    error::AppResult,
    models::user::{User, UserForm},
};

#[derive(Clone, Debug)]
pub struct UsersApi {
    client: ApiClient,
}

impl UsersApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_all(&self) -> AppResult<Vec<User>> {
        self.client
            .get_json(&["usuarios"], "Erro ao carregar usuários")
            .await
    }

    pub async fn by_name(&self, name: &str) -> AppResult<Vec<User>> {
        self.client
            .get_json(&["usuarios", "nome", name], "Erro ao carregar usuários por nome")
            .await
    }

    pub async fn by_username(&self, username: &str) -> AppResult<User> {
        self.client
            .get_json(
                &["usuarios", "username", username],
                "Erro ao carregar usuário por username",
            )
            .await
    }

    pub async fn by_cpf(&self, cpf: &str) -> AppResult<Vec<User>> {
        self.client
            .get_json(&["usuarios", "cpf", cpf], "Erro ao carregar usuários por CPF")
            .await
    }

    pub async fn create(&self, form: &UserForm) -> AppResult<String> {
        Ok(self
            .client
            .send_for_message(Method::POST, &["usuarios"], &[], Some(form), "Erro ao salvar usuário")
            .await?
            .unwrap_or_default())
    }

    /// Replace the record of `username`; the backend echoes the stored user
    pub async fn update(&self, username: &str, user: &User) -> AppResult<User> {
        self.client
            .send_json(Method::PUT, &["usuarios", username], user, "Erro ao atualizar usuário")
            .await
    }

    pub async fn delete(&self, username: &str) -> AppResult<String> {
        self.client
            .message(Method::DELETE, &["usuarios", username], &[], "Erro ao remover usuário")
            .await
    }
}
