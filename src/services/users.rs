//! User management page and the self-service profile

use std::str::FromStr;

use crate::{
    api::users::UsersApi,
    error::{AppError, AppResult},
    listing::ListView,
    models::{validate_form, ProfileForm, User, UserForm},
    session::{SessionStorage, SessionStore},
};

/// Backend-side search criterion of the users page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserSearch {
    Name,
    Cpf,
}

impl FromStr for UserSearch {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nome" | "name" => Ok(UserSearch::Name),
            "cpf" => Ok(UserSearch::Cpf),
            other => Err(AppError::Validation(format!("Campo de busca inválido: {}", other))),
        }
    }
}

pub struct UsersService {
    api: UsersApi,
    list: ListView<User>,
}

impl UsersService {
    pub fn new(api: UsersApi, page_size: usize) -> Self {
        Self {
            api,
            list: ListView::new(page_size),
        }
    }

    pub fn list(&self) -> &ListView<User> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListView<User> {
        &mut self.list
    }

    pub async fn load(&mut self) -> bool {
        let api = &self.api;
        self.list.load(api.list_all()).await
    }

    /// Replace the collection with a backend search. A blank query lists
    /// every user.
    pub async fn search(&mut self, field: UserSearch, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return self.load().await;
        }

        let api = &self.api;
        let fetch = async move {
            match field {
                UserSearch::Name => api.by_name(query).await,
                UserSearch::Cpf => api.by_cpf(query).await,
            }
        };
        self.list.load(fetch).await
    }

    /// Text query over name, username, e-mail and CPF; status is
    /// `Ativo` / `Inativo`
    pub fn filter(&mut self, query: &str, status: Option<&str>) {
        self.list.filter(query, status);
    }

    /// Register a user. Masks are applied to CPF and phone before sending.
    pub async fn create(&self, form: UserForm) -> AppResult<String> {
        validate_form(&form)?;
        form.require_password()?;
        let form = form.normalized();

        let message = self.api.create(&form).await?;
        tracing::info!(username = %form.username, "User created");
        Ok(message)
    }

    /// The loaded record for `username`, fetched when it is not in the list
    pub async fn find(&self, username: &str) -> AppResult<User> {
        match self.list.items().iter().find(|u| u.username == username) {
            Some(user) => Ok(user.clone()),
            None => self.api.by_username(username).await,
        }
    }

    /// Staff edit of `username`
    pub async fn update(&mut self, username: &str, form: &UserForm) -> AppResult<User> {
        validate_form(form)?;

        let mut user = self.find(username).await?;
        form.apply_to(&mut user);

        let saved = self.api.update(username, &user).await?;
        self.list.replace_item(|u| u.username == username, &saved);
        tracing::info!(username, "User updated");
        Ok(saved)
    }

    pub async fn delete(&mut self, username: &str) -> AppResult<String> {
        let message = self.api.delete(username).await?;
        self.list.remove_item(|u| u.username == username);
        tracing::info!(username, "User deleted");
        Ok(message)
    }

    /// Self-service profile edit for the session user
    pub async fn update_profile<S: SessionStorage>(
        &self,
        session: &SessionStore<S>,
        form: &ProfileForm,
    ) -> AppResult<User> {
        let username = session.require_username()?;
        validate_form(form)?;

        let current = self.api.by_username(username).await?;
        let updated = form.merged_into(&current);
        let saved = self.api.update(username, &updated).await?;
        tracing::info!(username, "Profile updated");
        Ok(saved)
    }
}
