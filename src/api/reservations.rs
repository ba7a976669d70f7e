//! Reservation endpoints (`/reservas`)

use reqwest::Method;

use super::ApiClient;
use crate::{error::AppResult, models::reservation::Reservation};

#[derive(Clone, Debug)]
pub struct ReservationsApi {
    client: ApiClient,
}

impl ReservationsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Every reservation. The backend answers 404 when there are none,
    /// which is an empty list here.
    pub async fn list_all(&self) -> AppResult<Vec<Reservation>> {
        match self
            .client
            .get_json(&["reservas"], "Erro ao listar reservas")
            .await
        {
            Err(e) if e.is_not_found() => {
                tracing::debug!("No reservations registered");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Reservations held by `username`; 404 means the user has none.
    pub async fn by_username(&self, username: &str) -> AppResult<Vec<Reservation>> {
        match self
            .client
            .get_json(
                &["reservas", "username", username],
                "Erro ao carregar reservas para o usuário.",
            )
            .await
        {
            Err(e) if e.is_not_found() => {
                tracing::debug!(username, "No reservations for user");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    pub async fn by_id(&self, id: i64) -> AppResult<Reservation> {
        self.client
            .get_json(
                &["reservas", "id", &id.to_string()],
                "Erro desconhecido ao carregar reservas.",
            )
            .await
    }

    pub async fn overdue(&self) -> AppResult<Vec<Reservation>> {
        self.client
            .get_json(&["reservas", "atrasadas"], "Erro ao listar reservas atrasadas")
            .await
    }

    pub async fn create(&self, isbn: &str, username: &str) -> AppResult<String> {
        self.client
            .message(
                Method::POST,
                &["reservas", "realizar"],
                &[("isbn", isbn), ("username", username)],
                "Erro ao realizar reserva",
            )
            .await
    }

    pub async fn delete(&self, id: i64) -> AppResult<String> {
        let fallback = format!("Erro ao deletar reserva {}", id);
        self.client
            .message(Method::DELETE, &["reservas", &id.to_string()], &[], &fallback)
            .await
    }

    /// Turn a reservation into a loan on the backend
    pub async fn convert_to_loan(&self, id: i64) -> AppResult<String> {
        let fallback = format!("Erro ao transformar a reserva {} em empréstimo", id);
        self.client
            .message(
                Method::POST,
                &["reservas", "transformar", &id.to_string()],
                &[],
                &fallback,
            )
            .await
    }
}
