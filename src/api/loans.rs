//! Loan endpoints (`/emprestimos`)

use reqwest::Method;

use super::ApiClient;
use crate::{
    error::AppResult,
    models::loan::{Loan, LoanKind},
};

#[derive(Clone, Debug)]
pub struct LoansApi {
    client: ApiClient,
}

impl LoansApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_all(&self) -> AppResult<Vec<Loan>> {
        self.client
            .get_json(&["emprestimos"], "Erro ao carregar empréstimos")
            .await
    }

    pub async fn by_username(&self, username: &str) -> AppResult<Vec<Loan>> {
        self.client
            .get_json(
                &["emprestimos", "username", username],
                "Erro ao listar empréstimos por username",
            )
            .await
    }

    pub async fn by_id(&self, id: i64) -> AppResult<Loan> {
        self.client
            .get_json(&["emprestimos", "id", &id.to_string()], "Erro ao buscar empréstimo por ID")
            .await
    }

    pub async fn physical(&self) -> AppResult<Vec<Loan>> {
        self.client
            .get_json(&["emprestimos", "fisico"], "Erro ao listar empréstimos físicos")
            .await
    }

    pub async fn digital(&self) -> AppResult<Vec<Loan>> {
        self.client
            .get_json(&["emprestimos", "digital"], "Erro ao listar empréstimos digitais")
            .await
    }

    pub async fn overdue(&self) -> AppResult<Vec<Loan>> {
        self.client
            .get_json(&["emprestimos", "atrasados"], "Erro ao listar empréstimos atrasados")
            .await
    }

    pub async fn active(&self) -> AppResult<Vec<Loan>> {
        self.client
            .get_json(&["emprestimos", "ativos"], "Erro ao listar empréstimos ativos")
            .await
    }

    pub async fn finished(&self) -> AppResult<Vec<Loan>> {
        self.client
            .get_json(&["emprestimos", "finalizados"], "Erro ao listar empréstimos finalizados")
            .await
    }

    /// Lend `isbn` to `username`; returns the message carrying the loan ID
    pub async fn create(&self, kind: LoanKind, isbn: &str, username: &str) -> AppResult<String> {
        let fallback = match kind {
            LoanKind::Physical => "Erro ao realizar empréstimo físico",
            LoanKind::Digital => "Erro ao realizar empréstimo digital",
        };
        self.client
            .message(
                Method::POST,
                &["emprestimos", "realizar", kind.path_segment()],
                &[("isbn", isbn), ("username", username)],
                fallback,
            )
            .await
    }

    pub async fn return_loan(&self, id: i64) -> AppResult<String> {
        self.client
            .message(
                Method::PUT,
                &["emprestimos", "devolver", &id.to_string()],
                &[],
                "Erro ao devolver o empréstimo",
            )
            .await
    }

    /// Delete finished loans older than `years`. `None` means the backend
    /// answered 204: nothing old enough to delete.
    pub async fn delete_older_than(&self, years: u32) -> AppResult<Option<String>> {
        self.client
            .send_for_message::<()>(
                Method::DELETE,
                &["emprestimos", "anos", &years.to_string()],
                &[],
                None,
                "Erro ao excluir empréstimos antigos",
            )
            .await
    }
}
