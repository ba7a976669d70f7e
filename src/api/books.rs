//! Book catalog endpoints (`/livros`)

use reqwest::Method;

use super::ApiClient;
use crate::{
    error::AppResult,
    models::book::{Book, BookForm},
};

#[derive(Clone, Debug)]
pub struct BooksApi {
    client: ApiClient,
}

impl BooksApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List the whole catalog
    pub async fn list_all(&self) -> AppResult<Vec<Book>> {
        self.client.get_json(&["livros"], "Erro ao listar livros").await
    }

    pub async fn by_category(&self, category: &str) -> AppResult<Vec<Book>> {
        self.client
            .get_json(&["livros", "categoria", category], "Erro ao listar livros por categoria")
            .await
    }

    pub async fn by_title(&self, title: &str) -> AppResult<Vec<Book>> {
        self.client
            .get_json(&["livros", "titulo", title], "Erro ao listar livros por título")
            .await
    }

    pub async fn by_author(&self, author: &str) -> AppResult<Vec<Book>> {
        self.client
            .get_json(&["livros", "autor", author], "Erro ao listar livros por autor")
            .await
    }

    pub async fn by_isbn(&self, isbn: &str) -> AppResult<Book> {
        self.client
            .get_json(&["livros", "isbn", isbn], "Erro ao listar livros por ISBN")
            .await
    }

    /// Create a book; returns the backend's confirmation message
    pub async fn create(&self, form: &BookForm) -> AppResult<String> {
        Ok(self
            .client
            .send_for_message(Method::POST, &["livros"], &[], Some(form), "Erro ao salvar livro")
            .await?
            .unwrap_or_default())
    }

    pub async fn update(&self, isbn: &str, form: &BookForm) -> AppResult<String> {
        Ok(self
            .client
            .send_for_message(Method::PUT, &["livros", isbn], &[], Some(form), "Erro ao salvar livro")
            .await?
            .unwrap_or_default())
    }

    pub async fn delete(&self, isbn: &str) -> AppResult<String> {
        self.client
            .message(Method::DELETE, &["livros", isbn], &[], "Erro ao remover livros")
            .await
    }
}
