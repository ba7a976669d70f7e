//! Book catalog: the staff catalog page and the patron search page

use std::str::FromStr;

use crate::{
    api::books::BooksApi,
    error::{AppError, AppResult},
    listing::ListView,
    models::{validate_form, Book, BookForm},
};

/// Backend-side search criterion of the patron catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Author,
    Category,
}

impl FromStr for SearchField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "titulo" | "title" => Ok(SearchField::Title),
            "autor" | "author" => Ok(SearchField::Author),
            "categoria" | "category" => Ok(SearchField::Category),
            other => Err(AppError::Validation(format!("Campo de busca inválido: {}", other))),
        }
    }
}

pub struct CatalogService {
    api: BooksApi,
    list: ListView<Book>,
}

impl CatalogService {
    pub fn new(api: BooksApi, page_size: usize) -> Self {
        Self {
            api,
            list: ListView::new(page_size),
        }
    }

    pub fn list(&self) -> &ListView<Book> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListView<Book> {
        &mut self.list
    }

    pub async fn load(&mut self) -> bool {
        let api = &self.api;
        self.list.load(api.list_all()).await
    }

    /// Replace the collection with a backend search. A blank query lists
    /// the whole catalog.
    pub async fn search(&mut self, field: SearchField, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return self.load().await;
        }

        let api = &self.api;
        let fetch = async move {
            match field {
                SearchField::Title => api.by_title(query).await,
                SearchField::Author => api.by_author(query).await,
                SearchField::Category => api.by_category(query).await,
            }
        };
        self.list.load(fetch).await
    }

    pub fn filter(&mut self, query: &str, status: Option<&str>) {
        self.list.filter(query, status);
    }

    pub async fn detail(&self, isbn: &str) -> AppResult<Book> {
        self.api.by_isbn(isbn).await
    }

    pub async fn create(&self, form: &BookForm) -> AppResult<String> {
        validate_form(form)?;
        let message = self.api.create(form).await?;
        tracing::info!(isbn = %form.isbn, "Book created");
        Ok(message)
    }

    /// Save an edited book and patch the loaded copy in place
    pub async fn update(&mut self, isbn: &str, form: &BookForm) -> AppResult<String> {
        validate_form(form)?;
        let message = self.api.update(isbn, form).await?;

        let edited = self.list.items().iter().find(|b| b.isbn == isbn).cloned();
        if let Some(mut book) = edited {
            form.apply_to(&mut book);
            self.list.replace_item(|b| b.isbn == isbn, &book);
        }
        tracing::info!(isbn, "Book updated");
        Ok(message)
    }

    pub async fn delete(&mut self, isbn: &str) -> AppResult<String> {
        let message = self.api.delete(isbn).await?;
        self.list.remove_item(|b| b.isbn == isbn);
        tracing::info!(isbn, "Book deleted");
        Ok(message)
    }
}
