//! Book (livro) catalog record and the create/edit form

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use crate::listing::Listable;

/// Book record as returned by `/livros`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Book {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "titulo", default)]
    pub title: String,
    #[serde(rename = "autor", default)]
    pub author: String,
    #[serde(rename = "categoria", default)]
    pub category: String,
    #[serde(rename = "quantidadeEstoque", default)]
    pub stock: i32,
    #[serde(default)]
    pub isbn: String,
    /// Cover image, base64 data URL
    #[serde(rename = "capa", default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(rename = "livroFisico", default)]
    pub physical: bool,
    #[serde(rename = "livroDigital", default)]
    pub digital: bool,
    #[serde(rename = "quantidadeLicencas", default)]
    pub licenses: i32,
    #[serde(rename = "descricao", default)]
    pub description: String,
    #[serde(rename = "disponivelParaEmprestimo", default)]
    pub available: bool,
}

/// Availability label used by the staff catalog status filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookStatus {
    Available,
    Unavailable,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "Disponível",
            BookStatus::Unavailable => "Indisponível",
        }
    }
}

impl std::fmt::Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Book {
    pub fn status(&self) -> BookStatus {
        if self.available {
            BookStatus::Available
        } else {
            BookStatus::Unavailable
        }
    }

    /// Whether a digital loan can be issued client-side
    pub fn has_free_license(&self) -> bool {
        self.digital && self.licenses > 0
    }
}

impl Listable for Book {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.author.as_str(), self.category.as_str()]
    }

    fn status_label(&self) -> Option<&'static str> {
        Some(self.status().as_str())
    }
}

/// Book create/edit form
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[validate(schema(function = "validate_licenses", skip_on_field_errors = false))]
pub struct BookForm {
    #[serde(rename = "titulo")]
    #[validate(length(min = 1, message = "Título é obrigatório."))]
    pub title: String,
    #[serde(rename = "autor")]
    #[validate(length(min = 1, message = "Autor é obrigatório."))]
    pub author: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "quantidadeEstoque")]
    #[validate(range(min = 0, message = "Quantidade em estoque inválida."))]
    pub stock: i32,
    #[validate(length(min = 1, message = "ISBN é obrigatório."))]
    pub isbn: String,
    #[serde(rename = "capa", skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(rename = "livroFisico")]
    pub physical: bool,
    #[serde(rename = "livroDigital")]
    pub digital: bool,
    #[serde(rename = "quantidadeLicencas")]
    pub licenses: i32,
    #[serde(rename = "descricao")]
    pub description: String,
}

fn validate_licenses(form: &BookForm) -> Result<(), ValidationError> {
    if form.digital && form.licenses <= 0 {
        let mut err = ValidationError::new("licenses");
        err.message = Some(Cow::from(
            "Por favor, insira uma quantidade de licenças válida para livros digitais.",
        ));
        return Err(err);
    }
    Ok(())
}

impl BookForm {
    /// Pre-fill the edit form from an existing record
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            category: book.category.clone(),
            stock: book.stock,
            isbn: book.isbn.clone(),
            cover: book.cover.clone(),
            physical: book.physical,
            digital: book.digital,
            licenses: book.licenses,
            description: book.description.clone(),
        }
    }

    /// Apply the submitted form onto the locally held record
    pub fn apply_to(&self, book: &mut Book) {
        book.title = self.title.clone();
        book.author = self.author.clone();
        book.category = self.category.clone();
        book.stock = self.stock;
        book.isbn = self.isbn.clone();
        if self.cover.is_some() {
            book.cover = self.cover.clone();
        }
        book.physical = self.physical;
        book.digital = self.digital;
        book.licenses = self.licenses;
        book.description = self.description.clone();
    }
}
