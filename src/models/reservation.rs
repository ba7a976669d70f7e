//! Reservation (reserva) model

use serde::{Deserialize, Serialize};

use super::book::Book;
use super::user::User;
use crate::listing::Listable;

/// Reservation record as returned by `/reservas`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Reservation {
    pub id: i64,
    #[serde(rename = "livro", default)]
    pub book: Option<Book>,
    #[serde(rename = "usuario", default)]
    pub user: Option<User>,
    #[serde(rename = "dataReserva", default)]
    pub reserved_on: Option<String>,
    #[serde(rename = "dataExpiracao", default)]
    pub expires_on: Option<String>,
}

impl Reservation {
    pub fn book_title(&self) -> &str {
        self.book.as_ref().map(|b| b.title.as_str()).unwrap_or("")
    }

    pub fn holder_name(&self) -> &str {
        self.user.as_ref().map(|u| u.name.as_str()).unwrap_or("")
    }
}

impl Listable for Reservation {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.book_title(), self.holder_name()]
    }
}
