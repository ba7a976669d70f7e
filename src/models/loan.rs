//! Loan (empréstimo) model and related types

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::book::Book;
use super::user::User;
use crate::listing::Listable;

/// Loan record as returned by `/emprestimos`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Loan {
    pub id: i64,
    #[serde(rename = "livro", default)]
    pub book: Option<Book>,
    #[serde(rename = "usuario", default)]
    pub user: Option<User>,
    #[serde(rename = "dataEmprestimo", default)]
    pub borrowed_on: Option<String>,
    #[serde(rename = "dataDevolucaoPrevista", default)]
    pub due_on: Option<String>,
    #[serde(rename = "dataDevolucaoEfetiva", default)]
    pub returned_on: Option<String>,
    #[serde(rename = "emprestimoFisico", default)]
    pub physical: bool,
    #[serde(rename = "emprestimoDigital", default)]
    pub digital: bool,
    #[serde(rename = "emprestimoAtivo", default)]
    pub active: bool,
    #[serde(rename = "atrasado", default)]
    pub overdue: bool,
}

/// Derived loan status shown in lists and matched by the status filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanStatus {
    Active,
    Overdue,
    Finished,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "Ativo",
            LoanStatus::Overdue => "Atrasado",
            LoanStatus::Finished => "Finalizado",
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Physical copy or digital license
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanKind {
    Physical,
    Digital,
}

impl LoanKind {
    /// Path segment used by `POST /emprestimos/realizar/{kind}`
    pub fn path_segment(&self) -> &'static str {
        match self {
            LoanKind::Physical => "fisico",
            LoanKind::Digital => "digital",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoanKind::Physical => "Físico",
            LoanKind::Digital => "Digital",
        }
    }
}

impl std::str::FromStr for LoanKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fisico" | "físico" | "physical" => Ok(LoanKind::Physical),
            "digital" => Ok(LoanKind::Digital),
            _ => Err(format!("Invalid loan kind: {}", s)),
        }
    }
}

impl Loan {
    /// Not active → Finalizado; else overdue → Atrasado; else Ativo
    pub fn status(&self) -> LoanStatus {
        if !self.active {
            LoanStatus::Finished
        } else if self.overdue {
            LoanStatus::Overdue
        } else {
            LoanStatus::Active
        }
    }

    pub fn kind(&self) -> LoanKind {
        if self.physical {
            LoanKind::Physical
        } else {
            LoanKind::Digital
        }
    }

    pub fn book_title(&self) -> &str {
        self.book.as_ref().map(|b| b.title.as_str()).unwrap_or("")
    }

    pub fn borrower_name(&self) -> &str {
        self.user.as_ref().map(|u| u.name.as_str()).unwrap_or("")
    }

    pub fn borrowed_at(&self) -> Option<NaiveDateTime> {
        self.borrowed_on.as_deref().and_then(parse_backend_date)
    }
}

impl Listable for Loan {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.book_title(), self.borrower_name()]
    }

    fn status_label(&self) -> Option<&'static str> {
        Some(self.status().as_str())
    }
}

/// Active loans before inactive ones; backend order kept within each group
pub fn active_first(a: &Loan, b: &Loan) -> Ordering {
    b.active.cmp(&a.active)
}

/// Active loans first, then most recently borrowed first within each group
pub fn active_first_newest(a: &Loan, b: &Loan) -> Ordering {
    active_first(a, b).then_with(|| b.borrowed_at().cmp(&a.borrowed_at()))
}

/// Parse the date shapes the backend emits: `2024-05-01`,
/// `2024-05-01T10:00:00[.fff]` or a full RFC 3339 timestamp.
pub fn parse_backend_date(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
