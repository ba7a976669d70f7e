//! Loan pages: staff overview (all loans) and the patron's own loans

use std::str::FromStr;

use crate::{
    api::{books::BooksApi, loans::LoansApi},
    error::{AppError, AppResult},
    listing::ListView,
    models::{
        loan::{active_first, active_first_newest},
        Loan, LoanKind,
    },
    session::{SessionStorage, SessionStore},
};

const NO_LICENSES: &str = "Não há licenças disponíveis para este livro digital.";
const INVALID_YEARS: &str = "Por favor, insira um número de anos válido.";
const NOTHING_TO_PURGE: &str = "Nenhum empréstimo antigo para excluir.";

/// Create a loan. A digital loan is refused up front when the book has no
/// free license.
async fn lend(
    loans: &LoansApi,
    books: &BooksApi,
    kind: LoanKind,
    isbn: &str,
    username: &str,
) -> AppResult<String> {
    if kind == LoanKind::Digital {
        let book = books.by_isbn(isbn).await?;
        if !book.has_free_license() {
            return Err(AppError::Validation(NO_LICENSES.to_string()));
        }
    }

    let message = loans.create(kind, isbn, username).await?;
    tracing::info!(isbn, username, kind = kind.label(), "Loan created");
    Ok(message)
}

/// Backend-side selection of the staff loan page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoanView {
    #[default]
    All,
    Physical,
    Digital,
    Overdue,
    Active,
    Finished,
}

impl FromStr for LoanView {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "todos" | "all" => Ok(LoanView::All),
            "fisico" | "physical" => Ok(LoanView::Physical),
            "digital" => Ok(LoanView::Digital),
            "atrasados" | "overdue" => Ok(LoanView::Overdue),
            "ativos" | "active" => Ok(LoanView::Active),
            "finalizados" | "finished" => Ok(LoanView::Finished),
            other => Err(AppError::Validation(format!("Seleção de empréstimos inválida: {}", other))),
        }
    }
}

/// Staff loan page: every loan, active ones first
pub struct LoansService {
    api: LoansApi,
    books: BooksApi,
    list: ListView<Loan>,
}

impl LoansService {
    pub fn new(api: LoansApi, books: BooksApi, page_size: usize) -> Self {
        Self {
            api,
            books,
            list: ListView::new(page_size).with_order(active_first),
        }
    }

    pub fn list(&self) -> &ListView<Loan> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListView<Loan> {
        &mut self.list
    }

    pub async fn load(&mut self) -> bool {
        let api = &self.api;
        self.list.load(api.list_all()).await
    }

    /// Replace the collection with one of the backend's loan selections
    pub async fn load_view(&mut self, view: LoanView) -> bool {
        let api = &self.api;
        let fetch = async move {
            match view {
                LoanView::All => api.list_all().await,
                LoanView::Physical => api.physical().await,
                LoanView::Digital => api.digital().await,
                LoanView::Overdue => api.overdue().await,
                LoanView::Active => api.active().await,
                LoanView::Finished => api.finished().await,
            }
        };
        self.list.load(fetch).await
    }

    pub fn filter(&mut self, query: &str, status: Option<&str>) {
        self.list.filter(query, status);
    }

    pub async fn detail(&self, id: i64) -> AppResult<Loan> {
        self.api.by_id(id).await
    }

    pub async fn borrow(&self, kind: LoanKind, isbn: &str, username: &str) -> AppResult<String> {
        lend(&self.api, &self.books, kind, isbn, username).await
    }

    /// Mark a loan returned, then reload the list
    pub async fn return_loan(&mut self, id: i64) -> AppResult<String> {
        let message = self.api.return_loan(id).await?;
        tracing::info!(loan_id = id, "Loan returned");
        self.load().await;
        Ok(message)
    }

    /// Delete finished loans older than `years`, then reload the list
    pub async fn purge(&mut self, years: i64) -> AppResult<String> {
        let years = u32::try_from(years)
            .ok()
            .filter(|y| *y > 0)
            .ok_or_else(|| AppError::Validation(INVALID_YEARS.to_string()))?;

        let message = match self.api.delete_older_than(years).await? {
            Some(message) => message,
            None => NOTHING_TO_PURGE.to_string(),
        };
        tracing::info!(years, "Old loans purged");
        self.load().await;
        Ok(message)
    }
}

/// Patron loan page: the current user's loans, active first, newest first
/// within each group
pub struct PatronLoansService {
    api: LoansApi,
    books: BooksApi,
    list: ListView<Loan>,
}

impl PatronLoansService {
    pub fn new(api: LoansApi, books: BooksApi, page_size: usize) -> Self {
        Self {
            api,
            books,
            list: ListView::new(page_size).with_order(active_first_newest),
        }
    }

    pub fn list(&self) -> &ListView<Loan> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListView<Loan> {
        &mut self.list
    }

    /// Load the loans of the session user. Without one the view fails with
    /// the not-authenticated message and no request is sent.
    pub async fn load<S: SessionStorage>(&mut self, session: &SessionStore<S>) -> bool {
        let api = &self.api;
        let username = session.require_username().map(str::to_string);
        self.list
            .load(async move { api.by_username(&username?).await })
            .await
    }

    pub fn filter(&mut self, query: &str, status: Option<&str>) {
        self.list.filter(query, status);
    }

    /// Borrow a book for the session user
    pub async fn borrow<S: SessionStorage>(
        &self,
        session: &SessionStore<S>,
        kind: LoanKind,
        isbn: &str,
    ) -> AppResult<String> {
        let username = session.require_username()?;
        lend(&self.api, &self.books, kind, isbn, username).await
    }
}
