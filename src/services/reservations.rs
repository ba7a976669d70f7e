//! Reservation pages

use crate::{
    api::reservations::ReservationsApi,
    error::AppResult,
    listing::ListView,
    models::Reservation,
    session::{SessionStorage, SessionStore},
};

/// Staff reservation page: every reservation, convertible into a loan
pub struct ReservationsService {
    api: ReservationsApi,
    list: ListView<Reservation>,
}

impl ReservationsService {
    pub fn new(api: ReservationsApi, page_size: usize) -> Self {
        Self {
            api,
            list: ListView::new(page_size),
        }
    }

    pub fn list(&self) -> &ListView<Reservation> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListView<Reservation> {
        &mut self.list
    }

    pub async fn load(&mut self) -> bool {
        let api = &self.api;
        self.list.load(api.list_all()).await
    }

    /// Only the reservations past their expiry date
    pub async fn load_overdue(&mut self) -> bool {
        let api = &self.api;
        self.list.load(api.overdue()).await
    }

    pub fn filter(&mut self, query: &str) {
        self.list.filter(query, None);
    }

    pub async fn detail(&self, id: i64) -> AppResult<Reservation> {
        self.api.by_id(id).await
    }

    pub async fn reserve(&self, isbn: &str, username: &str) -> AppResult<String> {
        let message = self.api.create(isbn, username).await?;
        tracing::info!(isbn, username, "Reservation created");
        Ok(message)
    }

    /// Turn a reservation into a loan; the reservation leaves the list
    pub async fn convert(&mut self, id: i64) -> AppResult<String> {
        let message = self.api.convert_to_loan(id).await?;
        self.list.remove_item(|r| r.id == id);
        tracing::info!(reservation_id = id, "Reservation converted to loan");
        Ok(message)
    }

    pub async fn delete(&mut self, id: i64) -> AppResult<String> {
        let message = self.api.delete(id).await?;
        self.list.remove_item(|r| r.id == id);
        tracing::info!(reservation_id = id, "Reservation deleted");
        Ok(message)
    }
}

/// Patron reservation page: the session user's reservations
pub struct PatronReservationsService {
    api: ReservationsApi,
    list: ListView<Reservation>,
}

impl PatronReservationsService {
    pub fn new(api: ReservationsApi, page_size: usize) -> Self {
        Self {
            api,
            list: ListView::new(page_size),
        }
    }

    pub fn list(&self) -> &ListView<Reservation> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListView<Reservation> {
        &mut self.list
    }

    /// A user without reservations gets an empty, non-error list
    pub async fn load<S: SessionStorage>(&mut self, session: &SessionStore<S>) -> bool {
        let api = &self.api;
        let username = session.require_username().map(str::to_string);
        self.list
            .load(async move { api.by_username(&username?).await })
            .await
    }

    pub fn filter(&mut self, query: &str) {
        self.list.filter(query, None);
    }

    pub async fn reserve<S: SessionStorage>(
        &self,
        session: &SessionStore<S>,
        isbn: &str,
    ) -> AppResult<String> {
        let username = session.require_username()?;
        let message = self.api.create(isbn, username).await?;
        tracing::info!(isbn, username, "Reservation created");
        Ok(message)
    }

    pub async fn cancel(&mut self, id: i64) -> AppResult<String> {
        let message = self.api.delete(id).await?;
        self.list.remove_item(|r| r.id == id);
        Ok(message)
    }
}
