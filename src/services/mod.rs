//! View controllers: one per page, composing the API facades with a
//! [`ListView`](crate::listing::ListView) and, where needed, the session

pub mod auth;
pub mod catalog;
pub mod loans;
pub mod reservations;
pub mod users;

use crate::{api::Api, config::PaginationConfig};

/// Container for all services
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
    pub patron_loans: loans::PatronLoansService,
    pub reservations: reservations::ReservationsService,
    pub patron_reservations: reservations::PatronReservationsService,
    pub users: users::UsersService,
}

impl Services {
    /// Create all services over the given API facades
    pub fn new(api: &Api, pages: &PaginationConfig) -> Self {
        Self {
            auth: auth::AuthService::new(api.auth.clone()),
            catalog: catalog::CatalogService::new(api.books.clone(), pages.books_per_page),
            loans: loans::LoansService::new(
                api.loans.clone(),
                api.books.clone(),
                pages.staff_loans_per_page,
            ),
            patron_loans: loans::PatronLoansService::new(
                api.loans.clone(),
                api.books.clone(),
                pages.patron_loans_per_page,
            ),
            reservations: reservations::ReservationsService::new(
                api.reservations.clone(),
                pages.reservations_per_page,
            ),
            patron_reservations: reservations::PatronReservationsService::new(
                api.reservations.clone(),
                pages.reservations_per_page,
            ),
            users: users::UsersService::new(api.users.clone(), pages.users_per_page),
        }
    }
}
