//! Data models for the Biblioteca backend records

pub mod book;
pub mod loan;
pub mod reservation;
pub mod user;

use validator::{Validate, ValidationErrors};

use crate::error::{AppError, AppResult};

// Re-export commonly used types
pub use book::{Book, BookForm, BookStatus};
pub use loan::{Loan, LoanKind, LoanStatus};
pub use reservation::Reservation;
pub use user::{Principal, ProfileForm, User, UserForm, UserStatus, UserType};

/// Run `validator` rules and collapse failures into a single display message.
///
/// Field errors are visited in field-name order so the reported message is
/// stable; struct-level (schema) errors come last.
pub fn validate_form<T: Validate>(form: &T) -> AppResult<()> {
    form.validate()
        .map_err(|errors| AppError::Validation(first_message(&errors)))
}

fn first_message(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.iter().collect();
    // "__all__" holds schema-level errors
    fields.sort_by_key(|(name, _)| {
        let name = name.to_string();
        (name == "__all__", name)
    });

    fields
        .into_iter()
        .flat_map(|(_, errs)| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Dados inválidos.".to_string())
}
