//! User (usuário) model, the authenticated principal and related forms

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};
use crate::listing::Listable;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserType {
    /// Patron
    #[default]
    Cliente,
    /// Staff
    Funcionario,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Cliente => "CLIENTE",
            UserType::Funcionario => "FUNCIONARIO",
        }
    }

    /// Permissions granted to this role
    pub fn permissions(&self) -> &'static [&'static str] {
        match self {
            UserType::Funcionario => &[
                "view-dashboard",
                "manage-users",
                "view-livros",
                "create-livros",
                "edit-livros",
            ],
            UserType::Cliente => &["view-dashboard", "view-livros", "borrow-livros"],
        }
    }

    /// Front-end area a freshly logged-in user lands on
    pub fn landing_route(&self) -> &'static str {
        match self {
            UserType::Cliente => "/cliente",
            UserType::Funcionario => "/funcionario",
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CLIENTE" => Ok(UserType::Cliente),
            "FUNCIONARIO" => Ok(UserType::Funcionario),
            _ => Err(format!("Invalid user type: {}", s)),
        }
    }
}

/// Authenticated identity returned by `POST /login`.
///
/// Any field the backend sends beyond the three known ones is kept verbatim
/// in `extra`, so a persisted copy round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    pub username: String,
    pub token: String,
    #[serde(rename = "tipoUsuario")]
    pub user_type: UserType,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Principal {
    pub fn new(username: impl Into<String>, token: impl Into<String>, user_type: UserType) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
            user_type,
            extra: Map::new(),
        }
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.user_type.permissions().iter().any(|p| *p == permission)
    }

    pub fn is_staff(&self) -> bool {
        self.user_type == UserType::Funcionario
    }
}

/// Active/inactive label used by the user list status filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "Ativo",
            UserStatus::Inactive => "Inativo",
        }
    }
}

/// User record as returned by `/usuarios`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: String,
    #[serde(rename = "nome", default)]
    pub name: String,
    #[serde(rename = "senha", default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "tipoUsuario", default)]
    pub user_type: UserType,
    #[serde(default)]
    pub cpf: String,
    #[serde(rename = "endereco", default)]
    pub address: String,
    #[serde(rename = "telefone", default)]
    pub phone: String,
    #[serde(rename = "usuarioAtivo", default)]
    pub active: bool,
}

impl User {
    pub fn status(&self) -> UserStatus {
        if self.active {
            UserStatus::Active
        } else {
            UserStatus::Inactive
        }
    }
}

impl Listable for User {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.username.as_str(),
            self.email.as_str(),
            self.cpf.as_str(),
        ]
    }

    fn status_label(&self) -> Option<&'static str> {
        Some(self.status().as_str())
    }
}

const REQUIRED_BY_STAFF: &str = "Todos os campos obrigatórios devem ser preenchidos.";
const REQUIRED_BY_PROFILE: &str = "Todos os campos são obrigatórios.";

fn missing_field(message: &'static str) -> ValidationError {
    let mut err = ValidationError::new("required");
    err.message = Some(Cow::Borrowed(message));
    err
}

fn required_by_staff(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(missing_field(REQUIRED_BY_STAFF));
    }
    Ok(())
}

fn required_by_profile(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(missing_field(REQUIRED_BY_PROFILE));
    }
    Ok(())
}

/// Registration and staff-side edit form
#[derive(Debug, Clone, Serialize, Validate)]
pub struct UserForm {
    #[validate(custom(function = "required_by_staff"))]
    pub username: String,
    #[serde(rename = "nome")]
    #[validate(custom(function = "required_by_staff"))]
    pub name: String,
    #[serde(rename = "senha", skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[validate(custom(function = "required_by_staff"), email(message = "E-mail inválido."))]
    pub email: String,
    #[serde(rename = "tipoUsuario")]
    pub user_type: UserType,
    #[validate(custom(function = "required_by_staff"))]
    pub cpf: String,
    #[serde(rename = "endereco")]
    pub address: String,
    #[serde(rename = "telefone")]
    pub phone: String,
    #[serde(rename = "usuarioAtivo")]
    pub active: bool,
}

impl Default for UserForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            name: String::new(),
            password: None,
            email: String::new(),
            user_type: UserType::Cliente,
            cpf: String::new(),
            address: String::new(),
            phone: String::new(),
            active: true,
        }
    }
}

impl UserForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            name: user.name.clone(),
            password: None,
            email: user.email.clone(),
            user_type: user.user_type,
            cpf: user.cpf.clone(),
            address: user.address.clone(),
            phone: user.phone.clone(),
            active: user.active,
        }
    }

    /// Registration additionally requires a password
    pub fn require_password(&self) -> AppResult<()> {
        match self.password.as_deref() {
            Some(p) if !p.is_empty() => Ok(()),
            _ => Err(AppError::Validation(REQUIRED_BY_STAFF.to_string())),
        }
    }

    /// Copy the staff-editable fields onto a stored record. The password is
    /// only replaced when one was typed.
    pub fn apply_to(&self, user: &mut User) {
        user.username = self.username.clone();
        user.name = self.name.clone();
        user.email = self.email.clone();
        user.user_type = self.user_type;
        user.cpf = format_cpf(&self.cpf);
        user.address = self.address.clone();
        user.phone = format_phone(&self.phone);
        user.active = self.active;
        if let Some(password) = self.password.as_ref().filter(|p| !p.is_empty()) {
            user.password = Some(password.clone());
        }
    }

    /// Apply the input masks to CPF and phone
    pub fn normalized(mut self) -> Self {
        self.cpf = format_cpf(&self.cpf);
        self.phone = format_phone(&self.phone);
        self
    }
}

/// Self-service profile form
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct ProfileForm {
    #[serde(rename = "nome")]
    #[validate(custom(function = "required_by_profile"))]
    pub name: String,
    #[validate(custom(function = "required_by_profile"))]
    pub email: String,
    #[serde(rename = "endereco")]
    #[validate(custom(function = "required_by_profile"))]
    pub address: String,
    #[serde(rename = "telefone")]
    #[validate(custom(function = "required_by_profile"))]
    pub phone: String,
    #[serde(rename = "senha", skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl ProfileForm {
    /// Merge the profile fields over the stored user record
    pub fn merged_into(&self, user: &User) -> User {
        let mut updated = user.clone();
        updated.name = self.name.clone();
        updated.email = self.email.clone();
        updated.address = self.address.clone();
        updated.phone = format_phone(&self.phone);
        if self.password.is_some() {
            updated.password = self.password.clone();
        }
        updated
    }

    pub fn missing_fields_message() -> &'static str {
        REQUIRED_BY_PROFILE
    }
}

static NON_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\D").expect("valid regex"));
static CPF_MASK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{3})(\d{3})(\d{3})(\d{1,2})$").expect("valid regex"));
static PHONE_MASK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2})(\d{5})(\d{0,4})$").expect("valid regex"));

fn digits(value: &str, max: usize) -> String {
    NON_DIGIT.replace_all(value, "").chars().take(max).collect()
}

/// `12345678901` → `123.456.789-01`; shorter inputs are left as bare digits
pub fn format_cpf(value: &str) -> String {
    let d = digits(value, 11);
    CPF_MASK.replace(&d, "$1.$2.$3-$4").into_owned()
}

/// `11987654321` → `(11) 98765-4321`; shorter inputs are left as bare digits
pub fn format_phone(value: &str) -> String {
    let d = digits(value, 11);
    PHONE_MASK.replace(&d, "($1) $2-$3").into_owned()
}
