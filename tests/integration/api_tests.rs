//! Client integration tests against an in-process fake backend

use std::collections::HashMap;
use std::sync::atomic::{AtomicU16, AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};

use biblioteca_client::{
    api::{Api, ApiClient},
    config::{ApiConfig, AppConfig},
    models::{LoanKind, ProfileForm, UserType},
    services::{
        auth::AuthService,
        catalog::{CatalogService, SearchField},
        loans::{LoanView, LoansService, PatronLoansService},
        reservations::{PatronReservationsService, ReservationsService},
        users::{UserSearch, UsersService},
    },
    session::{FileStorage, MemoryStorage, SessionStore},
    App, AppError,
};

#[derive(Default)]
struct Backend {
    hits: AtomicUsize,
    /// Status of `GET /reservas`; 0 answers 500
    reservations_status: AtomicU16,
}

type Shared = State<Arc<Backend>>;

fn book(n: usize) -> Value {
    json!({
        "id": n,
        "titulo": format!("Livro {:02}", n),
        "autor": if n % 2 == 0 { "Clarice Lispector" } else { "Machado de Assis" },
        "categoria": "Romance",
        "quantidadeEstoque": 2,
        "isbn": format!("isbn-{:02}", n),
        "livroFisico": true,
        "livroDigital": n == 7,
        "quantidadeLicencas": 0,
        "descricao": "",
        "disponivelParaEmprestimo": n % 5 != 0
    })
}

fn user(username: &str, name: &str) -> Value {
    json!({
        "username": username,
        "nome": name,
        "email": format!("{}@example.com", username),
        "tipoUsuario": "CLIENTE",
        "cpf": "123.456.789-01",
        "endereco": "Rua A, 1",
        "telefone": "(11) 98765-4321",
        "usuarioAtivo": true
    })
}

fn loan(id: i64, active: bool, overdue: bool, date: &str) -> Value {
    json!({
        "id": id,
        "livro": book(id as usize),
        "usuario": user("ana", "Ana Souza"),
        "dataEmprestimo": date,
        "emprestimoFisico": id != 3,
        "emprestimoDigital": id == 3,
        "emprestimoAtivo": active,
        "atrasado": overdue
    })
}

fn reservation(id: i64, holder: &str) -> Value {
    json!({
        "id": id,
        "livro": book(id as usize),
        "usuario": user(holder, holder),
        "dataReserva": "2024-05-01",
        "dataExpiracao": "2024-05-08"
    })
}

async fn login(State(backend): Shared, Query(params): Query<HashMap<String, String>>) -> Response {
    backend.hits.fetch_add(1, Ordering::SeqCst);
    match (params.get("username"), params.get("senha")) {
        (Some(u), Some(p)) if u == "ana" && p == "segredo" => Json(json!({
            "username": "ana",
            "token": "t0k",
            "tipoUsuario": "FUNCIONARIO",
            "nome": "Ana Souza"
        }))
        .into_response(),
        (Some(u), _) if u == "mudo" => StatusCode::UNAUTHORIZED.into_response(),
        _ => (StatusCode::UNAUTHORIZED, "Usuário ou senha inválidos").into_response(),
    }
}

async fn list_books() -> Json<Value> {
    Json(Value::Array((1..=25).map(book).collect()))
}

async fn books_by_title(Path(title): Path<String>) -> Json<Value> {
    let needle = title.to_lowercase();
    Json(Value::Array(
        (1..=25)
            .map(book)
            .filter(|b| b["titulo"].as_str().unwrap_or("").to_lowercase().contains(&needle))
            .collect(),
    ))
}

async fn book_by_isbn(Path(isbn): Path<String>) -> Response {
    match (1..=25).map(book).find(|b| b["isbn"] == isbn.as_str()) {
        Some(b) => Json(b).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Livro não encontrado", "status": 404})),
        )
            .into_response(),
    }
}

async fn delete_book(Path(_isbn): Path<String>) -> &'static str {
    "Livro removido com sucesso"
}

fn all_loans() -> Vec<Value> {
    vec![
        loan(1, false, false, "2023-01-10"),
        loan(2, true, false, "2024-02-01"),
        loan(3, false, false, "2023-06-15"),
        loan(4, true, true, "2024-01-05"),
    ]
}

async fn list_loans() -> Json<Value> {
    Json(Value::Array(all_loans()))
}

async fn loans_selection(Path(selection): Path<String>) -> Response {
    let keep: fn(&Value) -> bool = match selection.as_str() {
        "fisico" => |l| l["emprestimoFisico"] == true,
        "digital" => |l| l["emprestimoDigital"] == true,
        "atrasados" => |l| l["atrasado"] == true,
        "ativos" => |l| l["emprestimoAtivo"] == true,
        "finalizados" => |l| l["emprestimoAtivo"] == false,
        _ => return StatusCode::NOT_FOUND.into_response(),
    };
    Json(Value::Array(all_loans().into_iter().filter(keep).collect())).into_response()
}

async fn loan_by_id(Path(id): Path<i64>) -> Response {
    match all_loans().into_iter().find(|l| l["id"] == id) {
        Some(l) => Json(l).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Empréstimo não encontrado"})),
        )
            .into_response(),
    }
}

async fn loans_by_username(Path(_username): Path<String>) -> Json<Value> {
    Json(json!([
        loan(5, false, false, "2024-03-01"),
        loan(6, true, false, "2024-01-01"),
        loan(7, true, false, "2024-04-01"),
        loan(8, false, false, "2024-05-01"),
    ]))
}

async fn create_loan(
    Path(kind): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    match (params.get("isbn"), params.get("username")) {
        (Some(_), Some(_)) => format!("Empréstimo {} realizado com ID: 42", kind).into_response(),
        _ => (StatusCode::BAD_REQUEST, "Parâmetros ausentes").into_response(),
    }
}

async fn return_loan(Path(id): Path<i64>) -> String {
    format!("Empréstimo {} devolvido", id)
}

async fn purge_loans(State(backend): Shared, Path(years): Path<i64>) -> Response {
    backend.hits.fetch_add(1, Ordering::SeqCst);
    if years == 1 {
        StatusCode::NO_CONTENT.into_response()
    } else {
        Json("3 empréstimos excluídos").into_response()
    }
}

async fn list_reservations(State(backend): Shared) -> Response {
    match backend.reservations_status.load(Ordering::SeqCst) {
        0 => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        code => (
            StatusCode::from_u16(code).unwrap(),
            "Nenhuma reserva encontrada",
        )
            .into_response(),
    }
}

async fn overdue_reservations() -> Json<Value> {
    Json(json!([reservation(3, "bia")]))
}

async fn reservation_by_id(Path(id): Path<i64>) -> Response {
    if (1..=3).contains(&id) {
        Json(reservation(id, "ana")).into_response()
    } else {
        (StatusCode::NOT_FOUND, "Reserva não encontrada").into_response()
    }
}

async fn reservations_by_username(Path(username): Path<String>) -> Response {
    if username == "ana" {
        Json(json!([reservation(1, "ana"), reservation(2, "ana")])).into_response()
    } else {
        (StatusCode::NOT_FOUND, "Nenhuma reserva encontrada").into_response()
    }
}

async fn convert_reservation(Path(id): Path<i64>) -> Response {
    if id == 1 {
        "Reserva transformada em empréstimo".into_response()
    } else {
        (StatusCode::CONFLICT, Json(json!({"message": "Livro indisponível"}))).into_response()
    }
}

async fn delete_reservation(Path(id): Path<i64>) -> String {
    format!("Reserva {} deletada", id)
}

async fn user_by_username(headers: HeaderMap, Path(username): Path<String>) -> Response {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map_or(false, |v| v == "Bearer t0k");
    if !authorized {
        return (StatusCode::UNAUTHORIZED, "Token ausente").into_response();
    }
    Json(user(&username, "Ana Souza")).into_response()
}

fn all_users() -> Vec<Value> {
    vec![user("ana", "Ana Souza"), user("bia", "Beatriz Lima")]
}

async fn users_by_name(Path(name): Path<String>) -> Json<Value> {
    let needle = name.to_lowercase();
    Json(Value::Array(
        all_users()
            .into_iter()
            .filter(|u| u["nome"].as_str().unwrap_or("").to_lowercase().contains(&needle))
            .collect(),
    ))
}

async fn users_by_cpf(Path(cpf): Path<String>) -> Json<Value> {
    let digits: String = cpf.chars().filter(char::is_ascii_digit).collect();
    let found = if digits == "12345678901" { all_users() } else { Vec::new() };
    Json(Value::Array(found))
}

async fn update_user(Path(_username): Path<String>, Json(body): Json<Value>) -> Json<Value> {
    Json(body)
}

async fn spawn_backend() -> (String, Arc<Backend>) {
    let backend = Arc::new(Backend::default());
    let app = Router::new()
        .route("/login", post(login))
        .route("/livros", get(list_books))
        .route("/livros/titulo/:titulo", get(books_by_title))
        .route("/livros/isbn/:isbn", get(book_by_isbn))
        .route("/livros/:isbn", delete(delete_book))
        .route("/emprestimos", get(list_loans))
        .route("/emprestimos/:selection", get(loans_selection))
        .route("/emprestimos/id/:id", get(loan_by_id))
        .route("/emprestimos/username/:username", get(loans_by_username))
        .route("/emprestimos/realizar/:kind", post(create_loan))
        .route("/emprestimos/devolver/:id", put(return_loan))
        .route("/emprestimos/anos/:anos", delete(purge_loans))
        .route("/reservas", get(list_reservations))
        .route("/reservas/atrasadas", get(overdue_reservations))
        .route("/reservas/id/:id", get(reservation_by_id))
        .route("/reservas/username/:username", get(reservations_by_username))
        .route("/reservas/:id", delete(delete_reservation))
        .route("/reservas/transformar/:id", post(convert_reservation))
        .route("/usuarios/nome/:nome", get(users_by_name))
        .route("/usuarios/cpf/:cpf", get(users_by_cpf))
        .route("/usuarios/username/:username", get(user_by_username))
        .route("/usuarios/:username", put(update_user))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), backend)
}

fn api_config(base: &str) -> ApiConfig {
    ApiConfig {
        base_url: base.to_string(),
        timeout_secs: 5,
    }
}

fn api(base: &str) -> Api {
    Api::new(ApiClient::new(&api_config(base)).unwrap())
}

fn logged_in(username: &str) -> SessionStore<MemoryStorage> {
    let raw = json!({"username": username, "token": "t0k", "tipoUsuario": "CLIENTE"}).to_string();
    let mut session = SessionStore::new(MemoryStorage::with_value(raw));
    session.initialize();
    session
}

#[tokio::test]
async fn test_catalog_pages_and_filters() {
    let (base, _) = spawn_backend().await;
    let mut catalog = CatalogService::new(api(&base).books, 12);

    assert!(catalog.load().await);
    let list = catalog.list();
    assert_eq!(list.items().len(), 25);
    assert_eq!(list.total_pages(), 3);

    catalog.list_mut().go_to_page(3);
    assert_eq!(catalog.list().page_items().len(), 1);
    assert_eq!(catalog.list().page_items()[0].title, "Livro 25");

    catalog.filter("LIVRO 2", None);
    assert_eq!(catalog.list().filtered().len(), 6);
    assert_eq!(catalog.list().current_page(), 1);

    catalog.filter("", Some("Indisponível"));
    let unavailable: Vec<_> = catalog.list().filtered().iter().map(|b| b.isbn.as_str()).collect();
    assert_eq!(unavailable, ["isbn-05", "isbn-10", "isbn-15", "isbn-20", "isbn-25"]);
}

#[tokio::test]
async fn test_catalog_backend_search() {
    let (base, _) = spawn_backend().await;
    let mut catalog = CatalogService::new(api(&base).books, 12);

    assert!(catalog.search(SearchField::Title, "livro 1").await);
    assert_eq!(catalog.list().items().len(), 10);

    assert!(catalog.search(SearchField::Title, "   ").await);
    assert_eq!(catalog.list().items().len(), 25);
}

#[tokio::test]
async fn test_book_detail_not_found_uses_backend_message() {
    let (base, _) = spawn_backend().await;
    let catalog = CatalogService::new(api(&base).books, 12);

    let book = catalog.detail("isbn-03").await.unwrap();
    assert_eq!(book.title, "Livro 03");

    let err = catalog.detail("isbn-99").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.user_message(), "Livro não encontrado");
}

#[tokio::test]
async fn test_delete_book_removes_it_locally() {
    let (base, _) = spawn_backend().await;
    let mut catalog = CatalogService::new(api(&base).books, 12);
    catalog.load().await;
    catalog.list_mut().go_to_page(3);

    let message = catalog.delete("isbn-25").await.unwrap();
    assert_eq!(message, "Livro removido com sucesso");
    assert_eq!(catalog.list().items().len(), 24);
    assert!(catalog.list().page_items().is_empty());
    assert_eq!(catalog.list().current_page(), 3);
}

#[tokio::test]
async fn test_staff_loans_put_active_first() {
    let (base, _) = spawn_backend().await;
    let api = api(&base);
    let mut loans = LoansService::new(api.loans, api.books, 5);

    assert!(loans.load().await);
    let ids: Vec<i64> = loans.list().items().iter().map(|l| l.id).collect();
    assert_eq!(ids, [2, 4, 1, 3]);

    loans.filter("", Some("Atrasado"));
    let ids: Vec<i64> = loans.list().filtered().iter().map(|l| l.id).collect();
    assert_eq!(ids, [4]);

    let message = loans.return_loan(4).await.unwrap();
    assert_eq!(message, "Empréstimo 4 devolvido");
    // reloaded: filter reset
    assert_eq!(loans.list().filtered().len(), 4);
}

#[tokio::test]
async fn test_staff_loan_views() {
    let (base, _) = spawn_backend().await;
    let api = api(&base);
    let mut loans = LoansService::new(api.loans, api.books, 5);

    let cases = [
        (LoanView::Physical, vec![2, 4, 1]),
        (LoanView::Digital, vec![3]),
        (LoanView::Overdue, vec![4]),
        (LoanView::Active, vec![2, 4]),
        (LoanView::Finished, vec![1, 3]),
        (LoanView::All, vec![2, 4, 1, 3]),
    ];
    for (view, expected) in cases {
        assert!(loans.load_view(view).await);
        let ids: Vec<i64> = loans.list().items().iter().map(|l| l.id).collect();
        assert_eq!(ids, expected, "{:?}", view);
    }

    assert_eq!("atrasados".parse::<LoanView>().unwrap(), LoanView::Overdue);
    assert!("emprestados".parse::<LoanView>().is_err());
}

#[tokio::test]
async fn test_loan_detail() {
    let (base, _) = spawn_backend().await;
    let api = api(&base);
    let loans = LoansService::new(api.loans, api.books, 5);

    let loan = loans.detail(4).await.unwrap();
    assert!(loan.overdue);
    assert_eq!(loan.book_title(), "Livro 04");

    let err = loans.detail(40).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.user_message(), "Empréstimo não encontrado");
}

#[tokio::test]
async fn test_patron_loans_newest_first_within_group() {
    let (base, _) = spawn_backend().await;
    let api = api(&base);
    let mut loans = PatronLoansService::new(api.loans, api.books, 6);
    let session = logged_in("ana");

    assert!(loans.load(&session).await);
    let ids: Vec<i64> = loans.list().items().iter().map(|l| l.id).collect();
    assert_eq!(ids, [7, 6, 8, 5]);
}

#[tokio::test]
async fn test_purge_old_loans() {
    let (base, backend) = spawn_backend().await;
    let api = api(&base);
    let mut loans = LoansService::new(api.loans, api.books, 5);

    let err = loans.purge(0).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(backend.hits.load(Ordering::SeqCst), 0);

    let message = loans.purge(1).await.unwrap();
    assert_eq!(message, "Nenhum empréstimo antigo para excluir.");

    let message = loans.purge(5).await.unwrap();
    assert_eq!(message, "3 empréstimos excluídos");
    assert_eq!(backend.hits.load(Ordering::SeqCst), 2);
    assert!(loans.list().error().is_none());
}

#[tokio::test]
async fn test_borrow_checks_digital_licenses() {
    let (base, _) = spawn_backend().await;
    let api = api(&base);
    let loans = LoansService::new(api.loans, api.books, 5);

    let err = loans
        .borrow(LoanKind::Digital, "isbn-07", "ana")
        .await
        .unwrap_err();
    assert_eq!(
        err.user_message(),
        "Não há licenças disponíveis para este livro digital."
    );

    let message = loans.borrow(LoanKind::Physical, "isbn-07", "ana").await.unwrap();
    assert_eq!(message, "Empréstimo fisico realizado com ID: 42");
}

#[tokio::test]
async fn test_reservations_for_user_without_any_is_empty() {
    let (base, _) = spawn_backend().await;
    let mut page = PatronReservationsService::new(api(&base).reservations, 10);

    assert!(page.load(&logged_in("bia")).await);
    assert!(page.list().items().is_empty());
    assert!(page.list().error().is_none());

    assert!(page.load(&logged_in("ana")).await);
    assert_eq!(page.list().items().len(), 2);
}

#[tokio::test]
async fn test_reservation_list_failure_uses_fallback_message() {
    let (base, _) = spawn_backend().await;
    let mut page = ReservationsService::new(api(&base).reservations, 10);

    assert!(page.load().await);
    assert_eq!(page.list().error(), Some("Erro ao listar reservas"));
    assert!(page.list().page_items().is_empty());
}

#[tokio::test]
async fn test_reservation_list_not_found_is_empty() {
    let (base, backend) = spawn_backend().await;
    backend.reservations_status.store(404, Ordering::SeqCst);
    let mut page = ReservationsService::new(api(&base).reservations, 10);

    assert!(page.load().await);
    assert!(page.list().error().is_none());
    assert!(page.list().items().is_empty());
    assert_eq!(page.list().total_pages(), 0);
}

#[tokio::test]
async fn test_overdue_reservations_and_detail() {
    let (base, _) = spawn_backend().await;
    let mut page = ReservationsService::new(api(&base).reservations, 10);

    assert!(page.load_overdue().await);
    let ids: Vec<i64> = page.list().items().iter().map(|r| r.id).collect();
    assert_eq!(ids, [3]);

    let reservation = page.detail(2).await.unwrap();
    assert_eq!(reservation.book_title(), "Livro 02");

    let err = page.detail(99).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.user_message(), "Reserva não encontrada");
}

#[tokio::test]
async fn test_convert_and_cancel_reservations() {
    let (base, _) = spawn_backend().await;
    let mut page = PatronReservationsService::new(api(&base).reservations, 10);
    page.load(&logged_in("ana")).await;

    let mut staff = ReservationsService::new(api(&base).reservations, 10);
    let message = staff.convert(1).await.unwrap();
    assert_eq!(message, "Reserva transformada em empréstimo");

    let err = staff.convert(2).await.unwrap_err();
    assert_eq!(err.status(), Some(409));
    assert_eq!(err.user_message(), "Livro indisponível");

    let message = page.cancel(2).await.unwrap();
    assert_eq!(message, "Reserva 2 deletada");
    let ids: Vec<i64> = page.list().items().iter().map(|r| r.id).collect();
    assert_eq!(ids, [1]);
}

#[tokio::test]
async fn test_login_persists_session() {
    let (base, backend) = spawn_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let auth = AuthService::new(api(&base).auth);

    let mut session = SessionStore::new(FileStorage::new(&path));
    session.initialize();

    let err = auth.login(&mut session, "ana", "errada").await.unwrap_err();
    assert_eq!(err.user_message(), "Usuário ou senha inválidos");
    let err = auth.login(&mut session, "mudo", "x").await.unwrap_err();
    assert_eq!(err.user_message(), "Erro ao fazer login.");
    assert!(session.current().is_none());

    let principal = auth.login(&mut session, "ana", "segredo").await.unwrap();
    assert_eq!(principal.user_type, UserType::Funcionario);
    assert_eq!(principal.user_type.landing_route(), "/funcionario");
    assert_eq!(backend.hits.load(Ordering::SeqCst), 3);

    let mut restored = SessionStore::new(FileStorage::new(&path));
    restored.initialize();
    assert_eq!(restored.current(), Some(&principal));
    assert_eq!(restored.current().unwrap().extra["nome"], "Ana Souza");

    auth.logout(&mut restored).unwrap();
    assert!(!path.exists());
}

#[tokio::test]
async fn test_unreachable_backend_reports_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut catalog = CatalogService::new(api(&format!("http://{}", addr)).books, 12);
    assert!(catalog.load().await);
    assert_eq!(catalog.list().error(), Some("Erro de rede ou servidor"));
}

#[tokio::test]
async fn test_restored_session_sends_token() {
    let (base, _) = spawn_backend().await;
    let mut config = AppConfig::default();
    config.api = api_config(&base);

    let raw = json!({"username": "ana", "token": "t0k", "tipoUsuario": "CLIENTE"}).to_string();
    let app = App::new(config, MemoryStorage::with_value(raw)).unwrap();

    let form = ProfileForm {
        name: "Ana S.".into(),
        email: "ana@example.com".into(),
        address: "Rua B, 2".into(),
        phone: "11912345678".into(),
        password: None,
    };
    let saved = app
        .services
        .users
        .update_profile(&app.session, &form)
        .await
        .unwrap();
    assert_eq!(saved.name, "Ana S.");
    assert_eq!(saved.phone, "(11) 91234-5678");

    // no session: no token, backend refuses
    let anonymous = api(&base);
    let err = anonymous.users.by_username("ana").await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.user_message(), "Token ausente");
}

#[tokio::test]
async fn test_users_backend_search() {
    let (base, _) = spawn_backend().await;
    let mut users = UsersService::new(api(&base).users, 10);

    assert!(users.search(UserSearch::Name, "beatriz").await);
    let names: Vec<_> = users.list().items().iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, ["bia"]);

    assert!(users.search(UserSearch::Cpf, "123.456.789-01").await);
    assert_eq!(users.list().items().len(), 2);

    assert!(users.search(UserSearch::Cpf, "00000000000").await);
    assert!(users.list().items().is_empty());
    assert!(users.list().error().is_none());
}

#[tokio::test]
async fn test_token_follows_logout_and_login() {
    let (base, _) = spawn_backend().await;
    let mut config = AppConfig::default();
    config.api = api_config(&base);

    let raw = json!({"username": "ana", "token": "t0k", "tipoUsuario": "CLIENTE"}).to_string();
    let mut app = App::new(config, MemoryStorage::with_value(raw)).unwrap();
    assert!(app.services.users.find("ana").await.is_ok());

    app.services.auth.logout(&mut app.session).unwrap();
    let err = app.services.users.find("ana").await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.user_message(), "Token ausente");

    app.services
        .auth
        .login(&mut app.session, "ana", "segredo")
        .await
        .unwrap();
    let user = app.services.users.find("ana").await.unwrap();
    assert_eq!(user.username, "ana");
}

#[tokio::test]
async fn test_login_without_restored_session_sends_token() {
    let (base, _) = spawn_backend().await;
    let mut config = AppConfig::default();
    config.api = api_config(&base);

    let mut app = App::new(config, MemoryStorage::new()).unwrap();
    let err = app.services.users.find("ana").await.unwrap_err();
    assert_eq!(err.status(), Some(401));

    app.services
        .auth
        .login(&mut app.session, "ana", "segredo")
        .await
        .unwrap();
    assert!(app.services.users.find("ana").await.is_ok());
}
