//! Biblioteca - terminal front-end for the library backend
//!
//! Each invocation restores the saved session, runs one command against
//! the backend and prints the result as plain text.

use anyhow::{anyhow, bail, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use biblioteca_client::{
    config::AppConfig,
    error::AppError,
    listing::ListView,
    listing::Listable,
    models::{Book, BookForm, Loan, LoanKind, ProfileForm, Reservation, User, UserForm, UserType},
    services::{catalog::SearchField, loans::LoanView, users::UserSearch},
    session::FileStorage,
    App,
};

#[derive(Parser)]
#[command(name = "biblioteca", version, about = "Terminal client for the Biblioteca backend")]
struct Cli {
    /// Backend URL (overrides configuration)
    #[arg(long, env = "BIBLIOTECA_API_URL")]
    api_url: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and save the session
    Login {
        username: String,
        #[arg(long, env = "BIBLIOTECA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the saved session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Book catalog
    #[command(subcommand)]
    Books(BookCommand),
    /// Loans
    #[command(subcommand)]
    Loans(LoanCommand),
    /// Reservations
    #[command(subcommand)]
    Reservations(ReservationCommand),
    /// User management
    #[command(subcommand)]
    Users(UserCommand),
}

#[derive(Args)]
struct ListArgs {
    /// Case-insensitive text filter
    #[arg(long, short)]
    query: Option<String>,
    /// Exact status label (e.g. Ativo, Atrasado, Disponível)
    #[arg(long, short)]
    status: Option<String>,
    #[arg(long, short, default_value_t = 1)]
    page: usize,
}

#[derive(Subcommand)]
enum BookCommand {
    List(ListArgs),
    /// Backend search by title, author or category
    Search {
        #[arg(long, default_value = "titulo")]
        field: SearchField,
        query: Option<String>,
        #[arg(long, short, default_value_t = 1)]
        page: usize,
    },
    Show {
        isbn: String,
    },
    Create {
        isbn: String,
        #[command(flatten)]
        book: BookArgs,
    },
    Update {
        isbn: String,
        #[command(flatten)]
        book: BookArgs,
    },
    Delete {
        isbn: String,
    },
}

#[derive(Args)]
struct BookArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    author: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    stock: Option<i32>,
    #[arg(long)]
    physical: Option<bool>,
    #[arg(long)]
    digital: Option<bool>,
    #[arg(long)]
    licenses: Option<i32>,
    #[arg(long)]
    description: Option<String>,
}

impl BookArgs {
    fn apply(self, form: &mut BookForm) {
        if let Some(v) = self.title {
            form.title = v;
        }
        if let Some(v) = self.author {
            form.author = v;
        }
        if let Some(v) = self.category {
            form.category = v;
        }
        if let Some(v) = self.stock {
            form.stock = v;
        }
        if let Some(v) = self.physical {
            form.physical = v;
        }
        if let Some(v) = self.digital {
            form.digital = v;
        }
        if let Some(v) = self.licenses {
            form.licenses = v;
        }
        if let Some(v) = self.description {
            form.description = v;
        }
    }
}

#[derive(Subcommand)]
enum LoanCommand {
    /// All loans (staff)
    List {
        /// todos, fisico, digital, atrasados, ativos or finalizados
        #[arg(long, default_value = "todos")]
        view: LoanView,
        #[command(flatten)]
        list: ListArgs,
    },
    Show {
        id: i64,
    },
    /// Loans of the logged-in user
    Mine(ListArgs),
    Borrow {
        isbn: String,
        #[arg(long, default_value = "fisico")]
        kind: LoanKind,
        /// Borrower; defaults to the logged-in user
        #[arg(long)]
        username: Option<String>,
    },
    Return {
        id: i64,
    },
    /// Delete finished loans older than N years
    Purge {
        #[arg(allow_negative_numbers = true)]
        years: i64,
    },
}

#[derive(Subcommand)]
enum ReservationCommand {
    /// All reservations (staff)
    List {
        /// Only reservations past their expiry date
        #[arg(long)]
        overdue: bool,
        #[command(flatten)]
        list: ListArgs,
    },
    Show {
        id: i64,
    },
    /// Reservations of the logged-in user
    Mine(ListArgs),
    Reserve {
        isbn: String,
        /// Holder; defaults to the logged-in user
        #[arg(long)]
        username: Option<String>,
    },
    /// Turn a reservation into a loan
    Convert {
        id: i64,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand)]
enum UserCommand {
    List(ListArgs),
    /// Backend search by name or CPF
    Search {
        #[arg(long, default_value = "nome")]
        field: UserSearch,
        query: Option<String>,
        #[arg(long, short, default_value_t = 1)]
        page: usize,
    },
    Create {
        username: String,
        #[command(flatten)]
        user: UserArgs,
    },
    Update {
        username: String,
        #[command(flatten)]
        user: UserArgs,
    },
    /// Edit the logged-in user's own profile
    Profile {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        password: Option<String>,
    },
    Delete {
        username: String,
    },
}

#[derive(Args)]
struct UserArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    password: Option<String>,
    #[arg(long)]
    cpf: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    /// CLIENTE or FUNCIONARIO
    #[arg(long = "type")]
    user_type: Option<UserType>,
    #[arg(long)]
    active: Option<bool>,
}

impl UserArgs {
    fn apply(self, form: &mut UserForm) {
        if let Some(v) = self.name {
            form.name = v;
        }
        if let Some(v) = self.email {
            form.email = v;
        }
        if self.password.is_some() {
            form.password = self.password;
        }
        if let Some(v) = self.cpf {
            form.cpf = v;
        }
        if let Some(v) = self.address {
            form.address = v;
        }
        if let Some(v) = self.phone {
            form.phone = v;
        }
        if let Some(v) = self.user_type {
            form.user_type = v;
        }
        if let Some(v) = self.active {
            form.active = v;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = AppConfig::load().map_err(|e| anyhow!("Failed to load configuration: {}", e))?;
    if let Some(url) = cli.api_url.clone() {
        config.api.base_url = url;
    }

    init_tracing(&config, cli.json_logs);
    tracing::debug!("Biblioteca client v{} -> {}", env!("CARGO_PKG_VERSION"), config.api.base_url);

    let storage = FileStorage::new(config.session.path.clone());
    let mut app = App::new(config, storage).map_err(user_facing)?;

    match cli.command {
        Commands::Login { username, password } => {
            let principal = app
                .services
                .auth
                .login(&mut app.session, &username, &password)
                .await
                .map_err(user_facing)?;
            println!(
                "Bem-vindo, {} ({}). Início: {}",
                principal.username,
                principal.user_type,
                principal.user_type.landing_route()
            );
        }
        Commands::Logout => {
            app.services.auth.logout(&mut app.session).map_err(user_facing)?;
            println!("Sessão encerrada.");
        }
        Commands::Whoami => match app.session.current() {
            Some(principal) => {
                println!("{} ({})", principal.username, principal.user_type);
                println!("Permissões: {}", principal.user_type.permissions().join(", "));
            }
            None => bail!(AppError::Unauthenticated.user_message()),
        },
        Commands::Books(cmd) => run_books(&mut app, cmd).await?,
        Commands::Loans(cmd) => run_loans(&mut app, cmd).await?,
        Commands::Reservations(cmd) => run_reservations(&mut app, cmd).await?,
        Commands::Users(cmd) => run_users(&mut app, cmd).await?,
    }

    Ok(())
}

fn init_tracing(config: &AppConfig, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "biblioteca_client={level},biblioteca={level}",
            level = config.logging.level
        )
        .into()
    });

    let json = json || config.logging.format.eq_ignore_ascii_case("json");
    let (pretty_layer, json_layer) = if json {
        (
            None,
            Some(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
        )
    } else {
        (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty_layer)
        .with(json_layer)
        .init();
}

/// Surface the display message rather than the debug form
fn user_facing(e: AppError) -> anyhow::Error {
    anyhow!(e.user_message())
}

/// Apply filter and page, then print the visible rows
fn show_page<T, F>(list: &mut ListView<T>, args: &ListArgs, row: F) -> Result<()>
where
    T: Listable + Clone,
    F: Fn(&T) -> String,
{
    if let Some(message) = list.error() {
        bail!(message.to_string());
    }
    if args.query.is_some() || args.status.is_some() {
        list.filter(args.query.as_deref().unwrap_or(""), args.status.as_deref());
    }
    list.go_to_page(args.page);
    print_rows(list, row);
    Ok(())
}

fn print_rows<T, F>(list: &ListView<T>, row: F)
where
    T: Listable + Clone,
    F: Fn(&T) -> String,
{
    if list.filtered().is_empty() {
        println!("Nenhum registro encontrado.");
        return;
    }
    for item in list.page_items() {
        println!("{}", row(item));
    }
    println!(
        "-- Página {} de {} ({} registros)",
        list.current_page(),
        list.total_pages(),
        list.filtered().len()
    );
}

fn book_row(b: &Book) -> String {
    format!(
        "{:<15} {:<40} {:<25} {:<15} {}",
        b.isbn,
        b.title,
        b.author,
        b.category,
        b.status()
    )
}

fn loan_row(l: &Loan) -> String {
    format!(
        "#{:<5} {:<40} {:<25} {:<8} {:<10} prev. {}",
        l.id,
        l.book_title(),
        l.borrower_name(),
        l.kind().label(),
        l.status(),
        l.due_on.as_deref().unwrap_or("-")
    )
}

fn reservation_row(r: &Reservation) -> String {
    format!(
        "#{:<5} {:<40} {:<25} expira {}",
        r.id,
        r.book_title(),
        r.holder_name(),
        r.expires_on.as_deref().unwrap_or("-")
    )
}

fn user_row(u: &User) -> String {
    format!(
        "{:<15} {:<30} {:<30} {:<15} {:<12} {}",
        u.username,
        u.name,
        u.email,
        u.cpf,
        u.user_type,
        u.status().as_str()
    )
}

fn session_username(app: &App<FileStorage>, explicit: Option<String>) -> Result<String> {
    match explicit {
        Some(username) => Ok(username),
        None => Ok(app.session.require_username().map_err(user_facing)?.to_string()),
    }
}

async fn run_books(app: &mut App<FileStorage>, cmd: BookCommand) -> Result<()> {
    let catalog = &mut app.services.catalog;
    match cmd {
        BookCommand::List(args) => {
            catalog.load().await;
            show_page(catalog.list_mut(), &args, book_row)?;
        }
        BookCommand::Search { field, query, page } => {
            catalog.search(field, query.as_deref().unwrap_or("")).await;
            let args = ListArgs {
                query: None,
                status: None,
                page,
            };
            show_page(catalog.list_mut(), &args, book_row)?;
        }
        BookCommand::Show { isbn } => {
            let book = catalog.detail(&isbn).await.map_err(user_facing)?;
            println!("{}", book.title);
            println!("Autor: {}", book.author);
            println!("Categoria: {}", book.category);
            println!("ISBN: {}", book.isbn);
            println!("Estoque: {}", book.stock);
            if book.digital {
                println!("Licenças digitais: {}", book.licenses);
            }
            println!("Situação: {}", book.status());
            if !book.description.is_empty() {
                println!("\n{}", book.description);
            }
        }
        BookCommand::Create { isbn, book } => {
            let mut form = BookForm {
                isbn,
                physical: true,
                ..Default::default()
            };
            book.apply(&mut form);
            println!("{}", catalog.create(&form).await.map_err(user_facing)?);
        }
        BookCommand::Update { isbn, book } => {
            let current = catalog.detail(&isbn).await.map_err(user_facing)?;
            let mut form = BookForm::from_book(&current);
            book.apply(&mut form);
            println!("{}", catalog.update(&isbn, &form).await.map_err(user_facing)?);
        }
        BookCommand::Delete { isbn } => {
            println!("{}", catalog.delete(&isbn).await.map_err(user_facing)?);
        }
    }
    Ok(())
}

async fn run_loans(app: &mut App<FileStorage>, cmd: LoanCommand) -> Result<()> {
    match cmd {
        LoanCommand::List { view, list } => {
            let loans = &mut app.services.loans;
            loans.load_view(view).await;
            show_page(loans.list_mut(), &list, loan_row)?;
        }
        LoanCommand::Show { id } => {
            let loan = app.services.loans.detail(id).await.map_err(user_facing)?;
            println!("{}", loan_row(&loan));
            println!("Emprestado em: {}", loan.borrowed_on.as_deref().unwrap_or("-"));
            println!("Devolvido em: {}", loan.returned_on.as_deref().unwrap_or("-"));
        }
        LoanCommand::Mine(args) => {
            let loans = &mut app.services.patron_loans;
            loans.load(&app.session).await;
            show_page(loans.list_mut(), &args, loan_row)?;
        }
        LoanCommand::Borrow { isbn, kind, username } => {
            let username = session_username(app, username)?;
            let message = app
                .services
                .loans
                .borrow(kind, &isbn, &username)
                .await
                .map_err(user_facing)?;
            println!("{}", message);
        }
        LoanCommand::Return { id } => {
            let message = app.services.loans.return_loan(id).await.map_err(user_facing)?;
            println!("{}", message);
        }
        LoanCommand::Purge { years } => {
            let message = app.services.loans.purge(years).await.map_err(user_facing)?;
            println!("{}", message);
        }
    }
    Ok(())
}

async fn run_reservations(app: &mut App<FileStorage>, cmd: ReservationCommand) -> Result<()> {
    match cmd {
        ReservationCommand::List { overdue, list } => {
            let reservations = &mut app.services.reservations;
            if overdue {
                reservations.load_overdue().await;
            } else {
                reservations.load().await;
            }
            show_page(reservations.list_mut(), &list, reservation_row)?;
        }
        ReservationCommand::Show { id } => {
            let reservation = app.services.reservations.detail(id).await.map_err(user_facing)?;
            println!("{}", reservation_row(&reservation));
        }
        ReservationCommand::Mine(args) => {
            let reservations = &mut app.services.patron_reservations;
            reservations.load(&app.session).await;
            show_page(reservations.list_mut(), &args, reservation_row)?;
        }
        ReservationCommand::Reserve { isbn, username } => {
            let username = session_username(app, username)?;
            let message = app
                .services
                .reservations
                .reserve(&isbn, &username)
                .await
                .map_err(user_facing)?;
            println!("{}", message);
        }
        ReservationCommand::Convert { id } => {
            let message = app.services.reservations.convert(id).await.map_err(user_facing)?;
            println!("{}", message);
        }
        ReservationCommand::Delete { id } => {
            let message = app.services.reservations.delete(id).await.map_err(user_facing)?;
            println!("{}", message);
        }
    }
    Ok(())
}

async fn run_users(app: &mut App<FileStorage>, cmd: UserCommand) -> Result<()> {
    match cmd {
        UserCommand::List(args) => {
            let users = &mut app.services.users;
            users.load().await;
            show_page(users.list_mut(), &args, user_row)?;
        }
        UserCommand::Search { field, query, page } => {
            let users = &mut app.services.users;
            users.search(field, query.as_deref().unwrap_or("")).await;
            let args = ListArgs {
                query: None,
                status: None,
                page,
            };
            show_page(users.list_mut(), &args, user_row)?;
        }
        UserCommand::Create { username, user } => {
            let mut form = UserForm {
                username,
                ..Default::default()
            };
            user.apply(&mut form);
            println!("{}", app.services.users.create(form).await.map_err(user_facing)?);
        }
        UserCommand::Update { username, user } => {
            let users = &mut app.services.users;
            let current = users.find(&username).await.map_err(user_facing)?;
            let mut form = UserForm::from_user(&current);
            user.apply(&mut form);
            let saved = users.update(&username, &form).await.map_err(user_facing)?;
            println!("{}", user_row(&saved));
        }
        UserCommand::Profile {
            name,
            email,
            address,
            phone,
            password,
        } => {
            let form = ProfileForm {
                name,
                email,
                address,
                phone,
                password,
            };
            let saved = app
                .services
                .users
                .update_profile(&app.session, &form)
                .await
                .map_err(user_facing)?;
            println!("{}", user_row(&saved));
        }
        UserCommand::Delete { username } => {
            println!("{}", app.services.users.delete(&username).await.map_err(user_facing)?);
        }
    }
    Ok(())
}
