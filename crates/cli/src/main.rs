//! ShopDesk CLI - Admin console for the store backend.
//!
//! # Usage
//!
//! ```bash
//! # Sign in; the session is kept until logout
//! SHOPDESK_PASSWORD=... shopdesk login -e admin@shop.test
//!
//! # Counts and the latest pending orders
//! shopdesk dashboard --status pending
//!
//! # Manage collections
//! shopdesk users list
//! shopdesk products list --category pantry
//! shopdesk orders set-status 7 shipped
//!
//! # Machine-readable output
//! shopdesk --json orders list
//! ```
//!
//! # Commands
//!
//! - `login` / `logout` / `whoami` - Session management
//! - `dashboard` - Collection counts and recent orders
//! - `users` - List, edit, block, unblock and delete accounts
//! - `products` - List, create, update and delete products
//! - `orders` - List orders and change their status
//!
//! Configuration comes from the environment (see `shopdesk_admin::config`).
//! Logs go to stderr; `SHOPDESK_LOG_FORMAT=json` switches them to JSON.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use shopdesk_admin::AdminConsole;
use shopdesk_admin::config::ClientConfig;
use shopdesk_core::{OrderId, OrderStatus, Price, ProductId, UserId, UserRole};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{CliError, Output};

#[derive(Parser)]
#[command(name = "shopdesk")]
#[command(author, version, about = "ShopDesk admin console")]
struct Cli {
    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in as an administrator
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long, env = "SHOPDESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in administrator
    Whoami,
    /// Collection counts and recent orders
    Dashboard {
        /// Only show recent orders in this status (filtered by the backend)
        #[arg(short, long)]
        status: Option<OrderStatus>,
    },
    /// Manage user accounts
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Manage the product catalog
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// List accounts (customers by default)
    List {
        /// Only show accounts with this role (`admin`, `user`)
        #[arg(short, long, conflicts_with = "all")]
        role: Option<UserRole>,

        /// Show every account
        #[arg(short, long)]
        all: bool,
    },
    /// Edit an account's profile or role
    Edit {
        id: UserId,

        /// Full name
        #[arg(short, long)]
        name: Option<String>,

        /// Role (`admin`, `user`)
        #[arg(short, long)]
        role: Option<UserRole>,

        /// Postal address
        #[arg(long)]
        address: Option<String>,

        /// Avatar image URL
        #[arg(long)]
        avatar_url: Option<String>,
    },
    /// Block an account
    Block { id: UserId },
    /// Unblock an account
    Unblock { id: UserId },
    /// Delete an account
    Delete { id: UserId },
}

#[derive(clap::Args)]
struct ProductFields {
    /// Product name
    #[arg(short, long)]
    name: Option<String>,

    /// Description
    #[arg(short, long)]
    description: Option<String>,

    /// Unit price (e.g. 249.50)
    #[arg(short, long)]
    price: Option<Price>,

    /// Units in stock
    #[arg(short, long)]
    stock: Option<i64>,

    /// Category
    #[arg(short, long)]
    category: Option<String>,

    /// Image URL
    #[arg(long)]
    image_url: Option<String>,
}

impl From<ProductFields> for commands::products::ProductArgs {
    fn from(fields: ProductFields) -> Self {
        Self {
            name: fields.name,
            description: fields.description,
            price: fields.price,
            stock: fields.stock,
            category: fields.category,
            image_url: fields.image_url,
        }
    }
}

#[derive(Subcommand)]
enum ProductAction {
    /// List products
    List {
        /// Only show products in this category (case-insensitive)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Create a product (name and price are required)
    Create {
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Change some fields of a product
    Update {
        id: ProductId,

        #[command(flatten)]
        fields: ProductFields,
    },
    /// Delete a product
    Delete { id: ProductId },
}

#[derive(Subcommand)]
enum OrderAction {
    /// List orders
    List {
        /// Only show orders in this status
        #[arg(short, long)]
        status: Option<OrderStatus>,

        /// Let the backend apply the status filter
        #[arg(long, requires = "status")]
        server_filter: bool,
    },
    /// Move an order to a new status
    SetStatus { id: OrderId, status: OrderStatus },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::debug!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopdesk_admin=info,shopdesk_cli=info".into());

    let json = std::env::var("SHOPDESK_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    // Load configuration first so `.env` can set RUST_LOG
    let config = ClientConfig::from_env();
    init_tracing();

    let cli = Cli::parse();

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {e}");
            std::process::exit(1);
        }
    };
    let _sentry = init_sentry(&config);

    if let Err(e) = run(cli, &config).await {
        tracing::error!("{}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &ClientConfig) -> Result<(), CliError> {
    let console = AdminConsole::open(config)?;
    let out = Output::new(cli.json);

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&console, out, &email, password).await?;
        }
        Commands::Logout => commands::auth::logout(&console, out).await?,
        Commands::Whoami => commands::auth::whoami(&console, out).await?,
        Commands::Dashboard { status } => commands::dashboard::show(&console, out, status).await?,
        Commands::Users { action } => match action {
            UserAction::List { role, all } => {
                commands::users::list(&console, out, role, all).await?;
            }
            UserAction::Edit {
                id,
                name,
                role,
                address,
                avatar_url,
            } => {
                let args = commands::users::EditArgs {
                    name,
                    role,
                    address,
                    avatar_url,
                };
                commands::users::edit(&console, out, id, args).await?;
            }
            UserAction::Block { id } => commands::users::set_blocked(&console, out, id, true).await?,
            UserAction::Unblock { id } => {
                commands::users::set_blocked(&console, out, id, false).await?;
            }
            UserAction::Delete { id } => commands::users::delete(&console, out, id).await?,
        },
        Commands::Products { action } => match action {
            ProductAction::List { category } => {
                commands::products::list(&console, out, category.as_deref()).await?;
            }
            ProductAction::Create { fields } => {
                commands::products::create(&console, out, fields.into()).await?;
            }
            ProductAction::Update { id, fields } => {
                commands::products::update(&console, out, id, fields.into()).await?;
            }
            ProductAction::Delete { id } => commands::products::delete(&console, out, id).await?,
        },
        Commands::Orders { action } => match action {
            OrderAction::List {
                status,
                server_filter,
            } => commands::orders::list(&console, out, status, server_filter).await?,
            OrderAction::SetStatus { id, status } => {
                commands::orders::set_status(&console, out, id, status).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_order_status_change() {
        let cli = Cli::try_parse_from(["shopdesk", "orders", "set-status", "7", "Shipped"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Orders {
                action: OrderAction::SetStatus { status: OrderStatus::Shipped, .. }
            }
        ));
    }

    #[test]
    fn test_server_filter_requires_status() {
        assert!(Cli::try_parse_from(["shopdesk", "orders", "list", "--server-filter"]).is_err());
    }

    #[test]
    fn test_rejects_unknown_role() {
        assert!(Cli::try_parse_from(["shopdesk", "users", "list", "--role", "owner"]).is_err());
    }
}
