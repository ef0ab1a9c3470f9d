//! Pepperleaf CLI - a command-line storefront shell.
//!
//! # Usage
//!
//! ```bash
//! # Create an account, or sign in
//! plf-cli signup -f Ada -l Lovelace -e ada@example.com -p hunter22
//! plf-cli login -e ada@example.com -p hunter22
//!
//! # Browse and shop
//! plf-cli products
//! plf-cli cart add <product-id>
//! plf-cli cart show
//!
//! # Check out and track orders
//! plf-cli checkout -f Ada -l Lovelace -a "12 Analytical Row"
//! plf-cli orders list
//! plf-cli orders cancel <order-id>
//! ```
//!
//! The session persists across invocations (see `PEPPERLEAF_DATA_DIR`);
//! each run restores it before executing the command.

#![cfg_attr(not(test), forbid(unsafe_code))]
// A CLI talks to its user on stdout/stderr
#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use pepperleaf_client::notify::Notify;
use pepperleaf_client::{App, ClientConfig};

mod commands;

#[derive(Parser)]
#[command(name = "plf-cli")]
#[command(author, version, about = "Pepperleaf storefront shell")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and sign in
    Signup {
        /// First name
        #[arg(short, long)]
        first_name: String,

        /// Last name
        #[arg(short, long)]
        last_name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Sign in with an existing account
    Login {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Sign out and discard the persisted session
    Logout,
    /// Show the signed-in account
    Whoami,
    /// List the product catalog
    Products,
    /// Inspect and modify the cart
    Cart {
        #[command(subcommand)]
        action: commands::cart::CartAction,
    },
    /// Place an order from the current cart
    Checkout {
        /// First name for shipping
        #[arg(short, long)]
        first_name: String,

        /// Last name for shipping
        #[arg(short, long)]
        last_name: String,

        /// Shipping address
        #[arg(short, long)]
        address: String,
    },
    /// View and manage past orders
    Orders {
        #[command(subcommand)]
        action: commands::orders::OrderAction,
    },
}

/// Notifier that prints notices the way toasts would appear.
struct ConsoleNotifier;

impl Notify for ConsoleNotifier {
    fn success(&self, message: &str) {
        println!("✔ {message}");
    }

    fn error(&self, message: &str) {
        eprintln!("✖ {message}");
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pepperleaf=warn".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(api_url = %config.api_base_url, "loaded configuration");

    let app = match App::new(&config, Arc::new(ConsoleNotifier)) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Restore a persisted session before running the command
    app.start().await;

    let result = match cli.command {
        Commands::Signup {
            first_name,
            last_name,
            email,
            password,
        } => commands::auth::signup(&app, first_name, last_name, email, password).await,
        Commands::Login { email, password } => commands::auth::login(&app, &email, &password).await,
        Commands::Logout => commands::auth::logout(&app),
        Commands::Whoami => commands::auth::whoami(&app),
        Commands::Products => commands::catalog::list(&app).await,
        Commands::Cart { action } => commands::cart::run(&app, action).await,
        Commands::Checkout {
            first_name,
            last_name,
            address,
        } => commands::checkout::place_order(&app, first_name, last_name, address).await,
        Commands::Orders { action } => commands::orders::run(&app, action).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
