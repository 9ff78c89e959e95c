//! Bazaar CLI - drive the cart controller from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Add two of product 42 to the cart
//! bazaar cart add 42 --quantity 2 --cookies "sessionid=...; csrftoken=..."
//!
//! # Remove product 42 from the cart
//! bazaar cart remove 42 --cookies "sessionid=...; csrftoken=..."
//!
//! # Show the cart badge and total
//! bazaar cart show --cookies "sessionid=..."
//!
//! # Format an amount in rupees
//! bazaar price 1234567.5
//!
//! # Read a cookie out of a cookie string
//! bazaar cookie csrftoken "sessionid=abc; csrftoken=xyz"
//! ```
//!
//! # Commands
//!
//! - `cart` - Run a cart action against the service in `BAZAAR_API_BASE_URL`
//! - `price` - Format an amount the way the cart total is shown
//! - `cookie` - Look up and decode a cookie value

#![cfg_attr(not(test), forbid(unsafe_code))]

use bazaar_core::ProductId;
use bazaar_storefront::StorefrontConfig;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::CommandError;

#[derive(Parser)]
#[command(name = "bazaar")]
#[command(author, version, about = "Bazaar storefront cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a cart action and print the resulting page state
    Cart {
        #[command(subcommand)]
        action: CartAction,

        /// Cookie string sent with every request (session and CSRF token)
        #[arg(long, global = true, default_value = "")]
        cookies: String,
    },
    /// Format an amount as Indian rupees
    Price {
        /// Amount, e.g. 1234567.5
        #[arg(allow_hyphen_values = true)]
        amount: Decimal,
    },
    /// Print the decoded value of a cookie
    Cookie {
        /// Cookie name
        name: String,

        /// Cookie string, e.g. "a=1; b=2"
        cookies: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a product to the cart
    Add {
        /// Product ID
        product_id: ProductId,

        /// Quantity to add
        #[arg(short, long)]
        quantity: Option<String>,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        product_id: ProductId,
    },
    /// Show the cart count and total
    Show,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
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

    tracing::info!("Sentry initialized");
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

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Only cart commands talk to the service and need configuration
    let config = match cli.command {
        Commands::Cart { .. } => StorefrontConfig::from_env().map(Some),
        _ => Ok(None),
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = config
        .as_ref()
        .ok()
        .and_then(Option::as_ref)
        .and_then(init_sentry);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bazaar_storefront=info,bazaar_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: Option<StorefrontConfig>) -> Result<(), CommandError> {
    match cli.command {
        Commands::Cart { action, cookies } => {
            let config = config.ok_or(CommandError::MissingConfig)?;
            match action {
                CartAction::Add {
                    product_id,
                    quantity,
                } => commands::cart::add(&config, &cookies, product_id, quantity.as_deref()).await?,
                CartAction::Remove { product_id } => {
                    commands::cart::remove(&config, &cookies, product_id).await?;
                }
                CartAction::Show => commands::cart::show(&config, &cookies).await?,
            }
        }
        Commands::Price { amount } => commands::tools::price(amount),
        Commands::Cookie { name, cookies } => commands::tools::cookie(&name, &cookies)?,
    }
    Ok(())
}
