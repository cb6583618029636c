//! Campus Market CLI - Drive the cart from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Add an item (stock of 5) with quantity 2
//! market add --id 42 --name Pen --price 10 --qty 2 --max 5
//!
//! # Inspect the cart
//! market show
//!
//! # Place the order
//! market checkout
//!
//! # Cancel or confirm receipt of an order
//! market cancel ORD-1A2B
//! market received ORD-1A2B --yes
//! ```
//!
//! # Commands
//!
//! - `add`, `remove`, `set`, `show`, `badge`, `clear` - Cart maintenance
//! - `checkout` - Submit the cart to the place-order endpoint
//! - `cancel`, `received` - Order actions (confirmation required)
//!
//! Configuration is read from the environment; see
//! [`campus_market_client::config`].

#![cfg_attr(not(test), forbid(unsafe_code))]

use campus_market_client::ClientConfig;
use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod render;

use commands::CliError;
use render::Renderer;

#[derive(Parser)]
#[command(name = "market")]
#[command(author, version, about = "Campus Market cart tools")]
struct Cli {
    /// Answer yes to confirmation prompts
    #[arg(short, long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add an item to the cart
    Add {
        /// Catalog item ID
        #[arg(long)]
        id: String,

        /// Item display name
        #[arg(long)]
        name: String,

        /// Unit price
        #[arg(long)]
        price: String,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        qty: u32,

        /// Available stock (defaults to the requested quantity)
        #[arg(short, long)]
        max: Option<u32>,
    },
    /// Remove an item from the cart
    Remove {
        /// Catalog item ID
        id: String,
    },
    /// Set the quantity of an item already in the cart (0 removes it)
    Set {
        /// Catalog item ID
        id: String,
        /// New quantity
        qty: u32,
    },
    /// Show the cart
    Show,
    /// Show the cart badge
    Badge,
    /// Empty the cart
    Clear,
    /// Place an order with the cart contents
    Checkout,
    /// Cancel an order
    Cancel {
        /// Order ID
        order_id: String,
    },
    /// Mark an order as received
    Received {
        /// Order ID
        order_id: String,
    },
}

/// Stock bound for `add`: without `--max` the requested quantity is trusted.
const fn stock_limit(qty: u32, max: Option<u32>) -> u32 {
    match max {
        Some(max) => max,
        None => qty,
    }
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to warn so command output stays readable if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "campus_market_client=warn,campus_market_cli=warn".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, &config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &ClientConfig) -> Result<(), CliError> {
    let mut dispatcher = commands::build_dispatcher(config, cli.yes)?;
    let mut renderer = Renderer::new(&config.timing);

    match cli.command {
        Commands::Add {
            id,
            name,
            price,
            qty,
            max,
        } => {
            let max = stock_limit(qty, max);
            commands::cart::add(&mut dispatcher, &mut renderer, &id, &name, &price, qty, max)
                .await?;
        }
        Commands::Remove { id } => {
            commands::cart::remove(&mut dispatcher, &mut renderer, &id).await;
        }
        Commands::Set { id, qty } => {
            commands::cart::set(&mut dispatcher, &mut renderer, &id, qty).await;
        }
        Commands::Show => commands::cart::show(&dispatcher, &renderer),
        Commands::Badge => commands::cart::badge(&mut dispatcher, &mut renderer).await,
        Commands::Clear => commands::cart::clear(&dispatcher)?,
        Commands::Checkout => commands::checkout::run(&mut dispatcher, &mut renderer).await,
        Commands::Cancel { order_id } => {
            commands::orders::cancel(&mut dispatcher, &mut renderer, &order_id).await;
        }
        Commands::Received { order_id } => {
            commands::orders::received(&mut dispatcher, &mut renderer, &order_id).await;
        }
    }
    Ok(())
}
