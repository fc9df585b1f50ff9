//! Sia Creations CLI - The storefront from a terminal.
//!
//! Each invocation behaves like one page load: the cart and wishlist are
//! rehydrated from the data directory, the catalog is fetched when the
//! command needs it, one action runs, and the result is saved back.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! sia catalog list --category sarees --sort price-low --page 2
//! sia catalog show 665f1c
//!
//! # Cart and wishlist
//! sia cart add 665f1c --color Pink --size M
//! sia cart qty 665f1c -1 --color Pink --size M
//! sia wishlist toggle 665f1d
//! sia wishlist move-all
//!
//! # Checkout
//! sia checkout --name "Asha Verma" --phone 9876543210 --address "12 MG Road"
//! sia buy-now 665f1c --size M && sia checkout --express --name ...
//!
//! # Print the rendered badges, sidebars and modal after any command
//! sia --surfaces cart show
//! ```
//!
//! # Environment Variables
//!
//! See `sia_storefront::config` for the full list; `SIA_API_URL` is required.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use sia_storefront::{SortOrder, StorefrontConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{CheckoutArgs, Session, VariantArgs};

#[derive(Parser)]
#[command(name = "sia")]
#[command(author, version, about = "Sia Creations storefront")]
struct Cli {
    /// Print the rendered storefront surfaces after the command
    #[arg(long, global = true)]
    surfaces: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Check out a single product without touching the cart
    BuyNow {
        /// Product ID
        id: String,

        #[command(flatten)]
        variant: VariantArgs,
    },
    /// Place an order for the cart or the pending buy-now item
    Checkout(CheckoutArgs),
    /// Store administration
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List in-stock products, one page at a time
    List {
        /// Only products in this category
        #[arg(short, long)]
        category: Option<String>,

        /// `default`, `price-low`, `price-high`, `name-az` or `name-za`
        #[arg(short, long, default_value = "default")]
        sort: SortOrder,

        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// List the newest in-stock arrivals
    NewArrivals,
    /// List categories in display order
    Categories,
    /// Show one product with its variants
    Show {
        /// Product ID
        id: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart and its total
    Show,
    /// Add a product; products with variants need `--color`/`--size`
    Add {
        /// Product ID
        id: String,

        #[command(flatten)]
        variant: VariantArgs,
    },
    /// Change the quantity of a cart line by a signed amount
    Qty {
        /// Product ID
        id: String,

        /// Amount to add (negative to reduce)
        #[arg(allow_hyphen_values = true)]
        delta: i64,

        #[command(flatten)]
        variant: VariantArgs,
    },
    /// Remove a cart line
    Remove {
        /// Product ID
        id: String,

        #[command(flatten)]
        variant: VariantArgs,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show the wishlist
    Show,
    /// Save a product, or remove it if already saved
    Toggle {
        /// Product ID
        id: String,

        #[command(flatten)]
        variant: VariantArgs,
    },
    /// Remove every saved entry for a product
    Remove {
        /// Product ID
        id: String,
    },
    /// Move a saved product into the cart
    Move {
        /// Product ID
        id: String,
    },
    /// Move everything saved into the cart
    MoveAll,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Replace a product's stock flags
    Stock {
        /// Product ID
        id: String,

        /// Mark the whole product out of stock
        #[arg(long)]
        out_of_stock: bool,

        /// Out-of-stock variant: `Color|Size`, or a bare value for single-axis
        /// products (repeatable)
        #[arg(short, long = "disable")]
        disabled: Vec<String>,
    },
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

    tracing::debug!("Sentry initialized");
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

fn init_tracing() {
    // Quiet by default so command output stays readable
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sia_storefront=warn,sia_cli=warn".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let sentry_guard = init_sentry(&config);
    init_tracing();

    let result = run(cli, &config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        // process::exit skips destructors; flush Sentry first
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::open(config, cli.surfaces)?;

    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List {
                category,
                sort,
                page,
            } => commands::catalog::list(&mut session, category.as_deref(), sort, page).await?,
            CatalogAction::NewArrivals => commands::catalog::new_arrivals(&mut session).await?,
            CatalogAction::Categories => commands::catalog::categories(&mut session).await?,
            CatalogAction::Show { id } => commands::catalog::show(&mut session, &id).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&session)?,
            CartAction::Add { id, variant } => {
                commands::cart::add(&mut session, &id, &variant).await?;
            }
            CartAction::Qty { id, delta, variant } => {
                commands::cart::change_quantity(&mut session, &id, delta, &variant)?;
            }
            CartAction::Remove { id, variant } => {
                commands::cart::remove(&mut session, &id, &variant)?;
            }
            CartAction::Clear => commands::cart::clear(&mut session)?,
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Show => commands::wishlist::show(&session)?,
            WishlistAction::Toggle { id, variant } => {
                commands::wishlist::toggle(&mut session, &id, &variant).await?;
            }
            WishlistAction::Remove { id } => commands::wishlist::remove(&mut session, &id)?,
            WishlistAction::Move { id } => {
                commands::wishlist::move_to_cart(&mut session, &id).await?;
            }
            WishlistAction::MoveAll => commands::wishlist::move_all(&mut session).await?,
        },
        Commands::BuyNow { id, variant } => {
            commands::checkout::buy_now(&mut session, &id, &variant).await?;
        }
        Commands::Checkout(args) => commands::checkout::place_order(&mut session, &args).await?,
        Commands::Admin { action } => match action {
            AdminAction::Stock {
                id,
                out_of_stock,
                disabled,
            } => commands::admin::update_stock(&mut session, &id, out_of_stock, &disabled).await?,
        },
    }

    session.finish()?;
    Ok(())
}
