//! rocketcart - drive the shopping cart from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the current cart
//! rocketcart show
//!
//! # Add one unit of product 3
//! rocketcart add 3
//!
//! # Set product 3 to exactly 2 units
//! rocketcart update 3 2
//!
//! # Remove product 3
//! rocketcart remove 3
//! ```
//!
//! Configuration comes from `ROCKETCART_*` environment variables; see
//! `rocketcart_infra::config`. Failures are reported on stderr and never
//! change the exit code, mirroring the storefront's toast behaviour.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use rocketcart_cart::{Cart, Notifier, NotifyingCartStore, UpdateProductAmount};
use rocketcart_core::ProductId;
use rocketcart_infra::{CartConfig, TracingNotifier, build_cart_store};
use rocketcart_observability::LogFormat;

#[derive(Parser)]
#[command(name = "rocketcart")]
#[command(author, version, about = "RocketShoes shopping cart")]
struct Cli {
    /// Storefront API base URL (overrides ROCKETCART_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Cart database file (overrides ROCKETCART_DB_PATH)
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cart
    Show,
    /// Add one unit of a product
    Add {
        /// Product id
        product_id: ProductId,
    },
    /// Remove a product's line
    Remove {
        /// Product id
        product_id: ProductId,
    },
    /// Set a product's quantity
    Update {
        /// Product id
        product_id: ProductId,
        /// New quantity
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

/// Prints notifications the way the storefront shows toasts.
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn error(&self, message: &str) {
        eprintln!("✖ {message}");
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = CartConfig::from_env().context("invalid configuration")?;
    if let Some(api_url) = cli.api_url {
        config = config.with_api_url(api_url).context("invalid --api-url")?;
    }
    if let Some(db_path) = cli.db_path {
        config = config.with_database_path(db_path);
    }

    rocketcart_observability::init(config.log_format);

    let store = build_cart_store(&config).await;
    let mut cart = NotifyingCartStore::new(store, notifier_for(config.log_format));

    match cli.command {
        Commands::Show => {}
        Commands::Add { product_id } => cart.add_product(product_id).await,
        Commands::Remove { product_id } => cart.remove_product(product_id).await,
        Commands::Update { product_id, amount } => {
            cart.update_product_amount(UpdateProductAmount { product_id, amount })
                .await
        }
    }

    print_cart(cart.cart());
    Ok(())
}

/// JSON runs keep notifications in the log stream; terminals get toast lines.
fn notifier_for(format: LogFormat) -> Arc<dyn Notifier> {
    match format {
        LogFormat::Json => Arc::new(TracingNotifier),
        LogFormat::Pretty => Arc::new(StderrNotifier),
    }
}

fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Cart is empty.");
        return;
    }

    println!("{:>6}  {:<40} {:>10} {:>5} {:>12}", "ID", "PRODUCT", "PRICE", "QTY", "SUBTOTAL");
    for item in cart {
        println!(
            "{:>6}  {:<40} {:>10.2} {:>5} {:>12.2}",
            item.id,
            truncate(&item.title, 40),
            item.price,
            item.quantity,
            item.subtotal()
        );
    }
    println!(
        "{} item(s), {} unit(s), total {:.2}",
        cart.len(),
        cart.total_quantity(),
        cart.subtotal()
    );
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
