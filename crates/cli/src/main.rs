//! Boutique CLI - browse the catalog and manage a persisted cart and wishlist.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! boutique products list --category sepatu --sort price-low
//! boutique products show 7
//! boutique categories
//!
//! # Cart
//! boutique cart add 7 --size 38 --color Black --quantity 2
//! boutique cart update 7 1 --size 38 --color Black
//! boutique cart remove 7 --size 38 --color Black
//! boutique cart show
//!
//! # Wishlist
//! boutique wishlist toggle 12
//! boutique wishlist check 12
//! ```
//!
//! State lives in `--data-dir` (env `BOUTIQUE_DATA_DIR`, default `.boutique`),
//! shared with the storefront server.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::{CliError, Session};

#[derive(Parser)]
#[command(name = "boutique")]
#[command(author, version, about = "Boutique shopping session from the terminal")]
struct Cli {
    /// Directory holding the persisted cart and wishlist
    #[arg(long, env = "BOUTIQUE_DATA_DIR", default_value = ".boutique", global = true)]
    data_dir: PathBuf,

    /// JSON catalog to use instead of the built-in one
    #[arg(long, env = "BOUTIQUE_CATALOG_PATH", global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// List categories and subcategories
    Categories,
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
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products, optionally filtered and sorted
    List(commands::products::ListArgs),
    /// Show one product
    Show {
        /// Product ID
        id: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a product variant (merges with an existing line)
    Add {
        /// Product ID
        id: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
        #[arg(short, long)]
        size: Option<String>,
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Set the quantity of a line (0 or less removes it)
    Update {
        /// Product ID
        id: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
        #[arg(short, long)]
        size: Option<String>,
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Remove a line
    Remove {
        /// Product ID
        id: String,
        #[arg(short, long)]
        size: Option<String>,
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Empty the cart
    Clear,
    /// Show lines and the order summary
    Show,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Add a product
    Add { id: String },
    /// Remove a product
    Remove { id: String },
    /// Add when absent, remove when present
    Toggle { id: String },
    /// Empty the wishlist
    Clear,
    /// List wishlist entries
    Show,
    /// Report whether a product is in the wishlist
    Check { id: String },
}

fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries command output.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli, &mut std::io::stdout().lock()) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli, out: &mut impl std::io::Write) -> Result<(), CliError> {
    let session = Session::open(&cli.data_dir, cli.catalog.as_deref())?;

    match cli.command {
        Commands::Products { action } => match action {
            ProductsAction::List(args) => commands::products::list(&session, &args, out)?,
            ProductsAction::Show { id } => commands::products::show(&session, &id, out)?,
        },
        Commands::Categories => commands::products::categories(&session, out)?,
        Commands::Cart { action } => {
            let mut cart = session.cart();
            match action {
                CartAction::Add {
                    id,
                    quantity,
                    size,
                    color,
                } => {
                    let product = session.product(&id)?;
                    cart.add_item(product, quantity, size.as_deref(), color.as_deref());
                }
                CartAction::Update {
                    id,
                    quantity,
                    size,
                    color,
                } => cart.set_quantity(
                    &id.into(),
                    quantity,
                    size.as_deref(),
                    color.as_deref(),
                ),
                CartAction::Remove { id, size, color } => {
                    cart.remove_item(&id.into(), size.as_deref(), color.as_deref());
                }
                CartAction::Clear => cart.clear_cart(),
                CartAction::Show => {}
            }
            commands::cart::print(&cart, out)?;
        }
        Commands::Wishlist { action } => {
            let mut wishlist = session.wishlist();
            match action {
                WishlistAction::Add { id } => wishlist.add_item(session.product(&id)?),
                WishlistAction::Remove { id } => wishlist.remove_item(&id.into()),
                WishlistAction::Toggle { id } => {
                    let added = wishlist.toggle(session.product(&id)?);
                    commands::wishlist::print_membership(&id, added, out)?;
                    return Ok(());
                }
                WishlistAction::Clear => wishlist.clear_wishlist(),
                WishlistAction::Show => {}
                WishlistAction::Check { id } => {
                    let present = wishlist.is_in_wishlist(&id.as_str().into());
                    commands::wishlist::print_membership(&id, present, out)?;
                    return Ok(());
                }
            }
            commands::wishlist::print(&wishlist, out)?;
        }
    }
    Ok(())
}
