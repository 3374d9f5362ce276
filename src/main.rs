//! Storefront Core - demo walkthrough
//!
//! Builds a storefront, runs each component through a short scenario and
//! prints the results, optionally as JSON.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use tracing::Level;

use storefront_core::types::{CartAction, CustomerProfile};
use storefront_core::{StoreConfig, Storefront};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON configuration file (defaults apply when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log every structural mutation
    #[arg(short, long)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

fn print_result<T: Serialize + std::fmt::Debug>(json: bool, label: &str, value: &T) {
    if json {
        match serde_json::to_string(value) {
            Ok(encoded) => println!("{label}: {encoded}"),
            Err(e) => eprintln!("{label}: failed to encode: {e}"),
        }
    } else {
        println!("{label}: {value:?}");
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let config = match cli.config {
        Some(path) => match StoreConfig::from_json_file(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("ERROR: failed to load {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => StoreConfig::default(),
    };

    println!("===========================================");
    println!("  Storefront Core");
    println!("===========================================");
    println!();

    let mut store = Storefront::new(config);
    let json = cli.json;

    // Carousel
    println!("Carousel");
    for id in ["Shoes", "Phone", "Watch", "Laptop"] {
        store.carousel.add_to_end(id, false);
    }
    store.carousel.add_to_front("Headphones", true);
    print_result(json, "  display", &store.carousel.display());
    print_result(json, "  featured", &store.carousel.featured());

    store.carousel.move_to_front("Watch");
    store.carousel.remove_product("Phone");
    print_result(json, "  after move/remove", &store.carousel.display());

    store.carousel.link_after("Laptop", "Shoes");
    print_result(json, "  validate", &store.carousel.validate());
    print_result(json, "  repaired", &store.carousel.display());
    println!();

    // Customers
    println!("Customers");
    let profile: CustomerProfile = serde_json::from_str(
        r#"{"name": "Ada", "freq": 3,
            "rec_graph": {"A-Shirt": {"B-Pants": 3, "C-Socks": 1},
                          "B-Pants": {"A-Shirt": 3, "D-Belt": 2}}}"#,
    )
    .unwrap_or_default();
    store.customers.add_customer(500, CustomerProfile::named("Root"));
    store.customers.add_customer(300, profile);
    store.customers.add_customer(700, CustomerProfile::named("Bo"));
    print_result(json, "  in order", &store.customers.in_order());
    print_result(json, "  promote 300", &store.customers.promote_hot_customer(300).ok());
    print_result(json, "  root", &store.customers.root_id());
    print_result(json, "  recommend 300", &store.customers.score_recommendations(300, 3).ok());
    println!();

    // Cart and orders
    println!("Cart");
    store.cart.add_item("Mug", 2);
    print_result(
        json,
        "  change Mug",
        &store.cart.change_quantity("Mug", 5).map_err(|e| e.to_string()),
    );
    store.cart.push_cart_action(CartAction::Add { product: "Tea".into() });
    print_result(json, "  undo", &store.cart.undo_last_action().ok());
    print_result(json, "  undo", &store.cart.undo_last_action().ok());
    print_result(json, "  items", store.cart.items());
    println!();

    println!("Orders");
    for id in ["O1", "O2", "O3"] {
        store.orders.enqueue_order(id, false);
    }
    print_result(json, "  enqueue O4 (vip)", &store.orders.enqueue_order("O4", true));
    print_result(json, "  next", &store.orders.process_next_order().ok());
    println!();

    println!("State root: {}", store.state_root_hex());
}
