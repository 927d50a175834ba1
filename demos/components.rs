// SPDX-License-Identifier: MPL-2.0

//! Demo program: three components sharing one installed bus.
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=component_bus=trace cargo run --example components
//! ```

use component_bus::{AppContext, InstallOptions, args};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let app: AppContext = AppContext::new();
    app.install(InstallOptions::from_json(r#"{ "name": "$bus" }"#)?);

    let cart = app.mount("$bus")?;
    cart.on_fn("item-added", |args| println!("cart: added {args:?}"));

    let badge = app.mount("$bus")?;
    badge.on_fn("item-added", |args| {
        if let Some(quantity) = args.get(1) {
            println!("badge: +{quantity}");
        }
    });

    let catalog = app.mount("$bus")?;
    catalog.emit("item-added", args!["sku-1", 2]);

    println!("Closing the cart...");
    drop(cart);
    catalog.emit("item-added", args!["sku-2", 1]);

    println!("Done!");
    Ok(())
}
