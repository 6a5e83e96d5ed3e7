//! Basic authentication example.
//!
//! Demonstrates logging in to a BlockEx venue, listing the trader's
//! instruments, and logging out.
//!
//! Run with: cargo run --example basic_auth

use blockex_rs::{BlockExClient, Credentials};

#[tokio::main]
async fn main() -> blockex_rs::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let credentials = Credentials::new(
        std::env::var("BLOCKEX_API_URL")
            .expect("BLOCKEX_API_URL environment variable required"),
        std::env::var("BLOCKEX_API_ID")
            .expect("BLOCKEX_API_ID environment variable required"),
        std::env::var("BLOCKEX_USERNAME")
            .expect("BLOCKEX_USERNAME environment variable required"),
        std::env::var("BLOCKEX_PASSWORD")
            .expect("BLOCKEX_PASSWORD environment variable required"),
    )?;

    let client = BlockExClient::new(credentials)?;

    println!("Logging in...");
    client.login().await?;
    println!("Successfully authenticated!");

    // List the instruments this trader can trade
    let instruments = client.instruments().trader().await?;
    println!("\nFound {} instrument(s):", instruments.len());
    for instrument in &instruments {
        println!(
            "  - {} ({}), min order: {}, fee: {}",
            instrument.name,
            instrument.description,
            instrument.min_order_amount,
            instrument.commission_fee_percent,
        );
    }

    client.logout().await?;
    println!("\nLogged out.");

    Ok(())
}
