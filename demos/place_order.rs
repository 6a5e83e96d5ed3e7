//! Order placement example.
//!
//! Places a limit bid on the first available instrument, lists the
//! trader's working orders, and cancels them again.
//!
//! Run with: cargo run --example place_order

use blockex_rs::api::OrdersQuery;
use blockex_rs::models::{NewOrder, OfferType, OrderStatus};
use blockex_rs::{BlockExClient, Credentials};
use rust_decimal_macros::dec;

#[tokio::main]
async fn main() -> blockex_rs::Result<()> {
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

    // Login happens lazily on the first call
    let instruments = client.instruments().trader().await?;
    let Some(instrument) = instruments.first() else {
        println!("No instruments available for this trader");
        return Ok(());
    };
    println!("Trading {} (instrument {})", instrument.name, instrument.id);

    // Place a small limit bid well below the market so it rests
    let order = NewOrder::limit(
        OfferType::Bid,
        instrument.id,
        dec!(1.00),
        instrument.min_order_amount,
    );
    client.orders().create(&order).await?;
    println!("Order placed");

    // Show what is now working on the book
    let query = OrdersQuery {
        instrument_id: Some(instrument.id),
        status: Some(vec![OrderStatus::Pending, OrderStatus::Placed]),
        ..Default::default()
    };
    let working = client.orders().list(Some(query)).await?;
    println!("{} working order(s):", working.len());
    for order in &working {
        println!(
            "  - #{} {} {} @ {} ({:?})",
            order.order_id, order.offer_type, order.quantity, order.price, order.status,
        );
    }

    // Clean up
    client.orders().cancel_all(instrument.id).await?;
    println!("All orders cancelled");

    client.logout().await?;
    Ok(())
}
