use dotenv::dotenv;
use std::env;
use vitrina::prelude::*;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::try_from_env("VITRINA_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let vitrina = Vitrina::from_env()?;
    let user_id = env::var("VITRINA_USER_ID").ok().and_then(|v| v.parse().ok());
    let product_id: i64 = env::var("VITRINA_PRODUCT_ID")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(1);

    let cart = vitrina.cart(user_id);
    let Some(summary) = cart.fetch().await? else {
        println!("Set VITRINA_USER_ID to use the cart");
        return Ok(());
    };
    println!("Cart: {} items, subtotal {}", summary.total_items, summary.subtotal);

    let added = cart.add(product_id, 1).await?;
    println!("Added {} ({})", added.product.name, added.product.price);
    print_summary(&added.cart);

    if let Some(line) = added.cart.items.iter().find(|item| item.product_id == product_id) {
        let summary = cart.update_quantity(line.id, line.quantity + 1).await?;
        print_summary(&summary);

        let summary = cart.remove(line.id).await?;
        print_summary(&summary);
    }

    Ok(())
}

fn print_summary(summary: &CartSummary) {
    println!(
        "  {} lines, {} units, subtotal {}",
        summary.item_count, summary.total_items, summary.subtotal
    );
}
