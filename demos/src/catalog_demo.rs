use dotenv::dotenv;
use std::env;
use vitrina::catalog::{ProductSort, SortOrder};
use vitrina::prelude::*;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::try_from_env("VITRINA_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let vitrina = Vitrina::from_env()?;
    let catalog = vitrina.catalog();

    println!("Categories:");
    for category in catalog.categories(true).await? {
        println!("  {} ({} products)", category.name, category.product_count.unwrap_or(0));
    }

    println!("Brands:");
    for brand in catalog.brands(&BrandQuery::new().active_only().with_limit(10)).await? {
        println!("  {} [{}]", brand.name, brand.slug);
    }

    let newest = catalog
        .products(
            &ProductQuery::new()
                .with_limit(5)
                .with_sort(ProductSort::CreatedAt, SortOrder::Desc),
        )
        .await?;
    println!("Newest products: {}", newest.len());

    let product_id = match env::var("VITRINA_PRODUCT_ID").ok().and_then(|v| v.parse().ok()) {
        Some(id) => id,
        None => match newest.first() {
            Some(product) => product.id,
            None => return Ok(()),
        },
    };

    let detail = catalog.product(product_id).await?;
    if let Some(seller_id) = detail.product.seller_id {
        let seller = catalog.seller(seller_id).await?;
        println!(
            "Sold by {} ({} active products)",
            seller.profile.display_name(),
            seller.products.len()
        );
    }

    let mut selector = VariantSelector::new(detail);
    println!(
        "{}: {} (stock {}, line {})",
        selector.product().name,
        selector.price(),
        selector.stock(),
        selector.line_id()
    );

    let choices: Vec<(String, String)> = selector
        .available_attributes()
        .iter()
        .filter_map(|(name, values)| values.last().map(|v| (name.clone(), v.clone())))
        .collect();
    for (name, value) in choices {
        selector.select_attribute(&name, &value);
        println!("  {name} = {value}: {} ({} images)", selector.price(), selector.images().len());
    }

    Ok(())
}
