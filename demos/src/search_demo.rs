use dotenv::dotenv;
use std::time::Duration;
use vitrina::prelude::*;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::try_from_env("VITRINA_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("vitrina_search=debug,info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let vitrina = Vitrina::from_env()?;
    let search = vitrina.search();
    let _sweeper = search.spawn_cache_sweeper();

    // Simulated typing: only the last query reaches the server
    for query in ["r", "re", "rel", "relo", "reloj"] {
        search.debounced_search(SearchFilters::new().with_query(query));
        tokio::time::sleep(Duration::from_millis(120)).await;
    }

    let mut updates = search.subscribe();
    loop {
        {
            let state = updates.borrow_and_update();
            if state.error.is_some() || (!state.loading && state.source.is_some()) {
                break;
            }
        }
        if updates.changed().await.is_err() {
            break;
        }
    }

    let state = search.state();
    if let Some(error) = &state.error {
        println!("Search failed: {error}");
        return Ok(());
    }
    println!(
        "{} of {} results for {:?} ({:?})",
        state.results.len(),
        state.pagination.total,
        state.filters.q,
        state.source
    );

    while let Some(source) = search.load_more().await? {
        let state = search.state();
        println!("Loaded up to {} results ({source:?})", state.results.len());
        if state.results.len() >= 200 {
            break;
        }
    }

    let source = search
        .search(SearchFilters::new().with_sort(SortBy::PriceAsc), false, true)
        .await?;
    let cheapest = search.state().results.first().map(|item| (item.name.clone(), item.price));
    println!("Cheapest match: {cheapest:?} ({source:?})");

    let recommended = search.recommended(4).await?;
    println!("Recommended: {}", recommended.len());
    for item in recommended {
        println!("  - {} ({})", item.name, item.price);
    }

    Ok(())
}
