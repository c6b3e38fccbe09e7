use anyhow::Result;
use clap::Parser;
use market_edge::api::events_api::{ApiConfig, EventsApiClient};
use market_edge::load_board;
use market_edge::models::Event;
use market_edge::utils::data::{load_events_from_cache, save_events_to_cache, save_offers_to_csv};
use market_edge::utils::filters::{filter_events_default, FilterOptions};
use market_edge::utils::refresh::REFRESH_INTERVAL;
use std::path::Path;

/// Print the odds board for one sport
#[derive(Parser, Debug)]
#[command(name = "market-edge", about = "Sports betting odds board")]
struct Args {
    /// Sport to display ("all" for every sport)
    #[arg(long, default_value = "all")]
    sport: String,

    /// Only show events with at least one edge
    #[arg(long)]
    edge_only: bool,

    /// Only show live events (placeholder liveness rule)
    #[arg(long)]
    live_only: bool,

    /// Only show followed events (requires API_TOKEN)
    #[arg(long)]
    followed: bool,

    /// Load events from the cache file instead of the API
    #[arg(long)]
    use_cache: bool,

    /// Export all offers to cache/offers.csv
    #[arg(long)]
    save_csv: bool,

    /// Keep running, re-fetching on the refresh cadence
    #[arg(long)]
    watch: bool,
}

fn print_board(events: &[Event], options: &FilterOptions) {
    let displayed = filter_events_default(events, options);

    if displayed.is_empty() {
        if options.edge_only {
            println!("No events with betting edges available at the moment.");
        } else {
            println!("No events available at the moment.");
        }
        return;
    }

    for (i, event) in displayed.iter().enumerate() {
        println!("{}. {}", i + 1, event.format());
        for market in &event.markets {
            println!("   [{}]", market.kind.as_str());
            for offer in &market.offers {
                println!("     {}", offer.format());
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let client = EventsApiClient::new(ApiConfig::from_env());
    let token = std::env::var("API_TOKEN").ok();

    let options = FilterOptions {
        edge_only: args.edge_only,
        live_only: args.live_only,
    };

    let cache_file = "cache/board_cache.json";

    let events = if args.use_cache && Path::new(cache_file).exists() {
        println!("Loading events from cache file: {}\n", cache_file);
        load_events_from_cache(cache_file)?
    } else {
        let board = load_board(&client, &args.sport, args.followed, token.as_deref()).await;
        if !board.sports.is_empty() {
            println!("Available sports: {}\n", board.sports.join(", "));
        }
        if Path::new("cache").exists() {
            save_events_to_cache(&board.events, cache_file)?;
        }
        board.events
    };

    println!("ODDS BOARD ({})\n", args.sport);
    print_board(&events, &options);

    if args.save_csv && !events.is_empty() {
        save_offers_to_csv(&events, "cache/offers.csv")?;
        println!("\nSaved offers to cache/offers.csv");
    }

    if args.watch {
        println!("\nWatching for updates every {}s...", REFRESH_INTERVAL.as_secs());
        loop {
            tokio::time::sleep(REFRESH_INTERVAL).await;
            let board = load_board(&client, &args.sport, args.followed, token.as_deref()).await;
            println!("\nODDS BOARD ({})\n", args.sport);
            print_board(&board.events, &options);
        }
    }

    Ok(())
}
