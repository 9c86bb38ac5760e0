use std::time::Duration;

use agriha::config::Config;
use agriha::geocoding::{popular_locations, GeocoderTrait, NominatimGeocoder};
use agriha::models::Location;
use agriha::proxy::{self, ProxyState};
use agriha::search::fuzzy;
use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "agriha", version, about = "AGRIHA marketplace proxy and tools")]
struct Cli {
    /// Config file (defaults to agriha.toml)
    #[arg(long, global = true, env = "AGRIHA_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the same-origin GraphQL proxy
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Geocode a place name the way the search box does
    Geocode {
        /// Free-text place name
        query: Vec<String>,
    },
    /// Print the popular locations shown for an empty search
    Popular,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("agriha=info")))
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path.as_str()),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;

    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            info!("🏠 AGRIHA GraphQL proxy -> {}", config.graphql.upstream);

            let state = ProxyState::new(
                config.graphql.upstream.clone(),
                Duration::from_secs(config.graphql.timeout_secs),
            )
            .context("Failed to create HTTP client")?;
            proxy::serve(&config.server, state).await.context("Proxy server failed")?;
        }
        Command::Geocode { query } => {
            let query = query.join(" ");
            if query.trim().chars().count() < config.geocoder.min_query_len {
                anyhow::bail!(
                    "Query must be at least {} characters",
                    config.geocoder.min_query_len
                );
            }

            let geocoder = NominatimGeocoder::with_params(config.geocoder.clone())
                .context("Failed to create geocoder")?;
            info!("Searching {} for {:?}", geocoder.provider_name(), query);

            let locations = geocoder
                .geocode(query.trim())
                .await
                .context("Geocoding request failed")?;
            let locations = fuzzy::rank(&query, locations);

            info!("✅ Found {} locations", locations.len());
            print_locations(&locations);
        }
        Command::Popular => print_locations(&popular_locations()),
    }

    Ok(())
}

fn print_locations(locations: &[Location]) {
    for (i, location) in locations.iter().enumerate() {
        println!("{}. {}", i + 1, location.label());
        println!("   {:.5}, {:.5} ({:?})", location.latitude, location.longitude, location.kind);
        if let Some(count) = location.property_count {
            println!("   {} properties", count);
        }
        if let Some(description) = &location.description {
            println!("   {}", description);
        }
        println!();
    }
}
