use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dexdle_core::utc_today;
use dexdle_persistence::{DatabaseStore, connection::connect_and_migrate};
use dexdle_server::{
    auth::AuthService,
    config::Config,
    create_routes,
    daily_game::DailyGameService,
    pokedex::{PokeApiClient, PokemonLookup, StaticPokedex},
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Pokedexdle server...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize database connection and run migrations
    let db = match connect_and_migrate(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to connect to database and run migrations: {}", e);
            std::process::exit(1);
        }
    };
    let store = Arc::new(DatabaseStore::new(db));

    let pokedex: Arc<dyn PokemonLookup> = if config.offline_pokedex {
        info!("Using the built-in offline Pokédex");
        Arc::new(StaticPokedex::kanto_starters())
    } else {
        match PokeApiClient::new(
            config.pokeapi_base_url.clone(),
            Duration::from_secs(config.pokeapi_timeout_seconds),
        ) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                tracing::error!("Failed to build PokeAPI client: {}", e);
                std::process::exit(1);
            }
        }
    };

    if config.seed_puzzles {
        let names = StaticPokedex::kanto_starters().species_names();
        let answers: Vec<&str> = names.iter().map(String::as_str).collect();
        match store.puzzles().seed_puzzles(utc_today(), &answers).await {
            Ok(inserted) => info!("Seeded {} daily puzzles", inserted),
            Err(e) => tracing::warn!("Failed to seed puzzles: {}", e),
        }
    }

    let auth_service = match (&config.auth_jwt_secret, config.auth_dev_mode) {
        (_, true) => {
            info!("Starting in development authentication mode - JWT validation disabled");
            Arc::new(AuthService::new_dev_mode())
        }
        (Some(secret), false) => Arc::new(AuthService::new(secret)),
        (None, false) => {
            tracing::error!("AUTH_JWT_SECRET is required outside of dev mode");
            std::process::exit(1);
        }
    };

    let game_service = Arc::new(
        DailyGameService::new(store.clone(), pokedex, config.persistence_policy)
            .with_search_limit(config.search_limit),
    );
    info!("Persistence policy: {:?}", game_service.policy());

    let routes = create_routes(game_service, store, auth_service);

    info!("Server starting on {}:{}", config.host, config.port);

    let ip = match config.host.parse::<std::net::IpAddr>() {
        Ok(ip) => ip,
        Err(e) => {
            tracing::error!("Invalid HOST '{}': {}", config.host, e);
            std::process::exit(1);
        }
    };

    let (addr, server) = warp::serve(routes).bind_with_graceful_shutdown((ip, config.port), async {
        // Wait for SIGINT (Ctrl+C) or SIGTERM
        #[cfg(unix)]
        {
            let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt()).unwrap();
            let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate()).unwrap();

            tokio::select! {
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down gracefully...");
                }
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully...");
                }
            }
        }

        #[cfg(not(unix))]
        {
            signal::ctrl_c().await.expect("Failed to listen for ctrl+c");
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    });

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
}
