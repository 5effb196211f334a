use std::env;
use std::str::FromStr;

/// What to do when a guess or a result cannot be written to the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistencePolicy {
    /// Log the failure, keep playing, and report `persisted = false`.
    BestEffort,
    /// Fail the request so the client can retry the same attempt.
    Strict,
}

impl FromStr for PersistencePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "best-effort" | "best_effort" => Ok(PersistencePolicy::BestEffort),
            "strict" => Ok(PersistencePolicy::Strict),
            other => Err(format!("unknown persistence policy '{}'", other)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid {key}: {message}")]
pub struct ConfigError {
    pub key: &'static str,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub pokeapi_base_url: String,
    pub pokeapi_timeout_seconds: u64,
    pub offline_pokedex: bool,
    pub search_limit: usize,
    pub auth_dev_mode: bool,
    pub auth_jwt_secret: Option<String>,
    pub persistence_policy: PersistencePolicy,
    pub seed_puzzles: bool,
}

fn env_or<T>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|e: T::Err| ConfigError {
            key,
            message: e.to_string(),
        })
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let auth_dev_mode: bool = env_or("AUTH_DEV_MODE", "false")?;
        let auth_jwt_secret = env::var("AUTH_JWT_SECRET").ok().filter(|s| !s.is_empty());
        if !auth_dev_mode && auth_jwt_secret.is_none() {
            return Err(ConfigError {
                key: "AUTH_JWT_SECRET",
                message: "required unless AUTH_DEV_MODE=true".to_string(),
            });
        }

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env_or("PORT", "8080")?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://pokedexdle.db?mode=rwc".to_string()),
            pokeapi_base_url: env::var("POKEAPI_BASE_URL")
                .unwrap_or_else(|_| "https://pokeapi.co/api/v2".to_string()),
            pokeapi_timeout_seconds: env_or("POKEAPI_TIMEOUT_SECONDS", "10")?,
            offline_pokedex: env_or("POKEDEX_OFFLINE", "false")?,
            search_limit: env_or("SEARCH_LIMIT", "10")?,
            auth_dev_mode,
            auth_jwt_secret,
            persistence_policy: env_or("PERSISTENCE_POLICY", "best-effort")?,
            seed_puzzles: env_or("SEED_PUZZLES", "false")?,
        })
    }
}
