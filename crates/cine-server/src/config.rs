use std::{path::PathBuf, time::Duration};

use crate::error::Result;
use cine_dal::PoolSettings;
use cine_types::general::Environment;
pub use clap::Parser;
use url::Url;

#[derive(Debug, Clone, clap::Parser)]
#[command(version, about = "Movie catalogue REST API server")]
pub struct ServerConfig {
    #[arg(
        short,
        long,
        default_value_t = 4000,
        env = "CINE_LISTEN_PORT",
        help = "Port to listen on"
    )]
    pub port: u16,
    #[arg(
        short,
        long,
        default_value = "127.0.0.1",
        env = "CINE_LISTEN_ADDRESS",
        help = "Address to listen on"
    )]
    pub listen_address: String,

    #[arg(
        long,
        value_enum,
        default_value_t = Environment::Development,
        env = "CINE_ENV",
        help = "Environment the server runs in"
    )]
    pub env: Environment,

    #[arg(
        long,
        env = "CINE_BASE_URL",
        default_value = "http://localhost:4000",
        help = "Base URL of server, as visible to clients"
    )]
    pub base_url: Url,

    #[arg(
        long,
        env = "CINE_DATABASE_URL",
        help = "Database URL e.g. sqlite://file.db, default is sqlite://[data-dir]/cine.db, where data-dir is set by --data-dir"
    )]
    pub(crate) database_url: Option<String>,

    #[arg(
        long,
        env = "CINE_DATA_DIR",
        help = "Data directory for the database, default is system default like ~/.local/share/cine"
    )]
    pub(crate) data_dir: Option<PathBuf>,

    #[arg(
        long,
        env = "CINE_DB_MAX_CONNECTIONS",
        default_value_t = 25,
        help = "Maximum number of open database connections"
    )]
    pub db_max_connections: u32,

    #[arg(
        long,
        env = "CINE_DB_MAX_IDLE_TIME",
        default_value = "15m",
        help = "Maximum time a database connection may stay idle, in human friendly format (e.g. 15m, 1h)",
        value_parser = humantime::parse_duration
    )]
    pub db_max_idle_time: Duration,

    #[arg(
        long,
        env = "CINE_DB_ACQUIRE_TIMEOUT",
        default_value = "5s",
        help = "How long to wait for a free database connection",
        value_parser = humantime::parse_duration
    )]
    pub db_acquire_timeout: Duration,

    #[arg(long, env = "CINE_CORS", help = "Enable permissive CORS")]
    pub cors: bool,
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        ServerConfig::try_parse().map_err(|e| e.into())
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|p| p.join("cine"))
                .unwrap_or_else(|| PathBuf::from("cine"))
        })
    }

    pub fn database_url(&self) -> String {
        self.database_url
            .clone()
            .unwrap_or_else(|| format!("sqlite://{}/cine.db", self.data_dir().display()))
    }

    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.db_max_connections,
            idle_timeout: Some(self.db_max_idle_time),
            acquire_timeout: self.db_acquire_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::try_parse_from(["cine-server", "--data-dir", "/tmp/cine-data"])
            .unwrap();
        assert_eq!(4000, config.port);
        assert_eq!(Environment::Development, config.env);
        assert_eq!("sqlite:///tmp/cine-data/cine.db", config.database_url());
        let settings = config.pool_settings();
        assert_eq!(25, settings.max_connections);
        assert_eq!(Some(Duration::from_secs(900)), settings.idle_timeout);
        assert_eq!(Duration::from_secs(5), settings.acquire_timeout);
        assert!(!config.cors);
    }

    #[test]
    fn test_explicit_values() {
        let config = ServerConfig::try_parse_from([
            "cine-server",
            "--port",
            "8080",
            "--env",
            "production",
            "--database-url",
            "sqlite::memory:",
            "--db-max-idle-time",
            "1h 30m",
        ])
        .unwrap();
        assert_eq!(8080, config.port);
        assert_eq!(Environment::Production, config.env);
        assert_eq!("sqlite::memory:", config.database_url());
        assert_eq!(Duration::from_secs(5400), config.db_max_idle_time);
    }

    #[test]
    fn test_invalid_env() {
        let res = ServerConfig::try_parse_from(["cine-server", "--env", "qa"]);
        assert!(res.is_err());
    }
}
