use crate::error::{Error, Result};
use crate::search::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub pagination: PaginationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connection_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub external_url: Option<String>,
    pub api_rate_limit: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Upper bound accepted for `pageSize`
    pub max_page_size: u32,
    pub max_request_body_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_page_size: MAX_PAGE_SIZE,
            max_request_body_size: 1_048_576,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: &str) -> Result<T> {
    std::env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| Error::Config(format!("Invalid {name} value")))
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:./data/recipes.db".to_string());

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let external_url = std::env::var("EXTERNAL_URL").ok();

        Ok(Settings {
            database: DatabaseConfig {
                url: database_url,
                max_connections: env_or("DATABASE_MAX_CONNECTIONS", "10")?,
                min_connections: env_or("DATABASE_MIN_CONNECTIONS", "1")?,
                connection_timeout_seconds: env_or("DATABASE_CONNECTION_TIMEOUT", "30")?,
                idle_timeout_seconds: env_or("DATABASE_IDLE_TIMEOUT", "600")?,
            },
            server: ServerConfig {
                host,
                port: env_or("PORT", "8080")?,
                external_url,
                api_rate_limit: env_or("API_RATE_LIMIT", "100")?,
            },
            pagination: PaginationConfig {
                max_page_size: env_or("MAX_PAGE_SIZE", "100000")?,
                max_request_body_size: env_or("MAX_REQUEST_BODY_SIZE", "1048576")?,
            },
        })
    }

    /// Base URL the CLI client uses to reach the server
    pub fn server_url(&self) -> String {
        self.server
            .external_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}", self.server.host, self.server.port))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::Config("Port must be non-zero".to_string()));
        }

        if self.server.api_rate_limit == 0 {
            return Err(Error::Config("API rate limit must be non-zero".to_string()));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(Error::Config(
                "DATABASE_MIN_CONNECTIONS exceeds DATABASE_MAX_CONNECTIONS".to_string(),
            ));
        }

        let pagination = &self.pagination;
        // Searches without a pageSize use the default, so it must stay allowed
        if pagination.max_page_size < DEFAULT_PAGE_SIZE || pagination.max_page_size > MAX_PAGE_SIZE
        {
            return Err(Error::Config(format!(
                "MAX_PAGE_SIZE must be between {DEFAULT_PAGE_SIZE} and {MAX_PAGE_SIZE}"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn test_settings() -> Settings {
    Settings {
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            connection_timeout_seconds: 30,
            idle_timeout_seconds: 600,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            external_url: None,
            api_rate_limit: 100,
        },
        pagination: PaginationConfig::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_validation() {
        let mut settings = test_settings();
        assert!(settings.validate().is_ok());

        settings.server.port = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_pagination_validation() {
        let mut settings = test_settings();
        settings.pagination.max_page_size = 0;
        assert!(settings.validate().is_err());

        settings.pagination.max_page_size = 99;
        assert!(settings.validate().is_err());

        settings.pagination.max_page_size = 200_000;
        assert!(settings.validate().is_err());

        settings.pagination.max_page_size = 500;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_server_url() {
        let mut settings = test_settings();
        assert_eq!(settings.server_url(), "http://127.0.0.1:8080");

        settings.server.external_url = Some("https://recipes.example.com".to_string());
        assert_eq!(settings.server_url(), "https://recipes.example.com");
    }
}
