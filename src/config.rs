use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub media: MediaConfig,
    pub pagination: PaginationConfig,
    pub admin: Option<AdminBootstrap>,
    pub seed_sample_data: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Where media files live on disk and how their URLs are rendered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Fallback origin used when a request carries no `Host` header.
    pub public_base_url: String,
    pub url_path: String,
    pub root: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub page_size: i64,
    pub max_page_size: i64,
}

/// Staff account created (or refreshed) at startup so the write API is reachable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminBootstrap {
    pub username: String,
    pub email: String,
    pub token: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let admin = match (env::var("ADMIN_USERNAME"), env::var("ADMIN_TOKEN")) {
            (Ok(username), Ok(token)) if !username.is_empty() && !token.is_empty() => {
                Some(AdminBootstrap {
                    email: env::var("ADMIN_EMAIL").unwrap_or_default(),
                    username,
                    token,
                })
            }
            _ => None,
        };

        let config = Self {
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite:techlearn.db".to_string()),
                max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 5)?,
            },
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env("SERVER_PORT", 8000)?,
            },
            media: MediaConfig {
                public_base_url: env::var("PUBLIC_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:8000".to_string()),
                url_path: env::var("MEDIA_URL").unwrap_or_else(|_| "/media/".to_string()),
                root: env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".to_string()),
            },
            pagination: PaginationConfig {
                page_size: parse_env("PAGE_SIZE", 20)?,
                max_page_size: parse_env("MAX_PAGE_SIZE", 100)?,
            },
            admin,
            seed_sample_data: parse_env("SEED_SAMPLE_DATA", false)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.pagination.page_size < 1 {
            anyhow::bail!("PAGE_SIZE must be at least 1");
        }
        if self.pagination.max_page_size < self.pagination.page_size {
            anyhow::bail!("MAX_PAGE_SIZE must not be smaller than PAGE_SIZE");
        }
        if self.database.max_connections == 0 {
            anyhow::bail!("DATABASE_MAX_CONNECTIONS must be at least 1");
        }
        Ok(())
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
            },
            media: MediaConfig {
                public_base_url: "http://localhost:8000".to_string(),
                url_path: "/media/".to_string(),
                root: "media".to_string(),
            },
            pagination: PaginationConfig {
                page_size: 20,
                max_page_size: 100,
            },
            admin: None,
            seed_sample_data: false,
        }
    }
}

fn parse_env<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} has an invalid value {:?}: {}", key, raw, e)),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server_address(), "127.0.0.1:8000");
    }

    #[test]
    fn test_page_size_bounds_are_checked() {
        let mut config = Config::default();
        config.pagination.page_size = 50;
        config.pagination.max_page_size = 10;
        assert!(config.validate().is_err());

        config.pagination.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_env_falls_back_to_default() {
        let value: u16 = parse_env("TECHLEARN_TEST_UNSET_PORT", 4242).unwrap();
        assert_eq!(value, 4242);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        env::set_var("TECHLEARN_TEST_BAD_PAGE_SIZE", "twenty");
        let parsed: anyhow::Result<i64> = parse_env("TECHLEARN_TEST_BAD_PAGE_SIZE", 20);
        assert!(parsed.is_err());
        env::remove_var("TECHLEARN_TEST_BAD_PAGE_SIZE");
    }
}
