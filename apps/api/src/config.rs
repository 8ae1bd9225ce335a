// Runtime configuration loaded from the environment (optionally via .env)

use std::net::SocketAddr;
use thiserror::Error;

const DEFAULT_JWT_SECRET: &str = "dev-secret-key";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("DATABASE_URL must be set when PORTAL_STORAGE=postgres")]
    MissingDatabaseUrl,
}

/// Where users, teams and content are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    /// Lost on restart; meant for demos and tests
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub jwt_secret: String,
    /// Lowercased emails that are provisioned with the admin role
    pub admin_emails: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind_addr = parse("PORTAL_BIND_ADDR", var("PORTAL_BIND_ADDR"), DEFAULT_BIND_ADDR)?;
        let max_connections = match var("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => match raw.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "DATABASE_MAX_CONNECTIONS",
                        value: raw,
                    })
                }
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let storage = match var("PORTAL_STORAGE").map(|v| v.to_lowercase()).as_deref() {
            None | Some("postgres") => StorageBackend::Postgres,
            Some("memory") => StorageBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "PORTAL_STORAGE",
                    value: other.to_string(),
                })
            }
        };

        let database_url = var("DATABASE_URL");
        if storage == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl);
        }

        let jwt_secret = var("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set, using development default");
            DEFAULT_JWT_SECRET.to_string()
        });

        let admin_emails = var("PORTAL_ADMIN_EMAILS")
            .map(|raw| {
                raw.split(',')
                    .map(|e| e.trim().to_lowercase())
                    .filter(|e| !e.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            bind_addr,
            storage,
            database_url,
            max_connections,
            jwt_secret,
            admin_emails,
        })
    }

    /// In-memory config for tests and local runs
    pub fn for_memory(jwt_secret: impl Into<String>) -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            storage: StorageBackend::Memory,
            database_url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            jwt_secret: jwt_secret.into(),
            admin_emails: Vec::new(),
        }
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.to_lowercase();
        self.admin_emails.iter().any(|a| *a == email)
    }
}

fn parse<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: &str,
) -> Result<T, ConfigError> {
    let value = raw.unwrap_or_else(|| default.to_string());
    value
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_apply() {
        let cfg = config(&[("DATABASE_URL", "postgres://localhost/portal")]).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(cfg.storage, StorageBackend::Postgres);
        assert_eq!(cfg.max_connections, 5);
        assert_eq!(cfg.jwt_secret, "dev-secret-key");
        assert!(cfg.admin_emails.is_empty());
    }

    #[test]
    fn postgres_requires_database_url() {
        assert_eq!(config(&[]).unwrap_err(), ConfigError::MissingDatabaseUrl);
        assert!(config(&[("PORTAL_STORAGE", "memory")]).is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        let err = config(&[("PORTAL_STORAGE", "redis")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORTAL_STORAGE", .. }));

        let err = config(&[("PORTAL_STORAGE", "memory"), ("DATABASE_MAX_CONNECTIONS", "0")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "DATABASE_MAX_CONNECTIONS", .. }));

        let err = config(&[("PORTAL_STORAGE", "memory"), ("PORTAL_BIND_ADDR", "nowhere")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORTAL_BIND_ADDR", .. }));
    }

    #[test]
    fn admin_emails_are_case_insensitive() {
        let cfg = config(&[
            ("PORTAL_STORAGE", "memory"),
            ("PORTAL_ADMIN_EMAILS", " Ada@Example.com, ,grace@example.com"),
        ])
        .unwrap();

        assert_eq!(cfg.admin_emails.len(), 2);
        assert!(cfg.is_admin_email("ADA@example.com"));
        assert!(!cfg.is_admin_email("linus@example.com"));
    }
}
