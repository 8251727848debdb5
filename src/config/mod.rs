use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub authentication: AuthenticationConfig,
    pub authorization: AuthorizationConfig,
    pub pagination: PaginationConfig,
    pub mail: MailConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Which `CityInfoStore` implementation backs the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    /// Only read when `backend` is `Postgres`
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticationConfig {
    #[serde(skip_serializing)]
    pub secret_for_key: String,
    pub issuer: String,
    pub audience: String,
    pub token_lifetime_minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationConfig {
    /// City a caller must claim to pass the v2 point-of-interest policy
    pub required_city: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub default_page_size: i64,
    pub max_page_size: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MailTransport {
    Local,
    Cloud,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub transport: MailTransport,
    pub mail_to: String,
    pub mail_from: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("CITYINFO_HOST") {
            self.server.host = v;
        }
        if let Some(v) = env::var("CITYINFO_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_BACKEND") {
            self.database.backend = match v.to_ascii_lowercase().as_str() {
                "postgres" | "postgresql" | "pg" => StoreBackend::Postgres,
                "memory" | "mem" => StoreBackend::Memory,
                _ => self.database.backend,
            };
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Authentication overrides
        if let Ok(v) = env::var("AUTHENTICATION_SECRET_FOR_KEY") {
            self.authentication.secret_for_key = v;
        }
        if let Ok(v) = env::var("AUTHENTICATION_ISSUER") {
            self.authentication.issuer = v;
        }
        if let Ok(v) = env::var("AUTHENTICATION_AUDIENCE") {
            self.authentication.audience = v;
        }
        if let Ok(v) = env::var("AUTHENTICATION_TOKEN_LIFETIME_MINUTES") {
            self.authentication.token_lifetime_minutes =
                v.parse().unwrap_or(self.authentication.token_lifetime_minutes);
        }

        // Authorization overrides
        if let Ok(v) = env::var("AUTHORIZATION_REQUIRED_CITY") {
            self.authorization.required_city = v;
        }

        // Pagination overrides
        if let Ok(v) = env::var("PAGINATION_DEFAULT_PAGE_SIZE") {
            self.pagination.default_page_size = v.parse().unwrap_or(self.pagination.default_page_size);
        }
        if let Ok(v) = env::var("PAGINATION_MAX_PAGE_SIZE") {
            self.pagination.max_page_size = v.parse().unwrap_or(self.pagination.max_page_size);
        }

        // Mail overrides
        if let Ok(v) = env::var("MAIL_TRANSPORT") {
            self.mail.transport = match v.to_ascii_lowercase().as_str() {
                "cloud" => MailTransport::Cloud,
                "local" => MailTransport::Local,
                _ => self.mail.transport,
            };
        }
        if let Ok(v) = env::var("MAIL_TO_ADDRESS") {
            self.mail.mail_to = v;
        }
        if let Ok(v) = env::var("MAIL_FROM_ADDRESS") {
            self.mail.mail_from = v;
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                backend: StoreBackend::Memory,
                url: None,
                max_connections: 5,
                connection_timeout: 30,
            },
            authentication: AuthenticationConfig {
                secret_for_key: "thisisthesecretforgeneratingakey(mustbeatleast32bitlong)".to_string(),
                issuer: "https://localhost:3000".to_string(),
                audience: "cityinfoapi".to_string(),
                token_lifetime_minutes: 60,
            },
            authorization: AuthorizationConfig {
                required_city: "Antwerp".to_string(),
            },
            pagination: PaginationConfig {
                default_page_size: 10,
                max_page_size: 20,
            },
            mail: MailConfig {
                transport: MailTransport::Local,
                mail_to: "admin@mycompany.com".to_string(),
                mail_from: "noreply@mycompany.com".to_string(),
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                backend: StoreBackend::Postgres,
                url: None,
                max_connections: 10,
                connection_timeout: 10,
            },
            authentication: AuthenticationConfig {
                // Must be supplied through AUTHENTICATION_SECRET_FOR_KEY
                secret_for_key: String::new(),
                issuer: "https://staging.example.com".to_string(),
                audience: "cityinfoapi".to_string(),
                token_lifetime_minutes: 60,
            },
            authorization: AuthorizationConfig {
                required_city: "Antwerp".to_string(),
            },
            pagination: PaginationConfig {
                default_page_size: 10,
                max_page_size: 20,
            },
            mail: MailConfig {
                transport: MailTransport::Cloud,
                mail_to: "admin@mycompany.com".to_string(),
                mail_from: "noreply@mycompany.com".to_string(),
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                backend: StoreBackend::Postgres,
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            authentication: AuthenticationConfig {
                secret_for_key: String::new(),
                issuer: "https://app.example.com".to_string(),
                audience: "cityinfoapi".to_string(),
                token_lifetime_minutes: 60,
            },
            authorization: AuthorizationConfig {
                required_city: "Antwerp".to_string(),
            },
            pagination: PaginationConfig {
                default_page_size: 10,
                max_page_size: 20,
            },
            mail: MailConfig {
                transport: MailTransport::Cloud,
                mail_to: "admin@mycompany.com".to_string(),
                mail_from: "noreply@mycompany.com".to_string(),
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.database.backend, StoreBackend::Memory);
        assert_eq!(config.pagination.max_page_size, 20);
        assert_eq!(config.authentication.token_lifetime_minutes, 60);
        assert!(!config.authentication.secret_for_key.is_empty());
        assert_eq!(config.authorization.required_city, "Antwerp");
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.database.backend, StoreBackend::Postgres);
        assert!(config.authentication.secret_for_key.is_empty());
        assert_eq!(config.mail.transport, MailTransport::Cloud);
    }

    #[test]
    fn bind_address_joins_host_and_port() {
        let mut config = AppConfig::development();
        config.server.port = 4321;
        assert_eq!(config.bind_address(), "127.0.0.1:4321");
    }

    #[test]
    fn secret_is_not_serialized() {
        let config = AppConfig::development();
        let value = serde_json::to_value(&config).unwrap();
        assert!(value["authentication"].get("secret_for_key").is_none());
        assert_eq!(value["authentication"]["audience"], "cityinfoapi");
    }
}
