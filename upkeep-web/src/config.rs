//! Configuration management
//!
//! Settings come from environment variables. `.env.local` and then `.env`
//! are loaded first when present, without overriding variables that are
//! already set.
//!
//! # Environment Variables
//!
//! ```text
//! DATABASE_URL          full connection URL (wins over the DB_* parts)
//! DB_HOST               default localhost
//! DB_PORT               default 5432
//! DB_USER               required without DATABASE_URL
//! DB_PASSWORD           default empty
//! DB_NAME               required without DATABASE_URL
//! DB_MAX_CONNECTIONS    default 10
//! RUN_MIGRATIONS        default true
//! SESSION_KEY           required, at least 32 characters
//! SESSION_SECURE        default true; set false for plain-http development
//! API_HOST              default 0.0.0.0
//! API_PORT              default 1323
//! STATIC_DIR            default public
//! ```

use std::env;
use upkeep_shared::db::pool;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// Directory served under `/public`
    pub static_dir: String,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub run_migrations: bool,
}

#[derive(Clone)]
pub struct SessionConfig {
    /// HMAC key for the session cookie
    pub key: String,

    /// Adds `Secure` to the session cookie
    pub secure: bool,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("key", &"<redacted>")
            .field("secure", &self.secure)
            .finish()
    }
}

fn parse_flag(name: &str, value: Option<String>, default: bool) -> anyhow::Result<bool> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some("1") | Some("true") | Some("yes") => Ok(true),
        Some("0") | Some("false") | Some("no") => Ok(false),
        Some(other) => anyhow::bail!("{} must be true or false, got {:?}", name, other),
    }
}

impl Config {
    /// Loads `.env.local` / `.env` and reads the process environment
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::from_filename(".env.local").ok();
        dotenvy::dotenv().ok();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let port = var_or("API_PORT", "1323")
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("API_PORT is not a valid port: {}", e))?;

        let url = match lookup("DATABASE_URL").filter(|u| !u.is_empty()) {
            Some(url) => url,
            None => {
                let user = lookup("DB_USER")
                    .ok_or_else(|| anyhow::anyhow!("DATABASE_URL or DB_USER is required"))?;
                let name = lookup("DB_NAME")
                    .ok_or_else(|| anyhow::anyhow!("DATABASE_URL or DB_NAME is required"))?;
                format!(
                    "postgresql://{}:{}@{}:{}/{}",
                    urlencoding::encode(&user),
                    urlencoding::encode(&var_or("DB_PASSWORD", "")),
                    var_or("DB_HOST", "localhost"),
                    var_or("DB_PORT", "5432"),
                    name
                )
            }
        };

        let max_connections = var_or("DB_MAX_CONNECTIONS", "10")
            .parse::<u32>()
            .map_err(|e| anyhow::anyhow!("DB_MAX_CONNECTIONS is not a number: {}", e))?;

        let key = lookup("SESSION_KEY")
            .ok_or_else(|| anyhow::anyhow!("SESSION_KEY environment variable is required"))?;
        if key.len() < 32 {
            anyhow::bail!("SESSION_KEY must be at least 32 characters long");
        }

        Ok(Self {
            server: ServerConfig {
                host: var_or("API_HOST", "0.0.0.0"),
                port,
                static_dir: var_or("STATIC_DIR", "public"),
            },
            database: DatabaseConfig {
                url,
                max_connections,
                run_migrations: parse_flag("RUN_MIGRATIONS", lookup("RUN_MIGRATIONS"), true)?,
            },
            session: SessionConfig {
                key,
                secure: parse_flag("SESSION_SECURE", lookup("SESSION_SECURE"), true)?,
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Pool settings for [`upkeep_shared::db::pool::create_pool`]
    pub fn pool_config(&self) -> pool::DatabaseConfig {
        pool::DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
            ..Default::default()
        }
    }
}
