use std::collections::HashSet;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub swagger: SwaggerConfig,
    pub media: MediaConfig,
    pub bot: BotConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Telegram identity verification and session token settings
#[derive(Clone)]
pub struct AuthConfig {
    /// Bot token, shared secret for WebApp initData and Login Widget signatures
    pub bot_token: String,
    /// HMAC secret for session tokens
    pub session_secret: String,
    pub session_token_ttl: Duration,
    /// Maximum accepted age of a Telegram `auth_date`
    pub auth_max_age: Duration,
    /// Telegram ids that receive the admin role
    pub admin_telegram_ids: HashSet<i64>,
}

// Secrets stay out of logs
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("bot_token", &"***")
            .field("session_secret", &"***")
            .field("session_token_ttl", &self.session_token_ttl)
            .field("auth_max_age", &self.auth_max_age)
            .field("admin_telegram_ids", &self.admin_telegram_ids)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Local media storage configuration
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Directory uploaded files are written to
    pub dir: PathBuf,
    /// URL prefix the directory is served under
    pub url_prefix: String,
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub enabled: bool,
    /// Mini-app URL shown as a WebApp button in the main menu
    pub webapp_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            media: MediaConfig::from_env()?,
            bot: BotConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 12 * 1024 * 1024; // 12MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    // Default values for database connection pool (conservative defaults for small-medium apps)
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl AuthConfig {
    const DEFAULT_SESSION_TOKEN_TTL_SECS: u64 = 7 * 24 * 3600; // 7 days
    const DEFAULT_AUTH_MAX_AGE_SECS: u64 = 86400; // 24 hours
    const MIN_SESSION_SECRET_LEN: usize = 32;

    pub fn from_env() -> Result<Self, String> {
        let bot_token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| "TELEGRAM_BOT_TOKEN environment variable is required".to_string())?;

        let session_secret = env::var("SESSION_SECRET")
            .map_err(|_| "SESSION_SECRET environment variable is required".to_string())?;
        if session_secret.len() < Self::MIN_SESSION_SECRET_LEN {
            return Err(format!(
                "SESSION_SECRET must be at least {} characters",
                Self::MIN_SESSION_SECRET_LEN
            ));
        }

        let session_token_ttl_secs = env::var("SESSION_TOKEN_TTL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_SESSION_TOKEN_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "SESSION_TOKEN_TTL_SECS must be a valid number".to_string())?;

        let auth_max_age_secs = env::var("AUTH_MAX_AGE_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_AUTH_MAX_AGE_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "AUTH_MAX_AGE_SECS must be a valid number".to_string())?;

        let admin_telegram_ids =
            parse_id_list(&env::var("ADMIN_TELEGRAM_IDS").unwrap_or_default())?;

        Ok(Self {
            bot_token,
            session_secret,
            session_token_ttl: Duration::from_secs(session_token_ttl_secs),
            auth_max_age: Duration::from_secs(auth_max_age_secs),
            admin_telegram_ids,
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Storefront API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "API documentation for the Telegram storefront".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl MediaConfig {
    pub fn from_env() -> Result<Self, String> {
        let dir = PathBuf::from(env::var("MEDIA_DIR").unwrap_or_else(|_| "media".to_string()));

        let url_prefix = env::var("MEDIA_URL_PREFIX").unwrap_or_else(|_| "/media".to_string());
        if !url_prefix.starts_with('/') {
            return Err("MEDIA_URL_PREFIX must start with '/'".to_string());
        }

        Ok(Self {
            dir,
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
        })
    }
}

impl BotConfig {
    pub fn from_env() -> Result<Self, String> {
        let enabled = match env::var("BOT_ENABLED") {
            Ok(v) => parse_bool(&v).ok_or_else(|| "BOT_ENABLED must be true or false".to_string())?,
            Err(_) => true,
        };

        let webapp_url = env::var("WEBAPP_URL").ok().filter(|s| !s.is_empty());

        Ok(Self {
            enabled,
            webapp_url,
        })
    }
}

/// Parse a comma-separated list of Telegram ids
fn parse_id_list(raw: &str) -> Result<HashSet<i64>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| format!("ADMIN_TELEGRAM_IDS contains an invalid id: '{}'", s))
        })
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_list() {
        let ids = parse_id_list(" 123, 456 ,,").unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&123));
        assert!(ids.contains(&456));
        assert!(parse_id_list("").unwrap().is_empty());
        assert!(parse_id_list("12,abc").is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
