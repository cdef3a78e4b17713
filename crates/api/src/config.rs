/// Where category, video and history documents live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Process-local collections, empty at startup.
    Memory,
    /// JSON document server reached over HTTP.
    Http { base_url: String },
    /// PostgreSQL via the `vidshelf-db` repositories.
    Postgres { database_url: String },
}

impl StoreBackend {
    pub fn name(&self) -> &'static str {
        match self {
            StoreBackend::Memory => "memory",
            StoreBackend::Http { .. } => "http",
            StoreBackend::Postgres { .. } => "postgres",
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long in-flight requests may drain after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    pub store: StoreBackend,
    /// Whether dropping a categorized card on the pool removes it from its
    /// category.
    pub pool_drop_target: bool,
    /// Queue transfers that touch a common category.
    pub serialize_transfers: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    /// | `STORE_BACKEND`        | `memory`                   |
    /// | `STORE_URL`            | `http://localhost:4000`    |
    /// | `DATABASE_URL`         | required for `postgres`    |
    /// | `POOL_DROP_TARGET`     | `true`                     |
    /// | `SERIALIZE_TRANSFERS`  | `true`                     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let store = match std::env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "memory".into())
            .to_ascii_lowercase()
            .as_str()
        {
            "memory" => StoreBackend::Memory,
            "http" => StoreBackend::Http {
                base_url: std::env::var("STORE_URL")
                    .unwrap_or_else(|_| "http://localhost:4000".into()),
            },
            "postgres" => StoreBackend::Postgres {
                database_url: std::env::var("DATABASE_URL")
                    .expect("DATABASE_URL must be set when STORE_BACKEND=postgres"),
            },
            other => panic!("STORE_BACKEND must be memory, http or postgres, got '{other}'"),
        };

        let pool_drop_target = parse_flag("POOL_DROP_TARGET", true);
        let serialize_transfers = parse_flag("SERIALIZE_TRANSFERS", true);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            store,
            pool_drop_target,
            serialize_transfers,
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_flag(var: &str, default: bool) -> bool {
    match std::env::var(var) {
        Ok(value) => parse_bool(&value)
            .unwrap_or_else(|| panic!("{var} must be true or false, got '{value}'")),
        Err(_) => default,
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
