use std::path::PathBuf;

/// Server configuration.
///
/// # Environment variables
///
/// | Variable | Default | Purpose |
/// |----------|---------|---------|
/// | WORK_DIR | /var/lib/floorhost | Working directory (database, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | LOG_LEVEL | info | Tracing level filter |
/// | LOG_DIR | (unset) | Daily-rolling log file directory |
/// | TIMEZONE | UTC | Business timezone for dashboard day buckets |
/// | ENVIRONMENT | development | development \| staging \| production |
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory holding the record store and logs
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Tracing level filter
    pub log_level: String,
    /// Optional directory for rolling file logs
    pub log_dir: Option<String>,
    /// Business timezone used when bucketing dashboard stats by day
    pub timezone: chrono_tz::Tz,
    /// Runtime environment: development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/floorhost".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
            timezone: std::env::var("TIMEZONE")
                .ok()
                .and_then(|tz| tz.parse().ok())
                .unwrap_or(chrono_tz::UTC),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Path of the redb record store inside the working directory.
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("floorhost.redb")
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
