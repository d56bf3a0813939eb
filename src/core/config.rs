use dotenv::dotenv;
use std::env;
use std::str::FromStr;
use tracing::{info, warn};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://rendezvous.db?mode=rwc";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub busy_timeout_secs: u64,
    pub default_page_size: u32,
    pub max_page_size: u32,
    pub log_filter: String,
    pub app_env: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 10,
            busy_timeout_secs: 5,
            default_page_size: 10,
            max_page_size: 100,
            log_filter: "info".to_string(),
            app_env: "development".to_string(),
        }
    }
}

impl Config {
    /// Carica la configurazione dalle variabili d'ambiente
    /// Chiama dotenv() automaticamente
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Costruisce la configurazione leggendo le chiavi da `lookup`
    /// (variabili mancanti = valore di default, numeri non validi = errore)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let defaults = Self::default();

        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| {
            warn!("DATABASE_URL not set, using {}", DEFAULT_DATABASE_URL);
            defaults.database_url.clone()
        });

        let max_connections = parse_var(&lookup, "MAX_DB_CONNECTIONS", defaults.max_connections)?;
        let busy_timeout_secs =
            parse_var(&lookup, "DB_BUSY_TIMEOUT_SECS", defaults.busy_timeout_secs)?;
        let default_page_size =
            parse_var(&lookup, "DEFAULT_PAGE_SIZE", defaults.default_page_size)?;
        let max_page_size = parse_var(&lookup, "MAX_PAGE_SIZE", defaults.max_page_size)?;

        if max_connections == 0 {
            return Err("Invalid MAX_DB_CONNECTIONS: must be a positive number".to_string());
        }

        if default_page_size == 0 || default_page_size > max_page_size {
            return Err("DEFAULT_PAGE_SIZE must be between 1 and MAX_PAGE_SIZE".to_string());
        }

        let log_filter = lookup("LOG_FILTER").unwrap_or(defaults.log_filter);

        let app_env = lookup("APP_ENV").unwrap_or(defaults.app_env);

        Ok(Config {
            database_url,
            max_connections,
            busy_timeout_secs,
            default_page_size,
            max_page_size,
            log_filter,
            app_env,
        })
    }

    /// Configurazione per un database SQLite in memoria (test e strumenti locali)
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            app_env: "test".to_string(),
            ..Self::default()
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }

    /// Logga la configurazione (nascondendo i segreti)
    pub fn print_info(&self) {
        info!(
            env = %self.app_env,
            database = %Self::mask_url(&self.database_url),
            max_connections = self.max_connections,
            busy_timeout_secs = self.busy_timeout_secs,
            default_page_size = self.default_page_size,
            max_page_size = self.max_page_size,
            "Server configuration"
        );
    }

    /// Maschera le credenziali dell'URL del database per il logging
    fn mask_url(url: &str) -> String {
        if let Some(at_pos) = url.find('@') {
            if let Some(scheme_end) = url.find("://") {
                let scheme = &url[..scheme_end + 3];
                let after_at = &url[at_pos..];
                return format!("{}***{}", scheme, after_at);
            }
        }
        // niente credenziali nell'URL (es. file SQLite): si può mostrare
        url.to_string()
    }
}

/// Legge una variabile numerica; assente = `default`
fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, String> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| format!("Invalid {key}: must be a positive number")),
    }
}
