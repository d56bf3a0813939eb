//! Core Module - Componenti infrastrutturali dell'applicazione
//!
//! Questo modulo contiene tutti i componenti "core" dell'applicazione:
//! - Configurazione
//! - Gestione errori ed esiti
//! - Stato applicazione
//! - Tracing

pub mod config;
pub mod error;
pub mod outcome;
pub mod state;
pub mod telemetry;

// Re-exports per facilitare l'import
pub use config::Config;
pub use error::{AppError, ErrorKind, is_unique_violation};
pub use outcome::Outcome;
pub use state::AppState;
pub use telemetry::init_tracing;
