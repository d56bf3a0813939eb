//! Telemetry - Inizializzazione del subscriber di tracing

use tracing_subscriber::EnvFilter;

/// Installa un subscriber `fmt` globale.
///
/// `RUST_LOG` ha la precedenza; altrimenti si usa `fallback_filter`
/// (tipicamente `Config::log_filter`). Chiamate successive non fanno nulla,
/// così i test possono invocarla liberamente.
pub fn init_tracing(fallback_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
