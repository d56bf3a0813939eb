//! Application State - Stato condiviso dai motori di dominio
//!
//! Contiene il pool di connessioni, tutti i repository e il registro delle
//! sessioni usato per le notifiche.

use crate::core::{AppError, Config};
use crate::notifications::SessionRegistry;
use crate::repositories::{
    DbPool, EventRepository, FriendshipRepository, InvitationRepository, MIGRATOR,
    MembershipRepository, UserRepository,
};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Stato condiviso tra tutte le operazioni. I motori non tengono altro stato:
/// ogni chiamata legge e scrive solo attraverso il pool.
pub struct AppState {
    /// Pool di connessioni al database relazionale
    pub pool: DbPool,

    /// Repository per la gestione degli utenti
    pub user: UserRepository,

    /// Repository per la gestione degli eventi
    pub event: EventRepository,

    /// Repository per la gestione delle membership utente-evento
    pub membership: MembershipRepository,

    /// Repository per la gestione degli inviti
    pub invitation: InvitationRepository,

    /// Repository per la gestione delle amicizie
    pub friendship: FriendshipRepository,

    /// Sessioni online a cui consegnare le notifiche
    /// Key: user_id, Value: canale verso il trasporto dell'utente
    pub notifications: SessionRegistry,

    /// Dimensione di pagina usata quando i filtri non specificano `limit`
    pub default_page_size: u32,

    /// Limite superiore per `limit`
    pub max_page_size: u32,
}

impl AppState {
    /// Crea una nuova istanza di AppState a partire da un pool già pronto
    /// (migrazioni già applicate).
    pub fn new(pool: DbPool, config: &Config) -> Self {
        Self {
            pool,
            user: UserRepository,
            event: EventRepository,
            membership: MembershipRepository,
            invitation: InvitationRepository,
            friendship: FriendshipRepository,
            notifications: SessionRegistry::new(),
            default_page_size: config.default_page_size,
            max_page_size: config.max_page_size,
        }
    }

    /// Apre il pool secondo la configurazione e applica le migrazioni.
    ///
    /// Un database in memoria esiste solo finché vive la sua connessione,
    /// quindi in quel caso il pool è bloccato a una connessione senza scadenza.
    #[instrument(skip(config), fields(env = %config.app_env))]
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        debug!("Opening database pool");
        config.print_info();

        let mut options = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(config.busy_timeout_secs));

        let pool_options = if config.is_in_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            options = options.journal_mode(SqliteJournalMode::Wal);
            SqlitePoolOptions::new().max_connections(config.max_connections)
        };

        let pool = pool_options.connect_with(options).await?;

        MIGRATOR.run(&pool).await?;
        info!("Database ready, migrations applied");

        Ok(Self::new(pool, config))
    }
}
