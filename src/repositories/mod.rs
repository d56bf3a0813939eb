//! Repositories module - Coordinatore per tutti i repository del progetto
//!
//! Questo modulo organizza i repository in sotto-moduli separati per una migliore manutenibilità.
//! Ogni repository gestisce le operazioni di database per una specifica entità.

// ************************* NOTA SULLE QUERY ************************* //

/*
   Le query sono scritte con le funzioni runtime di sqlx (`query_as::<_, T>` + `.bind(..)`)
   e le entità derivano `sqlx::FromRow`: così il crate compila senza un database raggiungibile.
   Ogni metodo riceve la connessione su cui lavorare:
     - letture semplici:   `let mut conn = state.pool.acquire().await?;`  -> `&mut conn`
     - check-then-write:   `let mut tx = begin_write(&state.pool).await?;` -> `&mut tx`
   dentro una transazione NON usare il pool direttamente (con SQLite in memoria c'è una sola
   connessione e la chiamata resterebbe in attesa per sempre).
   Le transazioni di scrittura partono con BEGIN IMMEDIATE: il lock di scrittura è preso
   prima delle letture e gli scrittori concorrenti attendono in coda (busy_timeout).
*/

// ************************* MODULI REPOSITORY ************************* //

pub mod event;
pub mod friendship;
pub mod invitation;
pub mod membership;
pub mod traits;
pub mod user;

use sqlx::migrate::Migrator;

// alias di tipo per il pool, per semplificare lo switch in caso in cui vogliamo usare un altro db
pub type DbPool = sqlx::SqlitePool;
pub type DbConnection = sqlx::SqliteConnection;

pub type DbTransaction = sqlx::Transaction<'static, sqlx::Sqlite>;

/// Apre una transazione che detiene subito il lock di scrittura del database
pub async fn begin_write(pool: &DbPool) -> Result<DbTransaction, sqlx::Error> {
    pool.begin_with("BEGIN IMMEDIATE").await
}

/// Migrazioni incorporate nel binario (cartella `migrations/`)
pub static MIGRATOR: Migrator = sqlx::migrate!();

// Re-esportazione dei trait per facilitare l'import
pub use traits::{Create, Delete, Read, ReadMany, Update};

// Re-esportazione delle struct dei repository per facilitare l'import
pub use event::{EventQuery, EventRepository};
pub use friendship::FriendshipRepository;
pub use invitation::InvitationRepository;
pub use membership::MembershipRepository;
pub use user::UserRepository;
