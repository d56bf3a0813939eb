//! User entity - Entità utente
//!
//! L'identità vera e propria (credenziali, token) è gestita da un sottosistema
//! esterno: qui serve solo come ancora per id e stato di attivazione.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct User {
    pub user_id: i32,
    pub username: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}
