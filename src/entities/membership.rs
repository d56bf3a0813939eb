//! Membership entity - Partecipazione di un utente a un evento

use super::enums::MembershipStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Chiave naturale: (user_id, event_id)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Membership {
    pub user_id: i32,
    pub event_id: i32,
    pub status: MembershipStatus,
    // aggiornato anche al rientro dopo LEFT: è l'istante dell'ultima adesione
    pub joined_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
