//! Invitation entity - Entità invito

use super::enums::InvitationStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Invitation {
    pub invite_id: i32,
    pub target_event_id: i32, // evento a cui si viene invitati
    pub invited_id: i32,      // utente invitato
    pub inviter_id: i32,      // utente che invita
    pub state: InvitationStatus,
    pub created_at: DateTime<Utc>,
}
