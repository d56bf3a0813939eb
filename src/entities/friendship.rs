//! Friendship entity - Relazione di amicizia tra due utenti

use super::enums::FriendshipStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Una sola riga per coppia non ordinata. Chi deve rispondere è indicato da
/// `responder_id`, non dalla posizione delle colonne.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Friendship {
    pub friendship_id: i32,
    pub sender_id: i32,
    pub responder_id: i32,
    pub status: FriendshipStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Friendship {
    /// L'altro capo della relazione visto da `user_id`
    pub fn other_side(&self, user_id: i32) -> i32 {
        if self.sender_id == user_id {
            self.responder_id
        } else {
            self.sender_id
        }
    }
}
