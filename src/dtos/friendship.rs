//! Friendship DTOs - Data Transfer Objects per amicizie

use crate::dtos::UserDTO;
use crate::entities::FriendshipStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateFriendshipDTO {
    pub sender_id: i32,
    pub responder_id: i32,
}

/// Aggiornamento di stato; sender/responder cambiano solo quando una richiesta
/// rifiutata viene riaperta nella direzione opposta
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UpdateFriendshipDTO {
    pub status: FriendshipStatus,
    pub sender_id: Option<i32>,
    pub responder_id: Option<i32>,
}

/// Un amico confermato, visto da uno dei due capi
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FriendDTO {
    pub friendship_id: i32,
    pub friend: UserDTO,
    pub since: DateTime<Utc>,
}

/// Richiesta di amicizia in attesa; `user` è la controparte
/// (il mittente per le richieste ricevute, il destinatario per quelle inviate)
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FriendRequestDTO {
    pub friendship_id: i32,
    pub user: UserDTO,
    pub created_at: DateTime<Utc>,
}
