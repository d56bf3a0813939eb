//! Membership DTOs - Data Transfer Objects per le membership

use crate::entities::{Membership, MembershipStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// DTO per creare una membership (chiave naturale + stato iniziale)
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateMembershipDTO {
    pub user_id: i32,
    pub event_id: i32,
    pub status: MembershipStatus,
    pub joined_at: DateTime<Utc>,
}

/// DTO per aggiornare una membership
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UpdateMembershipDTO {
    pub status: MembershipStatus,
    // valorizzato solo quando l'aggiornamento è un nuovo ingresso (LEFT -> CONFIRMED)
    pub joined_at: Option<DateTime<Utc>>,
}

/// Elenco dei membri di un evento, senza filtri sullo stato
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MembersDTO {
    pub event_id: i32,
    pub members: Vec<Membership>,
    pub count: usize,
}
