//! Invitation DTOs - Data Transfer Objects per inviti

use crate::dtos::{EventSummaryDTO, UserDTO};
use crate::entities::InvitationStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// DTO per creare un nuovo invito (senza invite_id, state e created_at)
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateInvitationDTO {
    pub target_event_id: i32,
    pub invited_id: i32,
    pub inviter_id: i32,
}

/// DTO per aggiornare un invito
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UpdateInvitationDTO {
    pub state: Option<InvitationStatus>,
    // cambia solo quando un invito rifiutato viene riaperto da un altro utente
    pub inviter_id: Option<i32>,
}

/// DTO arricchito con le informazioni dell'inviter e dell'evento
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EnrichedInvitationDTO {
    pub invite_id: i32,
    pub state: InvitationStatus,
    pub created_at: DateTime<Utc>,
    pub inviter: Option<UserDTO>,
    pub event: Option<EventSummaryDTO>,
}
