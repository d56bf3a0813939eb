//! InvitationRepository - Repository per la gestione degli inviti

use super::{Create, DbConnection, Read, Update};
use crate::dtos::{CreateInvitationDTO, UpdateInvitationDTO};
use crate::entities::{Invitation, InvitationStatus};
use chrono::Utc;
use sqlx::Error;

const COLUMNS: &str = "invite_id, target_event_id, invited_id, inviter_id, state, created_at";

//INVITATION REPOSITORY
pub struct InvitationRepository;

impl InvitationRepository {
    /// Get all pending invitations for a specific user
    pub async fn find_pending_by_user_id(
        &self,
        conn: &mut DbConnection,
        user_id: &i32,
    ) -> Result<Vec<Invitation>, Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM invitations WHERE invited_id = ? AND state = ? \
             ORDER BY created_at DESC, invite_id DESC"
        );
        sqlx::query_as::<_, Invitation>(&query)
            .bind(user_id)
            .bind(InvitationStatus::Pending)
            .fetch_all(&mut *conn)
            .await
    }

    /// L'invito (unico) di un utente per un evento, in qualunque stato
    pub async fn find_by_user_and_event(
        &self,
        conn: &mut DbConnection,
        user_id: &i32,
        event_id: &i32,
    ) -> Result<Option<Invitation>, Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM invitations WHERE invited_id = ? AND target_event_id = ?"
        );
        sqlx::query_as::<_, Invitation>(&query)
            .bind(user_id)
            .bind(event_id)
            .fetch_optional(&mut *conn)
            .await
    }
}

impl Create<Invitation, CreateInvitationDTO> for InvitationRepository {
    async fn create(
        &self,
        conn: &mut DbConnection,
        data: &CreateInvitationDTO,
    ) -> Result<Invitation, Error> {
        // lo stato iniziale è sempre PENDING
        let query = format!(
            "INSERT INTO invitations (target_event_id, invited_id, inviter_id, state, created_at) \
             VALUES (?, ?, ?, ?, ?) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Invitation>(&query)
            .bind(data.target_event_id)
            .bind(data.invited_id)
            .bind(data.inviter_id)
            .bind(InvitationStatus::Pending)
            .bind(Utc::now())
            .fetch_one(&mut *conn)
            .await
    }
}

impl Read<Invitation, i32> for InvitationRepository {
    async fn read(&self, conn: &mut DbConnection, id: &i32) -> Result<Option<Invitation>, Error> {
        let query = format!("SELECT {COLUMNS} FROM invitations WHERE invite_id = ?");
        sqlx::query_as::<_, Invitation>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }
}

impl Update<Invitation, UpdateInvitationDTO, i32> for InvitationRepository {
    async fn update(
        &self,
        conn: &mut DbConnection,
        id: &i32,
        data: &UpdateInvitationDTO,
    ) -> Result<Invitation, Error> {
        let query = format!(
            "UPDATE invitations SET state = COALESCE(?, state), inviter_id = COALESCE(?, inviter_id) \
             WHERE invite_id = ? RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Invitation>(&query)
            .bind(data.state)
            .bind(data.inviter_id)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or(Error::RowNotFound)
    }
}
