//! MembershipRepository - Repository per le membership utente-evento

use super::{Create, DbConnection, Read, Update};
use crate::dtos::{CreateMembershipDTO, UpdateMembershipDTO};
use crate::entities::Membership;
use chrono::Utc;
use sqlx::Error;

const COLUMNS: &str = "user_id, event_id, status, joined_at, updated_at";

// MEMBERSHIP REPO
pub struct MembershipRepository;

impl MembershipRepository {
    /// Tutte le membership di un evento, in qualunque stato
    pub async fn find_many_by_event_id(
        &self,
        conn: &mut DbConnection,
        event_id: &i32,
    ) -> Result<Vec<Membership>, Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM memberships WHERE event_id = ? ORDER BY joined_at ASC, user_id ASC"
        );
        sqlx::query_as::<_, Membership>(&query)
            .bind(event_id)
            .fetch_all(&mut *conn)
            .await
    }

    /// Numero di membri CONFIRMED, usato dal controllo di capienza
    pub async fn count_confirmed(
        &self,
        conn: &mut DbConnection,
        event_id: &i32,
    ) -> Result<i64, Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM memberships WHERE event_id = ? AND status = 'CONFIRMED'",
        )
        .bind(event_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(count)
    }
}

impl Create<Membership, CreateMembershipDTO> for MembershipRepository {
    async fn create(
        &self,
        conn: &mut DbConnection,
        data: &CreateMembershipDTO,
    ) -> Result<Membership, Error> {
        let query = format!(
            "INSERT INTO memberships (user_id, event_id, status, joined_at, updated_at) \
             VALUES (?, ?, ?, ?, ?) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Membership>(&query)
            .bind(data.user_id)
            .bind(data.event_id)
            .bind(data.status)
            .bind(data.joined_at)
            .bind(data.joined_at)
            .fetch_one(&mut *conn)
            .await
    }
}

/// La chiave è la coppia naturale (user_id, event_id)
impl Read<Membership, (i32, i32)> for MembershipRepository {
    async fn read(
        &self,
        conn: &mut DbConnection,
        id: &(i32, i32),
    ) -> Result<Option<Membership>, Error> {
        let query = format!("SELECT {COLUMNS} FROM memberships WHERE user_id = ? AND event_id = ?");
        sqlx::query_as::<_, Membership>(&query)
            .bind(id.0)
            .bind(id.1)
            .fetch_optional(&mut *conn)
            .await
    }
}

impl Update<Membership, UpdateMembershipDTO, (i32, i32)> for MembershipRepository {
    async fn update(
        &self,
        conn: &mut DbConnection,
        id: &(i32, i32),
        data: &UpdateMembershipDTO,
    ) -> Result<Membership, Error> {
        let query = format!(
            "UPDATE memberships SET status = ?, joined_at = COALESCE(?, joined_at), updated_at = ? \
             WHERE user_id = ? AND event_id = ? RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Membership>(&query)
            .bind(data.status)
            .bind(data.joined_at)
            .bind(Utc::now())
            .bind(id.0)
            .bind(id.1)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or(Error::RowNotFound)
    }
}
