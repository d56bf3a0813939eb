//! FriendshipRepository - Repository per le amicizie
//!
//! La coppia è salvata in forma canonica (user_low < user_high) con un vincolo
//! UNIQUE: qualunque sia l'ordine dei parametri, la riga è una sola.

use super::{Create, DbConnection, Delete, Update};
use crate::dtos::{CreateFriendshipDTO, UpdateFriendshipDTO};
use crate::entities::{Friendship, FriendshipStatus};
use chrono::Utc;
use sqlx::Error;

const COLUMNS: &str = "friendship_id, sender_id, responder_id, status, created_at, updated_at";

fn canonical_pair(a: i32, b: i32) -> (i32, i32) {
    if a < b { (a, b) } else { (b, a) }
}

// FRIENDSHIP REPO
pub struct FriendshipRepository;

impl FriendshipRepository {
    /// La riga della coppia non ordinata (a, b), se esiste
    pub async fn find_by_pair(
        &self,
        conn: &mut DbConnection,
        a: &i32,
        b: &i32,
    ) -> Result<Option<Friendship>, Error> {
        let (low, high) = canonical_pair(*a, *b);
        let query = format!("SELECT {COLUMNS} FROM friendships WHERE user_low = ? AND user_high = ?");
        sqlx::query_as::<_, Friendship>(&query)
            .bind(low)
            .bind(high)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Amicizie ACCEPTED in cui l'utente compare da uno qualsiasi dei due lati
    pub async fn find_accepted_by_user(
        &self,
        conn: &mut DbConnection,
        user_id: &i32,
    ) -> Result<Vec<Friendship>, Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM friendships \
             WHERE status = ? AND (user_low = ? OR user_high = ?) \
             ORDER BY updated_at DESC, friendship_id DESC"
        );
        sqlx::query_as::<_, Friendship>(&query)
            .bind(FriendshipStatus::Accepted)
            .bind(user_id)
            .bind(user_id)
            .fetch_all(&mut *conn)
            .await
    }

    /// Richieste PENDING ricevute: l'utente è il responder
    pub async fn find_pending_received(
        &self,
        conn: &mut DbConnection,
        user_id: &i32,
    ) -> Result<Vec<Friendship>, Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM friendships WHERE status = ? AND responder_id = ? \
             ORDER BY created_at DESC, friendship_id DESC"
        );
        sqlx::query_as::<_, Friendship>(&query)
            .bind(FriendshipStatus::Pending)
            .bind(user_id)
            .fetch_all(&mut *conn)
            .await
    }

    /// Richieste PENDING inviate: l'utente è il sender
    pub async fn find_pending_sent(
        &self,
        conn: &mut DbConnection,
        user_id: &i32,
    ) -> Result<Vec<Friendship>, Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM friendships WHERE status = ? AND sender_id = ? \
             ORDER BY created_at DESC, friendship_id DESC"
        );
        sqlx::query_as::<_, Friendship>(&query)
            .bind(FriendshipStatus::Pending)
            .bind(user_id)
            .fetch_all(&mut *conn)
            .await
    }
}

impl Create<Friendship, CreateFriendshipDTO> for FriendshipRepository {
    async fn create(
        &self,
        conn: &mut DbConnection,
        data: &CreateFriendshipDTO,
    ) -> Result<Friendship, Error> {
        let (low, high) = canonical_pair(data.sender_id, data.responder_id);
        let now = Utc::now();
        let query = format!(
            "INSERT INTO friendships \
             (user_low, user_high, sender_id, responder_id, status, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Friendship>(&query)
            .bind(low)
            .bind(high)
            .bind(data.sender_id)
            .bind(data.responder_id)
            .bind(FriendshipStatus::Pending)
            .bind(now)
            .bind(now)
            .fetch_one(&mut *conn)
            .await
    }
}

impl Update<Friendship, UpdateFriendshipDTO, i32> for FriendshipRepository {
    async fn update(
        &self,
        conn: &mut DbConnection,
        id: &i32,
        data: &UpdateFriendshipDTO,
    ) -> Result<Friendship, Error> {
        let query = format!(
            "UPDATE friendships SET status = ?, \
                sender_id = COALESCE(?, sender_id), \
                responder_id = COALESCE(?, responder_id), \
                updated_at = ? \
             WHERE friendship_id = ? RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Friendship>(&query)
            .bind(data.status)
            .bind(data.sender_id)
            .bind(data.responder_id)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or(Error::RowNotFound)
    }
}

impl Delete<i32> for FriendshipRepository {
    async fn delete(&self, conn: &mut DbConnection, id: &i32) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM friendships WHERE friendship_id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
