//! UserRepository - Repository per la gestione degli utenti

use super::{Create, DbConnection, Read, ReadMany};
use crate::dtos::CreateUserDTO;
use crate::entities::User;
use sqlx::{Error, QueryBuilder, Sqlite};

const COLUMNS: &str = "user_id, username, active, created_at";

// USER REPO
pub struct UserRepository;

impl UserRepository {
    /// Find user by exact username match
    pub async fn find_by_username(
        &self,
        conn: &mut DbConnection,
        username: &str,
    ) -> Result<Option<User>, Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = ?");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Legge l'utente solo se esiste ed è attivo: per i motori un utente
    /// disattivato equivale a un utente assente
    pub async fn find_active(
        &self,
        conn: &mut DbConnection,
        user_id: &i32,
    ) -> Result<Option<User>, Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE user_id = ? AND active = 1");
        sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Attiva / disattiva un utente (gestito dal sottosistema di identità)
    pub async fn set_active(
        &self,
        conn: &mut DbConnection,
        user_id: &i32,
        active: bool,
    ) -> Result<bool, Error> {
        let result = sqlx::query("UPDATE users SET active = ? WHERE user_id = ?")
            .bind(active)
            .bind(user_id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl Create<User, CreateUserDTO> for UserRepository {
    async fn create(&self, conn: &mut DbConnection, data: &CreateUserDTO) -> Result<User, Error> {
        let query = format!(
            "INSERT INTO users (username, active, created_at) VALUES (?, 1, ?) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&data.username)
            .bind(chrono::Utc::now())
            .fetch_one(&mut *conn)
            .await
    }
}

impl Read<User, i32> for UserRepository {
    async fn read(&self, conn: &mut DbConnection, id: &i32) -> Result<Option<User>, Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE user_id = ?");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }
}

impl ReadMany<User, i32> for UserRepository {
    async fn read_many(&self, conn: &mut DbConnection, ids: &[i32]) -> Result<Vec<User>, Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query_builder =
            QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM users WHERE user_id IN ("));
        let mut separated = query_builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        query_builder
            .build_query_as::<User>()
            .fetch_all(&mut *conn)
            .await
    }
}
