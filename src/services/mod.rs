//! Services module - Motori di dominio
//!
//! Ogni funzione riceve lo stato condiviso e l'id dell'utente già autenticato.
//! Le operazioni che modificano lo stato eseguono la sequenza check-then-write
//! dentro una sola transazione; le notifiche partono solo dopo il commit.

pub mod discovery;
pub mod event;
pub mod friendship;
pub mod invitation;
pub mod membership;

// Re-exports per facilitare l'import
pub use discovery::{find_all, get_my_memberships};
pub use event::{create_event, delete_event, get_event, update_event};
pub use friendship::{
    create_friendship, find_all_friends, find_all_pending_requests, find_sent_requests,
    remove_friendship, unfriend, update_friendship,
};
pub use invitation::{accept_invitation, get_my_invitations, invite_member, refuse_invitation};
pub use membership::{add_member, get_members, join_public_event, kick_member, leave_event};

use crate::core::{AppError, AppState};
use crate::entities::{Event, User};
use crate::repositories::{DbConnection, Read};
use tracing::warn;

/// Legge un utente attivo; assente o disattivato è `NotFound`
pub(crate) async fn require_active_user(
    state: &AppState,
    conn: &mut DbConnection,
    user_id: i32,
) -> Result<User, AppError> {
    state
        .user
        .find_active(conn, &user_id)
        .await?
        .ok_or_else(|| {
            warn!("User not found or inactive: {}", user_id);
            AppError::not_found("User not found")
        })
}

pub(crate) async fn require_event(
    state: &AppState,
    conn: &mut DbConnection,
    event_id: i32,
) -> Result<Event, AppError> {
    state.event.read(conn, &event_id).await?.ok_or_else(|| {
        warn!("Event not found: {}", event_id);
        AppError::not_found("Event not found")
    })
}
