//! Friendship services - Ciclo di vita delle amicizie

use super::require_active_user;
use crate::core::{AppError, AppState, is_unique_violation};
use crate::dtos::{CreateFriendshipDTO, FriendDTO, FriendRequestDTO, UpdateFriendshipDTO, UserDTO};
use crate::entities::{Friendship, FriendshipStatus, User};
use crate::repositories::{Create, DbConnection, Delete, ReadMany, Update, begin_write};
use tracing::{debug, info, instrument, warn};

/// Applica una nuova richiesta (sender -> responder) alla riga già esistente per la coppia
async fn apply_request_to_existing(
    state: &AppState,
    conn: &mut DbConnection,
    existing: Friendship,
    sender_id: i32,
    responder_id: i32,
) -> Result<Friendship, AppError> {
    match existing.status {
        FriendshipStatus::Accepted => {
            warn!("Users {} and {} are already friends", sender_id, responder_id);
            Err(AppError::conflict("Users are already friends"))
        }
        FriendshipStatus::Pending if existing.sender_id == responder_id => {
            // richieste incrociate: la seconda vale come accettazione della prima
            debug!("Crossed requests, accepting friendship {}", existing.friendship_id);
            let accepted = state
                .friendship
                .update(
                    conn,
                    &existing.friendship_id,
                    &UpdateFriendshipDTO {
                        status: FriendshipStatus::Accepted,
                        sender_id: None,
                        responder_id: None,
                    },
                )
                .await?;
            Ok(accepted)
        }
        FriendshipStatus::Pending => {
            warn!("Friend request already sent by {}", sender_id);
            Err(AppError::conflict("Friend request already sent"))
        }
        FriendshipStatus::Refused => {
            debug!("Re-opening refused friendship {}", existing.friendship_id);
            let reopened = state
                .friendship
                .update(
                    conn,
                    &existing.friendship_id,
                    &UpdateFriendshipDTO {
                        status: FriendshipStatus::Pending,
                        sender_id: Some(sender_id),
                        responder_id: Some(responder_id),
                    },
                )
                .await?;
            Ok(reopened)
        }
    }
}

#[instrument(skip(state), fields(sender_id = %sender_id, responder_id = %responder_id))]
pub async fn create_friendship(
    state: &AppState,
    sender_id: i32,
    responder_id: i32,
) -> Result<Friendship, AppError> {
    debug!("Creating friend request");
    // 1. Verificare che entrambi gli utenti esistano e siano attivi
    // 2. Rifiutare l'auto-amicizia
    // 3. Cercare la riga della coppia non ordinata
    // 4. Se non esiste inserire una richiesta PENDING
    // 5. Se esiste applicare le regole (già amici, richieste incrociate, già inviata, rifiutata)
    // 6. Una violazione di unicità (inserimento concorrente) riporta al punto 5

    let mut tx = begin_write(&state.pool).await?;

    require_active_user(state, &mut tx, sender_id).await?;
    require_active_user(state, &mut tx, responder_id).await?;

    if sender_id == responder_id {
        warn!("User attempted to befriend themselves");
        return Err(AppError::invalid_operation("Cannot send a friend request to yourself"));
    }

    let existing = state
        .friendship
        .find_by_pair(&mut tx, &sender_id, &responder_id)
        .await?;

    let friendship = match existing {
        Some(existing) => {
            apply_request_to_existing(state, &mut tx, existing, sender_id, responder_id).await?
        }
        None => {
            let data = CreateFriendshipDTO {
                sender_id,
                responder_id,
            };
            match state.friendship.create(&mut tx, &data).await {
                Ok(created) => created,
                Err(e) if is_unique_violation(&e) => {
                    debug!("Concurrent request for the same pair, re-reading");
                    let existing = state
                        .friendship
                        .find_by_pair(&mut tx, &sender_id, &responder_id)
                        .await?
                        .ok_or_else(|| AppError::internal("Friendship vanished after conflict"))?;
                    apply_request_to_existing(state, &mut tx, existing, sender_id, responder_id)
                        .await?
                }
                Err(e) => return Err(e.into()),
            }
        }
    };

    tx.commit().await?;

    info!(
        friendship_id = friendship.friendship_id,
        status = ?friendship.status,
        "Friend request processed"
    );
    Ok(friendship)
}

/// `responder_id` è l'utente che risponde alla richiesta
#[instrument(skip(state), fields(sender_id = %sender_id, responder_id = %responder_id, new_status = ?new_status))]
pub async fn update_friendship(
    state: &AppState,
    sender_id: i32,
    responder_id: i32,
    new_status: FriendshipStatus,
) -> Result<Friendship, AppError> {
    debug!("Responding to friend request");
    // 1. Recuperare la riga della coppia
    // 2. PENDING non è uno stato di destinazione valido
    // 3. Se la riga è già nello stato richiesto -> conflitto
    // 4. Solo il destinatario registrato può rispondere
    // 5. Solo una richiesta PENDING può cambiare stato
    // 6. Aggiornare lo stato

    let mut tx = begin_write(&state.pool).await?;

    let friendship = state
        .friendship
        .find_by_pair(&mut tx, &sender_id, &responder_id)
        .await?
        .ok_or_else(|| {
            warn!("No friendship between {} and {}", sender_id, responder_id);
            AppError::not_found("Friend request not found")
        })?;

    if new_status == FriendshipStatus::Pending {
        warn!("Attempted to move friendship back to PENDING");
        return Err(AppError::invalid_operation("A request can only be accepted or refused"));
    }

    if friendship.status == new_status {
        warn!("Friendship {} already {:?}", friendship.friendship_id, new_status);
        return Err(AppError::conflict("Friend request already in the requested state"));
    }

    if friendship.responder_id != responder_id {
        warn!(
            "User {} is not the responder of friendship {}",
            responder_id, friendship.friendship_id
        );
        return Err(AppError::unauthorized("Only the recipient can respond to a friend request"));
    }

    if friendship.status != FriendshipStatus::Pending {
        warn!(
            "Friendship {} is {:?}, not pending",
            friendship.friendship_id, friendship.status
        );
        return Err(AppError::invalid_operation("Friend request is not pending"));
    }

    let updated = state
        .friendship
        .update(
            &mut tx,
            &friendship.friendship_id,
            &UpdateFriendshipDTO {
                status: new_status,
                sender_id: None,
                responder_id: None,
            },
        )
        .await?;

    tx.commit().await?;

    info!("Friend request answered");
    Ok(updated)
}

/// Il mittente ritira una richiesta ancora PENDING
#[instrument(skip(state), fields(sender_id = %sender_id, responder_id = %responder_id))]
pub async fn remove_friendship(
    state: &AppState,
    sender_id: i32,
    responder_id: i32,
) -> Result<(), AppError> {
    debug!("Cancelling friend request");

    let mut tx = begin_write(&state.pool).await?;

    let friendship = state
        .friendship
        .find_by_pair(&mut tx, &sender_id, &responder_id)
        .await?
        .filter(|f| f.status == FriendshipStatus::Pending && f.sender_id == sender_id)
        .ok_or_else(|| {
            warn!("No pending request from {} to {}", sender_id, responder_id);
            AppError::not_found("Friend request not found")
        })?;

    state.friendship.delete(&mut tx, &friendship.friendship_id).await?;
    tx.commit().await?;

    info!("Friend request cancelled");
    Ok(())
}

/// Una delle due parti chiude un'amicizia ACCEPTED
#[instrument(skip(state), fields(user_id = %user_id, other_id = %other_id))]
pub async fn unfriend(state: &AppState, user_id: i32, other_id: i32) -> Result<(), AppError> {
    debug!("Removing friend");

    let mut tx = begin_write(&state.pool).await?;

    let friendship = state
        .friendship
        .find_by_pair(&mut tx, &user_id, &other_id)
        .await?
        .filter(|f| f.status == FriendshipStatus::Accepted)
        .ok_or_else(|| {
            warn!("Users {} and {} are not friends", user_id, other_id);
            AppError::not_found("Friendship not found")
        })?;

    state.friendship.delete(&mut tx, &friendship.friendship_id).await?;
    tx.commit().await?;

    info!("Friendship removed");
    Ok(())
}

/// Carica gli utenti attivi indicati, in una sola query
async fn load_users(
    state: &AppState,
    conn: &mut DbConnection,
    ids: &[i32],
) -> Result<Vec<User>, AppError> {
    let users = state.user.read_many(conn, ids).await?;
    Ok(users.into_iter().filter(|u| u.active).collect())
}

#[instrument(skip(state), fields(user_id = %user_id))]
pub async fn find_all_friends(state: &AppState, user_id: i32) -> Result<Vec<FriendDTO>, AppError> {
    debug!("Listing friends");
    // 1. Verificare che l'utente esista
    // 2. Recuperare le amicizie ACCEPTED in cui compare da un lato qualsiasi
    // 3. Caricare gli utenti dall'altro lato (singola query)
    // 4. Combinare in memoria

    let mut conn = state.pool.acquire().await?;
    require_active_user(state, &mut conn, user_id).await?;

    let friendships = state.friendship.find_accepted_by_user(&mut conn, &user_id).await?;
    let other_ids: Vec<i32> = friendships.iter().map(|f| f.other_side(user_id)).collect();
    let users = load_users(state, &mut conn, &other_ids).await?;

    let friends: Vec<FriendDTO> = friendships
        .into_iter()
        .filter_map(|f| {
            let other = f.other_side(user_id);
            users.iter().find(|u| u.user_id == other).map(|u| FriendDTO {
                friendship_id: f.friendship_id,
                friend: UserDTO::from(u.clone()),
                since: f.updated_at,
            })
        })
        .collect();

    info!("Found {} friends", friends.len());
    Ok(friends)
}

/// Richieste in arrivo: l'utente è il destinatario
#[instrument(skip(state), fields(user_id = %user_id))]
pub async fn find_all_pending_requests(
    state: &AppState,
    user_id: i32,
) -> Result<Vec<FriendRequestDTO>, AppError> {
    debug!("Listing incoming friend requests");

    let mut conn = state.pool.acquire().await?;
    require_active_user(state, &mut conn, user_id).await?;

    let pending = state.friendship.find_pending_received(&mut conn, &user_id).await?;
    let sender_ids: Vec<i32> = pending.iter().map(|f| f.sender_id).collect();
    let users = load_users(state, &mut conn, &sender_ids).await?;

    let requests = project_requests(pending, &users, |f| f.sender_id);
    info!("Found {} incoming requests", requests.len());
    Ok(requests)
}

/// Richieste in uscita: l'utente è il mittente
#[instrument(skip(state), fields(user_id = %user_id))]
pub async fn find_sent_requests(
    state: &AppState,
    user_id: i32,
) -> Result<Vec<FriendRequestDTO>, AppError> {
    debug!("Listing outgoing friend requests");

    let mut conn = state.pool.acquire().await?;
    require_active_user(state, &mut conn, user_id).await?;

    let pending = state.friendship.find_pending_sent(&mut conn, &user_id).await?;
    let responder_ids: Vec<i32> = pending.iter().map(|f| f.responder_id).collect();
    let users = load_users(state, &mut conn, &responder_ids).await?;

    let requests = project_requests(pending, &users, |f| f.responder_id);
    info!("Found {} outgoing requests", requests.len());
    Ok(requests)
}

fn project_requests(
    friendships: Vec<Friendship>,
    users: &[User],
    counterpart: impl Fn(&Friendship) -> i32,
) -> Vec<FriendRequestDTO> {
    friendships
        .into_iter()
        .filter_map(|f| {
            let other = counterpart(&f);
            users.iter().find(|u| u.user_id == other).map(|u| FriendRequestDTO {
                friendship_id: f.friendship_id,
                user: UserDTO::from(u.clone()),
                created_at: f.created_at,
            })
        })
        .collect()
}
