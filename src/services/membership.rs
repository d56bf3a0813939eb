//! Membership services - Partecipazione degli utenti agli eventi
//!
//! Macchina a stati per (utente, evento): nessuna riga -> CONFIRMED -> LEFT | KICKED.
//! Da LEFT si può rientrare; KICKED blocca ogni nuova adesione senza errore.

use super::{require_active_user, require_event};
use crate::core::{AppError, AppState, Outcome, is_unique_violation};
use crate::dtos::{CreateMembershipDTO, MembersDTO, UpdateMembershipDTO};
use crate::entities::{Event, Membership, MembershipStatus, Visibility};
use crate::notifications::{Notification, NotificationKind};
use crate::repositories::{Create, DbConnection, Read, Update, begin_write};
use chrono::Utc;
use tracing::{debug, info, instrument, warn};

pub const ALREADY_MEMBER: &str = "User is already a member of this event";
pub const KICKED: &str = "User was kicked from this event";
pub const ALREADY_LEFT: &str = "User already left this event";

/// Il passo di adesione vero e proprio, condiviso da add_member e join_public_event.
/// L'idoneità è già stata stabilita dal chiamante.
async fn confirm_membership(
    state: &AppState,
    conn: &mut DbConnection,
    event_id: i32,
    user_id: i32,
) -> Result<Outcome<Membership>, AppError> {
    let existing = state.membership.read(conn, &(user_id, event_id)).await?;

    match existing {
        None => {
            let data = CreateMembershipDTO {
                user_id,
                event_id,
                status: MembershipStatus::Confirmed,
                joined_at: Utc::now(),
            };
            match state.membership.create(conn, &data).await {
                Ok(created) => Ok(Outcome::Changed(created)),
                Err(e) if is_unique_violation(&e) => {
                    debug!("Concurrent join for the same pair, re-reading");
                    let current = state
                        .membership
                        .read(conn, &(user_id, event_id))
                        .await?
                        .ok_or_else(|| AppError::internal("Membership vanished after conflict"))?;
                    Ok(Outcome::unchanged(current, ALREADY_MEMBER))
                }
                Err(e) => Err(e.into()),
            }
        }
        Some(m) => match m.status {
            MembershipStatus::Left => {
                debug!("User rejoining after leaving");
                let rejoined = state
                    .membership
                    .update(
                        conn,
                        &(user_id, event_id),
                        &UpdateMembershipDTO {
                            status: MembershipStatus::Confirmed,
                            joined_at: Some(Utc::now()),
                        },
                    )
                    .await?;
                Ok(Outcome::Changed(rejoined))
            }
            MembershipStatus::Confirmed => {
                info!("User {} already member of event {}", user_id, event_id);
                Ok(Outcome::unchanged(m, ALREADY_MEMBER))
            }
            MembershipStatus::Kicked => {
                info!("User {} was kicked from event {}", user_id, event_id);
                Ok(Outcome::unchanged(m, KICKED))
            }
        },
    }
}

/// Avvisa il creatore dell'evento (se online e se non è lui stesso l'autore)
fn notify_creator(state: &AppState, event: &Event, user_id: i32, kind: NotificationKind) {
    if event.creator_id != user_id {
        state.notifications.send_if_online(
            &event.creator_id,
            Notification::new(kind, event.event_id, user_id),
        );
    }
}

#[instrument(skip(state), fields(event_id = %event_id, user_id = %user_id))]
pub async fn add_member(
    state: &AppState,
    event_id: i32,
    user_id: i32,
) -> Result<Outcome<Membership>, AppError> {
    debug!("Adding member to event");
    // 1. Verificare che l'evento esista
    // 2. Verificare che l'utente esista e sia attivo
    // 3. Applicare la transizione (nuovo, rientro, già membro, espulso)
    // 4. Commit, poi notificare il creatore se qualcosa è cambiato

    let mut tx = begin_write(&state.pool).await?;

    let event = require_event(state, &mut tx, event_id).await?;
    require_active_user(state, &mut tx, user_id).await?;

    let outcome = confirm_membership(state, &mut tx, event_id, user_id).await?;

    tx.commit().await?;

    if outcome.is_changed() {
        notify_creator(state, &event, user_id, NotificationKind::Joined);
        info!("Member added");
    }
    Ok(outcome)
}

/// Adesione autonoma a un evento PUBLIC, con controllo di capienza
#[instrument(skip(state), fields(event_id = %event_id, user_id = %user_id))]
pub async fn join_public_event(
    state: &AppState,
    event_id: i32,
    user_id: i32,
) -> Result<Outcome<Membership>, AppError> {
    debug!("User joining public event");
    // 1. Verificare che l'evento e l'utente esistano
    // 2. Solo gli eventi PUBLIC ammettono l'adesione autonoma
    // 3. Se l'utente non è già CONFIRMED verificare la capienza
    // 4. Procedere come add_member nella stessa transazione

    let mut tx = begin_write(&state.pool).await?;

    let event = require_event(state, &mut tx, event_id).await?;
    require_active_user(state, &mut tx, user_id).await?;

    if event.visibility != Visibility::Public {
        warn!("Event {} is {}, self-join refused", event_id, event.visibility.as_str());
        return Err(AppError::invalid_operation("Only public events can be joined directly"));
    }

    let already_confirmed = state
        .membership
        .read(&mut tx, &(user_id, event_id))
        .await?
        .is_some_and(|m| m.status == MembershipStatus::Confirmed);

    if !already_confirmed {
        let confirmed = state.membership.count_confirmed(&mut tx, &event_id).await?;
        if confirmed >= i64::from(event.max_participants) {
            warn!("Event {} is full ({}/{})", event_id, confirmed, event.max_participants);
            return Err(AppError::invalid_operation("Event is full")
                .with_details(format!("{}/{}", confirmed, event.max_participants)));
        }
    }

    let outcome = confirm_membership(state, &mut tx, event_id, user_id).await?;

    tx.commit().await?;

    if outcome.is_changed() {
        notify_creator(state, &event, user_id, NotificationKind::Joined);
        info!("User joined public event");
    }
    Ok(outcome)
}

#[instrument(skip(state), fields(event_id = %event_id))]
pub async fn get_members(state: &AppState, event_id: i32) -> Result<MembersDTO, AppError> {
    debug!("Listing members for event");

    let mut conn = state.pool.acquire().await?;
    require_event(state, &mut conn, event_id).await?;

    let members = state.membership.find_many_by_event_id(&mut conn, &event_id).await?;
    let count = members.len();

    info!("Successfully retrieved {} members", count);
    Ok(MembersDTO {
        event_id,
        members,
        count,
    })
}

#[instrument(skip(state), fields(event_id = %event_id, user_id = %user_id))]
pub async fn leave_event(
    state: &AppState,
    event_id: i32,
    user_id: i32,
) -> Result<Outcome<Membership>, AppError> {
    debug!("User leaving event");
    // 1. Verificare utente, evento e membership
    // 2. LEFT o KICKED: niente da fare
    // 3. CONFIRMED -> LEFT
    // 4. Commit, poi notificare il creatore

    let mut tx = begin_write(&state.pool).await?;

    require_active_user(state, &mut tx, user_id).await?;
    let event = require_event(state, &mut tx, event_id).await?;

    let membership = state
        .membership
        .read(&mut tx, &(user_id, event_id))
        .await?
        .ok_or_else(|| {
            warn!("User {} is not a member of event {}", user_id, event_id);
            AppError::not_found("Membership not found")
        })?;

    match membership.status {
        MembershipStatus::Left => return Ok(Outcome::unchanged(membership, ALREADY_LEFT)),
        MembershipStatus::Kicked => return Ok(Outcome::unchanged(membership, KICKED)),
        MembershipStatus::Confirmed => {}
    }

    let left = state
        .membership
        .update(
            &mut tx,
            &(user_id, event_id),
            &UpdateMembershipDTO {
                status: MembershipStatus::Left,
                joined_at: None,
            },
        )
        .await?;

    tx.commit().await?;

    notify_creator(state, &event, user_id, NotificationKind::Left);
    info!("User left event");
    Ok(Outcome::Changed(left))
}

#[instrument(skip(state), fields(event_id = %event_id, actor_id = %actor_id, target_id = %target_id))]
pub async fn kick_member(
    state: &AppState,
    event_id: i32,
    actor_id: i32,
    target_id: i32,
) -> Result<Outcome<Membership>, AppError> {
    debug!("Kicking member from event");
    // 1. Verificare evento, attore, bersaglio e membership del bersaglio
    // 2. Solo il creatore può espellere
    // 3. Il creatore non può espellere se stesso
    // 4. LEFT o KICKED: niente da fare
    // 5. CONFIRMED -> KICKED, poi notificare l'espulso

    let mut tx = begin_write(&state.pool).await?;

    let event = require_event(state, &mut tx, event_id).await?;
    require_active_user(state, &mut tx, actor_id).await?;
    require_active_user(state, &mut tx, target_id).await?;

    let membership = state
        .membership
        .read(&mut tx, &(target_id, event_id))
        .await?
        .ok_or_else(|| {
            warn!("User {} is not a member of event {}", target_id, event_id);
            AppError::not_found("Membership not found")
        })?;

    if event.creator_id != actor_id {
        warn!("User {} is not the creator of event {}", actor_id, event_id);
        return Err(AppError::unauthorized("Only the event creator can remove members"));
    }

    if actor_id == target_id {
        warn!("Creator attempted to kick themselves");
        return Err(AppError::invalid_operation("The creator cannot kick themselves"));
    }

    match membership.status {
        MembershipStatus::Left => return Ok(Outcome::unchanged(membership, ALREADY_LEFT)),
        MembershipStatus::Kicked => return Ok(Outcome::unchanged(membership, KICKED)),
        MembershipStatus::Confirmed => {}
    }

    let kicked = state
        .membership
        .update(
            &mut tx,
            &(target_id, event_id),
            &UpdateMembershipDTO {
                status: MembershipStatus::Kicked,
                joined_at: None,
            },
        )
        .await?;

    tx.commit().await?;

    state.notifications.send_if_online(
        &target_id,
        Notification::new(NotificationKind::Kicked, event_id, target_id),
    );

    info!("Member kicked");
    Ok(Outcome::Changed(kicked))
}
