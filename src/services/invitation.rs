//! Invitation services - Inviti agli eventi
//!
//! Accettare un invito NON crea la membership: il chiamante deve poi invocare
//! `add_member` esplicitamente.

use super::{require_active_user, require_event};
use crate::core::{AppError, AppState, Outcome, is_unique_violation};
use crate::dtos::{CreateInvitationDTO, EnrichedInvitationDTO, UpdateInvitationDTO};
use crate::entities::{Invitation, InvitationStatus, Visibility};
use crate::notifications::{Notification, NotificationKind};
use crate::repositories::{Create, Read, Update, begin_write};
use tracing::{debug, info, instrument, warn};

pub const ALREADY_INVITED: &str = "User has already been invited to this event";
pub const ALREADY_ACCEPTED: &str = "Invitation already accepted";

#[instrument(skip(state), fields(event_id = %event_id, inviter_id = %inviter_id, invitee_id = %invitee_id))]
pub async fn invite_member(
    state: &AppState,
    inviter_id: i32,
    event_id: i32,
    invitee_id: i32,
) -> Result<Outcome<Invitation>, AppError> {
    debug!("Inviting user to event");
    // 1. Verificare che l'evento esista
    // 2. Verificare la capienza (membri CONFIRMED)
    // 3. Verificare che inviter e invitato esistano
    // 4. Non ci si può invitare da soli
    // 5. Se c'è già un invito PENDING o ACCEPTED non fare nulla
    // 6. Controllo di visibilità: PUBLIC chiunque, PRIVATE nessuno, FRIENDSONLY solo il creatore
    // 7. Riaprire un invito REFUSED oppure crearne uno nuovo
    // 8. Commit, poi notificare l'invitato se online

    let mut tx = begin_write(&state.pool).await?;

    let event = require_event(state, &mut tx, event_id).await?;

    let confirmed = state.membership.count_confirmed(&mut tx, &event_id).await?;
    if confirmed >= i64::from(event.max_participants) {
        warn!("Event {} is full ({}/{})", event_id, confirmed, event.max_participants);
        return Err(AppError::invalid_operation("Event is full")
            .with_details(format!("{}/{}", confirmed, event.max_participants)));
    }

    require_active_user(state, &mut tx, inviter_id).await?;
    require_active_user(state, &mut tx, invitee_id).await?;

    if inviter_id == invitee_id {
        warn!("User attempted to invite themselves");
        return Err(AppError::invalid_operation("Cannot invite yourself"));
    }

    let existing = state
        .invitation
        .find_by_user_and_event(&mut tx, &invitee_id, &event_id)
        .await?;

    if let Some(invitation) = &existing {
        match invitation.state {
            InvitationStatus::Pending => {
                info!("Pending invitation already exists");
                return Ok(Outcome::unchanged(invitation.clone(), ALREADY_INVITED));
            }
            InvitationStatus::Accepted => {
                info!("Invitation already accepted");
                return Ok(Outcome::unchanged(invitation.clone(), ALREADY_ACCEPTED));
            }
            InvitationStatus::Refused => {}
        }
    }

    match event.visibility {
        Visibility::Public => {}
        Visibility::Private => {
            warn!("Attempted to invite into private event {}", event_id);
            return Err(AppError::invalid_operation("Cannot invite users to a private event"));
        }
        Visibility::FriendsOnly if event.creator_id != inviter_id => {
            warn!("Only the creator can invite to friends-only event {}", event_id);
            return Err(AppError::invalid_operation(
                "Only the creator can invite to a friends-only event",
            ));
        }
        Visibility::FriendsOnly => {}
    }

    let invitation = match existing {
        Some(refused) => {
            debug!("Re-opening refused invitation {}", refused.invite_id);
            state
                .invitation
                .update(
                    &mut tx,
                    &refused.invite_id,
                    &UpdateInvitationDTO {
                        state: Some(InvitationStatus::Pending),
                        inviter_id: Some(inviter_id),
                    },
                )
                .await?
        }
        None => {
            let data = CreateInvitationDTO {
                target_event_id: event_id,
                invited_id: invitee_id,
                inviter_id,
            };
            match state.invitation.create(&mut tx, &data).await {
                Ok(created) => created,
                Err(e) if is_unique_violation(&e) => {
                    debug!("Concurrent invitation for the same pair, re-reading");
                    let current = state
                        .invitation
                        .find_by_user_and_event(&mut tx, &invitee_id, &event_id)
                        .await?
                        .ok_or_else(|| AppError::internal("Invitation vanished after conflict"))?;
                    return Ok(Outcome::unchanged(current, ALREADY_INVITED));
                }
                Err(e) => return Err(e.into()),
            }
        }
    };

    tx.commit().await?;

    debug!("Invitation stored with id {}", invitation.invite_id);
    state.notifications.send_if_online(
        &invitee_id,
        Notification::new(NotificationKind::Invited, event_id, invitee_id),
    );

    info!("User successfully invited to event");
    Ok(Outcome::Changed(invitation))
}

#[instrument(skip(state), fields(user_id = %user_id))]
pub async fn get_my_invitations(
    state: &AppState,
    user_id: i32,
) -> Result<Vec<EnrichedInvitationDTO>, AppError> {
    debug!("Listing pending invitations for user");
    // 1. Verificare che l'utente esista
    // 2. Recuperare gli inviti PENDING a lui indirizzati
    // 3. Arricchire ogni invito con inviter ed evento

    let mut conn = state.pool.acquire().await?;
    require_active_user(state, &mut conn, user_id).await?;

    let invitations = state
        .invitation
        .find_pending_by_user_id(&mut conn, &user_id)
        .await?;

    info!("Found {} pending invitations", invitations.len());

    let mut enriched_invitations = Vec::with_capacity(invitations.len());

    for invitation in invitations {
        let inviter = state
            .user
            .read(&mut conn, &invitation.inviter_id)
            .await?
            .map(|user| user.into());

        let event = state
            .event
            .read(&mut conn, &invitation.target_event_id)
            .await?
            .map(|event| event.into());

        enriched_invitations.push(EnrichedInvitationDTO {
            invite_id: invitation.invite_id,
            state: invitation.state,
            created_at: invitation.created_at,
            inviter,
            event,
        });
    }

    Ok(enriched_invitations)
}

async fn respond_to_invitation(
    state: &AppState,
    user_id: i32,
    invitation_id: i32,
    new_state: InvitationStatus,
) -> Result<Invitation, AppError> {
    // 1. Verificare che l'utente esista
    // 2. Recuperare l'invito
    // 3. Verificare che l'invito sia indirizzato all'utente
    // 4. Verificare che sia ancora PENDING
    // 5. Aggiornare lo stato

    let mut tx = begin_write(&state.pool).await?;

    require_active_user(state, &mut tx, user_id).await?;

    let invitation = state.invitation.read(&mut tx, &invitation_id).await?.ok_or_else(|| {
        warn!("Invitation not found: {}", invitation_id);
        AppError::not_found("Invitation not found")
    })?;

    if invitation.invited_id != user_id {
        warn!(
            "User {} attempted to respond to invitation for user {}",
            user_id, invitation.invited_id
        );
        return Err(AppError::invalid_operation(
            "You are not the recipient of this invitation",
        ));
    }

    if invitation.state != InvitationStatus::Pending {
        warn!(
            "Invitation {} is already processed: {:?}",
            invitation_id, invitation.state
        );
        return Err(AppError::conflict("Invitation is already processed")
            .with_details(format!("Invitation is already {:?}", invitation.state)));
    }

    let updated = state
        .invitation
        .update(
            &mut tx,
            &invitation_id,
            &UpdateInvitationDTO {
                state: Some(new_state),
                inviter_id: None,
            },
        )
        .await?;

    tx.commit().await?;
    Ok(updated)
}

#[instrument(skip(state), fields(user_id = %user_id, invitation_id = %invitation_id))]
pub async fn accept_invitation(
    state: &AppState,
    user_id: i32,
    invitation_id: i32,
) -> Result<Invitation, AppError> {
    debug!("Accepting invitation");
    let invitation =
        respond_to_invitation(state, user_id, invitation_id, InvitationStatus::Accepted).await?;
    info!("Invitation accepted");
    Ok(invitation)
}

#[instrument(skip(state), fields(user_id = %user_id, invitation_id = %invitation_id))]
pub async fn refuse_invitation(
    state: &AppState,
    user_id: i32,
    invitation_id: i32,
) -> Result<Invitation, AppError> {
    debug!("Refusing invitation");
    let invitation =
        respond_to_invitation(state, user_id, invitation_id, InvitationStatus::Refused).await?;
    info!("Invitation refused");
    Ok(invitation)
}
