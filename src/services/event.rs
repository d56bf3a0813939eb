//! Event services - Creazione e gestione degli eventi

use super::{require_active_user, require_event};
use crate::core::{AppError, AppState};
use crate::dtos::{CreateEventDTO, NewEventDTO, UpdateEventDTO};
use crate::entities::Event;
use crate::repositories::{Create, Delete, Update, begin_write};
use tracing::{debug, info, instrument, warn};
use validator::Validate;

#[instrument(skip(state, data), fields(creator_id = %creator_id, visibility = data.visibility.as_str()))]
pub async fn create_event(
    state: &AppState,
    creator_id: i32,
    data: CreateEventDTO,
) -> Result<Event, AppError> {
    debug!("Creating new event");
    // 1. Validare il DTO
    // 2. Verificare che il creatore esista e sia attivo
    // 3. Inserire l'evento (il creatore NON diventa membro automaticamente)

    data.validate().map_err(|e| {
        warn!("Invalid event data: {}", e);
        AppError::from(e)
    })?;

    let mut tx = begin_write(&state.pool).await?;

    require_active_user(state, &mut tx, creator_id).await?;

    let event = state
        .event
        .create(&mut tx, &NewEventDTO { creator_id, data })
        .await?;

    tx.commit().await?;

    info!(event_id = event.event_id, "Event created");
    Ok(event)
}

#[instrument(skip(state), fields(event_id = %event_id))]
pub async fn get_event(state: &AppState, event_id: i32) -> Result<Event, AppError> {
    debug!("Fetching event");
    let mut conn = state.pool.acquire().await?;
    require_event(state, &mut conn, event_id).await
}

#[instrument(skip(state, data), fields(event_id = %event_id, actor_id = %actor_id))]
pub async fn update_event(
    state: &AppState,
    actor_id: i32,
    event_id: i32,
    data: UpdateEventDTO,
) -> Result<Event, AppError> {
    debug!("Updating event");
    // 1. Validare il DTO (solo i campi presenti)
    // 2. Verificare che l'evento esista
    // 3. Solo il creatore può modificarlo
    // 4. Aggiornamento parziale

    data.validate().map_err(|e| {
        warn!("Invalid event update: {}", e);
        AppError::from(e)
    })?;

    let mut tx = begin_write(&state.pool).await?;

    let event = require_event(state, &mut tx, event_id).await?;

    if event.creator_id != actor_id {
        warn!("User {} is not the creator of event {}", actor_id, event_id);
        return Err(AppError::unauthorized("Only the event creator can modify it"));
    }

    let updated = state.event.update(&mut tx, &event_id, &data).await?;

    tx.commit().await?;

    info!("Event updated");
    Ok(updated)
}

/// Cancella l'evento; membership e inviti seguono in cascata
#[instrument(skip(state), fields(event_id = %event_id, actor_id = %actor_id))]
pub async fn delete_event(state: &AppState, actor_id: i32, event_id: i32) -> Result<(), AppError> {
    debug!("Deleting event");

    let mut tx = begin_write(&state.pool).await?;

    let event = require_event(state, &mut tx, event_id).await?;

    if event.creator_id != actor_id {
        warn!("User {} is not the creator of event {}", actor_id, event_id);
        return Err(AppError::unauthorized("Only the event creator can delete it"));
    }

    state.event.delete(&mut tx, &event_id).await?;

    tx.commit().await?;

    info!("Event deleted");
    Ok(())
}
