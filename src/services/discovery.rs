//! Discovery services - Ricerca paginata degli eventi
//!
//! Ordinamento per (start_time, event_id) crescenti e paginazione a cursore:
//! la pagina successiva riparte strettamente dopo l'ultima chiave restituita,
//! quindi gli inserimenti concorrenti non spostano le righe già viste.

use super::require_active_user;
use crate::core::{AppError, AppState};
use crate::dtos::{EventCursor, EventFilters, EventPage, Scope};
use crate::geo::BoundingBox;
use crate::repositories::{DbConnection, EventQuery};
use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// Valida i filtri e li traduce nella query per il repository
fn build_query(state: &AppState, filters: &EventFilters) -> Result<EventQuery, AppError> {
    filters.validate().map_err(|e| {
        warn!("Invalid event filters: {}", e);
        AppError::from(e)
    })?;

    let limit = filters
        .limit
        .unwrap_or(state.default_page_size)
        .min(state.max_page_size);

    let after = filters
        .cursor
        .as_deref()
        .map(EventCursor::decode)
        .transpose()?;

    let bounds = filters
        .geo()
        .map(|(latitude, longitude, distance)| BoundingBox::around(latitude, longitude, distance));

    let now = Utc::now();
    let (starts_before, starts_from) = match filters.scope {
        Scope::Past => (Some(now), None),
        Scope::Upcoming => (None, Some(now)),
        Scope::All => (None, None),
    };

    let search = filters
        .search
        .as_deref()
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_string);

    Ok(EventQuery {
        member_id: None,
        visibilities: filters.visibility.visibilities(),
        min_start: filters.min_start,
        max_start: filters.max_start,
        starts_before,
        starts_from,
        search,
        min_entry_fee: filters.min_entry_fee,
        max_entry_fee: filters.max_entry_fee,
        bounds,
        after,
        viewer_id: filters.viewer_id,
        limit: i64::from(limit),
    })
}

/// Legge una riga in più del limite per sapere se esiste una pagina successiva
async fn fetch_page(
    state: &AppState,
    conn: &mut DbConnection,
    mut query: EventQuery,
) -> Result<EventPage, AppError> {
    let page_size = query.limit as usize;
    query.limit += 1;

    let mut events = state.event.find_filtered(conn, &query).await?;

    let next_cursor = if events.len() > page_size {
        events.truncate(page_size);
        events.last().map(|last| EventCursor::after(last).encode())
    } else {
        None
    };

    Ok(EventPage {
        events,
        next_cursor,
    })
}

#[instrument(skip(state, filters), fields(visibility = ?filters.visibility, scope = ?filters.scope))]
pub async fn find_all(state: &AppState, filters: &EventFilters) -> Result<EventPage, AppError> {
    debug!("Searching events");
    // 1. Validare i filtri (range, tripla geo, cursore)
    // 2. Calcolare limite, bounding box e finestra temporale dello scope
    // 3. Eseguire la query con limit + 1
    // 4. Produrre next_cursor solo se esistono altre righe

    let query = build_query(state, filters)?;

    let mut conn = state.pool.acquire().await?;
    let page = fetch_page(state, &mut conn, query).await?;

    info!(
        count = page.events.len(),
        has_more = page.next_cursor.is_some(),
        "Events found"
    );
    Ok(page)
}

/// Come `find_all`, ristretto agli eventi in cui l'utente è CONFIRMED
#[instrument(skip(state, filters), fields(user_id = %user_id))]
pub async fn get_my_memberships(
    state: &AppState,
    user_id: i32,
    filters: &EventFilters,
) -> Result<EventPage, AppError> {
    debug!("Listing events joined by user");

    let mut conn = state.pool.acquire().await?;
    require_active_user(state, &mut conn, user_id).await?;

    let mut query = build_query(state, filters)?;
    query.member_id = Some(user_id);

    let page = fetch_page(state, &mut conn, query).await?;

    info!(count = page.events.len(), "Joined events found");
    Ok(page)
}
