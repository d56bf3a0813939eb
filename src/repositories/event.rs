//! EventRepository - Repository per la gestione degli eventi

use super::{Create, DbConnection, Delete, Read, Update};
use crate::dtos::{EventCursor, NewEventDTO, UpdateEventDTO};
use crate::entities::{Event, Visibility};
use crate::geo::{BoundingBox, LongitudeSpan};
use chrono::{DateTime, Utc};
use sqlx::{Error, QueryBuilder, Sqlite};

const COLUMNS: &str = "event_id, creator_id, title, description, visibility, max_participants, \
     start_time, latitude, longitude, entry_fee, image_key, created_at";

// stesse colonne, qualificate per le query con JOIN
const E_COLUMNS: &str = "e.event_id, e.creator_id, e.title, e.description, e.visibility, \
     e.max_participants, e.start_time, e.latitude, e.longitude, e.entry_fee, e.image_key, \
     e.created_at";

/// Filtri già risolti (cursore decodificato, box calcolato) pronti per l'SQL
#[derive(Debug, Clone, Default)]
pub struct EventQuery {
    /// Solo eventi in cui questo utente è CONFIRMED
    pub member_id: Option<i32>,
    /// `None` = tutte le visibilità
    pub visibilities: Option<Vec<Visibility>>,
    pub min_start: Option<DateTime<Utc>>,
    pub max_start: Option<DateTime<Utc>>,
    /// `start_time < starts_before` (scope PAST)
    pub starts_before: Option<DateTime<Utc>>,
    /// `start_time >= starts_from` (scope UPCOMING)
    pub starts_from: Option<DateTime<Utc>>,
    pub search: Option<String>,
    pub min_entry_fee: Option<f64>,
    pub max_entry_fee: Option<f64>,
    pub bounds: Option<BoundingBox>,
    pub after: Option<EventCursor>,
    /// Eventi FRIENDSONLY visibili solo se creati dal viewer o da un suo amico
    pub viewer_id: Option<i32>,
    pub limit: i64,
}

/// Pattern LIKE per una ricerca per sottostringa, con i metacaratteri neutralizzati
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Testo indicizzato per la ricerca: titolo e descrizione in minuscolo (Unicode).
/// Il separatore impedisce che un termine combaci a cavallo dei due campi.
fn search_text(title: &str, description: &str) -> String {
    format!("{}\u{1f}{}", title.to_lowercase(), description.to_lowercase())
}

// EVENT REPO
pub struct EventRepository;

impl EventRepository {
    /// Eventi che rispettano i filtri, ordinati per (start_time, event_id) crescenti
    pub async fn find_filtered(
        &self,
        conn: &mut DbConnection,
        query: &EventQuery,
    ) -> Result<Vec<Event>, Error> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {E_COLUMNS} FROM events e"));

        if let Some(member_id) = query.member_id {
            qb.push(
                " JOIN memberships m ON m.event_id = e.event_id AND m.status = 'CONFIRMED' \
                 AND m.user_id = ",
            );
            qb.push_bind(member_id);
        }

        qb.push(" WHERE 1 = 1");

        if let Some(visibilities) = &query.visibilities {
            qb.push(" AND e.visibility IN (");
            let mut separated = qb.separated(", ");
            for visibility in visibilities {
                separated.push_bind(*visibility);
            }
            separated.push_unseparated(")");
        }

        if let Some(viewer_id) = query.viewer_id {
            qb.push(" AND (e.visibility <> 'FRIENDSONLY' OR e.creator_id = ");
            qb.push_bind(viewer_id);
            qb.push(
                " OR EXISTS (SELECT 1 FROM friendships f WHERE f.status = 'ACCEPTED' \
                 AND f.user_low = MIN(e.creator_id, ",
            );
            qb.push_bind(viewer_id);
            qb.push(") AND f.user_high = MAX(e.creator_id, ");
            qb.push_bind(viewer_id);
            qb.push(")))");
        }

        if let Some(min_start) = query.min_start {
            qb.push(" AND e.start_time >= ");
            qb.push_bind(min_start);
        }
        if let Some(max_start) = query.max_start {
            qb.push(" AND e.start_time <= ");
            qb.push_bind(max_start);
        }
        if let Some(before) = query.starts_before {
            qb.push(" AND e.start_time < ");
            qb.push_bind(before);
        }
        if let Some(from) = query.starts_from {
            qb.push(" AND e.start_time >= ");
            qb.push_bind(from);
        }

        if let Some(term) = query.search.as_deref() {
            qb.push(" AND e.search_text LIKE ");
            qb.push_bind(like_pattern(term));
            qb.push(" ESCAPE '\\'");
        }

        if let Some(min_fee) = query.min_entry_fee {
            qb.push(" AND e.entry_fee >= ");
            qb.push_bind(min_fee);
        }
        if let Some(max_fee) = query.max_entry_fee {
            qb.push(" AND e.entry_fee <= ");
            qb.push_bind(max_fee);
        }

        if let Some(bounds) = &query.bounds {
            qb.push(" AND e.latitude BETWEEN ");
            qb.push_bind(bounds.min_lat);
            qb.push(" AND ");
            qb.push_bind(bounds.max_lat);
            match bounds.longitude {
                LongitudeSpan::Any => {}
                LongitudeSpan::Range { min, max } => {
                    qb.push(" AND e.longitude BETWEEN ");
                    qb.push_bind(min);
                    qb.push(" AND ");
                    qb.push_bind(max);
                }
                LongitudeSpan::Wrapped { from, to } => {
                    qb.push(" AND (e.longitude >= ");
                    qb.push_bind(from);
                    qb.push(" OR e.longitude <= ");
                    qb.push_bind(to);
                    qb.push(")");
                }
            }
        }

        // keyset pagination: strettamente dopo (start_time, event_id) dell'ultima riga vista
        if let Some(cursor) = &query.after {
            qb.push(" AND (e.start_time > ");
            qb.push_bind(cursor.start_time);
            qb.push(" OR (e.start_time = ");
            qb.push_bind(cursor.start_time);
            qb.push(" AND e.event_id > ");
            qb.push_bind(cursor.event_id);
            qb.push("))");
        }

        qb.push(" ORDER BY e.start_time ASC, e.event_id ASC LIMIT ");
        qb.push_bind(query.limit);

        qb.build_query_as::<Event>().fetch_all(&mut *conn).await
    }
}

impl Create<Event, NewEventDTO> for EventRepository {
    async fn create(&self, conn: &mut DbConnection, data: &NewEventDTO) -> Result<Event, Error> {
        let event = &data.data;
        let query = format!(
            "INSERT INTO events (creator_id, title, description, visibility, max_participants, \
             start_time, latitude, longitude, entry_fee, image_key, created_at, search_text) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(data.creator_id)
            .bind(&event.title)
            .bind(&event.description)
            .bind(event.visibility)
            .bind(event.max_participants)
            .bind(event.start_time)
            .bind(event.latitude)
            .bind(event.longitude)
            .bind(event.entry_fee)
            .bind(&event.image_key)
            .bind(Utc::now())
            .bind(search_text(&event.title, &event.description))
            .fetch_one(&mut *conn)
            .await
    }
}

impl Read<Event, i32> for EventRepository {
    async fn read(&self, conn: &mut DbConnection, id: &i32) -> Result<Option<Event>, Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE event_id = ?");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }
}

impl Update<Event, UpdateEventDTO, i32> for EventRepository {
    async fn update(
        &self,
        conn: &mut DbConnection,
        id: &i32,
        data: &UpdateEventDTO,
    ) -> Result<Event, Error> {
        let query = format!(
            "UPDATE events SET \
                title = COALESCE(?, title), \
                description = COALESCE(?, description), \
                visibility = COALESCE(?, visibility), \
                max_participants = COALESCE(?, max_participants), \
                start_time = COALESCE(?, start_time), \
                latitude = COALESCE(?, latitude), \
                longitude = COALESCE(?, longitude), \
                entry_fee = COALESCE(?, entry_fee), \
                image_key = COALESCE(?, image_key) \
             WHERE event_id = ? RETURNING {COLUMNS}"
        );
        let event = sqlx::query_as::<_, Event>(&query)
            .bind(&data.title)
            .bind(&data.description)
            .bind(data.visibility)
            .bind(data.max_participants)
            .bind(data.start_time)
            .bind(data.latitude)
            .bind(data.longitude)
            .bind(data.entry_fee)
            .bind(&data.image_key)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or(Error::RowNotFound)?;

        // il testo di ricerca segue titolo e descrizione aggiornati
        if data.title.is_some() || data.description.is_some() {
            sqlx::query("UPDATE events SET search_text = ? WHERE event_id = ?")
                .bind(search_text(&event.title, &event.description))
                .bind(id)
                .execute(&mut *conn)
                .await?;
        }

        Ok(event)
    }
}

impl Delete<i32> for EventRepository {
    async fn delete(&self, conn: &mut DbConnection, id: &i32) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM events WHERE event_id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
