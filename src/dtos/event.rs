//! Event DTOs - Data Transfer Objects per eventi

use crate::entities::{Event, Visibility};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// DTO per creare un nuovo evento (senza event_id e creator_id, che arriva dall'identità)
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateEventDTO {
    #[validate(length(min = 1, max = 120, message = "Title must be between 1 and 120 characters"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 2000, message = "Description can be at most 2000 characters"))]
    pub description: String,

    pub visibility: Visibility,

    #[validate(range(min = 1, message = "An event needs room for at least one participant"))]
    pub max_participants: i32,

    pub start_time: DateTime<Utc>,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be in [-90, 90]"))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be in [-180, 180]"))]
    pub longitude: f64,

    #[serde(default)]
    #[validate(range(min = 0.0, message = "Entry fee cannot be negative"))]
    pub entry_fee: f64,

    #[serde(default)]
    pub image_key: Option<String>,
}

/// DTO per aggiornare un evento (solo i campi `Some(_)` vengono modificati)
#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateEventDTO {
    #[validate(length(min = 1, max = 120, message = "Title must be between 1 and 120 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 2000, message = "Description can be at most 2000 characters"))]
    pub description: Option<String>,

    pub visibility: Option<Visibility>,

    #[validate(range(min = 1, message = "An event needs room for at least one participant"))]
    pub max_participants: Option<i32>,

    pub start_time: Option<DateTime<Utc>>,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be in [-90, 90]"))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be in [-180, 180]"))]
    pub longitude: Option<f64>,

    #[validate(range(min = 0.0, message = "Entry fee cannot be negative"))]
    pub entry_fee: Option<f64>,

    pub image_key: Option<String>,
}

/// Vista ridotta di un evento, usata dentro gli inviti
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EventSummaryDTO {
    pub event_id: i32,
    pub title: String,
    pub visibility: Visibility,
    pub start_time: DateTime<Utc>,
}

impl From<Event> for EventSummaryDTO {
    fn from(value: Event) -> Self {
        Self {
            event_id: value.event_id,
            title: value.title,
            visibility: value.visibility,
            start_time: value.start_time,
        }
    }
}

/// Dati completi per l'inserimento: il creator arriva dall'identità, il resto dal client
#[derive(Debug, Clone)]
pub struct NewEventDTO {
    pub creator_id: i32,
    pub data: CreateEventDTO,
}
