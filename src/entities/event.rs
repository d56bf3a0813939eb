//! Event entity - Entità evento

use super::enums::Visibility;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Event {
    pub event_id: i32,
    pub creator_id: i32,
    pub title: String,
    pub description: String,
    pub visibility: Visibility,
    pub max_participants: i32,
    pub start_time: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub entry_fee: f64,
    // identificativo opaco risolto in URL firmato da un servizio esterno, mai l'URL stesso
    pub image_key: Option<String>,
    pub created_at: DateTime<Utc>,
}
