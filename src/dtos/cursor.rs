//! Cursor - Token opaco per la paginazione degli eventi
//!
//! Codifica la chiave di ordinamento (start_time, event_id) dell'ultima riga
//! restituita; la pagina successiva riparte strettamente dopo quella chiave.

use crate::core::AppError;
use crate::entities::Event;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, SecondsFormat, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct EventCursor {
    pub start_time: DateTime<Utc>,
    pub event_id: i32,
}

impl EventCursor {
    pub fn after(event: &Event) -> Self {
        Self {
            start_time: event.start_time,
            event_id: event.event_id,
        }
    }

    pub fn encode(&self) -> String {
        let raw = format!(
            "{}|{}",
            self.start_time.to_rfc3339_opts(SecondsFormat::Nanos, true),
            self.event_id
        );
        URL_SAFE_NO_PAD.encode(raw)
    }

    pub fn decode(token: &str) -> Result<Self, AppError> {
        let invalid = || AppError::invalid_operation("Invalid cursor");

        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|e| invalid().with_details(e.to_string()))?;
        let raw = String::from_utf8(bytes).map_err(|_| invalid())?;

        let (start_time, event_id) = raw.split_once('|').ok_or_else(invalid)?;
        let start_time = DateTime::parse_from_rfc3339(start_time)
            .map_err(|e| invalid().with_details(e.to_string()))?
            .with_timezone(&Utc);
        let event_id = event_id.parse::<i32>().map_err(|_| invalid())?;

        Ok(Self {
            start_time,
            event_id,
        })
    }
}
