#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use rendezvous::core::{AppState, Config};
use rendezvous::dtos::CreateEventDTO;
use rendezvous::entities::Visibility;
use rendezvous::notifications::Notification;
use sqlx::SqlitePool;
use tokio::sync::mpsc::{self, UnboundedReceiver};

// id degli utenti in fixtures/users.sql
pub const ALICE: i32 = 1;
pub const BOB: i32 = 2;
pub const CAROL: i32 = 3;
pub const DAVE: i32 = 4;
pub const ERIN_INACTIVE: i32 = 5;
pub const FRANK: i32 = 6;
pub const MISSING_USER: i32 = 999;

// id degli eventi in fixtures/events.sql
pub const JAZZ_PUBLIC: i32 = 1;
pub const DINNER_FRIENDS_ONLY: i32 = 2;
pub const PARTY_PRIVATE: i32 = 3;
pub const TINY_PUBLIC_FULL_AT_ONE: i32 = 4;
pub const OLD_CONCERT_PAST: i32 = 5;
pub const MISSING_EVENT: i32 = 999;

/// Crea un AppState per i test sopra il pool fornito da `#[sqlx::test]`
/// (migrazioni e fixtures già applicate)
pub fn create_test_state(pool: SqlitePool) -> AppState {
    rendezvous::init_tracing("warn");
    AppState::new(pool, &Config::default())
}

/// Registra l'utente come online e ritorna il ricevitore delle sue notifiche
pub fn subscribe(state: &AppState, user_id: i32) -> UnboundedReceiver<Notification> {
    let (tx, rx) = mpsc::unbounded_channel();
    state.notifications.register_online(user_id, tx);
    rx
}

pub fn day(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid test date")
}

/// Evento valido con i campi non rilevanti già compilati
pub fn event_data(title: &str, visibility: Visibility, start_time: DateTime<Utc>) -> CreateEventDTO {
    CreateEventDTO {
        title: title.to_string(),
        description: format!("{title} description"),
        visibility,
        max_participants: 50,
        start_time,
        latitude: 45.4642,
        longitude: 9.19,
        entry_fee: 0.0,
        image_key: None,
    }
}
