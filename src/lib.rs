//! Rendezvous core - amicizie, membership, inviti e ricerca degli eventi
//!
//! Il crate non espone un trasporto: chi lo usa autentica l'utente, costruisce
//! un [`AppState`] e invoca le funzioni dei [`services`].

pub mod core;
pub mod dtos;
pub mod entities;
pub mod geo;
pub mod notifications;
pub mod repositories;
pub mod services;

// Re-export dei tipi principali per facilitare l'import
pub use crate::core::{AppError, AppState, Config, ErrorKind, Outcome, init_tracing};
pub use crate::notifications::{Notification, NotificationKind, SessionRegistry};
