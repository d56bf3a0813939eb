//! Notifications - Consegna best-effort degli eventi di membership
//!
//! I motori notificano solo dopo il commit: una notifica persa non annulla
//! mai un cambio di stato già scritto.

pub mod registry;

pub use registry::{Notification, NotificationKind, SessionRegistry};
