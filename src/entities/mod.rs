//! Entities module - Entità del dominio applicativo
//!
//! Questo modulo contiene tutte le entità (models) che rappresentano i dati persistiti nel database.
//! Ogni entity corrisponde a una tabella nel database.

pub mod enums;
pub mod event;
pub mod friendship;
pub mod invitation;
pub mod membership;
pub mod user;

// Re-exports per facilitare l'import
pub use enums::{FriendshipStatus, InvitationStatus, MembershipStatus, Visibility};
pub use event::Event;
pub use friendship::Friendship;
pub use invitation::Invitation;
pub use membership::Membership;
pub use user::User;
