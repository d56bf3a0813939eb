//! DTOs module - Data Transfer Objects
//!
//! Questo modulo contiene tutti i DTOs usati al confine con i chiamanti.
//! I DTOs separano la rappresentazione esterna dalla rappresentazione interna (entities).

pub mod cursor;
pub mod event;
pub mod friendship;
pub mod invitation;
pub mod membership;
pub mod query;
pub mod user;

// Re-exports per facilitare l'import
pub use cursor::EventCursor;
pub use event::{CreateEventDTO, EventSummaryDTO, NewEventDTO, UpdateEventDTO};
pub use friendship::{CreateFriendshipDTO, FriendDTO, FriendRequestDTO, UpdateFriendshipDTO};
pub use invitation::{CreateInvitationDTO, EnrichedInvitationDTO, UpdateInvitationDTO};
pub use membership::{CreateMembershipDTO, MembersDTO, UpdateMembershipDTO};
pub use query::{EventFilters, EventPage, Scope, VisibilityFilter};
pub use user::{CreateUserDTO, UserDTO};
