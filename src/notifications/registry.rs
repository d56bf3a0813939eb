use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, instrument, warn};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    /// Destinatario: l'utente invitato
    Invited,
    /// Destinatario: il creatore dell'evento
    Joined,
    /// Destinatario: il creatore dell'evento
    Left,
    /// Destinatario: l'utente espulso
    Kicked,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Invited => "Invited",
            NotificationKind::Joined => "Joined",
            NotificationKind::Left => "Left",
            NotificationKind::Kicked => "Kicked",
        }
    }
}

/// Payload consegnato al trasporto dell'utente
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub event_id: i32,
    /// L'utente su cui è avvenuto il cambio (invitato, entrato, uscito, espulso)
    pub user_id: i32,
}

impl Notification {
    pub fn new(kind: NotificationKind, event_id: i32, user_id: i32) -> Self {
        Self {
            kind,
            event_id,
            user_id,
        }
    }
}

/// Registro delle sessioni online.
/// Key: user_id, Value: canale verso la connessione dell'utente
pub struct SessionRegistry {
    users_online: DashMap<i32, UnboundedSender<Notification>>,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        SessionRegistry {
            users_online: DashMap::new(),
        }
    }

    /// Una nuova registrazione sostituisce la precedente dello stesso utente
    #[instrument(skip(self, tx), fields(user_id))]
    pub fn register_online(&self, user_id: i32, tx: UnboundedSender<Notification>) {
        info!("Registering user {} as online", user_id);
        self.users_online.insert(user_id, tx);
        debug!("Total online users: {}", self.users_online.len());
    }

    #[instrument(skip(self), fields(user_id))]
    pub fn remove_from_online(&self, user_id: &i32) {
        info!("Removing user from online");
        self.users_online.remove(user_id);
    }

    /// Consegna la notifica se l'utente è online. Ritorna `true` se il canale
    /// l'ha accettata; un canale chiuso viene rimosso dal registro.
    #[instrument(skip(self, notification), fields(user_id, kind = notification.kind.as_str()))]
    pub fn send_if_online(&self, user_id: &i32, notification: Notification) -> bool {
        let result = match self.users_online.get(user_id) {
            Some(entry) => entry.value().send(notification),
            None => {
                debug!("User {} not online, notification dropped", user_id);
                return false;
            }
        };

        match result {
            Ok(()) => {
                debug!("Notification sent to online user");
                true
            }
            Err(e) => {
                warn!("Failed to send notification to user: {:?}", e);
                // il ricevitore è stato chiuso senza deregistrarsi
                self.users_online.remove(user_id);
                false
            }
        }
    }

    pub fn online_count(&self) -> usize {
        self.users_online.len()
    }

    pub fn is_user_online(&self, user_id: &i32) -> bool {
        self.users_online.contains_key(user_id)
    }
}
