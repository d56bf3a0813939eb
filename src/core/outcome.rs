//! Outcome - Esito di un'operazione che modifica lo stato
//!
//! Le operazioni "niente da fare" (già membro, già invitato, ...) non sono errori:
//! ritornano `Outcome::Unchanged` con un messaggio descrittivo.

use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "result", content = "data", rename_all = "snake_case")]
pub enum Outcome<T> {
    /// The request was applied and `T` is the new state
    Changed(T),
    /// Nothing to do: `current` is the untouched state
    Unchanged { current: T, message: &'static str },
}

impl<T> Outcome<T> {
    pub fn unchanged(current: T, message: &'static str) -> Self {
        Outcome::Unchanged { current, message }
    }

    pub fn is_changed(&self) -> bool {
        matches!(self, Outcome::Changed(_))
    }

    /// Messaggio informativo, presente solo per gli esiti senza modifiche
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Outcome::Changed(_) => None,
            Outcome::Unchanged { message, .. } => Some(message),
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Outcome::Changed(value) => value,
            Outcome::Unchanged { current, .. } => current,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Outcome::Changed(value) => value,
            Outcome::Unchanged { current, .. } => current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_carries_message_and_value() {
        let outcome = Outcome::unchanged(7, "already a member");
        assert!(!outcome.is_changed());
        assert_eq!(outcome.message(), Some("already a member"));
        assert_eq!(*outcome.value(), 7);
    }

    #[test]
    fn serializes_with_result_tag() {
        let json = serde_json::to_value(Outcome::Changed(3)).unwrap();
        assert_eq!(json, serde_json::json!({ "result": "changed", "data": 3 }));
    }
}
