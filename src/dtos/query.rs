//! Query DTOs - Filtri per la ricerca degli eventi

use crate::entities::{Event, Visibility};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Quali livelli di visibilità includere nella ricerca
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum VisibilityFilter {
    Public,
    FriendsOnly,
    Private,
    /// PUBLIC ∪ FRIENDSONLY
    #[default]
    Default,
    All,
}

impl VisibilityFilter {
    /// `None` significa nessun vincolo sulla visibilità
    pub fn visibilities(&self) -> Option<Vec<Visibility>> {
        match self {
            VisibilityFilter::Public => Some(vec![Visibility::Public]),
            VisibilityFilter::FriendsOnly => Some(vec![Visibility::FriendsOnly]),
            VisibilityFilter::Private => Some(vec![Visibility::Private]),
            VisibilityFilter::Default => Some(vec![Visibility::Public, Visibility::FriendsOnly]),
            VisibilityFilter::All => None,
        }
    }
}

/// Finestra temporale rispetto ad "adesso"
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Scope {
    Past,
    Upcoming,
    #[default]
    All,
}

/// Filtri di ricerca (query params ?limit=..&cursor=..)
#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_event_filters"))]
pub struct EventFilters {
    #[validate(range(min = 1, message = "limit must be at least 1"))]
    pub limit: Option<u32>,

    pub cursor: Option<String>,

    pub min_start: Option<DateTime<Utc>>,
    pub max_start: Option<DateTime<Utc>>,

    #[serde(default)]
    pub visibility: VisibilityFilter,

    #[validate(length(max = 100, message = "search can be at most 100 characters"))]
    pub search: Option<String>,

    #[validate(range(min = 0.0, message = "minEntryFee cannot be negative"))]
    pub min_entry_fee: Option<f64>,
    #[validate(range(min = 0.0, message = "maxEntryFee cannot be negative"))]
    pub max_entry_fee: Option<f64>,

    #[validate(range(min = -90.0, max = 90.0, message = "latitude must be in [-90, 90]"))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "longitude must be in [-180, 180]"))]
    pub longitude: Option<f64>,
    /// Raggio in km
    #[validate(range(min = 0.0, message = "maxDistance cannot be negative"))]
    pub max_distance: Option<f64>,

    #[serde(default)]
    pub scope: Scope,

    /// Se presente, gli eventi FRIENDSONLY sono limitati a quelli creati dal
    /// viewer o da un suo amico
    pub viewer_id: Option<i32>,
}

impl EventFilters {
    /// Tripla geospaziale, solo se completa
    pub fn geo(&self) -> Option<(f64, f64, f64)> {
        match (self.latitude, self.longitude, self.max_distance) {
            (Some(lat), Some(lng), Some(distance)) => Some((lat, lng, distance)),
            _ => None,
        }
    }
}

fn filter_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn validate_event_filters(filters: &EventFilters) -> Result<(), ValidationError> {
    let geo_fields = [
        filters.latitude.is_some(),
        filters.longitude.is_some(),
        filters.max_distance.is_some(),
    ];
    if geo_fields.iter().any(|set| *set) && !geo_fields.iter().all(|set| *set) {
        return Err(filter_error(
            "geo_triple",
            "latitude, longitude and maxDistance must be given together",
        ));
    }

    if let (Some(min), Some(max)) = (filters.min_start, filters.max_start) {
        if min > max {
            return Err(filter_error("start_range", "minStart must not be after maxStart"));
        }
    }

    if let (Some(min), Some(max)) = (filters.min_entry_fee, filters.max_entry_fee) {
        if min > max {
            return Err(filter_error("fee_range", "minEntryFee must not exceed maxEntryFee"));
        }
    }

    Ok(())
}

/// Una pagina di risultati; `next_cursor` è presente solo se ci sono altre righe
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EventPage {
    pub events: Vec<Event>,
    pub next_cursor: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_geo_triple_is_rejected() {
        let filters = EventFilters {
            latitude: Some(45.0),
            longitude: Some(9.0),
            ..Default::default()
        };
        assert!(filters.validate().is_err());
    }

    #[test]
    fn inverted_fee_range_is_rejected() {
        let filters = EventFilters {
            min_entry_fee: Some(20.0),
            max_entry_fee: Some(5.0),
            ..Default::default()
        };
        assert!(filters.validate().is_err());
    }

    #[test]
    fn zero_limit_is_rejected() {
        let filters = EventFilters {
            limit: Some(0),
            ..Default::default()
        };
        assert!(filters.validate().is_err());
    }

    #[test]
    fn default_visibility_covers_public_and_friends_only() {
        let filters = EventFilters::default();
        assert_eq!(
            filters.visibility.visibilities(),
            Some(vec![Visibility::Public, Visibility::FriendsOnly])
        );
        assert_eq!(VisibilityFilter::All.visibilities(), None);
    }

    #[test]
    fn filters_deserialize_from_camel_case() {
        let filters: EventFilters = serde_json::from_value(serde_json::json!({
            "limit": 5,
            "visibility": "FRIENDSONLY",
            "maxDistance": 12.5,
            "latitude": 45.0,
            "longitude": 9.0,
            "scope": "UPCOMING"
        }))
        .unwrap();

        assert_eq!(filters.limit, Some(5));
        assert_eq!(filters.visibility, VisibilityFilter::FriendsOnly);
        assert_eq!(filters.geo(), Some((45.0, 9.0, 12.5)));
        assert_eq!(filters.scope, Scope::Upcoming);
        assert!(filters.validate().is_ok());
    }
}
