//! Geo - Bounding box approssimato per la ricerca per distanza
//!
//! Il filtro è un rettangolo, non un cerchio: si traduce in predicati di range
//! su latitudine/longitudine che usano l'indice. Chi ha bisogno del raggio
//! esatto filtra i candidati con [`haversine_km`].

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Vincolo sulla longitudine del box
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LongitudeSpan {
    /// Nessun vincolo (box che tocca un polo o più largo del globo)
    Any,
    /// `min <= lng <= max`
    Range { min: f64, max: f64 },
    /// Il box attraversa l'antimeridiano: `lng >= from OR lng <= to`
    Wrapped { from: f64, to: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub longitude: LongitudeSpan,
}

impl BoundingBox {
    /// Box centrato in (`latitude`, `longitude`) con semi-lato `max_distance_km`.
    ///
    /// `lat_delta = d / R * 180/π`, `lng_delta = lat_delta / cos(lat)`.
    pub fn around(latitude: f64, longitude: f64, max_distance_km: f64) -> Self {
        let lat_delta = (max_distance_km / EARTH_RADIUS_KM).to_degrees();

        let min_lat = latitude - lat_delta;
        let max_lat = latitude + lat_delta;

        // vicino ai poli i meridiani convergono: qualsiasi longitudine è raggiungibile
        if min_lat <= -90.0 || max_lat >= 90.0 {
            return Self {
                min_lat: min_lat.max(-90.0),
                max_lat: max_lat.min(90.0),
                longitude: LongitudeSpan::Any,
            };
        }

        let lng_delta = lat_delta / latitude.to_radians().cos();
        let longitude_span = if !lng_delta.is_finite() || lng_delta >= 180.0 {
            LongitudeSpan::Any
        } else {
            let min_lng = longitude - lng_delta;
            let max_lng = longitude + lng_delta;
            if min_lng < -180.0 {
                LongitudeSpan::Wrapped {
                    from: min_lng + 360.0,
                    to: max_lng,
                }
            } else if max_lng > 180.0 {
                LongitudeSpan::Wrapped {
                    from: min_lng,
                    to: max_lng - 360.0,
                }
            } else {
                LongitudeSpan::Range {
                    min: min_lng,
                    max: max_lng,
                }
            }
        };

        Self {
            min_lat,
            max_lat,
            longitude: longitude_span,
        }
    }

    /// Stessa semantica (bordi inclusi) dei predicati SQL generati dal repository
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        if latitude < self.min_lat || latitude > self.max_lat {
            return false;
        }
        match self.longitude {
            LongitudeSpan::Any => true,
            LongitudeSpan::Range { min, max } => longitude >= min && longitude <= max,
            LongitudeSpan::Wrapped { from, to } => longitude >= from || longitude <= to,
        }
    }
}

/// Distanza ortodromica in km tra due punti
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}
