//! Events and favorites.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::profile::ProfileSummary;
use crate::money::Money;

/// Categories offered by the event forms and filters.
pub const CATEGORIES: &[&str] = &[
    "Música",
    "Festas",
    "Teatro",
    "Esportes",
    "Gastronomia",
    "Tecnologia",
    "Arte",
    "Outros",
];

/// A row in `events`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    /// Markdown.
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Ticket price in reais; zero for free events.
    #[serde(default)]
    pub price: f64,
    pub category: String,
    pub organizer_id: Uuid,
    pub image_url: Option<String>,
    pub capacity: Option<u32>,
    pub created_at: Option<DateTime<Utc>>,
    /// Embedded with `organizer:profiles(...)` when selected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<ProfileSummary>,
}

impl Event {
    pub fn price(&self) -> Money {
        Money::from_reais(self.price)
    }

    pub fn is_free(&self) -> bool {
        self.price().is_zero()
    }

    /// `(latitude, longitude)` when both are set.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }

    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.date >= now
    }

    /// Form values for editing this event.
    pub fn to_new(&self) -> NewEvent {
        NewEvent {
            title: self.title.clone(),
            description: self.description.clone(),
            date: self.date,
            location: self.location.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            price: self.price,
            category: self.category.clone(),
            organizer_id: self.organizer_id,
            image_url: self.image_url.clone(),
            capacity: self.capacity,
        }
    }
}

/// The subset of an event embedded in tickets and favorites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    pub id: Uuid,
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Insert/update payload for `events`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub price: f64,
    pub category: String,
    pub organizer_id: Uuid,
    pub image_url: Option<String>,
    pub capacity: Option<u32>,
}

/// Criteria for listing events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    /// Matched against title and location.
    pub search: Option<String>,
    pub category: Option<String>,
    /// Only events from now on.
    pub upcoming_only: bool,
    pub organizer: Option<Uuid>,
    /// Only events that have coordinates.
    pub with_coordinates: bool,
    pub limit: Option<usize>,
}

impl EventFilter {
    pub fn upcoming() -> Self {
        Self {
            upcoming_only: true,
            ..Default::default()
        }
    }

    /// Search term with characters that would break the filter syntax removed.
    pub fn search_term(&self) -> Option<String> {
        let term: String = self
            .search
            .as_deref()?
            .chars()
            .filter(|c| !matches!(c, ',' | '(' | ')' | '*' | '%' | '"' | '\\'))
            .collect();
        let term = term.trim();
        (!term.is_empty()).then(|| term.to_string())
    }
}

/// A row in `favorites`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    pub user_id: Uuid,
    pub event_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<EventSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(price: f64, lat: Option<f64>, lon: Option<f64>) -> Event {
        serde_json::from_value(json!({
            "id": "0b9c2d1e-7a4f-4e8b-9c3d-2e1f0a9b8c7d",
            "title": "Samba na Praça",
            "description": null,
            "date": "2030-03-01T22:00:00Z",
            "location": "Praça XV",
            "latitude": lat,
            "longitude": lon,
            "price": price,
            "category": "Música",
            "organizer_id": "5f1c1a3e-6b9a-4f39-9df5-1d2a3b4c5d6e",
            "image_url": null,
            "capacity": 200,
            "created_at": null
        }))
        .unwrap()
    }

    #[test]
    fn test_price_and_free() {
        assert!(event(0.0, None, None).is_free());
        let paid = event(35.5, None, None);
        assert!(!paid.is_free());
        assert_eq!(paid.price(), Money::from_cents(3550));
    }

    #[test]
    fn test_coordinates_need_both_values() {
        assert_eq!(event(0.0, Some(-22.9), Some(-43.2)).coordinates(), Some((-22.9, -43.2)));
        assert_eq!(event(0.0, Some(-22.9), None).coordinates(), None);
    }

    #[test]
    fn test_search_term_is_sanitized() {
        let filter = EventFilter {
            search: Some("  rock,(in) rio* ".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.search_term().as_deref(), Some("rockin rio"));

        let blank = EventFilter {
            search: Some(" ,, ".to_string()),
            ..Default::default()
        };
        assert_eq!(blank.search_term(), None);
    }

    #[test]
    fn test_to_new_keeps_fields() {
        let e = event(10.0, Some(1.0), Some(2.0));
        let new = e.to_new();
        assert_eq!(new.title, e.title);
        assert_eq!(new.capacity, Some(200));
        assert_eq!(new.latitude, Some(1.0));
    }
}
