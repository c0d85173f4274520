//! Caller location hints attached to each chat request.

use serde::{Deserialize, Serialize};

/// Where (and when) a request originates, as far as the caller knows.
///
/// Built per request from geolocation metadata; every field may be missing.
/// Immutable once built and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestHints {
    #[serde(default)]
    pub latitude: Option<String>,

    #[serde(default)]
    pub longitude: Option<String>,

    #[serde(default)]
    pub city: Option<String>,

    #[serde(default)]
    pub country: Option<String>,

    /// Caller-local date and time, when the caller supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_date_time: Option<String>,
}

impl RequestHints {
    /// Fill unset fields from `other`, keeping fields already present.
    ///
    /// Blank strings count as unset on both sides.
    pub fn or(self, other: RequestHints) -> RequestHints {
        RequestHints {
            latitude: present(self.latitude).or(present(other.latitude)),
            longitude: present(self.longitude).or(present(other.longitude)),
            city: present(self.city).or(present(other.city)),
            country: present(self.country).or(present(other.country)),
            current_date_time: present(self.current_date_time).or(present(other.current_date_time)),
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_fields() {
        let hints: RequestHints = serde_json::from_str(
            r#"{"latitude":"38.68","city":"Cascais","currentDateTime":"2025-08-14T15:00"}"#,
        )
        .unwrap();
        assert_eq!(hints.latitude.as_deref(), Some("38.68"));
        assert_eq!(hints.city.as_deref(), Some("Cascais"));
        assert_eq!(hints.current_date_time.as_deref(), Some("2025-08-14T15:00"));
        assert!(hints.country.is_none());
    }

    #[test]
    fn or_prefers_existing_values() {
        let body = RequestHints {
            city: Some("Oeiras".into()),
            ..Default::default()
        };
        let headers = RequestHints {
            city: Some("Lisbon".into()),
            country: Some("PT".into()),
            ..Default::default()
        };
        let merged = body.or(headers);
        assert_eq!(merged.city.as_deref(), Some("Oeiras"));
        assert_eq!(merged.country.as_deref(), Some("PT"));
    }

    #[test]
    fn blank_values_do_not_block_fallback() {
        let body: RequestHints =
            serde_json::from_str(r#"{"city":"","country":"  ","latitude":"38.70"}"#).unwrap();
        let headers = RequestHints {
            city: Some("Cascais".into()),
            country: Some("PT".into()),
            latitude: Some("0.0".into()),
            ..Default::default()
        };
        let merged = body.or(headers);
        assert_eq!(merged.city.as_deref(), Some("Cascais"));
        assert_eq!(merged.country.as_deref(), Some("PT"));
        assert_eq!(merged.latitude.as_deref(), Some("38.70"));
        assert!(merged.longitude.is_none());
    }
}
