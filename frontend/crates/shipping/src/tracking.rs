//! Public Shipment Tracking

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use platform::http::IdTokenSource;
use serde::Deserialize;

use crate::client::ApiClient;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEvent {
    pub status: String,
    #[serde(default)]
    pub location: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tracking {
    pub guide_number: String,
    pub status: String,
    #[serde(default)]
    pub events: Vec<TrackingEvent>,
}

impl Tracking {
    /// Most recent event
    pub fn latest(&self) -> Option<&TrackingEvent> {
        self.events.iter().max_by_key(|e| e.timestamp)
    }
}

/// Guide numbers are letters, digits and dashes
fn validate_guide_number(raw: &str) -> AppResult<&str> {
    let guide = raw.trim();
    if guide.is_empty() || !guide.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(AppError::invalid_input("Invalid guide number"));
    }
    Ok(guide)
}

/// Anonymous lookup; no session required
pub async fn track_shipment<T>(client: &ApiClient<T>, guide_number: &str) -> AppResult<Tracking>
where
    T: IdTokenSource,
{
    let guide = validate_guide_number(guide_number)?;
    client.get_public_json(&format!("tracking/{guide}")).await
}
