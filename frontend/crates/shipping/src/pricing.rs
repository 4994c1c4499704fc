//! Shipping Price Calculation

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use platform::http::IdTokenSource;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub origin: String,
    pub destination: String,
    pub weight_kg: f64,
    pub declared_value: f64,
}

impl PriceQuote {
    pub fn validate(&self) -> AppResult<()> {
        if self.origin.trim().is_empty() || self.destination.trim().is_empty() {
            return Err(AppError::invalid_input("Origin and destination are required"));
        }
        if !self.weight_kg.is_finite() || self.weight_kg <= 0.0 {
            return Err(AppError::invalid_input("Weight must be greater than zero"));
        }
        if !self.declared_value.is_finite() || self.declared_value < 0.0 {
            return Err(AppError::invalid_input("Declared value cannot be negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    #[serde(default)]
    pub base_price: f64,
    #[serde(default)]
    pub weight_charge: f64,
    #[serde(default)]
    pub insurance: f64,
    #[serde(default)]
    pub taxes: f64,
    pub total: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "COP".to_string()
}

pub async fn calculate_price<T>(client: &ApiClient<T>, quote: &PriceQuote) -> AppResult<PriceBreakdown>
where
    T: IdTokenSource,
{
    quote.validate()?;
    let breakdown: PriceBreakdown = client.post_json("pricing/calculate", quote).await?;

    tracing::debug!(
        origin = %quote.origin,
        destination = %quote.destination,
        total = breakdown.total,
        "Price calculated"
    );
    Ok(breakdown)
}
