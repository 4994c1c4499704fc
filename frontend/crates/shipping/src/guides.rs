//! Guide (Waybill) Creation
//!
//! The backend assigns the guide number and renders the PDF; the front-end
//! only submits the shipment data and gets both references back.

use kernel::error::app_error::{AppError, AppResult};
use platform::http::IdTokenSource;
use serde::{Deserialize, Serialize};

use crate::client::ApiClient;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
}

impl Party {
    fn validate(&self, label: &str) -> AppResult<()> {
        for (field, value) in [
            ("name", &self.name),
            ("phone", &self.phone),
            ("address", &self.address),
            ("city", &self.city),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::invalid_input(format!("{label} {field} is required")));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGuide {
    pub sender: Party,
    pub recipient: Party,
    pub weight_kg: f64,
    pub declared_value: f64,
    pub description: String,
}

impl NewGuide {
    pub fn validate(&self) -> AppResult<()> {
        self.sender.validate("sender")?;
        self.recipient.validate("recipient")?;
        if !self.weight_kg.is_finite() || self.weight_kg <= 0.0 {
            return Err(AppError::invalid_input("Weight must be greater than zero"));
        }
        if !self.declared_value.is_finite() || self.declared_value < 0.0 {
            return Err(AppError::invalid_input("Declared value cannot be negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedGuide {
    pub guide_number: String,
    pub pdf_url: String,
}

pub async fn create_guide<T>(client: &ApiClient<T>, guide: &NewGuide) -> AppResult<CreatedGuide>
where
    T: IdTokenSource,
{
    guide.validate()?;
    let created: CreatedGuide = client.post_json("guides", guide).await?;

    tracing::info!(guide = %created.guide_number, "Guide created");
    Ok(created)
}
