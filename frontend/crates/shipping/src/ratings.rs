//! Delivery Ratings

use kernel::error::app_error::{AppError, AppResult};
use platform::http::IdTokenSource;
use serde::Serialize;

use crate::client::ApiClient;

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;
const MAX_COMMENT_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub guide_number: String,
    pub score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Rating {
    pub fn validate(&self) -> AppResult<()> {
        if self.guide_number.trim().is_empty() {
            return Err(AppError::invalid_input("Guide number is required"));
        }
        if !(MIN_SCORE..=MAX_SCORE).contains(&self.score) {
            return Err(AppError::invalid_input(format!(
                "Score must be between {MIN_SCORE} and {MAX_SCORE}"
            )));
        }
        if self
            .comment
            .as_ref()
            .is_some_and(|c| c.chars().count() > MAX_COMMENT_CHARS)
        {
            return Err(AppError::invalid_input("Comment is too long"));
        }
        Ok(())
    }
}

pub async fn submit_rating<T>(client: &ApiClient<T>, rating: &Rating) -> AppResult<()>
where
    T: IdTokenSource,
{
    rating.validate()?;
    let _: serde_json::Value = client.post_json("ratings", rating).await?;

    tracing::info!(guide = %rating.guide_number, score = rating.score, "Rating submitted");
    Ok(())
}
