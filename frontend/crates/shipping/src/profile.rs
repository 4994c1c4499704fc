//! User Profile

use kernel::error::app_error::AppResult;
use platform::http::IdTokenSource;
use serde::Deserialize;

use crate::client::ApiClient;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub email: String,
    #[serde(default)]
    pub given_name: String,
    #[serde(default)]
    pub family_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub document: Option<String>,
    pub role: String,
}

impl UserProfile {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name).trim().to_string()
    }
}

/// Profile of the signed-in user
pub async fn get_profile<T>(client: &ApiClient<T>) -> AppResult<UserProfile>
where
    T: IdTokenSource,
{
    client.get_json("users/me").await
}
