//! Cognito User-Pool Adapter
//!
//! Implements [`IdentityProvider`] over the user-pool JSON API: one `POST`
//! per operation, selected by the `X-Amz-Target` header. Only public-client
//! operations are used, so no request signing is needed.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::domain::port::{
    IdentityProvider, ProviderError, ProviderResult, ProviderTokens, SignUpOutcome, SignUpRequest,
};

const TARGET_PREFIX: &str = "AWSCognitoIdentityProviderService";
const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

/// Identity provider configuration
#[derive(Debug, Clone)]
pub struct CognitoConfig {
    pub region: String,
    /// App client id (public client, no secret)
    pub client_id: String,
    /// Override of the regional endpoint (local emulators, tests)
    pub endpoint: Option<String>,
    pub timeout: Duration,
}

impl Default for CognitoConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            client_id: String::new(),
            endpoint: None,
            timeout: platform::http::DEFAULT_TIMEOUT,
        }
    }
}

impl CognitoConfig {
    pub fn endpoint_url(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://cognito-idp.{}.amazonaws.com/", self.region))
    }
}

#[derive(Debug, Clone)]
pub struct CognitoIdentityProvider {
    endpoint: String,
    client_id: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SignUpResponse {
    user_sub: String,
    #[serde(default)]
    user_confirmed: bool,
    #[serde(default)]
    code_delivery_details: Option<CodeDeliveryDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CodeDeliveryDetails {
    #[serde(default)]
    destination: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthResponse {
    #[serde(default)]
    challenge_name: Option<String>,
    #[serde(default)]
    authentication_result: Option<AuthenticationResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthenticationResult {
    access_token: String,
    id_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl CognitoIdentityProvider {
    pub fn new(config: &CognitoConfig) -> Result<Self, ProviderError> {
        if config.client_id.trim().is_empty() {
            return Err(ProviderError::Protocol("client id is not configured".to_string()));
        }

        let http = platform::http::build_client(config.timeout)
            .map_err(|e| ProviderError::Protocol(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint: config.endpoint_url(),
            client_id: config.client_id.clone(),
            http,
        })
    }

    async fn call(&self, operation: &str, payload: &Value) -> ProviderResult<Value> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("X-Amz-Target", format!("{TARGET_PREFIX}.{operation}"))
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE)
            .body(payload.to_string())
            .send()
            .await
            .map_err(|e| transport_error(operation, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(operation, e))?;

        if !status.is_success() {
            let err = service_error(status.as_u16(), &body);
            tracing::debug!(operation, status = status.as_u16(), error = %err, "Identity provider rejected request");
            return Err(err);
        }

        if body.trim().is_empty() {
            return Ok(Value::Object(Default::default()));
        }
        serde_json::from_str(&body)
            .map_err(|e| ProviderError::Protocol(format!("{operation}: invalid JSON response: {e}")))
    }

    async fn authenticate(&self, flow: &str, parameters: Value) -> ProviderResult<ProviderTokens> {
        let payload = json!({
            "AuthFlow": flow,
            "ClientId": self.client_id,
            "AuthParameters": parameters,
        });
        let value = self.call("InitiateAuth", &payload).await?;
        tokens_from_response(value)
    }
}

impl IdentityProvider for CognitoIdentityProvider {
    async fn sign_up(&self, request: &SignUpRequest) -> ProviderResult<SignUpOutcome> {
        let attributes: Vec<Value> = request
            .attributes
            .iter()
            .map(|a| json!({ "Name": a.name, "Value": a.value }))
            .collect();

        let payload = json!({
            "ClientId": self.client_id,
            "Username": request.username,
            "Password": request.password.expose(),
            "UserAttributes": attributes,
        });

        let value = self.call("SignUp", &payload).await?;
        let response: SignUpResponse = serde_json::from_value(value)
            .map_err(|e| ProviderError::Protocol(format!("SignUp: {e}")))?;

        Ok(SignUpOutcome {
            user_sub: response.user_sub,
            confirmed: response.user_confirmed,
            delivery_destination: response.code_delivery_details.and_then(|d| d.destination),
        })
    }

    async fn confirm_sign_up(&self, username: &str, code: &str) -> ProviderResult<()> {
        let payload = json!({
            "ClientId": self.client_id,
            "Username": username,
            "ConfirmationCode": code,
        });
        self.call("ConfirmSignUp", &payload).await.map(|_| ())
    }

    async fn resend_confirmation_code(&self, username: &str) -> ProviderResult<()> {
        let payload = json!({
            "ClientId": self.client_id,
            "Username": username,
        });
        self.call("ResendConfirmationCode", &payload).await.map(|_| ())
    }

    async fn initiate_auth(&self, username: &str, password: &str) -> ProviderResult<ProviderTokens> {
        self.authenticate(
            "USER_PASSWORD_AUTH",
            json!({ "USERNAME": username, "PASSWORD": password }),
        )
        .await
    }

    async fn refresh_tokens(&self, refresh_token: &str) -> ProviderResult<ProviderTokens> {
        self.authenticate("REFRESH_TOKEN_AUTH", json!({ "REFRESH_TOKEN": refresh_token }))
            .await
    }

    async fn global_sign_out(&self, access_token: &str) -> ProviderResult<()> {
        let payload = json!({ "AccessToken": access_token });
        self.call("GlobalSignOut", &payload).await.map(|_| ())
    }
}

fn transport_error(operation: &str, err: reqwest::Error) -> ProviderError {
    ProviderError::Transport(format!("{operation}: {err}"))
}

/// Strip the namespace and suffix off an `__type` value
///
/// `"com.amazonaws.cognito#CodeMismatchException:extra"` -> `"CodeMismatchException"`
fn normalize_error_code(raw: &str) -> &str {
    let code = raw.rsplit('#').next().unwrap_or(raw);
    code.split(':').next().unwrap_or(code).trim()
}

fn service_error(status: u16, body: &str) -> ProviderError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let field = |name: &str| {
        parsed
            .as_ref()
            .and_then(|v| v.get(name))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    match field("__type") {
        Some(raw) => ProviderError::service(
            normalize_error_code(&raw),
            field("message").or_else(|| field("Message")).unwrap_or_default(),
        ),
        None => ProviderError::Protocol(format!("HTTP {status} without error type")),
    }
}

fn tokens_from_response(value: Value) -> ProviderResult<ProviderTokens> {
    let response: InitiateAuthResponse = serde_json::from_value(value)
        .map_err(|e| ProviderError::Protocol(format!("InitiateAuth: {e}")))?;

    if let Some(challenge) = response.challenge_name {
        // MFA / NEW_PASSWORD_REQUIRED are not supported by this front-end.
        return Err(ProviderError::service(
            "UnsupportedChallenge",
            format!("challenge {challenge} is not supported"),
        ));
    }

    let result = response
        .authentication_result
        .ok_or_else(|| ProviderError::Protocol("InitiateAuth: missing AuthenticationResult".into()))?;

    Ok(ProviderTokens {
        access_token: result.access_token,
        id_token: result.id_token,
        refresh_token: result.refresh_token,
        expires_in_secs: result.expires_in.unwrap_or(3600),
    })
}
