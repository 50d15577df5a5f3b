//! Firebase Identity Toolkit and Secure Token REST client.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use daybook_config::FirebaseConfig;
use daybook_core::{Credentials, JournalError, UserId};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::identity::{BAD_CREDENTIALS, EMAIL_IN_USE, Identity, IdentityProvider};

#[derive(Debug)]
pub struct FirebaseAuthClient {
    api_key: String,
    identity_endpoint: String,
    token_endpoint: String,
    client: reqwest::Client,
}

impl FirebaseAuthClient {
    pub fn new(config: &FirebaseConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            identity_endpoint: config.identity_endpoint.trim_end_matches('/').to_string(),
            token_endpoint: config.token_endpoint.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    async fn password_call(&self, method: &str, credentials: &Credentials) -> Result<Identity> {
        let url = format!(
            "{}/accounts:{method}?key={}",
            self.identity_endpoint, self.api_key
        );
        let response = self
            .client
            .post(&url)
            .json(&json!({
                "email": credentials.email().trim(),
                "password": credentials.password(),
                "returnSecureToken": true
            }))
            .send()
            .await
            .with_context(|| format!("identity request accounts:{method} failed"))?;
        let body = read_auth_body(response).await?;
        let parsed: PasswordResponse =
            serde_json::from_str(&body).context("failed to parse identity response")?;
        debug!(user_id = %parsed.local_id, method, "identity call succeeded");
        parsed.into_identity(Utc::now())
    }
}

#[async_trait]
impl IdentityProvider for FirebaseAuthClient {
    async fn sign_up(&self, credentials: &Credentials) -> Result<Identity> {
        self.password_call("signUp", credentials).await
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity> {
        self.password_call("signInWithPassword", credentials).await
    }

    async fn refresh(&self, identity: &Identity) -> Result<Identity> {
        let Some(refresh_token) = identity.refresh_token.as_deref() else {
            return Ok(identity.clone());
        };
        let url = format!("{}/token?key={}", self.token_endpoint, self.api_key);
        let response = self
            .client
            .post(&url)
            .json(&json!({
                "grant_type": "refresh_token",
                "refresh_token": refresh_token
            }))
            .send()
            .await
            .context("token refresh request failed")?;
        let body = read_auth_body(response).await?;
        let parsed: RefreshResponse =
            serde_json::from_str(&body).context("failed to parse token refresh response")?;
        debug!(user_id = %identity.user_id, "refreshed id token");
        Ok(parsed.apply(identity, Utc::now()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PasswordResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    id_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<String>,
}

impl PasswordResponse {
    fn into_identity(self, now: DateTime<Utc>) -> Result<Identity> {
        Ok(Identity {
            user_id: UserId::new(self.local_id)?,
            email: self.email,
            expires_at: expiry(self.expires_in.as_deref(), now),
            id_token: Some(self.id_token),
            refresh_token: Some(self.refresh_token),
        })
    }
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<String>,
}

impl RefreshResponse {
    fn apply(self, identity: &Identity, now: DateTime<Utc>) -> Identity {
        Identity {
            user_id: identity.user_id.clone(),
            email: identity.email.clone(),
            expires_at: expiry(self.expires_in.as_deref(), now),
            id_token: Some(self.id_token),
            refresh_token: Some(self.refresh_token),
        }
    }
}

/// `expiresIn` is a decimal string of seconds.
fn expiry(expires_in: Option<&str>, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    expires_in
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .map(|secs| now + Duration::seconds(secs))
}

#[derive(Debug, Deserialize)]
struct AuthErrorBody {
    error: AuthError,
}

#[derive(Debug, Deserialize)]
struct AuthError {
    #[serde(default)]
    message: String,
}

async fn read_auth_body(response: reqwest::Response) -> Result<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .context("failed to read identity response")?;
    if status.is_success() {
        return Ok(body);
    }
    match serde_json::from_str::<AuthErrorBody>(&body) {
        Ok(parsed) if !parsed.error.message.is_empty() => {
            Err(JournalError::Auth(auth_message(&parsed.error.message)).into())
        }
        _ => anyhow::bail!("identity request failed ({status}): {}", body.trim()),
    }
}

/// Turn an Identity Toolkit error code into the text shown to the user.
///
/// Codes may carry a detail after ` : `, e.g.
/// `WEAK_PASSWORD : Password should be at least 6 characters`.
pub(crate) fn auth_message(code: &str) -> String {
    let (head, detail) = match code.split_once(" : ") {
        Some((head, detail)) => (head.trim(), Some(detail.trim())),
        None => (code.trim(), None),
    };
    let known = match head {
        "EMAIL_EXISTS" => Some(EMAIL_IN_USE),
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            Some(BAD_CREDENTIALS)
        }
        "INVALID_EMAIL" => Some("The email address is badly formatted."),
        "USER_DISABLED" => Some("This account has been disabled."),
        "TOO_MANY_ATTEMPTS_TRY_LATER" => {
            Some("Too many unsuccessful attempts. Please try again later.")
        }
        "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" | "USER_NOT_FOUND" => {
            Some("Your session has expired. Please sign in again.")
        }
        _ => None,
    };
    match (known, detail) {
        (Some(text), _) => text.to_string(),
        (None, Some(detail)) => detail.to_string(),
        (None, None) => head.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_message_maps_known_codes() {
        assert_eq!(auth_message("EMAIL_EXISTS"), EMAIL_IN_USE);
        assert_eq!(auth_message("INVALID_LOGIN_CREDENTIALS"), BAD_CREDENTIALS);
        assert_eq!(auth_message("EMAIL_NOT_FOUND"), BAD_CREDENTIALS);
    }

    #[test]
    fn test_auth_message_uses_detail_for_unknown_codes() {
        assert_eq!(
            auth_message("WEAK_PASSWORD : Password should be at least 6 characters"),
            "Password should be at least 6 characters"
        );
        assert_eq!(auth_message("OPERATION_NOT_ALLOWED"), "OPERATION_NOT_ALLOWED");
    }

    #[test]
    fn test_password_response_into_identity() {
        let body = r#"{
            "kind": "identitytoolkit#SignupNewUserResponse",
            "idToken": "id-tok",
            "email": "me@example.com",
            "refreshToken": "ref-tok",
            "expiresIn": "3600",
            "localId": "Xq9pLm2"
        }"#;
        let now = Utc::now();
        let parsed: PasswordResponse = serde_json::from_str(body).unwrap();
        let identity = parsed.into_identity(now).unwrap();
        assert_eq!(identity.user_id.as_str(), "Xq9pLm2");
        assert_eq!(identity.id_token.as_deref(), Some("id-tok"));
        assert_eq!(identity.refresh_token.as_deref(), Some("ref-tok"));
        assert_eq!(identity.expires_at, Some(now + Duration::seconds(3600)));
    }

    #[test]
    fn test_refresh_response_keeps_user() {
        let body = r#"{
            "expires_in": "3600",
            "token_type": "Bearer",
            "refresh_token": "ref-2",
            "id_token": "id-2",
            "user_id": "Xq9pLm2",
            "project_id": "1234"
        }"#;
        let old = Identity {
            user_id: UserId::new("Xq9pLm2").unwrap(),
            email: "me@example.com".into(),
            id_token: Some("id-1".into()),
            refresh_token: Some("ref-1".into()),
            expires_at: None,
        };
        let parsed: RefreshResponse = serde_json::from_str(body).unwrap();
        let renewed = parsed.apply(&old, Utc::now());
        assert_eq!(renewed.user_id, old.user_id);
        assert_eq!(renewed.email, "me@example.com");
        assert_eq!(renewed.id_token.as_deref(), Some("id-2"));
        assert!(renewed.expires_at.is_some());
    }

    #[test]
    fn test_expiry_ignores_garbage() {
        let now = Utc::now();
        assert_eq!(expiry(Some("oops"), now), None);
        assert_eq!(expiry(None, now), None);
        assert_eq!(expiry(Some(" 60 "), now), Some(now + Duration::seconds(60)));
    }
}
