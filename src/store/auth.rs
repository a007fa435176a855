use super::StoreError;
use base64::{Engine, engine::general_purpose::STANDARD};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;
use tracing::debug;

const SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: u64 = 3600;
/// Tokens are refreshed this long before Google would reject them.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    #[serde(default)]
    token_uri: Option<String>,
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    value: SecretString,
    refresh_at: Instant,
}

/// Service-account credentials exchanged for short-lived access tokens.
pub(crate) struct ServiceAccount {
    client_email: String,
    token_uri: String,
    key: EncodingKey,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccount {
    /// Decodes the base64-encoded service-account JSON key file.
    pub(crate) fn from_base64(encoded: &SecretString) -> Result<Self, StoreError> {
        let json = STANDARD
            .decode(encoded.expose_secret().trim())
            .map_err(|err| StoreError::Auth(format!("credentials are not valid base64: {err}")))?;
        let key: ServiceAccountKey = serde_json::from_slice(&json)?;
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|err| StoreError::Auth(format!("invalid private key: {err}")))?;
        Ok(Self {
            client_email: key.client_email,
            token_uri: key
                .token_uri
                .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
            key: encoding_key,
            cached: Mutex::new(None),
        })
    }

    pub(crate) fn client_email(&self) -> &str {
        &self.client_email
    }

    pub(crate) async fn access_token(&self, http: &Client) -> Result<SecretString, StoreError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref().filter(|token| Instant::now() < token.refresh_at) {
            return Ok(token.value.clone());
        }

        let token = self.request_token(http).await?;
        let value = SecretString::from(token.access_token);
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(EXPIRY_MARGIN);
        *cached = Some(CachedToken {
            value: value.clone(),
            refresh_at: Instant::now() + lifetime,
        });
        debug!(expires_in = token.expires_in, "fetched access token");
        Ok(value)
    }

    async fn request_token(&self, http: &Client) -> Result<TokenResponse, StoreError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|err| StoreError::Auth(err.to_string()))?
            .as_secs();
        let claims = Claims {
            iss: &self.client_email,
            scope: SCOPE,
            aud: &self.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };
        let assertion = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.key)
            .map_err(|err| StoreError::Auth(format!("failed to sign assertion: {err}")))?;

        let response = http
            .post(&self.token_uri)
            .form(&[("grant_type", GRANT_TYPE), ("assertion", assertion.as_str())])
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Auth(format!("token endpoint returned {status}: {body}")));
        }
        Ok(response.json().await?)
    }
}
