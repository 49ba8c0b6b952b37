use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetsError};

/// OAuth2 token payload stored at the configured credentials path. The
/// field names match what Google's client libraries write to token.json,
/// so a token minted elsewhere works as-is; `access_token` is accepted as
/// an alias on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    #[serde(alias = "access_token")]
    pub token: String,
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    pub client_id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub expiry: Option<String>,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Returns a valid access token, refreshing and persisting the stored
/// token first if it has expired.
pub fn access_token(path: &Path) -> Result<String> {
    let token = load_token(path)?;
    if is_expired(&token) {
        let refreshed = refresh(&token)?;
        save_token(path, &refreshed)?;
        Ok(refreshed.token)
    } else {
        Ok(token.token)
    }
}

pub fn load_token(path: &Path) -> Result<StoredToken> {
    if !path.exists() {
        return Err(SheetsError::CredentialsNotFound(path.to_path_buf()));
    }
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

pub fn save_token(path: &Path, token: &StoredToken) -> Result<()> {
    let contents = serde_json::to_string_pretty(token)?;
    fs::write(path, contents)?;
    Ok(())
}

/// A token within 60 seconds of its expiry (or with an unparseable or
/// missing expiry) counts as expired and goes through a refresh.
pub fn is_expired(token: &StoredToken) -> bool {
    let Some(expiry_str) = &token.expiry else {
        return true;
    };
    match chrono::DateTime::parse_from_rfc3339(expiry_str) {
        Ok(expiry) => {
            let now = chrono::Utc::now();
            expiry <= now + chrono::Duration::seconds(60)
        }
        Err(_) => true,
    }
}

fn refresh(token: &StoredToken) -> Result<StoredToken> {
    let refresh_token = token.refresh_token.as_deref().ok_or_else(|| {
        SheetsError::Auth("access token expired and no refresh token is stored".to_string())
    })?;

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .build()?;

    let mut form = vec![
        ("client_id", token.client_id.as_str()),
        ("refresh_token", refresh_token),
        ("grant_type", "refresh_token"),
    ];
    if let Some(secret) = token.client_secret.as_deref() {
        form.push(("client_secret", secret));
    }

    let response = client.post(&token.token_uri).form(&form).send()?;
    let status = response.status();
    let body = response.text()?;
    if !status.is_success() {
        return Err(SheetsError::Auth(format!(
            "token refresh failed with HTTP {}: {}",
            status.as_u16(),
            body
        )));
    }

    let payload: RefreshResponse = serde_json::from_str(&body)?;
    let expires_in = payload.expires_in.unwrap_or(3600);
    let expiry = chrono::Utc::now() + chrono::Duration::seconds(expires_in as i64);

    let mut refreshed = token.clone();
    refreshed.token = payload.access_token;
    refreshed.expiry = Some(expiry.to_rfc3339());
    Ok(refreshed)
}
