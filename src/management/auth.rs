use std::path::PathBuf;

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    config::{self, SpotifySettings},
    error::{CatalogError, ConfigError},
    types::Token,
};

/// Seconds before expiry at which a token is refreshed.
const EXPIRY_MARGIN: u64 = 240;

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    refresh_token: Option<String>,
    scope: Option<String>,
    expires_in: Option<u64>,
}

/// Holds the access token issued by the external OAuth component and keeps
/// it fresh with the `refresh_token` grant.
pub struct TokenManager {
    token: Token,
    refreshable: bool,
    client_id: Option<String>,
    client_secret: Option<String>,
    token_url: String,
    http: Client,
}

impl TokenManager {
    pub fn new(token: Token, settings: &SpotifySettings) -> Self {
        TokenManager {
            refreshable: !token.refresh_token.is_empty(),
            token,
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
            token_url: settings.token_url.clone(),
            http: Client::new(),
        }
    }

    /// A bearer token supplied directly; it is used as-is and never refreshed.
    pub fn from_access_token(access_token: String, settings: &SpotifySettings) -> Self {
        let token = Token {
            access_token,
            refresh_token: String::new(),
            scope: String::new(),
            expires_in: 0,
            obtained_at: 0,
        };
        let mut manager = Self::new(token, settings);
        manager.refreshable = false;
        manager
    }

    /// Prefers `SPOTIFY_ACCESS_TOKEN`, then the cached token file.
    pub async fn load(settings: &SpotifySettings) -> Result<Self, ConfigError> {
        if let Some(access_token) = &settings.access_token {
            return Ok(Self::from_access_token(access_token.clone(), settings));
        }

        let path = Self::token_path();
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| ConfigError::MissingToken(format!("{}: {}", path.display(), e)))?;
        let token: Token = serde_json::from_str(&content)
            .map_err(|e| ConfigError::MissingToken(format!("{}: {}", path.display(), e)))?;
        Ok(Self::new(token, settings))
    }

    pub async fn persist(&self) -> Result<(), String> {
        let path = Self::token_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(&self.token).map_err(|e| e.to_string())?;
        async_fs::write(path, json).await.map_err(|e| e.to_string())
    }

    pub async fn get_valid_token(&mut self) -> String {
        if self.refreshable && self.is_expired() {
            match self.refresh_token().await {
                Ok(new_token) => {
                    self.token = new_token;
                    if let Err(e) = self.persist().await {
                        log::warn!("Cannot persist refreshed token: {}", e);
                    }
                }
                Err(e) => log::warn!("Token refresh failed: {}", e),
            }
        }

        self.token.access_token.clone()
    }

    fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        let expires_at = self.token.obtained_at + self.token.expires_in;
        now >= expires_at.saturating_sub(EXPIRY_MARGIN)
    }

    async fn refresh_token(&self) -> Result<Token, CatalogError> {
        let client_id = self.client_id.as_deref().ok_or_else(|| {
            CatalogError::Unauthorized(
                "SPOTIFY_API_AUTH_CLIENT_ID must be set to refresh tokens".to_string(),
            )
        })?;

        let mut request = self.http.post(&self.token_url);
        let form = match &self.client_secret {
            Some(secret) => {
                request = request.basic_auth(client_id, Some(secret));
                vec![
                    ("grant_type", "refresh_token"),
                    ("refresh_token", self.token.refresh_token.as_str()),
                ]
            }
            None => vec![
                ("grant_type", "refresh_token"),
                ("refresh_token", self.token.refresh_token.as_str()),
                ("client_id", client_id),
            ],
        };

        let res = request.form(&form).send().await?.error_for_status()?;
        let json: RefreshResponse = res.json().await?;

        Ok(Token {
            access_token: json.access_token,
            refresh_token: json
                .refresh_token
                .unwrap_or_else(|| self.token.refresh_token.clone()),
            scope: json.scope.unwrap_or_else(|| self.token.scope.clone()),
            expires_in: json.expires_in.unwrap_or(3600),
            obtained_at: Utc::now().timestamp() as u64,
        })
    }

    pub fn token_path() -> PathBuf {
        let mut path = config::data_dir();
        path.push("cache/token.json");
        path
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }
}
