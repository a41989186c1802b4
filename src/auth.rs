//! Credential storage and construction of an authenticated YouTube client.
//!
//! Two files under `$HOME/.credentials/` drive authentication: the OAuth
//! client credentials the user downloads from Google Cloud Console, and the
//! OAuth token this tool mints and keeps fresh across runs.

use crate::oauth::OAuthManager;
use crate::youtube_api::{TimeBoundAccessToken, YouTubeClient};
use eyre::Context;
use oauth2::basic::BasicTokenResponse;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

const CREDENTIALS_FILE: &str = "google_credentials.json";
const TOKEN_FILE: &str = "youtube_token.json";

/// Google client-credentials JSON for an "installed application".
///
/// This is the file Google Cloud Console offers for download when creating an
/// OAuth client of type "Desktop app". Fields beyond the ones needed to drive
/// the flow (e.g. `redirect_uris`) are ignored.
#[derive(Debug, Deserialize)]
pub struct InstalledClientCredentials {
    /// The client configuration itself.
    pub installed: InstalledClient,
}

/// The inner client object of a Google "installed application" credentials file.
#[derive(Debug, Deserialize)]
pub struct InstalledClient {
    /// The OAuth client ID.
    pub client_id: String,
    /// The OAuth client secret.
    ///
    /// As per <https://developers.google.com/identity/protocols/oauth2#installed>,
    /// for an installed desktop application the secret gets embedded in the
    /// downloaded file and is _not_ considered secret.
    pub client_secret: String,
    /// The authorization endpoint URL.
    pub auth_uri: String,
    /// The token endpoint URL.
    pub token_uri: String,
}

/// Locations of the on-disk credential files.
#[derive(Debug)]
pub struct CredentialStore {
    credentials_path: PathBuf,
    token_path: PathBuf,
}

impl CredentialStore {
    /// Creates a store rooted at `$HOME/.credentials/`.
    pub fn new() -> eyre::Result<Self> {
        let home =
            dirs::home_dir().ok_or_else(|| eyre::eyre!("could not determine home directory"))?;
        let dir = home.join(".credentials");
        Ok(Self {
            credentials_path: dir.join(CREDENTIALS_FILE),
            token_path: dir.join(TOKEN_FILE),
        })
    }

    /// Reads and parses the Google client-credentials file.
    ///
    /// A missing or malformed file is fatal; the user has to create an OAuth
    /// client in Google Cloud Console and download its JSON first.
    pub async fn load_client_credentials(&self) -> eyre::Result<InstalledClientCredentials> {
        let bytes = tokio::fs::read(&self.credentials_path)
            .await
            .with_context(|| {
                format!(
                    "read credentials file {} (see README.md for setup instructions)",
                    self.credentials_path.display()
                )
            })?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("parse credentials file {}", self.credentials_path.display()))
    }

    /// Loads the stored OAuth token, if there is a usable one.
    ///
    /// A missing file just means the user has not authorized yet. A file that
    /// fails to parse is treated the same way; re-authorizing beats refusing
    /// to run.
    pub async fn load_token(&self) -> Option<BasicTokenResponse> {
        let bytes = match tokio::fs::read(&self.token_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(
                    "failed to read token file {}: {}",
                    self.token_path.display(),
                    e
                );
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(token) => Some(token),
            Err(e) => {
                tracing::warn!(
                    "ignoring malformed token file {}: {}",
                    self.token_path.display(),
                    e
                );
                None
            }
        }
    }

    /// Persists the OAuth token for subsequent runs.
    ///
    /// The token grants account access, so the directory is created `0700`
    /// and the file written `0600` (unix-only; plain writes elsewhere).
    pub async fn save_token(&self, token: &BasicTokenResponse) -> eyre::Result<()> {
        tracing::info!(path = %self.token_path.display(), "saving OAuth token");
        let json = serde_json::to_vec_pretty(token).expect("OAuth tokens always serialize");

        if let Some(dir) = self.token_path.parent() {
            let mut builder = tokio::fs::DirBuilder::new();
            builder.recursive(true);
            #[cfg(unix)]
            builder.mode(0o700);
            builder
                .create(dir)
                .await
                .with_context(|| format!("create credentials directory {}", dir.display()))?;
        }

        #[cfg(unix)]
        {
            use tokio::io::AsyncWriteExt;
            let mut file = tokio::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.token_path)
                .await
                .with_context(|| format!("open token file {}", self.token_path.display()))?;
            file.write_all(&json)
                .await
                .with_context(|| format!("write token file {}", self.token_path.display()))?;
            file.flush()
                .await
                .with_context(|| format!("flush token file {}", self.token_path.display()))?;
        }
        #[cfg(not(unix))]
        tokio::fs::write(&self.token_path, &json)
            .await
            .with_context(|| format!("write token file {}", self.token_path.display()))?;

        Ok(())
    }
}

/// Builds an authenticated [`YouTubeClient`].
///
/// Walks the full credential chain: client credentials from disk, then the
/// stored token (refreshed before first use), falling back to an interactive
/// browser authorization when no stored token is usable. Whichever token
/// comes out of that is persisted for the next run.
pub async fn setup_youtube_client() -> eyre::Result<YouTubeClient> {
    let store = CredentialStore::new()?;
    let credentials = store.load_client_credentials().await?;
    let oauth_manager = Arc::new(OAuthManager::new(credentials.installed));

    let token = match store.load_token().await {
        Some(stored) => {
            // The stored expires_in is relative to when the token was minted,
            // not to now, so treat it as expired and refresh before first use.
            let mut token = TimeBoundAccessToken::expired(stored);
            if token
                .refresh(&oauth_manager)
                .await
                .context("refresh stored token")?
            {
                tracing::debug!("successfully refreshed stored token");
                token
            } else {
                tracing::warn!("token refresh failed, getting new token via full OAuth");
                let raw_token = oauth_manager
                    .authenticate()
                    .await
                    .context("authorize user to YouTube")?;
                TimeBoundAccessToken::new(raw_token)
            }
        }
        None => {
            tracing::debug!("no stored token, running interactive authorization");
            let raw_token = oauth_manager
                .authenticate()
                .await
                .context("authorize user to YouTube")?;
            TimeBoundAccessToken::new(raw_token)
        }
    };

    // Failing to persist costs one re-authorization next run, nothing more.
    if let Err(e) = store.save_token(token.raw_token()).await {
        tracing::warn!("failed to save token for next run: {:#}", e);
    }

    Ok(YouTubeClient::new(
        token,
        oauth_manager,
        reqwest::Client::new(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use oauth2::TokenResponse;
    use pretty_assertions::assert_eq;

    #[test]
    fn google_installed_client_json_parses() {
        // The shape Google Cloud Console hands out for a "Desktop app" client.
        let credentials: InstalledClientCredentials = serde_json::from_value(serde_json::json!({
            "installed": {
                "client_id": "1234567890-abcdef.apps.googleusercontent.com",
                "project_id": "youtube-manager-test",
                "auth_uri": "https://accounts.google.com/o/oauth2/auth",
                "token_uri": "https://oauth2.googleapis.com/token",
                "auth_provider_x509_cert_url": "https://www.googleapis.com/oauth2/v1/certs",
                "client_secret": "GOCSPX-notactuallysecret",
                "redirect_uris": ["http://localhost"]
            }
        }))
        .unwrap();

        assert_eq!(
            credentials.installed.client_id,
            "1234567890-abcdef.apps.googleusercontent.com"
        );
        assert_eq!(
            credentials.installed.token_uri,
            "https://oauth2.googleapis.com/token"
        );
    }

    #[test]
    fn stored_token_json_round_trips() {
        let stored = serde_json::json!({
            "access_token": "ya29.a0AfH6SMB-test",
            "token_type": "Bearer",
            "expires_in": 3599,
            "refresh_token": "1//0gtest-refresh",
            "scope": "https://www.googleapis.com/auth/youtube.readonly https://www.googleapis.com/auth/youtube.force-ssl"
        });

        let token: BasicTokenResponse = serde_json::from_value(stored).unwrap();
        assert_eq!(token.access_token().secret(), "ya29.a0AfH6SMB-test");
        assert_eq!(
            token.refresh_token().map(|t| t.secret().as_str()),
            Some("1//0gtest-refresh")
        );
        assert_eq!(
            token.expires_in(),
            Some(std::time::Duration::from_secs(3599))
        );
        assert_eq!(token.scopes().map(|s| s.len()), Some(2));

        // What we write back must parse again on the next run.
        let written = serde_json::to_string(&token).unwrap();
        let reloaded: BasicTokenResponse = serde_json::from_str(&written).unwrap();
        assert_eq!(reloaded.access_token().secret(), "ya29.a0AfH6SMB-test");
        assert!(reloaded.refresh_token().is_some());
    }

    #[test]
    fn store_paths_live_under_dot_credentials() {
        let store = CredentialStore::new().unwrap();
        assert!(
            store
                .credentials_path
                .ends_with(".credentials/google_credentials.json")
        );
        assert!(store.token_path.ends_with(".credentials/youtube_token.json"));
    }
}
