//! Core YouTube API client functionality and authentication management.

use crate::oauth::OAuthManager;
use crate::youtube_api::{
    playlist_items::{PlaylistItem, PlaylistItemInsertRequest, PlaylistItemListResponse},
    playlists::{Playlist, PlaylistInsertRequest, PlaylistListResponse},
    search::{SearchListResponse, SearchResult},
    types::PagedStream,
    videos::{Video, VideoListResponse},
};
use eyre::Context;
use http::Method;
use oauth2::TokenResponse;
use oauth2::basic::BasicTokenResponse;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::Mutex;
use tokio_stream::Stream;
use tracing::instrument;

#[derive(Debug, Clone)]
pub struct TimeBoundAccessToken {
    /// The current OAuth2 token.
    token: BasicTokenResponse,
    /// When the current access token expires (with safety buffer).
    expires_at: SystemTime,
}

impl TimeBoundAccessToken {
    /// Creates a token that is already expired, forcing a refresh before first use.
    ///
    /// Tokens loaded from storage carry an `expires_in` relative to when they
    /// were minted, not to now, so their real remaining lifetime is unknown.
    pub fn expired(token: BasicTokenResponse) -> Self {
        Self {
            expires_at: SystemTime::UNIX_EPOCH,
            token,
        }
    }

    /// Creates a token with its expiry instant calculated from `expires_in`.
    pub fn new(token: BasicTokenResponse) -> Self {
        Self {
            expires_at: Self::calculate_token_expiry(&token),
            token,
        }
    }

    pub fn raw_token(&self) -> &BasicTokenResponse {
        &self.token
    }

    /// Refreshes this token using the provided OAuth manager, preserving the refresh token.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - Token was successfully refreshed
    /// * `Ok(false)` - The grant is no longer valid (re-authorization required)
    /// * `Err(_)` - Network or other error occurred
    pub async fn refresh(&mut self, oauth_manager: &OAuthManager) -> eyre::Result<bool> {
        tracing::trace!("refreshing token");
        match oauth_manager
            .refresh_token(self.token.clone())
            .await
            .context("refresh OAuth token")?
        {
            Some(new_token) => {
                let old_token = std::mem::replace(&mut self.token, new_token);

                // Google commonly omits the refresh token from refresh
                // responses; keep the one we already have in that case.
                if self.token.refresh_token().is_none() {
                    tracing::trace!("new token lacks refresh token, preserving original");
                    self.token
                        .set_refresh_token(old_token.refresh_token().cloned());
                } else {
                    tracing::debug!("new token includes refresh token");
                }

                self.expires_at = Self::calculate_token_expiry(&self.token);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Calculates when a token should be considered expired based on its `expires_in` field.
    ///
    /// Uses the current time + expires_in duration - 5 minute safety buffer.
    /// If no expires_in is provided, assumes a conservative 55-minute lifetime.
    fn calculate_token_expiry(token: &BasicTokenResponse) -> SystemTime {
        let now = SystemTime::now();
        if let Some(expires_in) = token.expires_in() {
            now + expires_in - Duration::from_secs(300) // 5 minute buffer
        } else {
            now + Duration::from_secs(3300) // 55 minutes
        }
    }
}

/// Client for the YouTube Data API v3.
///
/// Wraps an OAuth2 token and provides methods for the playlist, video, and
/// search endpoints. Expired access tokens are refreshed automatically before
/// API calls using the stored refresh token and OAuth manager; expiry is
/// tracked from the `expires_in` field of the OAuth response with a safety
/// buffer to prevent edge-case failures.
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    /// The current OAuth2 token, protected by a mutex for refresh operations.
    token: Arc<Mutex<TimeBoundAccessToken>>,
    /// OAuth manager for refreshing tokens.
    oauth_manager: Arc<OAuthManager>,
    /// HTTP client for API requests.
    client: reqwest::Client,
}

impl YouTubeClient {
    /// Creates a new YouTube API client from an already-tracked token.
    pub fn new(
        token: TimeBoundAccessToken,
        oauth_manager: Arc<OAuthManager>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            token: Arc::new(Mutex::new(token)),
            oauth_manager,
            client,
        }
    }

    /// Gets a guaranteed-fresh access token, refreshing if necessary.
    ///
    /// Called before each API request. Checks whether the token has passed its
    /// (buffered) expiry instant and refreshes it if so.
    #[instrument(skip(self))]
    async fn fresh_access_token(&self) -> eyre::Result<String> {
        let mut token = self.token.lock().await;
        let now = SystemTime::now();

        if now >= token.expires_at {
            tracing::debug!("access token expired, attempting refresh");

            if token.refresh(&self.oauth_manager).await? {
                tracing::debug!("access token successfully refreshed");
            } else {
                tracing::error!("access token refresh failed, client is unusable");
                return Err(eyre::eyre!("Unable to refresh expired access token"));
            }
        }

        Ok(token.token.access_token().secret().to_string())
    }

    /// Makes an authenticated HTTP request to the YouTube API with common error handling.
    ///
    /// This method consolidates the shared logic across all YouTube API requests:
    /// - Token freshness validation and refresh
    /// - Authorization header setup
    /// - Query parameters
    /// - JSON body (for requests that need one)
    /// - Status code validation and error handling
    ///
    /// # Returns
    ///
    /// The raw [`reqwest::Response`] for method-specific JSON parsing.
    #[instrument(skip(self, json_body), ret, level = tracing::Level::TRACE)]
    async fn make_authenticated_request(
        &self,
        method: Method,
        url: &str,
        query_params: Option<&[(&str, &str)]>,
        json_body: Option<&impl Serialize>,
    ) -> eyre::Result<reqwest::Response> {
        let access_token = self.fresh_access_token().await?;

        let mut request = self
            .client
            .request(method.clone(), url)
            .header("Authorization", format!("Bearer {}", access_token));

        if let Some(params) = query_params {
            request = request.query(params);
        }

        if let Some(body) = json_body {
            request = request
                .header("Content-Type", "application/json")
                .json(body);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("send {} request to YouTube API: {}", method, url))?;

        let status_code = response.status();
        if !status_code.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(eyre::eyre!(
                "YouTube API {} request failed with status {}: {}",
                method,
                status_code,
                error_text
            ));
        }

        Ok(response)
    }

    /// Returns a paginated stream of all playlists owned by the authenticated user.
    ///
    /// Uses the `playlists.list` API with `mine=true`. The stream handles
    /// pagination and fetches subsequent pages as they are consumed.
    ///
    /// # Required Scopes
    ///
    /// * `https://www.googleapis.com/auth/youtube.readonly`
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/playlists/list>
    #[instrument(skip(self))]
    pub fn list_my_playlists(&self) -> impl Stream<Item = eyre::Result<Playlist>> + use<'_> {
        PagedStream::new(|page_token| async {
            let response = self.list_playlists_internal(50, page_token).await?;
            Ok((response.items, response.next_page_token))
        })
    }

    /// Returns a paginated stream of the items in the given playlist, in
    /// playlist order.
    ///
    /// Uses the `playlistItems.list` API. The stream handles pagination and
    /// fetches subsequent pages as they are consumed.
    ///
    /// # Required Scopes
    ///
    /// * `https://www.googleapis.com/auth/youtube.readonly`
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/playlistItems/list>
    #[instrument(skip(self))]
    pub fn list_playlist_items<'a>(
        &'a self,
        playlist_id: &str,
    ) -> impl Stream<Item = eyre::Result<PlaylistItem>> + use<'a> {
        let playlist_id = playlist_id.to_string();
        PagedStream::new(move |page_token| {
            let playlist_id = playlist_id.clone();
            async move {
                let response = self
                    .list_playlist_items_internal(&playlist_id, 50, page_token)
                    .await?;
                Ok((response.items, response.next_page_token))
            }
        })
    }

    /// Creates a new playlist for the authenticated user.
    ///
    /// Uses the `playlists.insert` API with `part=snippet,status`.
    ///
    /// # Returns
    ///
    /// The created [`Playlist`] resource, including its server-assigned id.
    ///
    /// # Required Scopes
    ///
    /// * `https://www.googleapis.com/auth/youtube.force-ssl`
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/playlists/insert>
    #[instrument(skip(self), ret)]
    pub async fn create_playlist(
        &self,
        insert_request: &PlaylistInsertRequest,
    ) -> eyre::Result<Playlist> {
        let url = "https://www.googleapis.com/youtube/v3/playlists";
        let query_params = [("part", "snippet,status")];

        let response = self
            .make_authenticated_request(
                Method::POST,
                url,
                Some(&query_params),
                Some(insert_request),
            )
            .await?;

        let playlist: Playlist = response
            .json()
            .await
            .context("parse YouTube API insert response as JSON")?;

        tracing::debug!(playlist_id = playlist.id, "successfully created playlist");

        Ok(playlist)
    }

    /// Deletes a playlist by id.
    ///
    /// Uses the `playlists.delete` API; success is an empty 204 response.
    ///
    /// # Required Scopes
    ///
    /// * `https://www.googleapis.com/auth/youtube.force-ssl`
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/playlists/delete>
    #[instrument(skip(self), ret)]
    pub async fn delete_playlist(&self, playlist_id: &str) -> eyre::Result<()> {
        let url = "https://www.googleapis.com/youtube/v3/playlists";
        let query_params = [("id", playlist_id)];

        self.make_authenticated_request(Method::DELETE, url, Some(&query_params), None::<&()>)
            .await?;

        tracing::debug!(playlist_id, "successfully deleted playlist");

        Ok(())
    }

    /// Adds a video to the end of a playlist.
    ///
    /// Uses the `playlistItems.insert` API with a `youtube#video` resource id.
    ///
    /// # Required Scopes
    ///
    /// * `https://www.googleapis.com/auth/youtube.force-ssl`
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/playlistItems/insert>
    #[instrument(skip(self), ret)]
    pub async fn add_playlist_item(&self, playlist_id: &str, video_id: &str) -> eyre::Result<()> {
        let url = "https://www.googleapis.com/youtube/v3/playlistItems";
        let query_params = [("part", "snippet")];
        let insert_request = PlaylistItemInsertRequest::for_video(playlist_id, video_id);

        self.make_authenticated_request(
            Method::POST,
            url,
            Some(&query_params),
            Some(&insert_request),
        )
        .await?;

        tracing::debug!(playlist_id, video_id, "successfully added video to playlist");

        Ok(())
    }

    /// Fetches a single video with its snippet, content details, and statistics.
    ///
    /// Uses the `videos.list` API with `id=<video_id>`.
    ///
    /// # Returns
    ///
    /// The [`Video`] resource, or an error naming the id if no video matched.
    ///
    /// # Required Scopes
    ///
    /// * `https://www.googleapis.com/auth/youtube.readonly`
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/videos/list>
    #[instrument(skip(self), ret)]
    pub async fn get_video(&self, video_id: &str) -> eyre::Result<Video> {
        let url = "https://www.googleapis.com/youtube/v3/videos";
        let query_params = [
            ("part", "snippet,contentDetails,statistics"),
            ("id", video_id),
        ];

        let response = self
            .make_authenticated_request(Method::GET, url, Some(&query_params), None::<&()>)
            .await?;

        let videos: VideoListResponse = response
            .json()
            .await
            .context("parse YouTube videos API response as JSON")?;

        tracing::debug!(
            video_id,
            returned_items = videos.items.len(),
            "fetched video details"
        );

        videos
            .items
            .into_iter()
            .next()
            .ok_or_else(|| eyre::eyre!("video not found: {}", video_id))
    }

    /// Searches YouTube for videos matching `query`, in relevance order.
    ///
    /// Uses the `search.list` API with `type=video`. Only a single page is
    /// requested; `limit` is capped at the API's per-page maximum of 50.
    ///
    /// # Required Scopes
    ///
    /// * `https://www.googleapis.com/auth/youtube.readonly`
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/search/list>
    #[instrument(skip(self))]
    pub async fn search_videos(
        &self,
        query: &str,
        limit: u32,
    ) -> eyre::Result<Vec<SearchResult>> {
        let url = "https://www.googleapis.com/youtube/v3/search";

        let max_results_string = limit.clamp(1, 50).to_string();
        let query_params = [
            ("part", "snippet"),
            ("type", "video"),
            ("q", query),
            ("maxResults", max_results_string.as_str()),
        ];

        let response = self
            .make_authenticated_request(Method::GET, url, Some(&query_params), None::<&()>)
            .await?;

        let results: SearchListResponse = response
            .json()
            .await
            .context("parse YouTube search API response as JSON")?;

        tracing::debug!(
            query,
            total_results = results.page_info.total_results,
            returned_items = results.items.len(),
            "searched videos"
        );

        Ok(results.items.into())
    }

    /// Internal method to call the `playlists.list` API with configurable parameters.
    ///
    /// Uses `mine=true` to return the playlists owned by the authenticated
    /// user. Used by [`Self::list_my_playlists`] to handle pagination.
    async fn list_playlists_internal(
        &self,
        max_results: u32,
        page_token: Option<String>,
    ) -> eyre::Result<PlaylistListResponse> {
        let url = "https://www.googleapis.com/youtube/v3/playlists";

        let max_results_string = max_results.to_string();
        let mut query_params = vec![
            ("part", "snippet,contentDetails"),
            ("mine", "true"),
            ("maxResults", max_results_string.as_str()),
        ];

        if let Some(ref token) = page_token {
            query_params.push(("pageToken", token.as_str()));
        }

        let response = self
            .make_authenticated_request(Method::GET, url, Some(&query_params), None::<&()>)
            .await?;

        let playlists: PlaylistListResponse = response
            .json()
            .await
            .context("parse YouTube API response as JSON")?;

        tracing::debug!(
            total_results = playlists.page_info.total_results,
            returned_items = playlists.items.len(),
            "fetched playlists"
        );

        Ok(playlists)
    }

    /// Internal method to call the `playlistItems.list` API with configurable parameters.
    ///
    /// Used by [`Self::list_playlist_items`] to handle pagination.
    async fn list_playlist_items_internal(
        &self,
        playlist_id: &str,
        max_results: u32,
        page_token: Option<String>,
    ) -> eyre::Result<PlaylistItemListResponse> {
        let url = "https://www.googleapis.com/youtube/v3/playlistItems";

        let max_results_string = max_results.to_string();
        let mut query_params = vec![
            ("part", "snippet,contentDetails"),
            ("playlistId", playlist_id),
            ("maxResults", max_results_string.as_str()),
        ];

        if let Some(ref token) = page_token {
            query_params.push(("pageToken", token.as_str()));
        }

        let response = self
            .make_authenticated_request(Method::GET, url, Some(&query_params), None::<&()>)
            .await?;

        let items: PlaylistItemListResponse = response
            .json()
            .await
            .context("parse YouTube API response as JSON")?;

        tracing::debug!(
            playlist_id,
            total_results = items.page_info.total_results,
            returned_items = items.items.len(),
            "fetched playlist items"
        );

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oauth2::basic::BasicTokenType;
    use oauth2::{AccessToken, EmptyExtraTokenFields, StandardTokenResponse};

    fn token_with_expiry(expires_in: Option<Duration>) -> BasicTokenResponse {
        let mut token = StandardTokenResponse::new(
            AccessToken::new("ya29.test-access-token".to_string()),
            BasicTokenType::Bearer,
            EmptyExtraTokenFields {},
        );
        token.set_expires_in(expires_in.as_ref());
        token
    }

    #[test]
    fn fresh_tokens_expire_with_a_safety_buffer() {
        let now = SystemTime::now();
        let token = TimeBoundAccessToken::new(token_with_expiry(Some(Duration::from_secs(3600))));
        let lifetime = token.expires_at.duration_since(now).unwrap();
        // One hour minus the 5-minute buffer, with slack for test runtime.
        assert!(lifetime >= Duration::from_secs(3300));
        assert!(lifetime < Duration::from_secs(3310));
    }

    #[test]
    fn tokens_without_expiry_get_a_conservative_lifetime() {
        let now = SystemTime::now();
        let token = TimeBoundAccessToken::new(token_with_expiry(None));
        let lifetime = token.expires_at.duration_since(now).unwrap();
        assert!(lifetime >= Duration::from_secs(3300));
        assert!(lifetime < Duration::from_secs(3310));
    }

    #[test]
    fn stored_tokens_start_expired() {
        let token = TimeBoundAccessToken::expired(token_with_expiry(Some(Duration::from_secs(
            3600,
        ))));
        assert!(SystemTime::now() >= token.expires_at);
        assert_eq!(
            token.raw_token().access_token().secret(),
            "ya29.test-access-token"
        );
    }
}
