//! YouTube Data API v3 client library.
//!
//! This module provides a client for the parts of the YouTube Data API v3
//! that the command-line tool needs: playlist management, playlist contents,
//! video details, and search.
//!
//! # Resource Types
//!
//! - [`playlists::Playlist`] - a playlist owned by a channel, listed or
//!   created via [`YouTubeClient::list_my_playlists`] and
//!   [`YouTubeClient::create_playlist`].
//! - [`playlist_items::PlaylistItem`] - one entry of a playlist, pointing at
//!   a video. Note that a playlist item's id is not the video's id.
//! - [`videos::Video`] - a single video with snippet, content details, and
//!   statistics.
//! - [`search::SearchResult`] - a slim search hit; fetch the full
//!   [`videos::Video`] for anything beyond its snippet.
//!
//! List endpoints return one page at a time with a continuation token;
//! [`PagedStream`] turns that shape into a `Stream` of items that fetches
//! pages lazily as the consumer drains it.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use youtube_manager::youtube_api::YouTubeClient;
//! use tokio_stream::StreamExt;
//!
//! # async fn example(client: YouTubeClient) -> eyre::Result<()> {
//! let mut playlists = std::pin::pin!(client.list_my_playlists());
//! while let Some(playlist) = playlists.next().await {
//!     let playlist = playlist?;
//!     println!("{} ({})", playlist.snippet.title, playlist.id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod playlist_items;
pub mod playlists;
pub mod search;
pub mod types;
pub mod videos;

// Re-export main types for convenience
pub use client::{TimeBoundAccessToken, YouTubeClient};
pub use types::{PageInfo, PagedStream};

// Re-export commonly used types from each module
pub use playlists::{
    Playlist, PlaylistInsertRequest, PlaylistInsertSnippet, PlaylistPrivacyStatus,
    PlaylistSnippet, PlaylistStatus,
};

pub use playlist_items::{PlaylistItem, PlaylistItemSnippet, ResourceId};

pub use videos::{Video, VideoContentDetails, VideoSnippet, VideoStatistics};

pub use search::{SearchResult, SearchSnippet};
