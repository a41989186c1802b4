//! YouTube Playlists API types.

use crate::youtube_api::types::PageInfo;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Response structure for the `playlists.list` API call.
///
/// Contains a list of [`Playlist`] resources that match the request criteria,
/// along with pagination information in [`PageInfo`].
///
/// See: <https://developers.google.com/youtube/v3/docs/playlists/list>
#[derive(Debug, Serialize, Deserialize)]
pub struct PlaylistListResponse {
    /// Identifies the API resource's type.
    ///
    /// The value will be `youtube#playlistListResponse`.
    pub kind: String,
    /// A list of playlists that match the request criteria.
    pub items: VecDeque<Playlist>,
    #[serde(rename = "pageInfo")]
    pub page_info: PageInfo,
    /// Token that can be used as the value of the pageToken parameter to retrieve the next page in the result set.
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

/// A `playlist` resource represents a YouTube playlist.
///
/// Which of the nested objects are populated depends on the `part` parameter
/// of the request that produced the resource.
///
/// See: <https://developers.google.com/youtube/v3/docs/playlists#resource>
#[derive(Debug, Serialize, Deserialize)]
pub struct Playlist {
    /// The ID that YouTube uses to uniquely identify the playlist.
    pub id: String,
    /// Basic details about the playlist.
    pub snippet: PlaylistSnippet,
    /// Content details; present when the `contentDetails` part was requested.
    #[serde(
        default,
        rename = "contentDetails",
        skip_serializing_if = "Option::is_none"
    )]
    pub content_details: Option<PlaylistContentDetails>,
    /// Playlist status; present when the `status` part was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PlaylistStatus>,
}

/// Basic details about a playlist.
///
/// See: <https://developers.google.com/youtube/v3/docs/playlists#snippet>
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSnippet {
    /// The playlist's title.
    pub title: String,
    /// The playlist's description.
    #[serde(default)]
    pub description: String,
    /// The date and time that the playlist was created.
    pub published_at: Timestamp,
    /// The title of the channel that the playlist belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_title: Option<String>,
}

/// Content details about a playlist.
///
/// See: <https://developers.google.com/youtube/v3/docs/playlists#contentDetails>
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistContentDetails {
    /// The number of videos in the playlist.
    pub item_count: u64,
}

/// The playlist's status details.
///
/// See: <https://developers.google.com/youtube/v3/docs/playlists#status>
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistStatus {
    /// The playlist's privacy status.
    pub privacy_status: PlaylistPrivacyStatus,
}

/// The playlist's privacy status.
///
/// See: <https://developers.google.com/youtube/v3/docs/playlists#status.privacyStatus>
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum, Default,
)]
#[serde(rename_all = "camelCase")]
pub enum PlaylistPrivacyStatus {
    /// The playlist can only be viewed by the owner.
    #[default]
    Private,
    /// The playlist can be viewed by anyone.
    Public,
    /// The playlist can only be viewed by people with the link.
    Unlisted,
}

impl fmt::Display for PlaylistPrivacyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Private => write!(f, "private"),
            Self::Public => write!(f, "public"),
            Self::Unlisted => write!(f, "unlisted"),
        }
    }
}

/// Request body for the `playlists.insert` API call.
///
/// See: <https://developers.google.com/youtube/v3/docs/playlists/insert>
#[derive(Debug, Serialize, Deserialize)]
pub struct PlaylistInsertRequest {
    /// Title and description for the new playlist.
    pub snippet: PlaylistInsertSnippet,
    /// Privacy status for the new playlist.
    pub status: PlaylistStatus,
}

/// The snippet fields that can be set when creating a playlist.
#[derive(Debug, Serialize, Deserialize)]
pub struct PlaylistInsertSnippet {
    /// The playlist's title.
    pub title: String,
    /// The playlist's description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn playlist_list_response_deserializes() {
        let response: PlaylistListResponse = serde_json::from_value(serde_json::json!({
            "kind": "youtube#playlistListResponse",
            "pageInfo": { "totalResults": 2, "resultsPerPage": 50 },
            "items": [
                {
                    "kind": "youtube#playlist",
                    "id": "PL0123456789abcdef",
                    "snippet": {
                        "publishedAt": "2024-03-01T17:21:11Z",
                        "channelId": "UCabcdef",
                        "title": "Conference talks",
                        "description": "Talks worth rewatching",
                        "channelTitle": "My Channel"
                    },
                    "contentDetails": { "itemCount": 12 }
                },
                {
                    "kind": "youtube#playlist",
                    "id": "PLfedcba9876543210",
                    "snippet": {
                        "publishedAt": "2023-11-20T08:00:00Z",
                        "title": "Unnamed",
                        "description": ""
                    },
                    "contentDetails": { "itemCount": 0 }
                }
            ]
        }))
        .unwrap();

        assert_eq!(response.items.len(), 2);
        assert!(response.next_page_token.is_none());

        let first = &response.items[0];
        assert_eq!(first.id, "PL0123456789abcdef");
        assert_eq!(first.snippet.title, "Conference talks");
        assert_eq!(first.snippet.channel_title.as_deref(), Some("My Channel"));
        assert_eq!(
            first.content_details.as_ref().map(|d| d.item_count),
            Some(12)
        );
        assert!(first.status.is_none());
    }

    #[test]
    fn insert_request_serializes_to_api_shape() {
        let request = PlaylistInsertRequest {
            snippet: PlaylistInsertSnippet {
                title: "Road trip".to_string(),
                description: String::new(),
            },
            status: PlaylistStatus {
                privacy_status: PlaylistPrivacyStatus::Unlisted,
            },
        };

        // An empty description stays off the wire entirely.
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "snippet": { "title": "Road trip" },
                "status": { "privacyStatus": "unlisted" }
            })
        );
    }

    #[test]
    fn privacy_status_displays_as_api_value() {
        assert_eq!(PlaylistPrivacyStatus::Private.to_string(), "private");
        assert_eq!(PlaylistPrivacyStatus::Unlisted.to_string(), "unlisted");
    }
}
