//! YouTube Playlist Items API types.

use crate::youtube_api::types::PageInfo;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Response structure for the `playlistItems.list` API call.
///
/// Contains a list of [`PlaylistItem`] resources in playlist order, along
/// with pagination information in [`PageInfo`].
///
/// See: <https://developers.google.com/youtube/v3/docs/playlistItems/list>
#[derive(Debug, Serialize, Deserialize)]
pub struct PlaylistItemListResponse {
    /// Identifies the API resource's type.
    ///
    /// The value will be `youtube#playlistItemListResponse`.
    pub kind: String,
    /// A list of playlist items that match the request criteria.
    pub items: VecDeque<PlaylistItem>,
    #[serde(rename = "pageInfo")]
    pub page_info: PageInfo,
    /// Token that can be used as the value of the pageToken parameter to retrieve the next page in the result set.
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

/// A `playlistItem` resource identifies one video within a playlist.
///
/// The playlist item id is distinct from the id of the video it points at;
/// the video id lives in [`PlaylistItemContentDetails`] (and in the snippet's
/// [`ResourceId`]).
///
/// See: <https://developers.google.com/youtube/v3/docs/playlistItems#resource>
#[derive(Debug, Serialize, Deserialize)]
pub struct PlaylistItem {
    /// The ID that YouTube uses to uniquely identify the playlist item.
    pub id: String,
    /// Basic details about the playlist item.
    pub snippet: PlaylistItemSnippet,
    /// Details about the video the item refers to.
    #[serde(rename = "contentDetails")]
    pub content_details: PlaylistItemContentDetails,
}

/// Basic details about a playlist item.
///
/// See: <https://developers.google.com/youtube/v3/docs/playlistItems#snippet>
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemSnippet {
    /// The item's title (the title of the video it refers to).
    pub title: String,
    /// The title of the channel the playlist item belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_title: Option<String>,
    /// The ID of the playlist the item is in.
    pub playlist_id: String,
    /// The item's position in the playlist, starting at 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    /// The resource (video) the item refers to.
    pub resource_id: ResourceId,
}

/// Details about the video a playlist item refers to.
///
/// See: <https://developers.google.com/youtube/v3/docs/playlistItems#contentDetails>
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemContentDetails {
    /// The ID that YouTube uses to uniquely identify the video.
    pub video_id: String,
}

/// A reference to another YouTube resource, such as the video a playlist
/// item points at.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    /// The referred resource's type, e.g. `youtube#video`.
    pub kind: String,
    /// The referred video's ID. Set when `kind` is `youtube#video`.
    pub video_id: String,
}

/// Request body for the `playlistItems.insert` API call.
///
/// See: <https://developers.google.com/youtube/v3/docs/playlistItems/insert>
#[derive(Debug, Serialize, Deserialize)]
pub struct PlaylistItemInsertRequest {
    /// Binding between the target playlist and the video to add.
    pub snippet: PlaylistItemInsertSnippet,
}

/// The snippet fields that can be set when inserting a playlist item.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemInsertSnippet {
    /// The ID of the playlist to add the video to.
    pub playlist_id: String,
    /// The video to add.
    pub resource_id: ResourceId,
}

impl PlaylistItemInsertRequest {
    /// Build the request that appends `video_id` to `playlist_id`.
    pub fn for_video(playlist_id: &str, video_id: &str) -> Self {
        Self {
            snippet: PlaylistItemInsertSnippet {
                playlist_id: playlist_id.to_string(),
                resource_id: ResourceId {
                    kind: "youtube#video".to_string(),
                    video_id: video_id.to_string(),
                },
            },
        }
    }
}
