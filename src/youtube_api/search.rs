//! YouTube Search API types.

use crate::youtube_api::types::PageInfo;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Response structure for the `search.list` API call.
///
/// Contains a list of [`SearchResult`] resources in relevance order, along
/// with pagination information in [`PageInfo`].
///
/// See: <https://developers.google.com/youtube/v3/docs/search/list>
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchListResponse {
    /// Identifies the API resource's type.
    ///
    /// The value will be `youtube#searchListResponse`.
    pub kind: String,
    /// A list of results that match the search criteria.
    pub items: VecDeque<SearchResult>,
    #[serde(rename = "pageInfo")]
    pub page_info: PageInfo,
    /// Token that can be used as the value of the pageToken parameter to retrieve the next page in the result set.
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

/// A search result pointing at a YouTube resource.
///
/// Search results don't carry the full resource; follow up with the matching
/// list endpoint (e.g. `videos.list`) for details beyond the snippet.
///
/// See: <https://developers.google.com/youtube/v3/docs/search#resource>
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResult {
    /// Identifies the matched resource.
    pub id: SearchResultId,
    /// Basic details about the matched resource.
    pub snippet: SearchSnippet,
}

/// The id object of a search result.
///
/// Requests here always set `type=video`, so the video id is present.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultId {
    /// The matched resource's type, e.g. `youtube#video`.
    pub kind: String,
    /// The ID that YouTube uses to uniquely identify the matched video.
    pub video_id: String,
}

/// Basic details about a search result.
///
/// See: <https://developers.google.com/youtube/v3/docs/search#snippet>
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnippet {
    /// The matched video's title.
    pub title: String,
    /// The title of the channel that published the matched video.
    pub channel_title: String,
    /// The matched video's description.
    #[serde(default)]
    pub description: String,
}
