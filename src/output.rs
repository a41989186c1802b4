//! Rendering of fetched resources for the terminal.
//!
//! Everything here is a pure function from resources to the text that goes
//! to stdout; progress and status lines are the caller's business (and go to
//! stderr). Keeping these pure makes the exact output testable.

use crate::youtube_api::{Playlist, PlaylistItem, SearchResult, Video};
use std::fmt::Write;

/// Renders the user's playlists, one block per playlist.
pub fn format_playlists(playlists: &[Playlist]) -> String {
    if playlists.is_empty() {
        return "No playlists found.\n".to_string();
    }

    let mut out = String::new();
    for playlist in playlists {
        let videos = playlist
            .content_details
            .as_ref()
            .map(|details| details.item_count)
            .unwrap_or(0);
        let _ = writeln!(out, "{}", playlist.snippet.title);
        let _ = writeln!(out, "   ID: {}", playlist.id);
        let _ = writeln!(out, "   Videos: {}", videos);
        let _ = writeln!(
            out,
            "   Link: https://www.youtube.com/playlist?list={}\n",
            playlist.id
        );
    }
    out
}

/// Renders the videos of a playlist as a numbered list, in playlist order.
pub fn format_playlist_items(items: &[PlaylistItem]) -> String {
    if items.is_empty() {
        return "No videos found in this playlist.\n".to_string();
    }

    let mut out = String::new();
    for (idx, item) in items.iter().enumerate() {
        let video_id = &item.content_details.video_id;
        let _ = writeln!(out, "{}. {}", idx + 1, item.snippet.title);
        let _ = writeln!(out, "   Video ID: {}", video_id);
        let _ = writeln!(
            out,
            "   Channel: {}",
            item.snippet.channel_title.as_deref().unwrap_or("")
        );
        let _ = writeln!(
            out,
            "   Link: https://www.youtube.com/watch?v={}\n",
            video_id
        );
    }
    out
}

/// Renders the details of a single video.
///
/// The comment count is omitted when it is zero (or hidden), and the
/// description is cut off at 500 characters.
pub fn format_video(video: &Video) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", video.snippet.title);
    let _ = writeln!(out, "   Video ID: {}", video.id);
    let _ = writeln!(out, "   Channel: {}", video.snippet.channel_title);
    let _ = writeln!(out, "   Published: {}", video.snippet.published_at);
    let _ = writeln!(
        out,
        "   Duration: {}",
        format_duration(&video.content_details.duration)
    );
    let _ = writeln!(out, "   Views: {}", stat_count(&video.statistics.view_count));
    let _ = writeln!(out, "   Likes: {}", stat_count(&video.statistics.like_count));
    let comments = stat_count(&video.statistics.comment_count);
    if comments > 0 {
        let _ = writeln!(out, "   Comments: {}", comments);
    }
    let _ = writeln!(out, "   Link: https://www.youtube.com/watch?v={}", video.id);
    let _ = write!(
        out,
        "\n   Description:\n   {}\n",
        truncate_with_ellipsis(&video.snippet.description, 500)
    );
    out
}

/// Renders search results as a numbered list, in relevance order.
///
/// Descriptions are cut off at 100 characters.
pub fn format_search_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No videos found.\n".to_string();
    }

    let mut out = String::new();
    for (idx, result) in results.iter().enumerate() {
        let video_id = &result.id.video_id;
        let _ = writeln!(out, "{}. {}", idx + 1, result.snippet.title);
        let _ = writeln!(out, "   Video ID: {}", video_id);
        let _ = writeln!(out, "   Channel: {}", result.snippet.channel_title);
        let _ = writeln!(
            out,
            "   Description: {}",
            truncate_with_ellipsis(&result.snippet.description, 100)
        );
        let _ = writeln!(
            out,
            "   Link: https://www.youtube.com/watch?v={}\n",
            video_id
        );
    }
    out
}

/// Renders an ISO-8601 duration like `PT1H2M3S` as `1:02:03`, or `4:13` when
/// there is no hour component. Strings that don't parse as a duration are
/// passed through unchanged.
pub fn format_duration(iso: &str) -> String {
    let Ok(span) = iso.parse::<jiff::Span>() else {
        return iso.to_string();
    };

    // YouTube durations only ever carry days, hours, minutes, and seconds.
    let total_seconds = i64::from(span.get_days()) * 86_400
        + i64::from(span.get_hours()) * 3_600
        + span.get_minutes() * 60
        + span.get_seconds();

    let hours = total_seconds / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Parses one of the API's string-encoded statistics counters; hidden or
/// missing counters render as zero.
fn stat_count(count: &Option<String>) -> u64 {
    count
        .as_deref()
        .and_then(|count| count.parse().ok())
        .unwrap_or(0)
}

/// Cuts `text` off after `max_chars` characters, marking the cut with `...`.
fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::youtube_api::playlist_items::{
        PlaylistItemContentDetails, PlaylistItemSnippet, ResourceId,
    };
    use crate::youtube_api::playlists::PlaylistContentDetails;
    use crate::youtube_api::search::{SearchResultId, SearchSnippet};
    use crate::youtube_api::videos::{VideoContentDetails, VideoSnippet, VideoStatistics};
    use crate::youtube_api::PlaylistSnippet;
    use pretty_assertions::assert_eq;

    fn playlist(id: &str, title: &str, item_count: u64) -> Playlist {
        Playlist {
            id: id.to_string(),
            snippet: PlaylistSnippet {
                title: title.to_string(),
                description: String::new(),
                published_at: "2024-03-01T17:21:11Z".parse().unwrap(),
                channel_title: Some("My Channel".to_string()),
            },
            content_details: Some(PlaylistContentDetails { item_count }),
            status: None,
        }
    }

    fn playlist_item(title: &str, video_id: &str, channel: &str) -> PlaylistItem {
        PlaylistItem {
            id: format!("item-{video_id}"),
            snippet: PlaylistItemSnippet {
                title: title.to_string(),
                channel_title: Some(channel.to_string()),
                playlist_id: "PL123".to_string(),
                position: Some(0),
                resource_id: ResourceId {
                    kind: "youtube#video".to_string(),
                    video_id: video_id.to_string(),
                },
            },
            content_details: PlaylistItemContentDetails {
                video_id: video_id.to_string(),
            },
        }
    }

    fn video(description: &str, comment_count: Option<&str>) -> Video {
        Video {
            id: "dQw4w9WgXcQ".to_string(),
            snippet: VideoSnippet {
                title: "Never Gonna Give You Up".to_string(),
                description: description.to_string(),
                published_at: "2009-10-25T06:57:33Z".parse().unwrap(),
                channel_title: "Rick Astley".to_string(),
            },
            content_details: VideoContentDetails {
                duration: "PT3M33S".to_string(),
            },
            statistics: VideoStatistics {
                view_count: Some("1468148714".to_string()),
                like_count: Some("17871683".to_string()),
                comment_count: comment_count.map(str::to_string),
            },
        }
    }

    #[test]
    fn playlists_render_one_block_each() {
        let playlists = vec![
            playlist("PLabc", "Conference talks", 12),
            playlist("PLdef", "Cooking", 3),
        ];

        assert_eq!(
            format_playlists(&playlists),
            concat!(
                "Conference talks\n",
                "   ID: PLabc\n",
                "   Videos: 12\n",
                "   Link: https://www.youtube.com/playlist?list=PLabc\n",
                "\n",
                "Cooking\n",
                "   ID: PLdef\n",
                "   Videos: 3\n",
                "   Link: https://www.youtube.com/playlist?list=PLdef\n",
                "\n",
            )
        );
    }

    #[test]
    fn no_playlists_renders_placeholder() {
        assert_eq!(format_playlists(&[]), "No playlists found.\n");
    }

    #[test]
    fn playlist_items_are_numbered_from_one() {
        let items = vec![
            playlist_item("First video", "vid-1", "Channel A"),
            playlist_item("Second video", "vid-2", "Channel B"),
        ];

        assert_eq!(
            format_playlist_items(&items),
            concat!(
                "1. First video\n",
                "   Video ID: vid-1\n",
                "   Channel: Channel A\n",
                "   Link: https://www.youtube.com/watch?v=vid-1\n",
                "\n",
                "2. Second video\n",
                "   Video ID: vid-2\n",
                "   Channel: Channel B\n",
                "   Link: https://www.youtube.com/watch?v=vid-2\n",
                "\n",
            )
        );
    }

    #[test]
    fn empty_playlist_renders_placeholder() {
        assert_eq!(
            format_playlist_items(&[]),
            "No videos found in this playlist.\n"
        );
    }

    #[test]
    fn video_details_render_all_fields() {
        let video = video("The official video.", Some("2200000"));

        assert_eq!(
            format_video(&video),
            concat!(
                "Never Gonna Give You Up\n",
                "   Video ID: dQw4w9WgXcQ\n",
                "   Channel: Rick Astley\n",
                "   Published: 2009-10-25T06:57:33Z\n",
                "   Duration: 3:33\n",
                "   Views: 1468148714\n",
                "   Likes: 17871683\n",
                "   Comments: 2200000\n",
                "   Link: https://www.youtube.com/watch?v=dQw4w9WgXcQ\n",
                "\n",
                "   Description:\n",
                "   The official video.\n",
            )
        );
    }

    #[test]
    fn zero_comments_are_omitted() {
        let rendered = format_video(&video("desc", Some("0")));
        assert!(!rendered.contains("Comments:"));

        // A hidden counter reads the same as zero.
        let rendered = format_video(&video("desc", None));
        assert!(!rendered.contains("Comments:"));
    }

    #[test]
    fn long_descriptions_are_truncated() {
        let long = "x".repeat(600);
        let rendered = format_video(&video(&long, None));

        let expected_tail = format!("   Description:\n   {}...\n", "x".repeat(500));
        assert!(rendered.ends_with(&expected_tail));
    }

    #[test]
    fn search_results_render_numbered_with_short_descriptions() {
        let results = vec![SearchResult {
            id: SearchResultId {
                kind: "youtube#video".to_string(),
                video_id: "9bZkp7q19f0".to_string(),
            },
            snippet: SearchSnippet {
                title: "GANGNAM STYLE".to_string(),
                channel_title: "officialpsy".to_string(),
                description: "y".repeat(150),
            },
        }];

        assert_eq!(
            format_search_results(&results),
            format!(
                concat!(
                    "1. GANGNAM STYLE\n",
                    "   Video ID: 9bZkp7q19f0\n",
                    "   Channel: officialpsy\n",
                    "   Description: {}...\n",
                    "   Link: https://www.youtube.com/watch?v=9bZkp7q19f0\n",
                    "\n",
                ),
                "y".repeat(100)
            )
        );
    }

    #[test]
    fn no_search_results_renders_placeholder() {
        assert_eq!(format_search_results(&[]), "No videos found.\n");
    }

    #[test]
    fn durations_render_as_clock_time() {
        assert_eq!(format_duration("PT3M33S"), "3:33");
        assert_eq!(format_duration("PT45S"), "0:45");
        assert_eq!(format_duration("PT2H"), "2:00:00");
        assert_eq!(format_duration("PT1H2M3S"), "1:02:03");
        assert_eq!(format_duration("P1DT2H3M4S"), "26:03:04");
        // Zero-length videos do exist.
        assert_eq!(format_duration("P0D"), "0:00");
    }

    #[test]
    fn unparseable_durations_pass_through() {
        assert_eq!(format_duration("three minutes"), "three minutes");
    }

    #[test]
    fn hidden_counters_count_as_zero() {
        assert_eq!(stat_count(&None), 0);
        assert_eq!(stat_count(&Some("not a number".to_string())), 0);
        assert_eq!(stat_count(&Some("42".to_string())), 42);
    }
}
