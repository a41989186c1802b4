//! The command-line front end.
//!
//! Each subcommand maps to exactly one API operation or one yt-dlp
//! invocation. Progress and status lines go to stderr so that stdout carries
//! nothing but the requested listing or details.

use crate::auth;
use crate::download::Downloader;
use crate::output;
use crate::youtube_api::{
    PlaylistInsertRequest, PlaylistInsertSnippet, PlaylistPrivacyStatus, PlaylistStatus,
};
use clap::{Parser, Subcommand};
use eyre::Context;
use std::path::PathBuf;
use tokio_stream::StreamExt;

/// Download videos and manage playlists.
///
/// Manages YouTube content using the YouTube Data API v3 and yt-dlp. The
/// first API command you run opens a browser window to authorize access to
/// your YouTube account; later runs reuse the stored token.
#[derive(Debug, Parser)]
#[command(name = "youtube-manager", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List your YouTube playlists
    ListPlaylists {
        /// Maximum number of playlists to return
        #[arg(long, default_value = "50")]
        limit: usize,
    },

    /// Get videos from a playlist
    GetPlaylist {
        /// The playlist to list, by id
        playlist_id: String,

        /// Maximum number of videos to return
        #[arg(long, default_value = "50")]
        limit: usize,
    },

    /// Create a new playlist
    CreatePlaylist {
        /// Title of the new playlist
        title: String,

        /// Playlist description
        #[arg(long, default_value = "")]
        description: String,

        /// Privacy status
        #[arg(long, value_enum, default_value = "private")]
        privacy: PlaylistPrivacyStatus,
    },

    /// Delete a playlist
    DeletePlaylist {
        /// The playlist to delete, by id
        playlist_id: String,
    },

    /// Add a video to a playlist
    AddToPlaylist {
        /// The playlist to add to, by id
        playlist_id: String,

        /// The video to add, by id
        video_id: String,
    },

    /// Search for videos on YouTube
    Search {
        /// What to search for
        query: String,

        /// Maximum number of results
        #[arg(long, default_value = "10")]
        limit: u32,
    },

    /// Get detailed information about a video
    GetVideo {
        /// The video to look up, by id
        video_id: String,
    },

    /// Download a YouTube video using yt-dlp
    Download {
        /// The video URL to download
        url: String,

        /// Output directory
        #[arg(long, default_value = ".")]
        output: PathBuf,

        /// Video format
        #[arg(long, default_value = "best")]
        format: String,

        /// Download audio only (MP3)
        #[arg(long)]
        audio_only: bool,
    },
}

/// Runs the subcommand the user asked for.
pub async fn run(cli: Cli) -> eyre::Result<()> {
    match cli.command {
        Command::ListPlaylists { limit } => list_playlists(limit).await,
        Command::GetPlaylist { playlist_id, limit } => get_playlist(&playlist_id, limit).await,
        Command::CreatePlaylist {
            title,
            description,
            privacy,
        } => create_playlist(&title, &description, privacy).await,
        Command::DeletePlaylist { playlist_id } => delete_playlist(&playlist_id).await,
        Command::AddToPlaylist {
            playlist_id,
            video_id,
        } => add_to_playlist(&playlist_id, &video_id).await,
        Command::Search { query, limit } => search(&query, limit).await,
        Command::GetVideo { video_id } => get_video(&video_id).await,
        Command::Download {
            url,
            output,
            format,
            audio_only,
        } => {
            let downloader = Downloader::new(output, format, audio_only);
            downloader.download(&url).await
        }
    }
}

async fn list_playlists(limit: usize) -> eyre::Result<()> {
    let client = auth::setup_youtube_client().await?;

    eprintln!("Fetching playlists...\n");

    let stream = std::pin::pin!(client.list_my_playlists());
    let mut stream = stream.take(limit);
    let mut playlists = Vec::new();
    while let Some(playlist) = stream.next().await {
        playlists.push(playlist.context("list playlists")?);
    }

    if !playlists.is_empty() {
        eprintln!("Found {} playlist(s):\n", playlists.len());
    }
    print!("{}", output::format_playlists(&playlists));
    Ok(())
}

async fn get_playlist(playlist_id: &str, limit: usize) -> eyre::Result<()> {
    let client = auth::setup_youtube_client().await?;

    eprintln!("Fetching videos from playlist: {}...\n", playlist_id);

    let stream = std::pin::pin!(client.list_playlist_items(playlist_id));
    let mut stream = stream.take(limit);
    let mut items = Vec::new();
    while let Some(item) = stream.next().await {
        items.push(item.context("list playlist items")?);
    }

    if !items.is_empty() {
        eprintln!("Found {} video(s):\n", items.len());
    }
    print!("{}", output::format_playlist_items(&items));
    Ok(())
}

async fn create_playlist(
    title: &str,
    description: &str,
    privacy: PlaylistPrivacyStatus,
) -> eyre::Result<()> {
    let client = auth::setup_youtube_client().await?;

    eprintln!("Creating playlist: {}...\n", title);

    let request = PlaylistInsertRequest {
        snippet: PlaylistInsertSnippet {
            title: title.to_string(),
            description: description.to_string(),
        },
        status: PlaylistStatus {
            privacy_status: privacy,
        },
    };
    let playlist = client
        .create_playlist(&request)
        .await
        .context("create playlist")?;

    eprintln!("Playlist created successfully!");
    println!("   ID: {}", playlist.id);
    println!(
        "   Link: https://www.youtube.com/playlist?list={}",
        playlist.id
    );
    Ok(())
}

async fn delete_playlist(playlist_id: &str) -> eyre::Result<()> {
    let client = auth::setup_youtube_client().await?;

    eprintln!("Deleting playlist: {}...\n", playlist_id);
    client
        .delete_playlist(playlist_id)
        .await
        .context("delete playlist")?;

    eprintln!("Playlist deleted successfully!");
    Ok(())
}

async fn add_to_playlist(playlist_id: &str, video_id: &str) -> eyre::Result<()> {
    let client = auth::setup_youtube_client().await?;

    eprintln!("Adding video {} to playlist {}...\n", video_id, playlist_id);
    client
        .add_playlist_item(playlist_id, video_id)
        .await
        .context("add video to playlist")?;

    eprintln!("Video added to playlist successfully!");
    Ok(())
}

async fn search(query: &str, limit: u32) -> eyre::Result<()> {
    let client = auth::setup_youtube_client().await?;

    eprintln!("Searching for: \"{}\"...\n", query);
    let results = client
        .search_videos(query, limit)
        .await
        .context("search videos")?;

    if !results.is_empty() {
        eprintln!("Found {} video(s):\n", results.len());
    }
    print!("{}", output::format_search_results(&results));
    Ok(())
}

async fn get_video(video_id: &str) -> eyre::Result<()> {
    let client = auth::setup_youtube_client().await?;

    eprintln!("Fetching video info: {}...\n", video_id);
    let video = client.get_video(video_id).await.context("fetch video")?;

    print!("{}", output::format_video(&video));
    Ok(())
}
