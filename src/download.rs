//! Video and audio downloads via the external `yt-dlp` binary.

use eyre::Context;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// Runs `yt-dlp` with arguments assembled from the user's download options.
#[derive(Debug)]
pub struct Downloader {
    output_dir: PathBuf,
    format: String,
    audio_only: bool,
}

impl Downloader {
    /// Creates a downloader with the specified options.
    ///
    /// `format` is a yt-dlp format selector; the special value `best` maps to
    /// `bestvideo+bestaudio/best`. When `audio_only` is set the format is
    /// ignored and the best audio track is extracted as mp3.
    pub fn new(output_dir: PathBuf, format: String, audio_only: bool) -> Self {
        Self {
            output_dir,
            format,
            audio_only,
        }
    }

    /// Downloads the media at `url`.
    ///
    /// yt-dlp inherits stdout/stderr so its own progress output reaches the
    /// terminal directly; a non-zero exit status is an error.
    pub async fn download(&self, url: &str) -> eyre::Result<()> {
        Self::ensure_ytdlp().await?;

        eprintln!("Downloading video: {}\n", url);

        let args = self.build_args(url);
        tracing::debug!(?args, "invoking yt-dlp");

        let status = Command::new("yt-dlp")
            .args(&args)
            .status()
            .await
            .context("run yt-dlp")?;

        if !status.success() {
            eyre::bail!("yt-dlp exited with {}", status);
        }

        eprintln!("\nDownload completed successfully");
        Ok(())
    }

    /// Checks that `yt-dlp` is present on the search path.
    ///
    /// Probes by spawning `yt-dlp --version` with all output discarded; a
    /// spawn failure or non-zero exit both mean "not installed".
    async fn ensure_ytdlp() -> eyre::Result<()> {
        let probe = Command::new("yt-dlp")
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match probe {
            Ok(status) if status.success() => Ok(()),
            _ => eyre::bail!(
                "yt-dlp not found in PATH. Please install it first:\n  brew install yt-dlp  (macOS)\n  pip install yt-dlp   (pip)"
            ),
        }
    }

    /// Assembles the yt-dlp argument vector for `url`.
    fn build_args(&self, url: &str) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-o".into(),
            self.output_dir.join("%(title)s.%(ext)s").into_os_string(),
        ];

        if self.audio_only {
            args.extend(
                [
                    "-f",
                    "bestaudio/best",
                    "-x",
                    "--audio-format",
                    "mp3",
                    "--audio-quality",
                    "192K",
                ]
                .map(OsString::from),
            );
        } else if self.format == "best" {
            args.extend(["-f", "bestvideo+bestaudio/best"].map(OsString::from));
        } else {
            args.push("-f".into());
            args.push(self.format.as_str().into());
        }

        args.push(url.into());
        args
    }
}
