// Artifact download helper.
//
// The classifier and feature builder normally ship alongside the binary, but
// a deployment can point MODEL_URL / FEATURES_URL at a remote copy instead.
// Missing files are fetched once at startup (or via `dupecheck download-model`)
// and kept in a platform-appropriate directory
// (~/.local/share/dupecheck/ on Linux) so they persist across runs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

pub const MODEL_FILE: &str = "model.onnx";
pub const FEATURES_FILE: &str = "features.onnx";

/// Returns the default directory for storing artifacts.
pub fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dupecheck")
}

pub fn default_model_path() -> PathBuf {
    default_model_dir().join(MODEL_FILE)
}

pub fn default_features_path() -> PathBuf {
    default_model_dir().join(FEATURES_FILE)
}

/// Outcome of `ensure_artifact`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactSource {
    /// The file was already on disk.
    Local,
    /// The file was fetched from the configured URL.
    Downloaded,
}

/// Make sure the artifact at `path` exists, fetching it from `url` if it
/// doesn't. Fails when the file is absent and no URL is configured.
pub async fn ensure_artifact(
    path: &Path,
    url: Option<&str>,
    show_progress: bool,
) -> Result<ArtifactSource> {
    if path.exists() {
        return Ok(ArtifactSource::Local);
    }

    let Some(url) = url else {
        anyhow::bail!("{} not found and no download URL configured", path.display());
    };

    info!(url, dest = %path.display(), "Artifact missing locally, downloading");
    download_file(url, path, show_progress).await?;
    Ok(ArtifactSource::Downloaded)
}

/// Like `ensure_artifact`, but an absent file with no URL configured is
/// skipped (`Ok(None)`) instead of failing. Used for optional artifacts.
pub async fn fetch_optional(
    path: &Path,
    url: Option<&str>,
    show_progress: bool,
) -> Result<Option<ArtifactSource>> {
    if url.is_none() && !path.exists() {
        return Ok(None);
    }
    ensure_artifact(path, url, show_progress).await.map(Some)
}

/// Download a single file from a URL to a local path.
///
/// The body is written to a `.part` sibling first and renamed into place, so
/// an interrupted download never leaves a truncated artifact behind.
/// If `show_progress` is true, display a progress bar.
pub async fn download_file(url: &str, dest: &Path, show_progress: bool) -> Result<()> {
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let client = reqwest::Client::new();
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to download {}", url))?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed with status {}: {}", response.status(), url);
    }

    let total_size = response.content_length();

    let pb = if show_progress {
        Some(progress_bar(total_size)?)
    } else {
        None
    };

    let bytes = response
        .bytes()
        .await
        .context("Failed to read response body")?;

    if bytes.is_empty() {
        anyhow::bail!("Download returned an empty body: {}", url);
    }

    if let Some(ref pb) = pb {
        pb.set_position(bytes.len() as u64);
    }

    let partial = partial_path(dest);
    std::fs::write(&partial, &bytes)
        .with_context(|| format!("Failed to write {}", partial.display()))?;
    std::fs::rename(&partial, dest)
        .with_context(|| format!("Failed to move download into {}", dest.display()))?;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    info!("Downloaded {} to {}", url, dest.display());
    Ok(())
}

fn progress_bar(total_size: Option<u64>) -> Result<ProgressBar> {
    let pb = match total_size {
        Some(size) => {
            let pb = ProgressBar::new(size);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("    [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")?
                    .progress_chars("=> "),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(ProgressStyle::default_spinner().template("    {spinner} {bytes}")?);
            pb
        }
    };
    Ok(pb)
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}
