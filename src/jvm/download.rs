use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;

use crate::error::ReleaseError;

use super::temurin::JdkRelease;

/// Downloads the JDK archive into `cache_dir`, reusing a previous download
/// whose checksum still matches the published one.
pub async fn download_jdk(release: &JdkRelease, cache_dir: &Path) -> Result<PathBuf, ReleaseError> {
    let url = release.url();
    let expected_sha = fetch_checksum(release).await?;

    tokio::fs::create_dir_all(cache_dir).await?;
    let dest = cache_dir.join(release.archive_name());

    if dest.exists() {
        if sha256_hex(&dest)? == expected_sha {
            tracing::info!("JDK archive already downloaded and verified");
            return Ok(dest);
        }
        tracing::warn!("cached {} failed verification, downloading again", dest.display());
        std::fs::remove_file(&dest)?;
    }

    tracing::info!("downloading JDK from {url}");

    let mut response = reqwest::get(&url)
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| ReleaseError::JdkDownload(format!("download failed: {e}")))?;

    let pb = ProgressBar::new(response.content_length().unwrap_or(0));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    pb.set_message(format!("Downloading JDK {}", release.version));

    let mut file = tokio::fs::File::create(&dest).await?;
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| ReleaseError::JdkDownload(format!("download stream failed: {e}")))?
    {
        file.write_all(&chunk).await?;
        pb.inc(chunk.len() as u64);
    }
    file.flush().await?;
    drop(file);

    pb.finish_with_message("Download complete");

    let actual = sha256_hex(&dest)?;
    if actual != expected_sha {
        std::fs::remove_file(&dest)?;
        return Err(ReleaseError::ChecksumMismatch {
            file: dest,
            expected: expected_sha,
            actual,
        });
    }

    Ok(dest)
}

async fn fetch_checksum(release: &JdkRelease) -> Result<String, ReleaseError> {
    let url = release.checksum_url();
    tracing::debug!("fetching checksum from {url}");

    let body = reqwest::get(&url)
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| ReleaseError::JdkDownload(format!("checksum request failed: {e}")))?
        .text()
        .await
        .map_err(|e| ReleaseError::JdkDownload(format!("failed to read checksum: {e}")))?;

    parse_checksum(&body)
        .ok_or_else(|| ReleaseError::JdkDownload(format!("malformed checksum file at {url}")))
}

/// First token of a `sha256sum`-style line.
fn parse_checksum(body: &str) -> Option<String> {
    let digest = body.split_whitespace().next()?;
    (digest.len() == 64 && digest.chars().all(|c| c.is_ascii_hexdigit()))
        .then(|| digest.to_ascii_lowercase())
}

fn sha256_hex(path: &Path) -> Result<String, ReleaseError> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}
