pub mod cache;
pub mod download;
pub mod temurin;

use std::path::{Path, PathBuf};

use crate::config::{ReleaseConfig, Target, TargetOs};
use crate::error::ReleaseError;
use crate::pack::extract;

use temurin::JdkRelease;

/// An extracted JDK inside a working directory.
#[derive(Debug, Clone)]
pub struct ExtractedJdk {
    /// `jdk-<version>` directory, removed once the runtime image exists.
    pub root: PathBuf,
    pub jmods: PathBuf,
}

/// Downloads (or reuses) the JDK for `target` and extracts it into `work_dir`.
pub async fn ensure_jdk(
    java_version: &str,
    target: &Target,
    work_dir: &Path,
) -> Result<ExtractedJdk, ReleaseError> {
    let release = JdkRelease::new(java_version, *target);
    let archive = download::download_jdk(&release, &ReleaseConfig::cache_dir()?).await?;
    unpack_jdk(&archive, &release, work_dir)
}

/// Extracts a downloaded JDK archive into `work_dir` and locates its `jmods`.
pub fn unpack_jdk(
    archive: &Path,
    release: &JdkRelease,
    work_dir: &Path,
) -> Result<ExtractedJdk, ReleaseError> {
    tracing::info!("extracting JDK archive");
    extract::extract(archive, work_dir)?;

    let root = work_dir.join(release.dir_name());
    if !root.is_dir() {
        return Err(ReleaseError::JdkDownload(format!(
            "archive {} has no {} directory",
            archive.display(),
            release.dir_name()
        )));
    }

    let jmods = jmods_dir(&root, &release.target);
    if !jmods.is_dir() {
        return Err(ReleaseError::JdkDownload(format!(
            "no jmods directory at {}",
            jmods.display()
        )));
    }
    Ok(ExtractedJdk { root, jmods })
}

/// macOS builds nest the JDK home in an app-bundle layout.
pub fn jmods_dir(jdk_root: &Path, target: &Target) -> PathBuf {
    match target.os {
        TargetOs::Mac => jdk_root.join("Contents").join("Home").join("jmods"),
        TargetOs::Linux | TargetOs::Windows => jdk_root.join("jmods"),
    }
}
