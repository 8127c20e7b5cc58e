use std::fmt;
use std::path::Path;
use std::process::Command;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::ReleaseError;

static GITHUB_REMOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"github\.com[:/](.*?)/(.*?)(?:\.git)?$").expect("remote pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repository {
    pub organization: String,
    pub name: String,
}

impl Repository {
    pub fn releases_url(&self) -> String {
        format!("https://github.com/{}/{}/releases", self.organization, self.name)
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.organization, self.name)
    }
}

/// Reads the `origin` remote of the git checkout at `dir`.
pub fn locate_repository(dir: &Path) -> Result<Repository, ReleaseError> {
    let output = Command::new("git")
        .args(["remote", "get-url", "origin"])
        .current_dir(dir)
        .output()
        .map_err(|e| ReleaseError::GitFailed(format!("failed to run git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ReleaseError::GitFailed(stderr.trim().to_string()));
    }

    let url = String::from_utf8_lossy(&output.stdout);
    tracing::debug!("origin remote: {}", url.trim());
    parse_remote_url(&url)
}

pub fn parse_remote_url(url: &str) -> Result<Repository, ReleaseError> {
    let url = url.trim();
    let captures = GITHUB_REMOTE
        .captures(url)
        .ok_or_else(|| ReleaseError::RemoteUrl(url.to_string()))?;

    let organization = captures[1].to_string();
    let name = captures[2].to_string();
    if organization.is_empty() || name.is_empty() {
        return Err(ReleaseError::RemoteUrl(url.to_string()));
    }

    Ok(Repository { organization, name })
}
