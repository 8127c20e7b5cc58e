use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReleaseError {
    #[error("failed to query git remote: {0}")]
    GitFailed(String),

    #[error("cannot parse GitHub organization/repository from remote URL '{0}'")]
    RemoteUrl(String),

    #[error("no <version> tag found in {0}")]
    VersionTagMissing(PathBuf),

    #[error("startup script {path} has no line matching '{anchor}'")]
    ScriptAnchorMissing { path: PathBuf, anchor: String },

    #[error("application tree not found at {0}")]
    AppTreeMissing(PathBuf),

    #[error("invalid target '{0}'. Use: linux-x64, mac-x64, windows-x64")]
    InvalidTarget(String),

    #[error("path traversal detected: archive member '{member}' escapes {dest}")]
    PathTraversal { member: String, dest: PathBuf },

    #[error("unsupported archive format: {0}")]
    UnsupportedArchive(PathBuf),

    #[error("JDK download failed: {0}")]
    JdkDownload(String),

    #[error("checksum mismatch for {file}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        file: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("jlink failed: {0}")]
    JlinkFailed(String),

    #[error("cannot determine cache directory")]
    NoCacheDir,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}
