use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::ReleaseError;

/// Modules linked into every runtime image.
pub const MODULES: &str = "java.se";

/// Host `jlink`: `$JAVA_HOME/bin/jlink` when present, otherwise from `PATH`.
pub fn find_jlink() -> Result<PathBuf, ReleaseError> {
    let exe = format!("jlink{}", std::env::consts::EXE_SUFFIX);

    if let Some(java_home) = std::env::var_os("JAVA_HOME") {
        let candidate = Path::new(&java_home).join("bin").join(&exe);
        if candidate.is_file() {
            return Ok(candidate);
        }
        tracing::debug!("no jlink in JAVA_HOME, searching PATH");
    }

    which::which(&exe)
        .map_err(|e| ReleaseError::JlinkFailed(format!("jlink not found: {e}")))
}

pub fn create_runtime(jlink: &Path, jmods: &Path, output: &Path) -> Result<(), ReleaseError> {
    if output.exists() {
        std::fs::remove_dir_all(output)?;
    }

    tracing::info!("creating Java runtime image with jlink");

    let args = jlink_args(jmods, output);
    tracing::debug!("{} {:?}", jlink.display(), args);

    let result = Command::new(jlink)
        .args(&args)
        .output()
        .map_err(|e| ReleaseError::JlinkFailed(format!("failed to run jlink: {e}")))?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        return Err(ReleaseError::JlinkFailed(stderr.trim().to_string()));
    }

    Ok(())
}

fn jlink_args(jmods: &Path, output: &Path) -> Vec<std::ffi::OsString> {
    let mut args: Vec<std::ffi::OsString> = vec!["--module-path".into(), jmods.into()];
    args.extend(
        [
            "--add-modules",
            MODULES,
            "--strip-debug",
            "--no-man-pages",
            "--no-header-files",
            "--compress=2",
            "--output",
        ]
        .map(std::ffi::OsString::from),
    );
    args.push(output.into());
    args
}
