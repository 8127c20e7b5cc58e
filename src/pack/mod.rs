pub mod archive;
pub mod extract;

use std::path::Path;

use crate::config::Target;
use crate::error::ReleaseError;

/// Packages everything below `root` into `output` in the target's archive
/// format and returns the archive size in bytes.
pub fn create_archive(root: &Path, output: &Path, target: &Target) -> Result<u64, ReleaseError> {
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if output.exists() {
        std::fs::remove_file(output)?;
    }

    tracing::info!("creating binary archive {}", output.display());

    if target.is_windows() {
        archive::write_zip(root, output)?;
    } else {
        archive::write_tar_gz(root, output)?;
    }

    Ok(std::fs::metadata(output)?.len())
}
