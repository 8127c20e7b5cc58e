use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::{ReleaseConfig, Target};
use crate::error::ReleaseError;
use crate::jvm::temurin::JdkRelease;
use crate::pack::{self, extract};
use crate::script::{PatchOutcome, StartupScript};
use crate::{jlink, jvm, manifest, repo};

#[derive(Debug, Clone)]
pub struct BuiltArchive {
    pub target: Target,
    pub path: PathBuf,
    pub size: u64,
}

/// Builds one archive per configured target, stopping at the first failure.
pub async fn run(config: &ReleaseConfig) -> Result<Vec<BuiltArchive>> {
    let repository = repo::locate_repository(&config.project_dir)
        .context("cannot determine GitHub repository")?;
    tracing::info!("releasing {repository}");

    let jlink_bin = jlink::find_jlink()?;
    tracing::debug!("using {}", jlink_bin.display());

    let mut built = Vec::with_capacity(config.targets.len());
    for target in &config.targets {
        let archive = build_target(config, target, &jlink_bin)
            .await
            .with_context(|| format!("building {target} archive failed"))?;
        built.push(archive);
    }

    Ok(built)
}

pub async fn build_target(
    config: &ReleaseConfig,
    target: &Target,
    jlink_bin: &Path,
) -> Result<BuiltArchive, ReleaseError> {
    tracing::info!("processing platform/arch '{}/{}'", target.os_name(), target.arch_name());

    let version = manifest::read_version(&config.manifest_path())?;
    let work_dir = tempfile::tempdir()?;

    let app_dir = unpack_app(config, &version, work_dir.path())?;

    let jdk = jvm::ensure_jdk(&config.java_version, target, work_dir.path()).await?;
    let relative_jdk = JdkRelease::new(&config.java_version, *target).dir_name();
    jlink::create_runtime(jlink_bin, &jdk.jmods, &app_dir.join(&relative_jdk))?;

    tracing::info!("removing JDK directory");
    std::fs::remove_dir_all(&jdk.root)?;

    prepare_startup_script(config, target, &app_dir, &relative_jdk)?;

    let path = config.output_archive_path(&version, target);
    let size = pack::create_archive(work_dir.path(), &path, target)?;

    Ok(BuiltArchive {
        target: *target,
        path,
        size,
    })
}

/// Extracts the pre-built application archive and returns its top-level tree.
pub fn unpack_app(config: &ReleaseConfig, version: &str, work_dir: &Path) -> Result<PathBuf, ReleaseError> {
    let archive = config.app_archive_path(version);
    tracing::info!("extracting {}", archive.display());
    extract::extract(&archive, work_dir)?;

    let app_dir = work_dir.join(config.app_dir_name(version));
    if !app_dir.is_dir() {
        return Err(ReleaseError::AppTreeMissing(app_dir));
    }
    Ok(app_dir)
}

/// Drops the script flavour the target cannot run and points the other one
/// at the bundled runtime.
pub fn prepare_startup_script(
    config: &ReleaseConfig,
    target: &Target,
    app_dir: &Path,
    relative_jdk: &str,
) -> Result<(), ReleaseError> {
    let script = StartupScript::for_target(app_dir, &config.tool_name, target);

    let other = script.other();
    if other.exists() {
        std::fs::remove_file(&other)?;
    }

    tracing::info!("setting default for JAVA_HOME in {}", script.path.display());
    if script.patch(relative_jdk)? == PatchOutcome::AlreadyPatched {
        tracing::warn!("{} already defaults JAVA_HOME", script.path.display());
    }
    Ok(())
}
