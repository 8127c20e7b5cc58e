use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Component, Path, PathBuf};

use crate::error::ReleaseError;

/// Extracts a `.tar.gz`/`.tgz` or `.zip` archive into `dest`.
///
/// Every member is checked before anything is written: a member (or tar link
/// target) that would land outside `dest` aborts the extraction with
/// [`ReleaseError::PathTraversal`] and leaves `dest` untouched.
pub fn extract(archive: &Path, dest: &Path) -> Result<(), ReleaseError> {
    let file_name = archive
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ReleaseError::UnsupportedArchive(archive.to_path_buf()))?;

    std::fs::create_dir_all(dest)?;

    if file_name.ends_with(".tar.gz") || file_name.ends_with(".tgz") {
        extract_tar_gz(archive, dest)
    } else if file_name.ends_with(".zip") {
        extract_zip(archive, dest)
    } else {
        Err(ReleaseError::UnsupportedArchive(archive.to_path_buf()))
    }
}

/// Resolves `member` lexically below `dest`, rejecting anything that climbs out.
pub fn contained_path(dest: &Path, member: &Path) -> Result<PathBuf, ReleaseError> {
    resolve_within(Path::new(""), member, &HashSet::new())
        .map(|relative| dest.join(relative))
        .ok_or_else(|| traversal(dest, member.display().to_string()))
}

fn traversal(dest: &Path, member: String) -> ReleaseError {
    ReleaseError::PathTraversal {
        member,
        dest: dest.to_path_buf(),
    }
}

/// Walks `path` from the archive-relative `base` without touching the disk.
///
/// Returns `None` when the walk climbs above the archive root or continues
/// through an entry that an earlier member turned into a symlink.
fn resolve_within(base: &Path, path: &Path, symlinks: &HashSet<PathBuf>) -> Option<PathBuf> {
    let mut resolved = base.to_path_buf();
    let mut components = path.components().peekable();

    while let Some(component) = components.next() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !resolved.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
        if components.peek().is_some() && symlinks.contains(&resolved) {
            return None;
        }
    }

    Some(resolved)
}

fn open_tar_gz(archive: &Path) -> Result<tar::Archive<flate2::read::GzDecoder<BufReader<File>>>, ReleaseError> {
    let file = BufReader::new(File::open(archive)?);
    Ok(tar::Archive::new(flate2::read::GzDecoder::new(file)))
}

fn extract_tar_gz(archive: &Path, dest: &Path) -> Result<(), ReleaseError> {
    let mut symlinks = HashSet::new();

    let mut tar = open_tar_gz(archive)?;
    for entry in tar.entries()? {
        let entry = entry?;
        let member = entry.path()?.into_owned();

        // `unpack_in` skips members with any `..`, so refuse them outright.
        if member.components().any(|c| c == Component::ParentDir) {
            return Err(traversal(dest, member.display().to_string()));
        }
        let relative = resolve_within(Path::new(""), &member, &symlinks)
            .ok_or_else(|| traversal(dest, member.display().to_string()))?;

        if let Some(link) = entry.link_name()? {
            let kind = entry.header().entry_type();
            check_link(dest, &relative, &link, kind, &symlinks)?;
            if kind.is_symlink() {
                symlinks.insert(relative);
            }
        }
    }

    // The gzip stream cannot be rewound, so unpack from a second pass.
    let mut tar = open_tar_gz(archive)?;
    tar.set_preserve_permissions(true);
    for entry in tar.entries()? {
        let mut entry = entry?;
        if !entry.unpack_in(dest)? {
            return Err(traversal(dest, entry.path()?.display().to_string()));
        }
    }

    Ok(())
}

fn check_link(
    dest: &Path,
    member: &Path,
    link: &Path,
    kind: tar::EntryType,
    symlinks: &HashSet<PathBuf>,
) -> Result<(), ReleaseError> {
    // Hard link targets are archive paths, symlink targets are relative to the link.
    let base = if kind.is_hard_link() {
        Path::new("")
    } else {
        member.parent().unwrap_or(Path::new(""))
    };

    match resolve_within(base, link, symlinks) {
        Some(_) => Ok(()),
        None => Err(traversal(
            dest,
            format!("{} -> {}", member.display(), link.display()),
        )),
    }
}

fn extract_zip(archive: &Path, dest: &Path) -> Result<(), ReleaseError> {
    let file = BufReader::new(File::open(archive)?);
    let mut zip = zip::ZipArchive::new(file)?;

    let mut targets = Vec::with_capacity(zip.len());
    for i in 0..zip.len() {
        let entry = zip.by_index(i)?;
        targets.push(contained_path(dest, Path::new(entry.name()))?);
    }

    for (i, target) in targets.into_iter().enumerate() {
        let mut entry = zip.by_index(i)?;

        if entry.is_dir() {
            std::fs::create_dir_all(&target)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&target)?;
        std::io::copy(&mut entry, &mut out)?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&target, std::fs::Permissions::from_mode(mode & 0o777))?;
        }
    }

    Ok(())
}
