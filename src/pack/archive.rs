use std::fs::File;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

use crate::error::ReleaseError;

/// Entries below `root` in sorted order, paired with their `/`-joined relative name.
fn entries(root: &Path) -> impl Iterator<Item = Result<(String, walkdir::DirEntry), ReleaseError>> + '_ {
    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .map(move |entry| {
            let entry = entry?;
            let relative = entry
                .path()
                .strip_prefix(root)
                .map_err(|e| ReleaseError::Io(std::io::Error::other(e)))?;
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            Ok((name, entry))
        })
}

pub fn write_tar_gz(root: &Path, output: &Path) -> Result<(), ReleaseError> {
    let file = File::create(output)?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut tar = tar::Builder::new(encoder);
    tar.follow_symlinks(false);

    for item in entries(root) {
        let (name, entry) = item?;
        if entry.file_type().is_dir() {
            tar.append_dir(&name, entry.path())?;
        } else {
            tar.append_path_with_name(entry.path(), &name)?;
        }
    }

    let encoder = tar.into_inner()?;
    encoder.finish()?;
    Ok(())
}

pub fn write_zip(root: &Path, output: &Path) -> Result<(), ReleaseError> {
    let file = File::create(output)?;
    let mut zip = zip::ZipWriter::new(file);
    let base = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for item in entries(root) {
        let (name, entry) = item?;
        let options = base.unix_permissions(unix_mode(entry.path())?);

        if entry.file_type().is_dir() {
            zip.add_directory(format!("{name}/"), options)?;
        } else if entry.file_type().is_symlink() {
            let target = std::fs::read_link(entry.path())?;
            zip.add_symlink(name, target.to_string_lossy(), options)?;
        } else {
            zip.start_file(name, options)?;
            let mut source = File::open(entry.path())?;
            std::io::copy(&mut source, &mut zip)?;
        }
    }

    zip.finish()?;
    Ok(())
}

#[cfg(unix)]
fn unix_mode(path: &Path) -> Result<u32, ReleaseError> {
    use std::os::unix::fs::PermissionsExt;
    Ok(std::fs::symlink_metadata(path)?.permissions().mode() & 0o777)
}

#[cfg(not(unix))]
fn unix_mode(path: &Path) -> Result<u32, ReleaseError> {
    Ok(if std::fs::symlink_metadata(path)?.is_dir() { 0o755 } else { 0o644 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::tempdir;

    fn sample_tree(root: &Path) {
        let bin = root.join("app").join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::write(bin.join("run"), b"#!/bin/sh\necho hi\n").unwrap();
        std::fs::write(root.join("app").join("README"), b"readme").unwrap();
    }

    #[test]
    fn tar_gz_uses_relative_paths() {
        let src = tempdir().unwrap();
        sample_tree(src.path());
        let out = tempdir().unwrap();
        let archive = out.path().join("app.tar.gz");

        write_tar_gz(src.path(), &archive).unwrap();

        let file = File::open(&archive).unwrap();
        let mut tar = tar::Archive::new(flate2::read::GzDecoder::new(file));
        let names: Vec<String> = tar
            .entries()
            .unwrap()
            .map(|e| e.unwrap().path().unwrap().to_string_lossy().trim_end_matches('/').to_string())
            .collect();

        assert_eq!(names, vec!["app", "app/README", "app/bin", "app/bin/run"]);
    }

    #[test]
    fn zip_contains_file_contents() {
        let src = tempdir().unwrap();
        sample_tree(src.path());
        let out = tempdir().unwrap();
        let archive = out.path().join("app.zip");

        write_zip(src.path(), &archive).unwrap();

        let mut zip = zip::ZipArchive::new(File::open(&archive).unwrap()).unwrap();
        assert!(zip.by_name("app/").unwrap().is_dir());
        let mut body = String::new();
        zip.by_name("app/bin/run")
            .unwrap()
            .read_to_string(&mut body)
            .unwrap();
        assert_eq!(body, "#!/bin/sh\necho hi\n");
    }

    #[cfg(unix)]
    #[test]
    fn zip_keeps_executable_bit() {
        use std::os::unix::fs::PermissionsExt;

        let src = tempdir().unwrap();
        sample_tree(src.path());
        let run = src.path().join("app").join("bin").join("run");
        std::fs::set_permissions(&run, std::fs::Permissions::from_mode(0o755)).unwrap();
        let out = tempdir().unwrap();
        let archive = out.path().join("app.zip");

        write_zip(src.path(), &archive).unwrap();

        let mut zip = zip::ZipArchive::new(File::open(&archive).unwrap()).unwrap();
        let mode = zip.by_name("app/bin/run").unwrap().unix_mode().unwrap();
        assert_eq!(mode & 0o777, 0o755);
    }
}
