use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ReleaseError;

static VERSION_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<version>(.*?)</version>").expect("version pattern is valid"));

pub fn read_version(manifest: &Path) -> Result<String, ReleaseError> {
    let contents = std::fs::read_to_string(manifest)?;
    extract_version(&contents).ok_or_else(|| ReleaseError::VersionTagMissing(manifest.to_path_buf()))
}

/// Inner text of the first `<version>` tag, verbatim.
pub fn extract_version(contents: &str) -> Option<String> {
    VERSION_TAG
        .captures(contents)
        .map(|captures| captures[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn extracts_first_version_tag() {
        let pom = r#"<project>
  <artifactId>lsp-cli</artifactId>
  <version>1.2.3</version>
  <dependencies>
    <dependency><version>9.9.9</version></dependency>
  </dependencies>
</project>"#;
        assert_eq!(extract_version(pom).as_deref(), Some("1.2.3"));
    }

    #[test]
    fn keeps_inner_text_verbatim() {
        assert_eq!(
            extract_version("<version> 0.1.0-SNAPSHOT </version>").as_deref(),
            Some(" 0.1.0-SNAPSHOT ")
        );
    }

    #[test]
    fn missing_tag_is_none() {
        assert_eq!(extract_version("<project></project>"), None);
    }

    #[test]
    fn read_version_fails_without_tag() {
        let dir = tempdir().unwrap();
        let pom = dir.path().join("pom.xml");
        std::fs::write(&pom, "<project/>").unwrap();

        let err = read_version(&pom).unwrap_err();
        assert!(matches!(err, ReleaseError::VersionTagMissing(p) if p == pom));
    }

    #[test]
    fn read_version_reads_file() {
        let dir = tempdir().unwrap();
        let pom = dir.path().join("pom.xml");
        std::fs::write(&pom, "<project><version>1.2.3</version></project>").unwrap();

        assert_eq!(read_version(&pom).unwrap(), "1.2.3");
    }
}
