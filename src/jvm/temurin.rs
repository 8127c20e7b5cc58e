use url::form_urlencoded;

use crate::config::Target;

const TEMURIN_RELEASES: &str = "https://github.com/adoptium";

/// A Temurin JDK build on GitHub releases for one target.
#[derive(Debug, Clone)]
pub struct JdkRelease {
    pub version: String,
    pub target: Target,
}

impl JdkRelease {
    pub fn new(version: &str, target: Target) -> Self {
        Self {
            version: version.to_string(),
            target,
        }
    }

    /// Feature release number, `11` for `11.0.12+7`.
    pub fn major(&self) -> &str {
        self.version
            .split(['.', '+'])
            .next()
            .unwrap_or(&self.version)
    }

    pub fn archive_name(&self) -> String {
        format!(
            "OpenJDK{}U-jdk_{}_{}_hotspot_{}{}",
            self.major(),
            self.target.arch_name(),
            self.target.os_name(),
            self.version.replace('+', "_"),
            self.target.archive_extension()
        )
    }

    pub fn url(&self) -> String {
        let tag: String = form_urlencoded::byte_serialize(self.version.as_bytes()).collect();
        format!(
            "{TEMURIN_RELEASES}/temurin{}-binaries/releases/download/jdk-{tag}/{}",
            self.major(),
            self.archive_name()
        )
    }

    pub fn checksum_url(&self) -> String {
        format!("{}.sha256.txt", self.url())
    }

    /// Top-level directory inside the JDK archive.
    pub fn dir_name(&self) -> String {
        format!("jdk-{}", self.version)
    }
}
