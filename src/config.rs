use std::fmt;
use std::path::PathBuf;

use crate::error::ReleaseError;

pub const DEFAULT_TOOL_NAME: &str = "lsp-cli";
pub const DEFAULT_JAVA_VERSION: &str = "11.0.12+7";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetOs {
    Linux,
    Mac,
    Windows,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetArch {
    X64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub os: TargetOs,
    pub arch: TargetArch,
}

impl Target {
    pub const ALL: [Target; 3] = [
        Target { os: TargetOs::Linux, arch: TargetArch::X64 },
        Target { os: TargetOs::Mac, arch: TargetArch::X64 },
        Target { os: TargetOs::Windows, arch: TargetArch::X64 },
    ];

    pub fn from_str(s: &str) -> Result<Self, ReleaseError> {
        Self::ALL
            .into_iter()
            .find(|t| t.to_string() == s)
            .ok_or_else(|| ReleaseError::InvalidTarget(s.to_string()))
    }

    /// Platform name as used by Adoptium and in output archive names.
    pub fn os_name(&self) -> &'static str {
        match self.os {
            TargetOs::Linux => "linux",
            TargetOs::Mac => "mac",
            TargetOs::Windows => "windows",
        }
    }

    pub fn arch_name(&self) -> &'static str {
        match self.arch {
            TargetArch::X64 => "x64",
        }
    }

    pub fn is_windows(&self) -> bool {
        self.os == TargetOs::Windows
    }

    /// Windows builds ship as zip, everything else as tar.gz.
    pub fn archive_extension(&self) -> &'static str {
        if self.is_windows() {
            ".zip"
        } else {
            ".tar.gz"
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os_name(), self.arch_name())
    }
}

#[derive(Debug, Clone)]
pub struct ReleaseConfig {
    pub project_dir: PathBuf,
    pub tool_name: String,
    pub java_version: String,
    pub targets: Vec<Target>,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            tool_name: DEFAULT_TOOL_NAME.to_string(),
            java_version: DEFAULT_JAVA_VERSION.to_string(),
            targets: Target::ALL.to_vec(),
        }
    }
}

impl ReleaseConfig {
    pub fn manifest_path(&self) -> PathBuf {
        self.project_dir.join("pom.xml")
    }

    pub fn target_dir(&self) -> PathBuf {
        self.project_dir.join("target")
    }

    /// Directory name of the application tree inside the pre-built archive.
    pub fn app_dir_name(&self, version: &str) -> String {
        format!("{}-{}", self.tool_name, version)
    }

    pub fn app_archive_path(&self, version: &str) -> PathBuf {
        self.target_dir()
            .join(format!("{}.tar.gz", self.app_dir_name(version)))
    }

    pub fn output_archive_path(&self, version: &str, target: &Target) -> PathBuf {
        self.target_dir().join(format!(
            "{}-{}-{}-{}{}",
            self.tool_name,
            version,
            target.os_name(),
            target.arch_name(),
            target.archive_extension()
        ))
    }

    pub fn cache_dir() -> Result<PathBuf, ReleaseError> {
        Ok(dirs::cache_dir()
            .ok_or(ReleaseError::NoCacheDir)?
            .join("lsp-cli-release")
            .join("jdk"))
    }
}
