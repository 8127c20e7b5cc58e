use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::config::Target;
use crate::error::ReleaseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptFlavor {
    Posix,
    Batch,
}

static POSIX_ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^BASEDIR=.*$").expect("anchor pattern is valid"));
static BATCH_ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^set REPO=.*$").expect("anchor pattern is valid"));

impl ScriptFlavor {
    fn anchor(&self) -> &'static Regex {
        match self {
            Self::Posix => &*POSIX_ANCHOR,
            Self::Batch => &*BATCH_ANCHOR,
        }
    }

    /// Line that defaults `JAVA_HOME` to the bundled runtime unless the caller set it.
    pub fn java_home_default(&self, relative_jdk: &str) -> String {
        match self {
            Self::Posix => format!("[ -z \"$JAVA_HOME\" ] && JAVA_HOME=\"$BASEDIR\"/{relative_jdk}"),
            Self::Batch => {
                format!("if not defined JAVA_HOME set JAVA_HOME=\"%BASEDIR%\\{relative_jdk}\"")
            }
        }
    }

    fn line_break(&self) -> &'static str {
        match self {
            Self::Posix => "\n",
            Self::Batch => "\r\n",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    Patched,
    AlreadyPatched,
}

#[derive(Debug, Clone)]
pub struct StartupScript {
    pub path: PathBuf,
    pub flavor: ScriptFlavor,
    bin: PathBuf,
    tool: String,
}

impl StartupScript {
    pub fn for_target(app_dir: &Path, tool: &str, target: &Target) -> Self {
        let flavor = if target.is_windows() {
            ScriptFlavor::Batch
        } else {
            ScriptFlavor::Posix
        };
        Self::new(&app_dir.join("bin"), tool, flavor)
    }

    pub fn new(bin: &Path, tool: &str, flavor: ScriptFlavor) -> Self {
        Self {
            path: Self::script_path(bin, tool, flavor),
            flavor,
            bin: bin.to_path_buf(),
            tool: tool.to_string(),
        }
    }

    fn script_path(bin: &Path, tool: &str, flavor: ScriptFlavor) -> PathBuf {
        match flavor {
            ScriptFlavor::Posix => bin.join(tool),
            ScriptFlavor::Batch => bin.join(format!("{tool}.bat")),
        }
    }

    /// The variant that does not ship for this target.
    pub fn other(&self) -> PathBuf {
        let other = match self.flavor {
            ScriptFlavor::Posix => ScriptFlavor::Batch,
            ScriptFlavor::Batch => ScriptFlavor::Posix,
        };
        Self::script_path(&self.bin, &self.tool, other)
    }

    pub fn patch(&self, relative_jdk: &str) -> Result<PatchOutcome, ReleaseError> {
        let contents = std::fs::read_to_string(&self.path)?;
        match insert_java_home(&contents, self.flavor, relative_jdk) {
            Some(patched) => {
                std::fs::write(&self.path, patched)?;
                Ok(PatchOutcome::Patched)
            }
            None if contents.contains(&self.flavor.java_home_default(relative_jdk)) => {
                Ok(PatchOutcome::AlreadyPatched)
            }
            None => Err(ReleaseError::ScriptAnchorMissing {
                path: self.path.clone(),
                anchor: self.flavor.anchor().as_str().trim_start_matches("(?m)").to_string(),
            }),
        }
    }
}

/// Returns the script with the `JAVA_HOME` default inserted after the anchor
/// line, or `None` when there is no anchor or the default is already present.
pub fn insert_java_home(contents: &str, flavor: ScriptFlavor, relative_jdk: &str) -> Option<String> {
    let default_line = flavor.java_home_default(relative_jdk);
    if contents.contains(&default_line) {
        return None;
    }

    let anchor = flavor.anchor().find(contents)?;
    // `$` stops before `\n` but not before `\r`.
    let end = anchor.as_str().trim_end_matches('\r').len() + anchor.start();

    let mut patched = String::with_capacity(contents.len() + default_line.len() + 2);
    patched.push_str(&contents[..end]);
    patched.push_str(flavor.line_break());
    patched.push_str(&default_line);
    patched.push_str(&contents[end..]);
    Some(patched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    const POSIX: &str = "#!/bin/sh\nPRG=\"$0\"\nBASEDIR=`dirname \"$PRG\"`/..\nBASEDIR=`cd \"$BASEDIR\" && pwd`\nexec java\n";
    const BATCH: &str = "@echo off\r\nset BASEDIR=%~dp0..\r\nset REPO=%BASEDIR%\\lib\r\n\"%JAVACMD%\" %*\r\n";

    #[test]
    fn posix_default_follows_first_basedir_line() {
        let patched = insert_java_home(POSIX, ScriptFlavor::Posix, "jdk-11.0.12+7").unwrap();
        assert_eq!(
            patched,
            "#!/bin/sh\nPRG=\"$0\"\nBASEDIR=`dirname \"$PRG\"`/..\n\
             [ -z \"$JAVA_HOME\" ] && JAVA_HOME=\"$BASEDIR\"/jdk-11.0.12+7\n\
             BASEDIR=`cd \"$BASEDIR\" && pwd`\nexec java\n"
        );
    }

    #[test]
    fn batch_default_follows_set_repo_line() {
        let patched = insert_java_home(BATCH, ScriptFlavor::Batch, "jdk-11.0.12+7").unwrap();
        assert_eq!(
            patched,
            "@echo off\r\nset BASEDIR=%~dp0..\r\nset REPO=%BASEDIR%\\lib\r\n\
             if not defined JAVA_HOME set JAVA_HOME=\"%BASEDIR%\\jdk-11.0.12+7\"\r\n\
             \"%JAVACMD%\" %*\r\n"
        );
    }

    #[test]
    fn missing_anchor_is_none() {
        assert_eq!(insert_java_home("#!/bin/sh\nexec java\n", ScriptFlavor::Posix, "jdk"), None);
    }

    #[test]
    fn patching_twice_leaves_one_default() {
        let dir = tempdir().unwrap();
        let script = StartupScript::new(dir.path(), "lsp-cli", ScriptFlavor::Posix);
        std::fs::write(&script.path, POSIX).unwrap();

        assert_eq!(script.patch("jdk-11.0.12+7").unwrap(), PatchOutcome::Patched);
        assert_eq!(script.patch("jdk-11.0.12+7").unwrap(), PatchOutcome::AlreadyPatched);

        let contents = std::fs::read_to_string(&script.path).unwrap();
        assert_eq!(contents.matches("JAVA_HOME=\"$BASEDIR\"").count(), 1);
    }

    #[test]
    fn patch_without_anchor_fails() {
        let dir = tempdir().unwrap();
        let script = StartupScript::new(dir.path(), "lsp-cli", ScriptFlavor::Batch);
        std::fs::write(&script.path, "@echo off\r\n").unwrap();

        let err = script.patch("jdk").unwrap_err();
        assert!(matches!(err, ReleaseError::ScriptAnchorMissing { .. }));
    }

    #[test]
    fn selects_script_per_target() {
        let app = Path::new("/app");
        let linux = StartupScript::for_target(app, "lsp-cli", &Target::from_str("linux-x64").unwrap());
        let windows = StartupScript::for_target(app, "lsp-cli", &Target::from_str("windows-x64").unwrap());

        assert_eq!(linux.path, PathBuf::from("/app/bin/lsp-cli"));
        assert_eq!(linux.other(), PathBuf::from("/app/bin/lsp-cli.bat"));
        assert_eq!(windows.path, PathBuf::from("/app/bin/lsp-cli.bat"));
        assert_eq!(windows.other(), PathBuf::from("/app/bin/lsp-cli"));
    }

    #[test]
    fn dotted_tool_name_keeps_full_script_names() {
        let app = Path::new("/app");
        let linux = StartupScript::for_target(app, "lsp.cli", &Target::from_str("linux-x64").unwrap());
        let windows = StartupScript::for_target(app, "lsp.cli", &Target::from_str("windows-x64").unwrap());

        assert_eq!(linux.path, PathBuf::from("/app/bin/lsp.cli"));
        assert_eq!(linux.other(), PathBuf::from("/app/bin/lsp.cli.bat"));
        assert_eq!(windows.path, PathBuf::from("/app/bin/lsp.cli.bat"));
        assert_eq!(windows.other(), PathBuf::from("/app/bin/lsp.cli"));
    }
}
