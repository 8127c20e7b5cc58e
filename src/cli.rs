use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{DEFAULT_JAVA_VERSION, DEFAULT_TOOL_NAME};

#[derive(Parser)]
#[command(name = "lsp-cli-release", version, about = "Build lsp-cli binary archives with a bundled JDK")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub project: ProjectArgs,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build one archive per target (default)
    Build {
        /// Target platforms (linux-x64, mac-x64, windows-x64); all when omitted
        #[arg(long = "target")]
        targets: Vec<String>,
    },
    /// Print the release plan as JSON
    Info,
    /// Remove downloaded JDK archives
    Clean,
}

#[derive(Args, Clone)]
pub struct ProjectArgs {
    /// Project directory containing pom.xml and target/
    #[arg(long, global = true, default_value = ".")]
    pub project_dir: PathBuf,

    /// Name of the packaged tool
    #[arg(long, global = true, default_value = DEFAULT_TOOL_NAME)]
    pub name: String,

    /// Temurin JDK version to bundle
    #[arg(long, global = true, default_value = DEFAULT_JAVA_VERSION)]
    pub java_version: String,
}
