mod cli;
mod config;
mod error;
mod jlink;
mod jvm;
mod manifest;
mod pack;
mod release;
mod repo;
mod script;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::HumanBytes;

use cli::{Cli, Command, ProjectArgs};
use config::{ReleaseConfig, Target};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lsp_cli_release=info".parse()?),
        )
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();

    match cli.command {
        None => run_build(config_for(&cli.project, &[])?).await?,
        Some(Command::Build { targets }) => run_build(config_for(&cli.project, &targets)?).await?,
        Some(Command::Info) => run_info(&config_for(&cli.project, &[])?)?,
        Some(Command::Clean) => run_clean()?,
    }

    Ok(())
}

fn config_for(args: &ProjectArgs, targets: &[String]) -> Result<ReleaseConfig> {
    let targets = if targets.is_empty() {
        Target::ALL.to_vec()
    } else {
        targets
            .iter()
            .map(|t| Target::from_str(t))
            .collect::<Result<Vec<_>, _>>()?
    };

    Ok(ReleaseConfig {
        project_dir: std::fs::canonicalize(&args.project_dir)
            .unwrap_or_else(|_| args.project_dir.clone()),
        tool_name: args.name.clone(),
        java_version: args.java_version.clone(),
        targets,
    })
}

async fn run_build(config: ReleaseConfig) -> Result<()> {
    let built = release::run(&config).await?;

    eprintln!();
    for archive in &built {
        eprintln!("  {:<12} {} ({})", archive.target, archive.path.display(), HumanBytes(archive.size));
    }
    eprintln!();

    Ok(())
}

fn run_info(config: &ReleaseConfig) -> Result<()> {
    let version = manifest::read_version(&config.manifest_path())?;
    let repository = repo::locate_repository(&config.project_dir).ok();

    let archives: Vec<_> = config
        .targets
        .iter()
        .map(|t| {
            serde_json::json!({
                "target": t.to_string(),
                "jdk": jvm::temurin::JdkRelease::new(&config.java_version, *t).url(),
                "output": config.output_archive_path(&version, t),
            })
        })
        .collect();

    let info = serde_json::json!({
        (config.tool_name.as_str()): version,
        "java": config.java_version,
        "repository": repository,
        "releases": repository.as_ref().map(|r| r.releases_url()),
        "input": config.app_archive_path(&version),
        "archives": archives,
        "cache": ReleaseConfig::cache_dir()?,
    });

    println!("{}", serde_json::to_string_pretty(&info).context("serializing release info")?);
    Ok(())
}

fn run_clean() -> Result<()> {
    let cache_dir = ReleaseConfig::cache_dir()?;
    let freed = jvm::cache::clear(&cache_dir)?;
    if freed == 0 {
        eprintln!("Cache is already empty");
    } else {
        eprintln!("Cleaned {} of cached data", HumanBytes(freed));
    }
    Ok(())
}
