//! Release builder CLI.
//!
//! Run from the NUSspli checkout root:
//!
//!   nusspli-builder                        build Debug and Release
//!   nusspli-builder --debug-only           pre-release style run
//!   nusspli-builder --set-version 1.2.3    override and rewrite the version
//!
//! Tool paths can be preset in a `builder.toml` next to the checkout;
//! command-line flags win over file values.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use nusspli_builder::config::{Config, ConfigFile, Edition};
use nusspli_builder::pipeline;
use nusspli_builder::target::PackageTarget;

#[derive(Parser)]
#[command(name = "nusspli-builder")]
#[command(about = "Builds and packages NUSspli release archives")]
#[command(version)]
struct Cli {
    /// Override the release version and rewrite include/utils.h to match
    #[arg(long, value_name = "VERSION")]
    set_version: Option<String>,

    /// Build only the Debug edition
    #[arg(long, conflicts_with = "release_only")]
    debug_only: bool,

    /// Build only the Release edition
    #[arg(long)]
    release_only: bool,

    /// Package Release editions even for ALPHA/BETA versions
    #[arg(long)]
    force_release: bool,

    /// Skip the reduced-feature Lite bundle
    #[arg(long)]
    no_lite: bool,

    /// Path to NUSPacker.jar (downloaded to the cache directory when unset)
    #[arg(long, value_name = "PATH")]
    nuspacker: Option<PathBuf>,

    /// Path to the wuhbtool executable (defaults to the one on PATH)
    #[arg(long, value_name = "PATH")]
    wuhbtool: Option<PathBuf>,

    /// Parallel jobs for make (defaults to the CPU count)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Application checkout to build
    #[arg(long, value_name = "DIR", default_value = ".")]
    root: PathBuf,

    /// Configuration file (defaults to builder.toml in the checkout)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log every step without executing commands or touching files
    #[arg(long)]
    dry_run: bool,

    /// Print commands as they execute
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let file = load_config_file(&cli)?;
    let config = build_config(cli, file);

    pipeline::run(&config).context("release build failed")?;
    Ok(())
}

fn load_config_file(cli: &Cli) -> Result<ConfigFile> {
    match &cli.config {
        Some(path) => ConfigFile::load(path)
            .with_context(|| format!("cannot load config {}", path.display())),
        None => {
            let default = cli.root.join("builder.toml");
            if default.exists() {
                ConfigFile::load(&default)
                    .with_context(|| format!("cannot load config {}", default.display()))
            } else {
                Ok(ConfigFile::default())
            }
        }
    }
}

fn build_config(cli: Cli, file: ConfigFile) -> Config {
    let editions = if cli.debug_only {
        vec![Edition::Debug]
    } else if cli.release_only {
        vec![Edition::Release]
    } else {
        vec![Edition::Debug, Edition::Release]
    };

    let targets = if cli.no_lite {
        PackageTarget::ALL
            .into_iter()
            .filter(|t| *t != PackageTarget::Lite)
            .collect()
    } else {
        PackageTarget::ALL.to_vec()
    };

    let defaults = Config::default();
    Config {
        root: cli.root,
        editions,
        targets,
        force_release: cli.force_release,
        set_version: cli.set_version,
        nuspacker: cli
            .nuspacker
            .or(file.nuspacker)
            .unwrap_or(defaults.nuspacker),
        nuspacker_sha256: file.nuspacker_sha256,
        wuhbtool: cli.wuhbtool.or(file.wuhbtool).unwrap_or(defaults.wuhbtool),
        java: file.java.unwrap_or(defaults.java),
        make: file.make.unwrap_or(defaults.make),
        jobs: cli.jobs.or(file.jobs).unwrap_or(defaults.jobs),
        titledb_url: file.titledb_url.unwrap_or(defaults.titledb_url),
        cacerts_url: file.cacerts_url.unwrap_or(defaults.cacerts_url),
        nuspacker_url: file.nuspacker_url.unwrap_or(defaults.nuspacker_url),
        dry_run: cli.dry_run,
        verbose: cli.verbose,
    }
}
