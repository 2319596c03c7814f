//! The release pipeline.
//!
//! Fixed-order orchestration of a full packaging run:
//!
//! resolve version → fetch inputs → clean workspace → per edition
//! (compile → bundle → loader → channel → lite) → archive each target →
//! drop the staging tree.
//!
//! There is no state machine beyond this sequence and no recovery: the
//! first error aborts the run and the next run's cleanup handles leftovers.

use std::path::PathBuf;

use crate::archive;
use crate::channel;
use crate::config::{APP_NAME, Config, Edition};
use crate::error::Result;
use crate::fetch;
use crate::loader;
use crate::output;
use crate::target::PackageTarget;
use crate::toolchain;
use crate::version::{self, ResolvedVersion};
use crate::workspace;

/// Summary of one completed run.
#[derive(Debug)]
pub struct RunReport {
    /// Version every artifact of this run was built as.
    pub version: String,
    /// Whether the version classified as a pre-release.
    pub prerelease: bool,
    /// Created archives; under dry-run, the archives that would be created.
    pub archives: Vec<PathBuf>,
}

/// Execute a complete release build against the configured checkout.
pub fn run(config: &Config) -> Result<RunReport> {
    let resolved = version::resolve(config)?;
    output::action(&format!("Building {APP_NAME} {}", resolved.as_str()));

    if resolved.is_prerelease() && !config.force_release {
        output::info("pre-release version: Release packaging disabled");
    }

    output::action("Fetching inputs");
    fetch::fetch_all(config)?;

    let editions = effective_editions(config, &resolved);
    let targets = packaging_order(config);

    output::action("Cleaning workspace");
    workspace::clean(config, resolved.as_str())?;
    workspace::prepare(config, &editions, &targets)?;

    if editions.is_empty() {
        output::info("no editions to build");
    }

    let mut archives = Vec::new();
    for &edition in &editions {
        build_edition(config, &resolved, edition, &targets, &mut archives)?;
    }

    // The staging tree is scratch space. Existence-checked: a run that never
    // packaged a channel image has nothing to remove here.
    workspace::remove_dir_if_present(&config.staging_dir())?;

    output::success(&format!(
        "{} archive(s) in {}",
        archives.len(),
        config.zips_dir().display()
    ));

    Ok(RunReport {
        version: resolved.as_str().to_string(),
        prerelease: resolved.is_prerelease(),
        archives,
    })
}

/// Editions actually packaged this run, after the pre-release policy.
fn effective_editions(config: &Config, version: &ResolvedVersion) -> Vec<Edition> {
    config
        .editions
        .iter()
        .copied()
        .filter(|&edition| {
            edition == Edition::Debug || version.package_release(config.force_release)
        })
        .collect()
}

/// Requested targets, normalized to canonical packaging order.
fn packaging_order(config: &Config) -> Vec<PackageTarget> {
    PackageTarget::ALL
        .iter()
        .copied()
        .filter(|target| config.targets.contains(target))
        .collect()
}

/// Compile one edition and produce every requested package target for it.
fn build_edition(
    config: &Config,
    version: &ResolvedVersion,
    edition: Edition,
    targets: &[PackageTarget],
    archives: &mut Vec<PathBuf>,
) -> Result<()> {
    output::action(&format!("Building {edition} edition"));
    toolchain::compile(config, edition, false)?;

    for &target in targets {
        output::sub_action(target.label());
        let out_dir = config.out_dir().join(target.out_dir_name(edition));

        match target {
            PackageTarget::Aroma => toolchain::bundle(config, &out_dir)?,
            PackageTarget::Hbl => loader::package(config, &out_dir)?,
            PackageTarget::Channel => channel::package(config, edition, &out_dir)?,
            PackageTarget::Lite => {
                // The lite variant is its own compile of the same edition.
                toolchain::compile(config, edition, true)?;
                toolchain::bundle(config, &out_dir)?;
            }
        }

        archives.push(archive::archive_dir(
            config,
            &out_dir,
            &archive::archive_name(version.as_str(), target, edition),
        )?);
    }

    Ok(())
}
