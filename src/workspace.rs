//! Workspace preparation.
//!
//! Every run starts from a clean slate: anything a previous run of the same
//! version may have produced is deleted before the directory skeleton is
//! recreated. Deletions are existence-checked, so the step is idempotent and
//! also mops up after an interrupted run.

use std::fs;
use std::path::Path;

use crate::archive;
use crate::config::{APP_NAME, Config, Edition};
use crate::error::Result;
use crate::output;
use crate::target::PackageTarget;

const EDITIONS: [Edition; 2] = [Edition::Debug, Edition::Release];

/// Loose build leftovers the toolchain may have dropped in the checkout root.
const STALE_EXTENSIONS: [&str; 3] = ["rpx", "wuhb", "zip"];

/// Delete a file if present. An absent path is a no-op, not an error.
pub fn remove_file_if_present(path: &Path) -> Result<()> {
    if path.exists() {
        output::detail(&format!("deleting {}", path.display()));
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Delete a directory tree if present. An absent path is a no-op.
pub fn remove_dir_if_present(path: &Path) -> Result<()> {
    if path.exists() {
        output::detail(&format!("deleting {}", path.display()));
        fs::remove_dir_all(path)?;
    }
    Ok(())
}

/// Remove every artifact a previous run of `version` may have left behind.
///
/// Covers all known editions and package targets regardless of what the
/// current run will build, so a narrower rerun never mixes in stale output.
pub fn clean(config: &Config, version: &str) -> Result<()> {
    if config.dry_run {
        output::detail("dry-run: skipping workspace cleanup");
        return Ok(());
    }

    remove_dir_if_present(&config.staging_dir())?;
    remove_dir_if_present(&config.out_dir())?;

    for edition in EDITIONS {
        for ext in STALE_EXTENSIONS {
            remove_file_if_present(&config.root.join(format!(
                "{APP_NAME}-{version}{}.{ext}",
                edition.suffix()
            )))?;
        }
    }

    for edition in EDITIONS {
        for target in PackageTarget::ALL {
            remove_file_if_present(
                &config
                    .zips_dir()
                    .join(archive::archive_name(version, target, edition)),
            )?;
        }
    }

    Ok(())
}

/// Recreate the directory skeleton for the editions and targets being built.
pub fn prepare(config: &Config, editions: &[Edition], targets: &[PackageTarget]) -> Result<()> {
    if config.dry_run {
        return Ok(());
    }

    for &edition in editions {
        for &target in targets {
            fs::create_dir_all(config.out_dir().join(target.out_dir_name(edition)))?;
        }
    }

    fs::create_dir_all(config.staging_dir().join("code"))?;
    fs::create_dir_all(config.zips_dir())?;
    Ok(())
}
