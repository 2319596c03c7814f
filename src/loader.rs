//! Loader packaging.
//!
//! The Homebrew Launcher needs no external packer: the compiled binary and
//! its launcher metadata are copied flat into the output directory.

use std::fs;
use std::path::Path;

use crate::config::{APP_NAME, Config};
use crate::error::Result;
use crate::output;

/// Launcher metadata copied verbatim next to the binary.
const HBL_META_FILES: [&str; 2] = ["meta.xml", "icon.png"];

/// Copy the loader payload for the current binary into `out_dir`.
pub fn package(config: &Config, out_dir: &Path) -> Result<()> {
    if config.dry_run {
        output::detail("dry-run: skipping loader packaging");
        return Ok(());
    }

    fs::create_dir_all(out_dir)?;
    fs::copy(config.rpx_path(), out_dir.join(format!("{APP_NAME}.rpx")))?;
    for name in HBL_META_FILES {
        fs::copy(config.hbl_meta_dir().join(name), out_dir.join(name))?;
    }
    Ok(())
}
