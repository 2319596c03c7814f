//! Native toolchain invocation.
//!
//! Compilation is delegated entirely to the devkitPro make build: the
//! pipeline selects a goal and a parallelism hint and otherwise treats the
//! compiler as opaque. Bundling wraps the resulting `.rpx` into a
//! self-contained `.wuhb` with fixed application metadata.

use std::fs;
use std::path::Path;

use crate::config::{APP_NAME, Config, Edition};
use crate::error::Result;
use crate::process;

/// Application author baked into every bundle.
pub const AUTHOR: &str = "V10lator";

/// Compile one edition of the binary. `lite` selects the reduced feature set.
///
/// Always runs `make clean` first: object files from another edition or
/// feature set must never leak into this build.
pub fn compile(config: &Config, edition: Edition, lite: bool) -> Result<()> {
    process::run(config, &config.root, &config.make, &["clean".to_string()])?;

    let mut args = vec![
        format!("-j{}", config.jobs),
        edition.make_goal().to_string(),
    ];
    if lite {
        args.push("LITE=1".to_string());
    }
    process::run(config, &config.root, &config.make, &args)
}

/// Wrap the compiled binary into an application bundle in `out_dir`.
pub fn bundle(config: &Config, out_dir: &Path) -> Result<()> {
    if !config.dry_run {
        fs::create_dir_all(out_dir)?;
    }

    let args = vec![
        config.rpx_path().display().to_string(),
        out_dir.join(format!("{APP_NAME}.wuhb")).display().to_string(),
        format!("--name={APP_NAME}"),
        format!("--short-name={APP_NAME}"),
        format!("--author={AUTHOR}"),
        "--icon=meta/menu/iconTex.tga".to_string(),
        "--tv-image=meta/menu/bootTvTex.tga".to_string(),
        "--drc-image=meta/menu/bootDrcTex.tga".to_string(),
        "--content=data".to_string(),
    ];
    process::run(config, &config.root, &config.wuhbtool, &args)
}
