//! Channel packaging.
//!
//! NUSPacker consumes a staging tree with three subtrees: `code/` (binary
//! plus app/cos metadata), `meta/` (visual assets), and `content/` (bundled
//! data). The visual assets are filtered while staging: image-editor sources
//! never ship, and edition-exclusive assets are resolved to the edition
//! being packaged. The compiled binary is moved, not copied, so later
//! targets in the same edition must already have taken their copy.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::config::{APP_NAME, Config, Edition};
use crate::error::Result;
use crate::output;
use crate::process;
use crate::workspace::{remove_dir_if_present, remove_file_if_present};

/// Extension used by image-editor source files that must never ship.
const EDITOR_SOURCE_EXT: &str = "xcf";

/// Metadata files that belong next to the binary rather than under `meta/`.
const CODE_METADATA: [&str; 2] = ["app.xml", "cos.xml"];

/// Stage `edition` and pack it into an installable image under `out_dir`.
pub fn package(config: &Config, edition: Edition, out_dir: &Path) -> Result<()> {
    if config.dry_run {
        output::detail("dry-run: skipping channel packaging");
        return Ok(());
    }

    stage(config, edition)?;
    fs::create_dir_all(out_dir)?;

    let args = vec![
        "-jar".to_string(),
        config.nuspacker.display().to_string(),
        "-in".to_string(),
        config.staging_dir().display().to_string(),
        "-out".to_string(),
        out_dir.join(APP_NAME).display().to_string(),
    ];
    process::run(config, &config.root, &config.java, &args)
}

/// Assemble the staging tree for one edition.
///
/// The content subtree is edition-independent and reused across editions in
/// the same run; the metadata subtree is rebuilt because its assets can be
/// edition-exclusive; the binary is always swapped in fresh.
fn stage(config: &Config, edition: Edition) -> Result<()> {
    let staging = config.staging_dir();
    let code = staging.join("code");
    fs::create_dir_all(&code)?;

    let meta = staging.join("meta");
    remove_dir_if_present(&meta)?;
    stage_meta(&config.menu_meta_dir(), &meta, edition)?;

    for name in CODE_METADATA {
        let dest = code.join(name);
        remove_file_if_present(&dest)?;
        fs::rename(meta.join(name), dest)?;
    }

    let content = staging.join("content");
    if !content.exists() {
        copy_tree(&config.content_dir(), &content)?;
    }

    let staged_rpx = code.join(format!("{APP_NAME}.rpx"));
    remove_file_if_present(&staged_rpx)?;
    fs::rename(config.rpx_path(), staged_rpx)?;
    Ok(())
}

/// Copy the visual metadata tree, dropping editor sources and resolving
/// edition-suffixed assets to their canonical names.
fn stage_meta(src_root: &Path, dest_root: &Path, edition: Edition) -> Result<()> {
    for entry in WalkDir::new(src_root) {
        let entry = entry.map_err(std::io::Error::from)?;
        let Ok(rel) = entry.path().strip_prefix(src_root) else {
            continue;
        };

        if entry.file_type().is_dir() {
            fs::create_dir_all(dest_root.join(rel))?;
            continue;
        }

        if entry.path().extension().is_some_and(|ext| ext == EDITOR_SOURCE_EXT) {
            continue;
        }

        let name = entry.file_name().to_string_lossy();

        match edition_variant(&name) {
            Some((tag, canonical)) => {
                if tag == edition.asset_tag() {
                    let dest = match rel.parent() {
                        Some(parent) => dest_root.join(parent).join(canonical),
                        None => dest_root.join(canonical),
                    };
                    fs::copy(entry.path(), dest)?;
                }
                // The other edition's asset is filtered out entirely.
            }
            None => {
                fs::copy(entry.path(), dest_root.join(rel))?;
            }
        }
    }
    Ok(())
}

/// Split `iconTex-DEBUG.tga` into its edition tag and canonical filename.
fn edition_variant(name: &str) -> Option<(&str, String)> {
    let (stem, ext) = name.rsplit_once('.')?;
    let (base, tag) = stem.rsplit_once('-')?;
    if tag != "DEBUG" && tag != "RELEASE" {
        return None;
    }
    Some((tag, format!("{base}.{ext}")))
}

/// Recursively copy a directory tree.
fn copy_tree(src: &Path, dest: &Path) -> Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(std::io::Error::from)?;
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let to = dest.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&to)?;
        } else {
            fs::copy(entry.path(), &to)?;
        }
    }
    Ok(())
}
