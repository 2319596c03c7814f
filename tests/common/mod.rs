//! Common test utilities for the integration suite.
//!
//! The external collaborators (make, wuhbtool, java) are replaced by small
//! shell scripts that produce the files the real tools would, so a full
//! pipeline run works inside a throwaway checkout.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use nusspli_builder::config::Config;
use tempfile::TempDir;

/// Records every make invocation; lets tests assert the toolchain never ran.
pub const MAKE_LOG: &str = "make.log";

/// Stub make: `clean` removes the binary, a build goal recreates it with the
/// argv as content (so bundles reveal which flags produced them).
const MAKE_STUB: &str = r#"#!/bin/sh
echo "$*" >> make.log
case "$*" in
  *clean*) rm -f NUSspli.rpx ;;
  *) echo "rpx $*" > NUSspli.rpx ;;
esac
"#;

/// Stub wuhbtool: copies the binary to the bundle path.
const WUHBTOOL_STUB: &str = r#"#!/bin/sh
cp "$1" "$2"
"#;

/// Stub java/NUSPacker: emits an image file into the -out directory.
const JAVA_STUB: &str = r#"#!/bin/sh
out=""
prev=""
for arg in "$@"; do
  if [ "$prev" = "-out" ]; then out="$arg"; fi
  prev="$arg"
done
mkdir -p "$out"
echo image > "$out/title.tmd"
"#;

/// A throwaway application checkout with stub external tools.
pub struct TestCheckout {
    dir: TempDir,
    pub root: PathBuf,
}

impl TestCheckout {
    pub fn new(version: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("checkout");

        fs::create_dir_all(root.join("include")).unwrap();
        fs::write(
            root.join("include/utils.h"),
            format!("#define NUSSPLI_VERSION            \"{version}\"\n"),
        )
        .unwrap();

        let menu = root.join("meta/menu");
        fs::create_dir_all(&menu).unwrap();
        for name in [
            "iconTex.tga",
            "bootTvTex.tga",
            "bootDrcTex.tga",
            "app.xml",
            "cos.xml",
        ] {
            fs::write(menu.join(name), name).unwrap();
        }
        fs::write(menu.join("iconTex.xcf"), "editor source").unwrap();

        let hbl = root.join("meta/hbl");
        fs::create_dir_all(&hbl).unwrap();
        fs::write(hbl.join("meta.xml"), "<app/>").unwrap();
        fs::write(hbl.join("icon.png"), "png").unwrap();

        fs::create_dir_all(root.join("data")).unwrap();
        fs::write(root.join("data/title.db"), "db").unwrap();
        fs::create_dir_all(root.join("src")).unwrap();

        let bin = dir.path().join("bin");
        fs::create_dir_all(&bin).unwrap();
        write_executable(&bin.join("make"), MAKE_STUB);
        write_executable(&bin.join("wuhbtool"), WUHBTOOL_STUB);
        write_executable(&bin.join("java"), JAVA_STUB);

        // Pre-cached packer jar so runs work without a download.
        fs::create_dir_all(dir.path().join("tools")).unwrap();
        fs::write(dir.path().join("tools/NUSPacker.jar"), "jar").unwrap();

        Self { dir, root }
    }

    /// Config wired to the stub tools and the cached jar.
    pub fn config(&self) -> Config {
        let bin = self.dir.path().join("bin");
        let mut config = Config::with_root(&self.root);
        config.make = bin.join("make");
        config.wuhbtool = bin.join("wuhbtool");
        config.java = bin.join("java");
        config.nuspacker = self.dir.path().join("tools/NUSPacker.jar");
        config.jobs = 2;
        config
    }

    /// All make invocations so far, one per line. None when make never ran.
    pub fn make_log(&self) -> Option<String> {
        fs::read_to_string(self.root.join(MAKE_LOG)).ok()
    }

    /// Filenames in `zips/`, sorted.
    pub fn zip_names(&self) -> Vec<String> {
        let zips = self.root.join("zips");
        let mut names: Vec<String> = match fs::read_dir(&zips) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().to_string())
                .collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }
}

fn write_executable(path: &Path, script: &str) {
    fs::write(path, script).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}
