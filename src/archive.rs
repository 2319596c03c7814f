//! Archive creation.
//!
//! One zip per (version, target, edition), named deterministically and
//! assembled in a temporary file that is renamed into place only after the
//! writer finishes - a failed run never leaves a partial archive behind.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::config::{APP_NAME, Config, Edition};
use crate::error::{BuildError, Result};
use crate::output;
use crate::target::PackageTarget;

/// Deterministic archive filename for one output artifact.
pub fn archive_name(version: &str, target: PackageTarget, edition: Edition) -> String {
    format!(
        "{APP_NAME}-{version}-{}{}.zip",
        target.label(),
        edition.suffix()
    )
}

/// Zip the contents of `dir` into `zips/<name>` and return the archive path.
///
/// Entries are stored relative to `dir`, so the archive unpacks flat.
pub fn archive_dir(config: &Config, dir: &Path, name: &str) -> Result<PathBuf> {
    let dest = config.zips_dir().join(name);

    if config.dry_run {
        output::detail(&format!("dry-run: would archive {}", dest.display()));
        return Ok(dest);
    }

    let tmp = tempfile::NamedTempFile::new_in(config.zips_dir())?;
    write_zip(dir, tmp.as_file())?;
    tmp.persist(&dest).map_err(|e| BuildError::Io(e.error))?;

    output::detail(&format!("archived {}", dest.display()));
    Ok(dest)
}

fn write_zip(root: &Path, file: &File) -> Result<()> {
    let mut writer = ZipWriter::new(file);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for entry in WalkDir::new(root).min_depth(1) {
        let entry = entry.map_err(io::Error::from)?;
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        let rel_name = rel.to_string_lossy().replace('\\', "/");

        if entry.file_type().is_dir() {
            writer.add_directory(rel_name, options)?;
        } else {
            writer.start_file(rel_name, options)?;
            let mut f = File::open(entry.path())?;
            io::copy(&mut f, &mut writer)?;
        }
    }

    writer.finish()?;
    Ok(())
}
