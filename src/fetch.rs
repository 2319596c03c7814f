//! Asset fetching.
//!
//! Two kinds of remote inputs feed a build: generated data files that are
//! re-downloaded on every run (the local copy is treated as a stale cache
//! and deleted first), and the NUSPacker jar, which is downloaded once to a
//! cache path and reused. Any fetch failure aborts the run; there is no
//! retry policy.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::config::Config;
use crate::error::{BuildError, Result};
use crate::output;
use crate::workspace;

/// User agent sent with every download; the data service tracks builder
/// versions server-side.
pub const USER_AGENT: &str = "NUSspliBuilder/2.2";

/// Fetch all remote inputs for a run, in order.
pub fn fetch_all(config: &Config) -> Result<()> {
    // (url, destination relative to the checkout root)
    let fresh = [
        (config.titledb_url.as_str(), "src/gtitles.c"),
        (config.cacerts_url.as_str(), "data/ca-certs.pem"),
    ];

    for (url, dest) in fresh {
        fetch_fresh(config, url, &config.root.join(dest))?;
    }

    fetch_nuspacker(config)
}

/// Generated inputs are never trusted across runs: delete, then re-download.
fn fetch_fresh(config: &Config, url: &str, dest: &Path) -> Result<()> {
    if config.dry_run {
        output::detail(&format!("dry-run: would download {url}"));
        return Ok(());
    }
    workspace::remove_file_if_present(dest)?;
    download(url, dest)
}

/// Download the packer jar unless the configured path already holds one.
pub fn fetch_nuspacker(config: &Config) -> Result<()> {
    if config.nuspacker.exists() {
        output::skip(&format!(
            "{} already cached, skipping download",
            config.nuspacker.display()
        ));
        return Ok(());
    }

    if config.dry_run {
        output::detail(&format!("dry-run: would download {}", config.nuspacker_url));
        return Ok(());
    }

    download(&config.nuspacker_url, &config.nuspacker)?;

    if let Some(expected) = &config.nuspacker_sha256 {
        verify_sha256(&config.nuspacker, expected)?;
    }
    Ok(())
}

/// Download `url` to `dest`, streaming to disk with a progress bar.
///
/// Redirects are followed; a connect error or non-success status is fatal.
pub fn download(url: &str, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let filename = dest
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "download".to_string());

    let pb = output::create_spinner(&format!("downloading {filename}"));

    let response = ureq::get(url)
        .set("User-Agent", USER_AGENT)
        .call()
        .map_err(|e| {
            pb.finish_and_clear();
            BuildError::Download {
                url: url.to_string(),
                reason: e.to_string(),
            }
        })?;

    if let Some(len) = response
        .header("content-length")
        .and_then(|s| s.parse().ok())
    {
        output::upgrade_to_bytes(&pb, len);
    }

    let mut reader = response.into_reader();
    let mut file = File::create(dest)?;
    let mut buffer = [0u8; 8192];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = reader.read(&mut buffer).map_err(|e| BuildError::Download {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if bytes_read == 0 {
            break;
        }
        file.write_all(&buffer[..bytes_read])?;
        total_bytes += bytes_read as u64;
        pb.set_position(total_bytes);
    }

    pb.finish_and_clear();
    output::detail(&format!("downloaded {filename} ({total_bytes} bytes)"));
    Ok(())
}

/// Verify a downloaded file against an expected SHA-256 digest.
pub fn verify_sha256(path: &Path, expected: &str) -> Result<()> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher)?;
    let actual = hex::encode(hasher.finalize());

    if !actual.eq_ignore_ascii_case(expected) {
        return Err(BuildError::ChecksumMismatch {
            path: path.to_path_buf(),
            expected: expected.to_ascii_lowercase(),
            actual,
        });
    }
    Ok(())
}
