//! Version resolution from the application's build metadata.
//!
//! The single source of truth is the `NUSSPLI_VERSION` define in
//! `include/utils.h`. An explicit override rewrites the define in place so
//! the compiled binary reports the same version the archives are named
//! after. The resolved version also lands in `version.txt` for CI.

use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::error::{BuildError, Result};
use crate::output;

const VERSION_DEFINE: &str = "#define NUSSPLI_VERSION";

/// Marker substrings that classify a version as a pre-release.
const PRERELEASE_MARKERS: [&str; 2] = ["ALPHA", "BETA"];

/// A resolved release version, fixed for the whole run.
#[derive(Debug, Clone)]
pub struct ResolvedVersion {
    version: String,
    prerelease: bool,
}

impl ResolvedVersion {
    /// Classify a version string.
    pub fn new(version: impl Into<String>) -> Self {
        let version = version.into();
        Self {
            prerelease: is_prerelease(&version),
            version,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.version
    }

    /// True for versions carrying an ALPHA or BETA marker.
    pub fn is_prerelease(&self) -> bool {
        self.prerelease
    }

    /// True when Release-edition packaging should run. Pre-releases are
    /// tested as Debug only unless the operator forces a full release.
    pub fn package_release(&self, force_release: bool) -> bool {
        !self.prerelease || force_release
    }
}

/// Resolve the version for this run.
///
/// With an override configured the header define is rewritten first;
/// otherwise the current define value is used as-is. Missing or malformed
/// metadata aborts the run before anything else happens.
pub fn resolve(config: &Config) -> Result<ResolvedVersion> {
    let header = config.version_header();

    let version = match &config.set_version {
        Some(version) => {
            if config.dry_run {
                output::detail(&format!("dry-run: would set version {version}"));
            } else {
                rewrite_define(&header, version)?;
            }
            version.clone()
        }
        None => read_define(&header)?,
    };

    if !config.dry_run {
        fs::write(config.root.join("version.txt"), format!("version={version}\n"))?;
    }

    Ok(ResolvedVersion::new(version))
}

fn is_prerelease(version: &str) -> bool {
    PRERELEASE_MARKERS.iter().any(|marker| version.contains(marker))
}

fn read_define(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path).map_err(|source| BuildError::Metadata {
        path: path.to_path_buf(),
        source,
    })?;
    parse_define(&text).ok_or_else(|| BuildError::VersionNotFound {
        path: path.to_path_buf(),
    })
}

/// Extract the quoted value of the version define.
fn parse_define(text: &str) -> Option<String> {
    text.lines().find_map(|line| {
        let rest = line.trim_start().strip_prefix(VERSION_DEFINE)?;
        // Reject longer define names sharing the prefix.
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let rest = rest.trim_start().strip_prefix('"')?;
        rest.split_once('"').map(|(version, _)| version.to_string())
    })
}

/// Replace the quoted value of the version define, preserving the rest of
/// the header byte for byte.
fn rewrite_define(path: &Path, version: &str) -> Result<()> {
    let text = fs::read_to_string(path).map_err(|source| BuildError::Metadata {
        path: path.to_path_buf(),
        source,
    })?;

    let mut out = String::with_capacity(text.len());
    let mut found = false;
    for line in text.lines() {
        if !found {
            if let Some(rewritten) = rewrite_line(line, version) {
                out.push_str(&rewritten);
                out.push('\n');
                found = true;
                continue;
            }
        }
        out.push_str(line);
        out.push('\n');
    }

    if !found {
        return Err(BuildError::VersionNotFound {
            path: path.to_path_buf(),
        });
    }

    fs::write(path, out)?;
    Ok(())
}

fn rewrite_line(line: &str, version: &str) -> Option<String> {
    let rest = line.trim_start().strip_prefix(VERSION_DEFINE)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let open = line.find('"')?;
    let close = line[open + 1..].find('"')? + open + 1;
    Some(format!("{}{}{}", &line[..=open], version, &line[close..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::tempdir;

    const HEADER: &str = "#include <stdint.h>\n\n#define NUSSPLI_VERSION            \"1.150\"\n\n#define NAPI_URL                   \"https://napi.v10lator.de/v2/\"\n";

    fn checkout_with_header(text: &str) -> (tempfile::TempDir, Config) {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("include")).unwrap();
        std::fs::write(dir.path().join("include/utils.h"), text).unwrap();
        let config = Config::with_root(dir.path());
        (dir, config)
    }

    #[test]
    fn parses_version_define() {
        assert_eq!(parse_define(HEADER).as_deref(), Some("1.150"));
    }

    #[test]
    fn ignores_longer_define_names() {
        let text = "#define NUSSPLI_VERSION_MAJOR \"9\"\n#define NUSSPLI_VERSION \"2.0\"\n";
        assert_eq!(parse_define(text).as_deref(), Some("2.0"));
    }

    #[test]
    fn missing_define_is_none() {
        assert_eq!(parse_define("#define SOMETHING_ELSE \"1\"\n"), None);
    }

    #[test]
    fn resolves_from_header() {
        let (_dir, config) = checkout_with_header(HEADER);
        let resolved = resolve(&config).unwrap();
        assert_eq!(resolved.as_str(), "1.150");
        assert!(!resolved.is_prerelease());

        let txt = std::fs::read_to_string(config.root.join("version.txt")).unwrap();
        assert_eq!(txt, "version=1.150\n");
    }

    #[test]
    fn override_rewrites_header() {
        let (_dir, config) = checkout_with_header(HEADER);
        let config = config.set_version("2.0.0-BETA1");

        let resolved = resolve(&config).unwrap();
        assert_eq!(resolved.as_str(), "2.0.0-BETA1");
        assert!(resolved.is_prerelease());

        // The define changed, everything around it survived.
        let header = std::fs::read_to_string(config.version_header()).unwrap();
        assert!(header.contains("#define NUSSPLI_VERSION            \"2.0.0-BETA1\""));
        assert!(header.contains("NAPI_URL"));
        assert!(header.contains("#include <stdint.h>"));
    }

    #[test]
    fn missing_header_is_fatal() {
        let dir = tempdir().unwrap();
        let config = Config::with_root(dir.path());
        match resolve(&config) {
            Err(BuildError::Metadata { .. }) => {}
            other => panic!("expected metadata error, got {other:?}"),
        }
    }

    #[test]
    fn header_without_define_is_fatal() {
        let (_dir, config) = checkout_with_header("#define OTHER \"x\"\n");
        match resolve(&config) {
            Err(BuildError::VersionNotFound { .. }) => {}
            other => panic!("expected version-not-found, got {other:?}"),
        }
    }

    #[test]
    fn prerelease_classification() {
        assert!(is_prerelease("2.0.0-BETA"));
        assert!(is_prerelease("2.0.0-ALPHA2"));
        assert!(is_prerelease("BETA"));
        assert!(!is_prerelease("1.150"));
        assert!(!is_prerelease("2.0.0-rc1"));
    }

    #[test]
    fn release_packaging_policy() {
        let stable = ResolvedVersion::new("1.2.3");
        let beta = ResolvedVersion::new("2.0.0-BETA");

        assert!(stable.package_release(false));
        assert!(stable.package_release(true));
        assert!(!beta.package_release(false));
        assert!(beta.package_release(true));
    }

    #[test]
    fn dry_run_leaves_metadata_untouched() {
        let (_dir, config) = checkout_with_header(HEADER);
        let config = config.set_version("9.9.9").dry_run(true);

        let resolved = resolve(&config).unwrap();
        assert_eq!(resolved.as_str(), "9.9.9");

        let header = std::fs::read_to_string(config.version_header()).unwrap();
        assert!(header.contains("\"1.150\""));
        assert!(!config.root.join("version.txt").exists());
    }
}
