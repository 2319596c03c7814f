//! Build configuration resolved once at startup.
//!
//! All paths and flags live in an immutable [`Config`] constructed before the
//! pipeline starts; no step mutates configuration mid-run. An optional
//! `builder.toml` supplies tool paths, with CLI flags taking precedence.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{BuildError, Result};
use crate::target::PackageTarget;

/// Application name used for binaries, bundles, and archive filenames.
pub const APP_NAME: &str = "NUSspli";

/// Build variant. Selects the make goal and the output/archive suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edition {
    Debug,
    Release,
}

impl Edition {
    /// Goal passed to make.
    pub fn make_goal(self) -> &'static str {
        match self {
            Edition::Debug => "debug",
            Edition::Release => "release",
        }
    }

    /// Suffix appended to output directory and archive names.
    ///
    /// Release artifacts are unsuffixed, matching the published naming scheme.
    pub fn suffix(self) -> &'static str {
        match self {
            Edition::Debug => "-DEBUG",
            Edition::Release => "",
        }
    }

    /// Tag used by edition-exclusive assets (`iconTex-DEBUG.tga`).
    pub fn asset_tag(self) -> &'static str {
        match self {
            Edition::Debug => "DEBUG",
            Edition::Release => "RELEASE",
        }
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edition::Debug => write!(f, "Debug"),
            Edition::Release => write!(f, "Release"),
        }
    }
}

/// Optional `builder.toml` overlay. CLI flags win over file values.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Path to NUSPacker.jar.
    pub nuspacker: Option<PathBuf>,
    /// Expected SHA-256 of the downloaded NUSPacker.jar.
    pub nuspacker_sha256: Option<String>,
    /// Path to the wuhbtool executable.
    pub wuhbtool: Option<PathBuf>,
    /// Path to the java executable used to run NUSPacker.
    pub java: Option<PathBuf>,
    /// Path to the make executable.
    pub make: Option<PathBuf>,
    /// Parallel compile jobs.
    pub jobs: Option<usize>,
    /// Title database endpoint.
    pub titledb_url: Option<String>,
    /// Root CA bundle endpoint.
    pub cacerts_url: Option<String>,
    /// NUSPacker download endpoint.
    pub nuspacker_url: Option<String>,
}

impl ConfigFile {
    /// Parse a `builder.toml`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| BuildError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

/// Immutable configuration for one builder run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Checkout root of the application repository.
    pub root: PathBuf,
    /// Editions requested on the command line, in build order.
    pub editions: Vec<Edition>,
    /// Package targets to produce.
    pub targets: Vec<PackageTarget>,
    /// Package Release editions even for ALPHA/BETA versions.
    pub force_release: bool,
    /// Explicit version override; rewrites the header define when set.
    pub set_version: Option<String>,
    /// Path to NUSPacker.jar; downloaded there when absent.
    pub nuspacker: PathBuf,
    /// Expected SHA-256 of a freshly downloaded NUSPacker.jar.
    pub nuspacker_sha256: Option<String>,
    /// wuhbtool executable.
    pub wuhbtool: PathBuf,
    /// java executable used to run NUSPacker.
    pub java: PathBuf,
    /// make executable.
    pub make: PathBuf,
    /// Parallel compile jobs passed to make.
    pub jobs: usize,
    /// Title database endpoint.
    pub titledb_url: String,
    /// Root CA bundle endpoint.
    pub cacerts_url: String,
    /// NUSPacker download endpoint.
    pub nuspacker_url: String,
    /// Log steps without executing commands or touching files.
    pub dry_run: bool,
    /// Print commands as they execute.
    pub verbose: bool,
}

/// Title database endpoint; serves the generated `gtitles.c`.
pub const TITLEDB_URL: &str = "https://napi.v10lator.de/db?t=c";

/// Mozilla root CA bundle, compiled into the application.
pub const CACERTS_URL: &str =
    "https://ccadb.my.salesforce-sites.com/mozilla/IncludedRootsPEMTxt?TrustBitsInclude=Websites";

/// Upstream NUSPacker.jar location.
pub const NUSPACKER_URL: &str =
    "https://github.com/Maschell/nuspacker/raw/master/NUSPacker.jar";

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            editions: vec![Edition::Debug, Edition::Release],
            targets: PackageTarget::ALL.to_vec(),
            force_release: false,
            set_version: None,
            nuspacker: default_nuspacker_path(),
            nuspacker_sha256: None,
            wuhbtool: PathBuf::from("wuhbtool"),
            java: PathBuf::from("java"),
            make: PathBuf::from("make"),
            jobs: num_cpus::get(),
            titledb_url: TITLEDB_URL.to_string(),
            cacerts_url: CACERTS_URL.to_string(),
            nuspacker_url: NUSPACKER_URL.to_string(),
            dry_run: false,
            verbose: false,
        }
    }
}

/// Default cache location for the auto-downloaded NUSPacker.jar.
pub fn default_nuspacker_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nusspli-builder")
        .join("NUSPacker.jar")
}

impl Config {
    /// Create a configuration rooted at the given checkout.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Set the editions to build.
    pub fn editions(mut self, editions: Vec<Edition>) -> Self {
        self.editions = editions;
        self
    }

    /// Set the package targets to produce.
    pub fn targets(mut self, targets: Vec<PackageTarget>) -> Self {
        self.targets = targets;
        self
    }

    /// Force Release packaging for pre-release versions.
    pub fn force_release(mut self, force: bool) -> Self {
        self.force_release = force;
        self
    }

    /// Override the release version.
    pub fn set_version(mut self, version: impl Into<String>) -> Self {
        self.set_version = Some(version.into());
        self
    }

    /// Set dry run mode.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set verbose mode.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    // Checkout layout. Everything the pipeline touches goes through these so
    // the whole tree can be relocated for tests.

    /// Header holding the version define.
    pub fn version_header(&self) -> PathBuf {
        self.root.join("include/utils.h")
    }

    /// Compiled binary emitted by make.
    pub fn rpx_path(&self) -> PathBuf {
        self.root.join(format!("{APP_NAME}.rpx"))
    }

    /// Root of all per-target output directories.
    pub fn out_dir(&self) -> PathBuf {
        self.root.join("out")
    }

    /// Finished archives.
    pub fn zips_dir(&self) -> PathBuf {
        self.root.join("zips")
    }

    /// Channel packaging staging tree.
    pub fn staging_dir(&self) -> PathBuf {
        self.root.join("NUStmp")
    }

    /// Visual metadata (icons, banners, app/cos xml).
    pub fn menu_meta_dir(&self) -> PathBuf {
        self.root.join("meta/menu")
    }

    /// Homebrew Launcher metadata.
    pub fn hbl_meta_dir(&self) -> PathBuf {
        self.root.join("meta/hbl")
    }

    /// Bundled content shipped with every package.
    pub fn content_dir(&self) -> PathBuf {
        self.root.join("data")
    }
}
