//! Release packaging pipeline for NUSspli, a Wii U homebrew title installer.
//!
//! One run drives the full release flow against an application checkout:
//!
//! 1. resolve the version from `include/utils.h`, optionally overriding it
//! 2. fetch the generated title database and root CA bundle, plus the
//!    NUSPacker jar when it is not cached yet
//! 3. delete everything a previous run of this version left behind
//! 4. per edition: compile with devkitPro make, bundle with wuhbtool, copy
//!    the Homebrew Launcher payload, stage and pack the channel image with
//!    NUSPacker, then compile and bundle the lite variant
//! 5. zip each populated output directory into `zips/`
//!
//! Pre-release versions (containing `ALPHA` or `BETA`) are packaged as
//! Debug only unless a full release is forced.
//!
//! The external tools (`make`, `wuhbtool`, `java`) are opaque
//! collaborators: any non-zero exit aborts the run, and an aborted run is
//! cleaned up by the next run's workspace preparation.
//!
//! # Example
//!
//! ```no_run
//! use nusspli_builder::{Config, pipeline};
//!
//! # fn main() -> nusspli_builder::Result<()> {
//! let config = Config::with_root("/src/NUSspli");
//! let report = pipeline::run(&config)?;
//! println!("built {} archives for {}", report.archives.len(), report.version);
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod channel;
pub mod config;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod target;
pub mod toolchain;
pub mod version;
pub mod workspace;

pub use config::{Config, ConfigFile, Edition};
pub use error::{BuildError, Result};
pub use pipeline::RunReport;
pub use target::PackageTarget;
