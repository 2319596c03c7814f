//! Package targets - the distribution formats a run can produce.

use crate::config::Edition;

/// A distribution format produced by the pipeline.
///
/// The declaration order of [`PackageTarget::ALL`] is the packaging order:
/// channel staging consumes the compiled binary (it is moved, not copied),
/// so the bundle and loader targets must be packaged before it, and the lite
/// variant recompiles afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageTarget {
    /// Self-contained Aroma application bundle (`.wuhb`).
    Aroma,
    /// Flat payload for the Homebrew Launcher.
    Hbl,
    /// Installable channel image produced by NUSPacker.
    Channel,
    /// Reduced-feature Aroma bundle.
    Lite,
}

impl PackageTarget {
    /// Every known target, in packaging order.
    pub const ALL: [PackageTarget; 4] = [
        PackageTarget::Aroma,
        PackageTarget::Hbl,
        PackageTarget::Channel,
        PackageTarget::Lite,
    ];

    /// Name used in output directories and archive filenames.
    pub fn label(self) -> &'static str {
        match self {
            PackageTarget::Aroma => "Aroma",
            PackageTarget::Hbl => "HBL",
            PackageTarget::Channel => "Channel",
            PackageTarget::Lite => "Lite",
        }
    }

    /// Output directory name under `out/` for the given edition.
    pub fn out_dir_name(self, edition: Edition) -> String {
        format!("{}{}", self.label(), edition.suffix())
    }
}
