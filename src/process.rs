//! Synchronous external-process invocation.
//!
//! The compiler, bundler, and packer are opaque collaborators: the pipeline
//! only renders an argv, runs it, and treats any non-zero exit as fatal.
//! Their stdout/stderr stream straight through to the console so a failing
//! step identifies itself.

use std::path::Path;
use std::process::Command;

use crate::config::Config;
use crate::error::{BuildError, Result};
use crate::output;

/// Run `program args..` with `dir` as the working directory.
///
/// Honors dry-run (log only) and verbose (echo the command) modes. Returns
/// an error carrying the rendered command line when the process cannot be
/// spawned or exits non-zero.
pub fn run(config: &Config, dir: &Path, program: &Path, args: &[String]) -> Result<()> {
    let rendered = render(program, args);

    if config.verbose || config.dry_run {
        output::detail(&format!(
            "[{}] {}",
            if config.dry_run { "dry-run" } else { "exec" },
            rendered
        ));
    }

    if config.dry_run {
        return Ok(());
    }

    let status = Command::new(program)
        .args(args)
        .current_dir(dir)
        .status()
        .map_err(|source| BuildError::Spawn {
            cmd: rendered.clone(),
            source,
        })?;

    if !status.success() {
        return Err(BuildError::CommandFailed {
            cmd: rendered,
            code: status.code(),
        });
    }

    Ok(())
}

fn render(program: &Path, args: &[String]) -> String {
    let mut rendered = program.display().to_string();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(arg);
    }
    rendered
}
