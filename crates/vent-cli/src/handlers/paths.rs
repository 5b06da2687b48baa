//! Paths command handler.
//!
//! Displays all resolved paths for diagnostics and debugging.

use anyhow::Result;

use crate::bootstrap::CliContext;

/// Execute the paths command.
///
/// Prints the resolved directories in `key = value` format, followed by the
/// manifest the context actually loaded (which `--manifest` may override).
pub fn execute(ctx: &CliContext) -> Result<()> {
    println!("{}", ctx.paths);
    if ctx.manifest_path != ctx.paths.manifest_path() {
        println!("manifest_override = {}", ctx.manifest_path.display());
    }
    Ok(())
}
