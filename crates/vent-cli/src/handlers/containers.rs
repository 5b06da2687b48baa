//! Containers command handler.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::presentation::{print_failures, render_table};

/// Execute the containers command.
///
/// Lists running vent containers by default; `all` drops the label filter
/// and `stopped` includes exited containers.
pub async fn execute(ctx: &CliContext, all: bool, stopped: bool) -> Result<()> {
    let mut failures = Vec::new();
    let containers = ctx
        .snapshot()
        .container_listing(!all, !stopped)
        .await
        .or_empty(&mut failures);

    if containers.is_empty() {
        println!("No containers found.");
    } else {
        let rows: Vec<Vec<String>> = containers
            .into_iter()
            .map(|(name, status)| vec![name, status])
            .collect();
        print!("{}", render_table(&["NAME", "STATUS"], &rows));
    }
    print_failures(&failures);
    Ok(())
}
