//! Tools command handler.
//!
//! Displays every tool section of the plugin manifest.

use anyhow::Result;
use vent_core::describe_tool;

use crate::bootstrap::CliContext;
use crate::presentation::{render_table, truncate_string};

/// Execute the tools command.
pub fn execute(ctx: &CliContext) -> Result<()> {
    let sections = ctx.reconciler().manifest_tools();
    if sections.is_empty() {
        println!("No tools declared in {}.", ctx.manifest_path.display());
        return Ok(());
    }

    println!("Found {} tool(s) in the manifest:\n", sections.len());
    let rows: Vec<Vec<String>> = sections
        .iter()
        .map(|section| {
            let tool = describe_tool(ctx.manifest(), section);
            vec![
                truncate_string(&tool.identifier, 32),
                truncate_string(&tool.name, 24),
                if tool.groups.is_empty() {
                    "-".to_string()
                } else {
                    tool.groups.to_string()
                },
                tool.repo_url,
            ]
        })
        .collect();
    let table = render_table(&["SECTION", "NAME", "GROUPS", "REPO"], &rows);
    print!("{table}");
    Ok(())
}
