//! Status command handler.
//!
//! Runs one reconciliation pass and prints the classified inventory.

use std::fmt::Write as _;

use anyhow::Result;
use vent_core::{CoreError, NormalTools, Partition, ToolsStatus};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::{format_list, print_failures, render_table};

/// Arguments for the status command.
#[derive(Debug, Clone, Default)]
pub struct StatusArgs {
    pub core: bool,
    pub branch: Option<String>,
    pub version: Option<String>,
    pub json: bool,
}

/// Execute the status command.
///
/// Branch and version fall back to the configured defaults. Degraded
/// probes are reported on stderr; the inventory is printed regardless.
pub async fn execute(ctx: &CliContext, args: StatusArgs) -> Result<()> {
    let partition = Partition::from_core_flag(args.core);
    let branch = args.branch.unwrap_or_else(|| ctx.settings.branch.clone());
    let version = args.version.unwrap_or_else(|| ctx.settings.version.clone());

    // Checkouts land under the plugins directory
    ctx.paths
        .ensure()
        .map_err(|e| CliError::from(CoreError::from(e)))?;

    let status = ctx
        .reconciler()
        .tools_status(partition, &branch, &version)
        .await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        print!("{}", render_status(partition, &status));
    }
    print_failures(&status.failures);
    Ok(())
}

/// Human-readable rendering of a reconciliation pass.
pub fn render_status(partition: Partition, status: &ToolsStatus) -> String {
    let mut out = String::new();
    let normal = match &status.normal {
        NormalTools::Available(tools) => format_list(tools, "none"),
        NormalTools::Failed => "failed".to_string(),
    };

    let _ = writeln!(out, "Partition:  {partition}");
    let _ = writeln!(out, "Repos:      {}", status.repo_count);
    let _ = writeln!(out, "Available:  {normal}");
    let _ = writeln!(out, "Built:      {}", format_list(&status.built, "none"));
    let _ = writeln!(out, "Running:    {}", format_list(&status.running, "none"));

    if status.installed.is_empty() {
        out.push_str("\nNo installed tools.\n");
        return out;
    }

    let _ = writeln!(out, "\nInstalled tools ({}):\n", status.installed.len());
    let rows: Vec<Vec<String>> = status
        .installed
        .iter()
        .map(|tool| {
            let yes_no = |names: &[String]| {
                let seen = if names.contains(&tool.name) { "yes" } else { "no" };
                seen.to_string()
            };
            vec![
                tool.name.clone(),
                tool.identifier.clone(),
                yes_no(&status.built),
                yes_no(&status.running),
                if tool.groups.is_empty() {
                    "-".to_string()
                } else {
                    tool.groups.to_string()
                },
            ]
        })
        .collect();
    out.push_str(&render_table(
        &["NAME", "SECTION", "BUILT", "RUNNING", "GROUPS"],
        &rows,
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use vent_core::{Groups, Tool};

    #[test]
    fn test_render_failed_status() {
        let status = ToolsStatus {
            repo_count: 2,
            installed: vec![
                Tool::new("a", "a", "https://example.com/x")
                    .with_groups(Groups::parse("pcap, network")),
            ],
            normal: NormalTools::Failed,
            built: vec!["a".into()],
            running: Vec::new(),
            failures: Vec::new(),
        };
        let text = render_status(Partition::Plugin, &status);

        assert!(text.contains("Partition:  plugin"));
        assert!(text.contains("Repos:      2"));
        assert!(text.contains("Available:  failed"));
        assert!(text.contains("Running:    none"));
        let row = text.lines().last().unwrap();
        assert!(row.starts_with("a "));
        assert!(row.contains("yes"));
        assert!(row.ends_with("network,pcap"));
    }

    #[test]
    fn test_render_empty_status() {
        let text = render_status(Partition::Core, &ToolsStatus::default());
        assert!(text.contains("Available:  none"));
        assert!(text.ends_with("No installed tools.\n"));
    }
}
