//! Services command handler.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::presentation::{print_failures, render_table};

/// Execute the services command.
///
/// Lists running containers that publish ports, with every `HostIp:HostPort`
/// they are reachable on.
pub async fn execute(ctx: &CliContext, all: bool) -> Result<()> {
    let mut failures = Vec::new();
    let services = ctx.snapshot().services(!all).await.or_empty(&mut failures);

    if services.is_empty() {
        println!("No services found.");
    } else {
        let rows: Vec<Vec<String>> = services
            .into_iter()
            .map(|service| vec![service.name, service.addresses.join(", ")])
            .collect();
        print!("{}", render_table(&["SERVICE", "ADDRESSES"], &rows));
    }
    print_failures(&failures);
    Ok(())
}
