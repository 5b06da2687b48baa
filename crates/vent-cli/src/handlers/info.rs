//! Info command handler.
//!
//! Displays host and runtime facts. Every probe degrades independently,
//! so the command always prints a full report.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::presentation::format_optional;

/// Execute the info command.
pub async fn execute(ctx: &CliContext, gpu_pull: bool) -> Result<()> {
    let host = ctx.host();
    let docker = host.docker().await;
    let gpu = host.gpu(gpu_pull).await;

    println!("Version:    {}", host.version());
    println!("System:     {}", host.system());
    println!(
        "Docker:     {}",
        format_optional(docker.server.as_ref().map(|s| &s.version), "unavailable")
    );
    println!("Docker OS:  {}", docker.os);
    if docker.env.is_empty() {
        println!("Docker env: {}", docker.kind);
    } else {
        println!("Docker env: {} ({})", docker.kind, docker.env);
    }
    println!("CPUs:       {}", host.cpu());
    println!("GPUs:       {gpu}");
    println!("Uptime:     {}", host.uptime());
    println!("Timestamp:  {}", host.timestamp());
    Ok(())
}
