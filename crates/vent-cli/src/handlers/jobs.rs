//! Jobs command handler.

use std::fmt::Write as _;

use anyhow::Result;
use vent_core::JobCounts;

use crate::bootstrap::CliContext;
use crate::presentation::print_failures;

/// Execute the jobs command.
pub async fn execute(ctx: &CliContext, json: bool) -> Result<()> {
    let jobs = ctx.reconciler().jobs().await;
    if json {
        println!("{}", serde_json::to_string_pretty(&jobs)?);
    } else {
        print!("{}", render_jobs(&jobs.counts));
    }
    print_failures(&jobs.failures);
    Ok(())
}

pub fn render_jobs(counts: &JobCounts) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Jobs running:    {}", counts.jobs_running);
    let _ = writeln!(out, "Tools running:   {}", counts.tools_running);
    let _ = writeln!(out, "Jobs finished:   {}", counts.jobs_finished);
    let _ = writeln!(out, "Tools finished:  {}", counts.tools_finished);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_jobs() {
        let text = render_jobs(&JobCounts {
            jobs_running: 2,
            tools_running: 3,
            jobs_finished: 1,
            tools_finished: 2,
        });
        assert_eq!(
            text,
            "Jobs running:    2\nTools running:   3\nJobs finished:   1\nTools finished:  2\n"
        );
    }
}
