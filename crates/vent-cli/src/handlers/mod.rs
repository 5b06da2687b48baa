//! Command handlers.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<()>`
//! - Thin wrappers that:
//!   1. Resolve CLI-specific defaults
//!   2. Call core services
//!   3. Format output for the terminal
//!
//! Handlers should NOT contain reconciliation logic or talk to adapters
//! directly.

pub mod containers;
pub mod images;
pub mod info;
pub mod jobs;
pub mod paths;
pub mod services;
pub mod status;
pub mod tools;
