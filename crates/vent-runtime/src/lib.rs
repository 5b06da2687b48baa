//! Adapters for vent: the docker CLI runtime, the git repository cache and
//! the host probe.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod command;
pub mod docker;
pub mod git;
pub mod system;

pub use command::{CommandError, CommandOutput, CommandRunner, TokioCommandRunner};

// Re-export adapters for the composition root
pub use docker::DockerCli;
pub use git::GitRepositoryCache;
pub use system::DefaultHostProbe;
