//! Docker runtime adapter.
//!
//! Implements `ContainerRuntimePort` by driving the `docker` CLI and
//! decoding its JSON inspect output.

mod cli;
mod inspect;

pub use cli::DockerCli;
