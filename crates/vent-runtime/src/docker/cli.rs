//! [`ContainerRuntimePort`] over the `docker` command line client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use vent_core::{ContainerRuntimePort, ContainerSummary, ImageSummary, RuntimeError, ServerVersion};

use super::inspect::{ContainerInspect, ImageInspect, ServerInfo};
use crate::command::{
    CommandError, CommandOutput, CommandRunner, TokioCommandRunner, display_command,
};

const DAEMON_UNREACHABLE: &str = "Cannot connect to the Docker daemon";

/// Docker runtime reached through its CLI.
///
/// One instance is built at the composition root and shared.
pub struct DockerCli {
    bin: String,
    timeout: Duration,
    runner: Arc<dyn CommandRunner>,
}

impl DockerCli {
    pub fn new(bin: impl Into<String>, timeout: Duration) -> Self {
        Self::with_runner(bin, timeout, Arc::new(TokioCommandRunner))
    }

    pub fn with_runner(
        bin: impl Into<String>,
        timeout: Duration,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            bin: bin.into(),
            timeout,
            runner,
        }
    }

    async fn docker(&self, args: Vec<String>) -> Result<CommandOutput, RuntimeError> {
        let command = display_command(&self.bin, &args);
        match self.runner.run(&self.bin, &args, None, self.timeout).await {
            Ok(output) => Ok(output),
            Err(CommandError::Spawn { reason, .. }) => Err(RuntimeError::Unavailable(reason)),
            Err(CommandError::Timeout { timeout, .. }) => {
                Err(RuntimeError::Timeout { command, timeout })
            }
        }
    }

    /// Run a command that must succeed and return its stdout.
    async fn docker_ok(&self, args: Vec<String>) -> Result<String, RuntimeError> {
        let command = display_command(&self.bin, &args);
        let output = self.docker(args).await?;
        if output.success() {
            Ok(output.stdout)
        } else {
            Err(command_failed(command, &output))
        }
    }

    /// Full ids printed by an `ls -q --no-trunc` style command, deduplicated.
    async fn ids(&self, args: Vec<String>) -> Result<Vec<String>, RuntimeError> {
        let stdout = self.docker_ok(args).await?;
        let mut ids: Vec<String> = Vec::new();
        for id in stdout.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if !ids.iter().any(|seen| seen == id) {
                ids.push(id.to_string());
            }
        }
        Ok(ids)
    }

    /// Inspect `ids` of `kind` (`image` or `container`).
    ///
    /// An object can disappear between listing and inspecting. Docker then
    /// exits non-zero but still prints the objects it found; those are kept.
    async fn inspect<T: DeserializeOwned>(
        &self,
        kind: &str,
        ids: &[String],
    ) -> Result<Vec<T>, RuntimeError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut args = vec![kind.to_string(), "inspect".to_string()];
        args.extend(ids.iter().cloned());
        let command = display_command(&self.bin, &args);
        let output = self.docker(args).await?;

        if !output.success() {
            if is_daemon_unreachable(&output) {
                return Err(RuntimeError::Unavailable(output.stderr.trim().to_string()));
            }
            if output.stdout.trim().is_empty() {
                return Err(command_failed(command, &output));
            }
            warn!(
                kind,
                stderr = %output.stderr.trim(),
                "Some objects vanished before inspection"
            );
        }

        serde_json::from_str(&output.stdout).map_err(|e| RuntimeError::Parse(e.to_string()))
    }
}

fn label_filter(args: &mut Vec<String>, label: Option<&str>) {
    if let Some(label) = label {
        args.push("--filter".to_string());
        args.push(format!("label={label}"));
    }
}

fn is_daemon_unreachable(output: &CommandOutput) -> bool {
    output.stderr.contains(DAEMON_UNREACHABLE)
}

fn command_failed(command: String, output: &CommandOutput) -> RuntimeError {
    if is_daemon_unreachable(output) {
        RuntimeError::Unavailable(output.stderr.trim().to_string())
    } else {
        RuntimeError::CommandFailed {
            command,
            stderr: output.stderr.trim().to_string(),
        }
    }
}

#[async_trait]
impl ContainerRuntimePort for DockerCli {
    async fn list_images(&self, label: Option<&str>) -> Result<Vec<ImageSummary>, RuntimeError> {
        let mut args = crate::command::args(["image", "ls", "-q", "--no-trunc"]);
        label_filter(&mut args, label);
        let ids = self.ids(args).await?;
        debug!(count = ids.len(), ?label, "Listed images");

        let images: Vec<ImageInspect> = self.inspect("image", &ids).await?;
        Ok(images.into_iter().map(Into::into).collect())
    }

    async fn list_containers(
        &self,
        all: bool,
        label: Option<&str>,
    ) -> Result<Vec<ContainerSummary>, RuntimeError> {
        let mut args = crate::command::args(["container", "ls", "-q", "--no-trunc"]);
        if all {
            args.push("--all".to_string());
        }
        label_filter(&mut args, label);
        let ids = self.ids(args).await?;
        debug!(count = ids.len(), all, ?label, "Listed containers");

        let containers: Vec<ContainerInspect> = self.inspect("container", &ids).await?;
        Ok(containers.into_iter().map(Into::into).collect())
    }

    async fn find_images(&self, reference: &str) -> Result<Vec<ImageSummary>, RuntimeError> {
        let args = crate::command::args(["image", "ls", "-q", "--no-trunc", reference]);
        let ids = self.ids(args).await?;
        let images: Vec<ImageInspect> = self.inspect("image", &ids).await?;
        Ok(images.into_iter().map(Into::into).collect())
    }

    async fn pull_image(&self, name: &str, tag: &str) -> Result<(), RuntimeError> {
        let reference = format!("{name}:{tag}");
        self.docker_ok(crate::command::args(["pull", reference.as_str()]))
            .await
            .map(|_| ())
    }

    async fn exec(&self, container: &str, command: &[String]) -> Result<String, RuntimeError> {
        let mut args = crate::command::args(["exec", container]);
        args.extend(command.iter().cloned());
        self.docker_ok(args).await
    }

    async fn run_ephemeral(
        &self,
        image: &str,
        command: &[String],
        gpus: bool,
    ) -> Result<String, RuntimeError> {
        let mut args = crate::command::args(["run", "--rm"]);
        if gpus {
            args.push("--gpus".to_string());
            args.push("all".to_string());
        }
        args.push(image.to_string());
        args.extend(command.iter().cloned());
        self.docker_ok(args).await
    }

    async fn server_version(&self) -> Result<ServerVersion, RuntimeError> {
        let version_args = crate::command::args(["version", "--format", "{{json .Server}}"]);
        let stdout = self.docker_ok(version_args).await?;
        let trimmed = stdout.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Err(RuntimeError::Unavailable(
                "runtime server did not report a version".to_string(),
            ));
        }
        let info: ServerInfo =
            serde_json::from_str(trimmed).map_err(|e| RuntimeError::Parse(e.to_string()))?;
        Ok(info.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::testing::ScriptedRunner;

    fn cli(runner: ScriptedRunner) -> (DockerCli, Arc<ScriptedRunner>) {
        let runner = Arc::new(runner);
        let cli = DockerCli::with_runner(
            "docker",
            Duration::from_secs(5),
            Arc::clone(&runner) as Arc<dyn CommandRunner>,
        );
        (cli, runner)
    }

    const IMAGE: &str = r#"[{"Id":"sha256:aaaaaaaaaaaaaaaa","RepoTags":["vent/file-drop:master","vent/file-drop:latest"],"Config":{"Labels":{"vent":"","vent.name":"file-drop","vent.groups":"core files"}}}]"#;

    #[tokio::test]
    async fn test_list_images_with_label() {
        let ids = CommandOutput::ok("sha256:aaaaaaaaaaaaaaaa\nsha256:aaaaaaaaaaaaaaaa\n");
        let (cli, runner) = cli(
            ScriptedRunner::new()
                .respond(ids)
                .respond(CommandOutput::ok(IMAGE)),
        );

        let images = cli.list_images(Some("vent")).await.unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].short_id, "aaaaaaaaaaaa");
        assert_eq!(
            runner.calls(),
            vec![
                "docker image ls -q --no-trunc --filter label=vent",
                "docker image inspect sha256:aaaaaaaaaaaaaaaa",
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_listing_skips_inspect() {
        let (cli, runner) = cli(ScriptedRunner::new().respond(CommandOutput::ok("\n")));
        let containers = cli
            .list_containers(true, Some("vent-plugin"))
            .await
            .unwrap();
        assert!(containers.is_empty());
        assert_eq!(
            runner.calls(),
            vec!["docker container ls -q --no-trunc --all --filter label=vent-plugin"]
        );
    }

    #[tokio::test]
    async fn test_vanished_container_keeps_the_rest() {
        let inspect = r#"[{"Id":"c1","Name":"/one","State":{"Status":"running"},"Config":{"Labels":{"vent":""}}}]"#;
        let partial = CommandOutput::failed(1, inspect, "Error: No such container: c2");
        let (cli, _) = cli(
            ScriptedRunner::new()
                .respond(CommandOutput::ok("c1\nc2\n"))
                .respond(partial),
        );

        let containers = cli.list_containers(false, None).await.unwrap();
        assert_eq!(containers.len(), 1);
        assert_eq!(containers[0].name, "one");
    }

    #[tokio::test]
    async fn test_daemon_down_is_unavailable() {
        let (cli, _) = cli(ScriptedRunner::new().respond(CommandOutput::failed(
            1,
            "",
            "Cannot connect to the Docker daemon at unix:///var/run/docker.sock. Is the docker daemon running?",
        )));
        assert!(matches!(
            cli.list_images(None).await,
            Err(RuntimeError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_binary_is_unavailable() {
        let (cli, _) = cli(ScriptedRunner::new().fail(CommandError::Spawn {
            program: "docker".into(),
            reason: "No such file or directory".into(),
        }));
        assert!(matches!(
            cli.list_containers(false, None).await,
            Err(RuntimeError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_timeout_maps_to_runtime_timeout() {
        let (cli, _) = cli(ScriptedRunner::new().fail(CommandError::Timeout {
            command: "docker image ls".into(),
            timeout: Duration::from_secs(5),
        }));
        assert!(matches!(
            cli.list_images(None).await,
            Err(RuntimeError::Timeout { .. })
        ));
    }

    #[tokio::test]
    async fn test_run_ephemeral_with_gpus() {
        let (cli, runner) = cli(ScriptedRunner::new().respond(CommandOutput::ok("GPU 0\n")));
        let out = cli
            .run_ephemeral(
                "nvidia/cuda:8.0-runtime",
                &crate::command::args(["nvidia-smi", "-L"]),
                true,
            )
            .await
            .unwrap();
        assert_eq!(out, "GPU 0\n");
        assert_eq!(
            runner.calls(),
            vec!["docker run --rm --gpus all nvidia/cuda:8.0-runtime nvidia-smi -L"]
        );
    }

    #[tokio::test]
    async fn test_server_version() {
        let (cli, _) = cli(ScriptedRunner::new().respond(CommandOutput::ok(
            r#"{"Version":"24.0.7","ApiVersion":"1.43","Os":"linux","Arch":"amd64","KernelVersion":"6.1.0"}"#,
        )));
        let version = cli.server_version().await.unwrap();
        assert_eq!(version.version, "24.0.7");
        assert_eq!(version.os.as_deref(), Some("linux"));
    }

    #[tokio::test]
    async fn test_pull_failure_is_command_failed() {
        let (cli, _) = cli(ScriptedRunner::new().respond(CommandOutput::failed(
            1,
            "",
            "Error response from daemon: pull access denied",
        )));
        assert!(matches!(
            cli.pull_image("nvidia/cuda", "8.0-runtime").await,
            Err(RuntimeError::CommandFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_exec_in_container() {
        let (cli, runner) = cli(ScriptedRunner::new().respond(CommandOutput::ok("ok\n")));
        let out = cli
            .exec("vent-rq-worker", &crate::command::args(["rq", "info"]))
            .await
            .unwrap();
        assert_eq!(out, "ok\n");
        assert_eq!(runner.calls(), vec!["docker exec vent-rq-worker rq info"]);
    }
}
