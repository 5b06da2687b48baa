//! `docker inspect` payloads.
//!
//! Only the fields the inventory reads are modelled; everything else in the
//! inspect output is ignored.

use std::collections::HashMap;

use serde::Deserialize;
use vent_core::{ContainerSummary, ImageSummary, PortBinding, ServerVersion};

const SHORT_ID_LEN: usize = 12;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct ImageInspect {
    pub id: String,
    #[serde(default)]
    pub repo_tags: Option<Vec<String>>,
    #[serde(default)]
    pub config: Option<LabelledConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct LabelledConfig {
    #[serde(default)]
    pub labels: Option<HashMap<String, String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct ContainerInspect {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: Option<ContainerState>,
    #[serde(default)]
    pub config: Option<LabelledConfig>,
    #[serde(default)]
    pub network_settings: Option<NetworkSettings>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct ContainerState {
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct NetworkSettings {
    #[serde(default)]
    pub ports: Option<HashMap<String, Option<Vec<HostBinding>>>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct HostBinding {
    #[serde(default)]
    pub host_ip: String,
    #[serde(default)]
    pub host_port: String,
}

/// `docker version --format '{{json .Server}}'`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct ServerInfo {
    pub version: String,
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub os: Option<String>,
    #[serde(default)]
    pub arch: Option<String>,
    #[serde(default)]
    pub kernel_version: Option<String>,
}

impl From<ImageInspect> for ImageSummary {
    fn from(image: ImageInspect) -> Self {
        Self {
            short_id: short_id(&image.id),
            id: image.id,
            tags: image.repo_tags.unwrap_or_default(),
            labels: labels_of(image.config),
        }
    }
}

impl From<ContainerInspect> for ContainerSummary {
    fn from(container: ContainerInspect) -> Self {
        let mut ports: Vec<PortBinding> = container
            .network_settings
            .and_then(|n| n.ports)
            .unwrap_or_default()
            .into_iter()
            .flat_map(|(container_port, bindings)| {
                bindings
                    .unwrap_or_default()
                    .into_iter()
                    .map(move |b| PortBinding {
                        container_port: container_port.clone(),
                        host_ip: b.host_ip,
                        host_port: b.host_port,
                    })
            })
            .collect();
        // Stable: bindings of one port keep the order docker reported.
        ports.sort_by(|a, b| a.container_port.cmp(&b.container_port));

        Self {
            id: container.id,
            name: container.name.trim_start_matches('/').to_string(),
            status: container.state.map(|s| s.status).unwrap_or_default(),
            labels: labels_of(container.config),
            ports,
        }
    }
}

impl From<ServerInfo> for ServerVersion {
    fn from(info: ServerInfo) -> Self {
        Self {
            version: info.version,
            api_version: info.api_version,
            os: info.os,
            arch: info.arch,
            kernel_version: info.kernel_version,
        }
    }
}

fn labels_of(config: Option<LabelledConfig>) -> HashMap<String, String> {
    config.and_then(|c| c.labels).unwrap_or_default()
}

/// First 12 hex digits of an id, without the `sha256:` prefix.
pub(super) fn short_id(id: &str) -> String {
    let hex = id.strip_prefix("sha256:").unwrap_or(id);
    hex.chars().take(SHORT_ID_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE_JSON: &str = r#"[
        {
            "Id": "sha256:4f8d2c1a9b7e3d6f0a1b2c3d4e5f60718293a4b5c6d7e8f90a1b2c3d4e5f6071",
            "RepoTags": ["cyberreboot/vent-rabbitmq:master"],
            "Config": {
                "Labels": {"vent": "", "vent.name": "rabbitmq", "vent.groups": "core"}
            }
        },
        {
            "Id": "sha256:0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef",
            "RepoTags": null,
            "Config": {"Labels": null}
        }
    ]"#;

    const CONTAINER_JSON: &str = r#"[
        {
            "Id": "9c1b1e0a2f",
            "Name": "/cyberreboot-vent-rabbitmq-master",
            "State": {"Status": "running"},
            "Config": {"Labels": {"vent": "", "vent.name": "rabbitmq"}},
            "NetworkSettings": {
                "Ports": {
                    "5672/tcp": [{"HostIp": "0.0.0.0", "HostPort": "32768"}],
                    "15672/tcp": null
                }
            }
        }
    ]"#;

    #[test]
    fn test_image_inspect_conversion() {
        let images: Vec<ImageInspect> = serde_json::from_str(IMAGE_JSON).unwrap();
        let images: Vec<ImageSummary> = images.into_iter().map(Into::into).collect();

        assert_eq!(images[0].short_id, "4f8d2c1a9b7e");
        assert_eq!(images[0].primary_tag(), "cyberreboot/vent-rabbitmq:master");
        assert_eq!(
            images[0].labels.get("vent.name").map(String::as_str),
            Some("rabbitmq")
        );

        assert!(images[1].tags.is_empty());
        assert_eq!(images[1].primary_tag(), "<none>");
        assert!(images[1].labels.is_empty());
    }

    #[test]
    fn test_container_inspect_conversion() {
        let containers: Vec<ContainerInspect> = serde_json::from_str(CONTAINER_JSON).unwrap();
        let container = ContainerSummary::from(containers.into_iter().next().unwrap());

        assert_eq!(container.name, "cyberreboot-vent-rabbitmq-master");
        assert_eq!(container.status, "running");
        assert_eq!(container.ports.len(), 1);
        assert_eq!(container.ports[0].host_address(), "0.0.0.0:32768");
    }

    #[test]
    fn test_port_bindings_keep_docker_order() {
        let json = r#"{
            "Id": "c2",
            "Name": "/web",
            "NetworkSettings": {
                "Ports": {
                    "80/tcp": [
                        {"HostIp": "0.0.0.0", "HostPort": "32770"},
                        {"HostIp": "::", "HostPort": "32770"}
                    ],
                    "443/tcp": [{"HostIp": "0.0.0.0", "HostPort": "32771"}]
                }
            }
        }"#;
        let container: ContainerInspect = serde_json::from_str(json).unwrap();
        let container = ContainerSummary::from(container);

        let addresses: Vec<_> = container
            .ports
            .iter()
            .map(|p| (p.container_port.as_str(), p.host_address()))
            .collect();
        assert_eq!(
            addresses,
            vec![
                ("443/tcp", "0.0.0.0:32771".to_string()),
                ("80/tcp", "0.0.0.0:32770".to_string()),
                ("80/tcp", ":::32770".to_string()),
            ]
        );
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("sha256:abcdef0123456789"), "abcdef012345");
        assert_eq!(short_id("abc"), "abc");
    }
}
