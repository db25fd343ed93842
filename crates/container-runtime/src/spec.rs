use crate::error::RunError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Entrypoint value meaning "keep whatever the image declares".
pub const IMAGE_DEFAULT_ENTRYPOINT: &str = "unset";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Entrypoint {
    #[default]
    ImageDefault,
    Override(String),
}

impl From<String> for Entrypoint {
    fn from(value: String) -> Self {
        if value == IMAGE_DEFAULT_ENTRYPOINT {
            Entrypoint::ImageDefault
        } else {
            Entrypoint::Override(value)
        }
    }
}

impl From<&str> for Entrypoint {
    fn from(value: &str) -> Self {
        Entrypoint::from(value.to_string())
    }
}

impl From<Entrypoint> for String {
    fn from(value: Entrypoint) -> Self {
        match value {
            Entrypoint::ImageDefault => IMAGE_DEFAULT_ENTRYPOINT.to_string(),
            Entrypoint::Override(value) => value,
        }
    }
}

/// Shell used inside the container to interpret the user command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shell {
    #[default]
    None,
    Sh,
    Bash,
    Powershell,
}

impl FromStr for Shell {
    type Err = RunError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Shell::None),
            "sh" => Ok(Shell::Sh),
            "bash" => Ok(Shell::Bash),
            "powershell" => Ok(Shell::Powershell),
            other => Err(RunError::InvalidSpec {
                message: format!(
                    "unknown shell '{}' (expected none, sh, bash or powershell)",
                    other
                ),
            }),
        }
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shell::None => "none",
            Shell::Sh => "sh",
            Shell::Bash => "bash",
            Shell::Powershell => "powershell",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MountKind {
    #[default]
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mount {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub kind: MountKind,
}

impl Mount {
    pub fn directory(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind: MountKind::Directory,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

impl EnvVar {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn validate(&self) -> Result<(), RunError> {
        if self.name.is_empty() {
            return Err(RunError::InvalidEnvVar {
                spec: format!("={}", self.value),
                reason: "name must not be empty".to_string(),
            });
        }
        if self.name.contains('=') {
            return Err(RunError::InvalidEnvVar {
                spec: self.name.clone(),
                reason: "name must not contain '='".to_string(),
            });
        }
        Ok(())
    }
}

/// Parses `NAME=VALUE`; the value may itself contain `=`.
impl FromStr for EnvVar {
    type Err = RunError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = s.split_once('=').ok_or_else(|| RunError::InvalidEnvVar {
            spec: s.to_string(),
            reason: "expected NAME=VALUE".to_string(),
        })?;
        let var = EnvVar::new(name, value);
        var.validate().map_err(|_| RunError::InvalidEnvVar {
            spec: s.to_string(),
            reason: "name must not be empty".to_string(),
        })?;
        Ok(var)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortMapping {
    pub host_port: u16,
    pub container_port: u16,
}

impl PortMapping {
    pub fn new(host_port: u16, container_port: u16) -> Result<Self, RunError> {
        let mapping = Self {
            host_port,
            container_port,
        };
        mapping.validate()?;
        Ok(mapping)
    }

    pub fn validate(&self) -> Result<(), RunError> {
        if self.host_port == 0 || self.container_port == 0 {
            return Err(RunError::InvalidPortMapping {
                spec: self.to_string(),
                reason: "ports must be between 1 and 65535".to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for PortMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host_port, self.container_port)
    }
}

/// Parses `HOST:CONTAINER`.
impl FromStr for PortMapping {
    type Err = RunError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| RunError::InvalidPortMapping {
            spec: s.to_string(),
            reason: reason.to_string(),
        };
        let (host, container) = s
            .split_once(':')
            .ok_or_else(|| invalid("expected HOST:CONTAINER"))?;
        let parse = |part: &str| -> Result<u16, RunError> {
            match part.trim().parse::<u16>() {
                Ok(0) | Err(_) => Err(invalid("ports must be between 1 and 65535")),
                Ok(port) => Ok(port),
            }
        };
        Ok(Self {
            host_port: parse(host)?,
            container_port: parse(container)?,
        })
    }
}

/// A fully resolved request to run one command in one container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSpec {
    pub image: String,
    #[serde(default)]
    pub entrypoint: Entrypoint,
    #[serde(default)]
    pub shell: Shell,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub working_directory: String,
    #[serde(default)]
    pub mounts: Vec<Mount>,
    #[serde(default)]
    pub environment: Vec<EnvVar>,
    #[serde(default)]
    pub ports: Vec<PortMapping>,
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub user_args: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl RunSpec {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), RunError> {
        if self.image.trim().is_empty() {
            return Err(RunError::InvalidSpec {
                message: "image must not be empty".to_string(),
            });
        }
        for var in &self.environment {
            var.validate()?;
        }
        for port in &self.ports {
            port.validate()?;
        }
        Ok(())
    }

    pub fn add_mount(&mut self, mount: Mount) {
        self.mounts.push(mount);
    }

    pub fn add_env(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.environment.push(EnvVar::new(name, value));
    }
}
