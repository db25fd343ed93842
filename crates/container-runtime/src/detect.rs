use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

/// Substring of the docker-machine install path that identifies Docker Toolbox.
pub const TOOLBOX_MARKER: &str = "Docker Toolbox";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeKind {
    Podman,
    DockerNative,
    DockerToolbox,
    None,
}

impl RuntimeKind {
    /// Binary that accepts `run`/`pull`; Toolbox drives the docker client inside its VM.
    pub fn binary(&self) -> Option<&'static str> {
        match self {
            RuntimeKind::Podman => Some("podman"),
            RuntimeKind::DockerNative | RuntimeKind::DockerToolbox => Some("docker"),
            RuntimeKind::None => None,
        }
    }
}

impl fmt::Display for RuntimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuntimeKind::Podman => "podman",
            RuntimeKind::DockerNative => "docker",
            RuntimeKind::DockerToolbox => "docker-toolbox",
            RuntimeKind::None => "none",
        };
        f.write_str(name)
    }
}

/// Resolves executable names the way a shell would.
pub trait ExecutableLookup {
    fn resolve(&self, name: &str) -> Option<PathBuf>;
}

/// Looks executables up on a `PATH`-style search list.
#[derive(Debug, Clone)]
pub struct SearchPath {
    paths: Option<OsString>,
}

impl SearchPath {
    /// Uses the `PATH` of the current process at lookup time.
    pub fn from_env() -> Self {
        Self { paths: None }
    }

    pub fn new(paths: impl Into<OsString>) -> Self {
        Self {
            paths: Some(paths.into()),
        }
    }
}

impl ExecutableLookup for SearchPath {
    fn resolve(&self, name: &str) -> Option<PathBuf> {
        match &self.paths {
            Some(paths) => {
                let cwd = std::env::current_dir().ok()?;
                which::which_in(name, Some(paths), cwd).ok()
            }
            None => which::which(name).ok(),
        }
    }
}

/// Probe the current `PATH`. Never cached; a shell may have edited `PATH` since the last run.
pub fn detect() -> RuntimeKind {
    detect_with(&SearchPath::from_env())
}

pub fn detect_with<L: ExecutableLookup + ?Sized>(lookup: &L) -> RuntimeKind {
    let runtime = if lookup.resolve("podman").is_some() {
        RuntimeKind::Podman
    } else if lookup.resolve("docker").is_some() {
        RuntimeKind::DockerNative
    } else if lookup
        .resolve("docker-machine")
        .is_some_and(|path| path.to_string_lossy().contains(TOOLBOX_MARKER))
    {
        RuntimeKind::DockerToolbox
    } else {
        RuntimeKind::None
    };

    debug!(runtime = %runtime, "detected container runtime");
    runtime
}
