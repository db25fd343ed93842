use thiserror::Error;

/// Failures surfaced by the detect → compile → execute pipeline.
///
/// Every variant is fatal for the current invocation; nothing here is retried.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("No supported container runtime found (podman, docker, docker toolbox)")]
    NoRuntimeFound,

    #[error("Failed to execute `{command}`: {reason}")]
    ExecutionFailed {
        command: String,
        reason: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Invalid port mapping '{spec}': {reason}")]
    InvalidPortMapping { spec: String, reason: String },

    #[error("Invalid environment variable '{spec}': {reason}")]
    InvalidEnvVar { spec: String, reason: String },

    #[error("Invalid run spec: {message}")]
    InvalidSpec { message: String },
}

impl RunError {
    pub fn code(&self) -> &'static str {
        match self {
            RunError::NoRuntimeFound => "RUNTIME_NOT_FOUND",
            RunError::ExecutionFailed { .. } => "EXECUTION_FAILED",
            RunError::InvalidPortMapping { .. } => "INVALID_PORT_MAPPING",
            RunError::InvalidEnvVar { .. } => "INVALID_ENV_VAR",
            RunError::InvalidSpec { .. } => "INVALID_SPEC",
        }
    }

    pub(crate) fn spawn(command: &str, source: std::io::Error) -> Self {
        RunError::ExecutionFailed {
            command: command.to_string(),
            reason: format!("could not start host shell: {}", source),
            source: Some(source),
        }
    }

    pub(crate) fn exited(command: &str, code: Option<i32>) -> Self {
        let reason = match code {
            Some(code) => format!("exited with status {}", code),
            None => "terminated by signal".to_string(),
        };
        RunError::ExecutionFailed {
            command: command.to_string(),
            reason,
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(RunError::NoRuntimeFound.code(), "RUNTIME_NOT_FOUND");
        assert_eq!(
            RunError::exited("docker run", Some(2)).code(),
            "EXECUTION_FAILED"
        );
    }

    #[test]
    fn exit_reason_mentions_status() {
        let err = RunError::exited("docker run --rm alpine", Some(3));
        let text = err.to_string();
        assert!(text.contains("docker run --rm alpine"));
        assert!(text.contains("exited with status 3"));
    }
}
