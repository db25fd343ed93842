//! Compile a declarative [`RunSpec`] into a `docker`/`podman` command line and run it.
//!
//! The pipeline is linear and re-run for every invocation:
//! [`detect`] → [`to_runtime_path`] → [`wrap`] → [`compile`] → [`run`].
//! Host facts live in one [`HostContext`] value passed down explicitly, so the
//! whole thing can be exercised for any platform from any host.

pub mod compile;
pub mod detect;
pub mod error;
pub mod exec;
pub mod path;
pub mod platform;
pub mod sanitize;
pub mod spec;

pub use compile::{compile, compile_pull, CompiledInvocation};
pub use detect::{detect, detect_with, ExecutableLookup, RuntimeKind, SearchPath, TOOLBOX_MARKER};
pub use error::RunError;
pub use exec::{host_shell_command, run};
pub use path::to_runtime_path;
pub use platform::{HostContext, HostOs, HostPlatform, DEFAULT_MACHINE_NAME};
pub use sanitize::{escape_args, wrap};
pub use spec::{
    Entrypoint, EnvVar, Mount, MountKind, PortMapping, RunSpec, Shell, IMAGE_DEFAULT_ENTRYPOINT,
};

/// Detect the runtime on `lookup` and compile `spec` for it.
pub fn prepare<L: ExecutableLookup + ?Sized>(
    spec: &RunSpec,
    host: &HostContext,
    lookup: &L,
) -> Result<CompiledInvocation, RunError> {
    let runtime = detect_with(lookup);
    compile(spec, runtime, host)
}
