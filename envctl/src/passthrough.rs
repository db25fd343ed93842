use container_runtime::EnvVar;
use tracing::debug;

/// Host variables that describe the host itself and must not leak into the container.
const EXCLUDED_VARIABLES: &[&str] = &[
    "",
    // unix
    "_",
    "PWD",
    "OLDPWD",
    "PATH",
    "HOME",
    "HOSTNAME",
    "TERM",
    "SHLVL",
    // windows
    "PROGRAMDATA",
    "PROGRAMFILES",
    "PROGRAMFILES(X86)",
    "PROGRAMW6432",
    "COMMONPROGRAMFILES",
    "COMMONPROGRAMFILES(X86)",
    "COMMONPROGRAMW6432",
    // proxy settings are passed explicitly in lower case
    "HTTP_PROXY",
    "HTTPS_PROXY",
];

/// Host environment to forward into CI containers, in host iteration order.
pub fn host_environment<I>(vars: I) -> Vec<EnvVar>
where
    I: IntoIterator<Item = (String, String)>,
{
    vars.into_iter()
        .filter_map(|(name, value)| {
            if EXCLUDED_VARIABLES.contains(&name.to_ascii_uppercase().as_str()) {
                debug!(name = %name, "excluded host variable by filter rule");
                return None;
            }
            // MinGW exports names such as `ProgramFiles(x86)` that no shell accepts
            if name.contains(['(', ')', '=']) {
                debug!(name = %name, "excluded host variable with invalid name");
                return None;
            }
            debug!(name = %name, "passing host variable to container");
            Some(EnvVar::new(name, value))
        })
        .collect()
}
