//! Host path → runtime path translation.
//!
//! Docker Toolbox runs its daemon in a VirtualBox VM that only sees the Windows
//! drives through shared folders named `<DRIVE>_DRIVE`; Docker Desktop and Podman
//! accept `/<DRIVE>/...`. MinGW shells rewrite anything that looks like a POSIX
//! path before it reaches the runtime, so those get an extra leading slash.

use crate::detect::RuntimeKind;
use crate::platform::HostPlatform;

pub fn to_runtime_path(host_path: &str, runtime: RuntimeKind, platform: &HostPlatform) -> String {
    let toolbox_share = runtime == RuntimeKind::DockerToolbox && platform.is_windows();

    let mut path = match split_drive(host_path) {
        Some((drive, rest)) if toolbox_share => format!("/{}_DRIVE/{}", drive, rest),
        Some((drive, rest)) => format!("/{}/{}", drive, rest),
        None => host_path.to_string(),
    };
    path = path.replace('\\', "/");

    if platform.is_mingw {
        path = escape_for_mingw(&path);
    }
    path
}

/// `/c/work` → `//c/work`. Relative paths and paths already carrying the escape are left alone.
pub fn escape_for_mingw(path: &str) -> String {
    if path.starts_with('/') && !path.starts_with("//") {
        format!("/{}", path)
    } else {
        path.to_string()
    }
}

/// Splits `C:\rest` into `('C', "rest")` for an upper-case drive letter.
fn split_drive(path: &str) -> Option<(char, &str)> {
    let mut chars = path.chars();
    let drive = chars.next().filter(char::is_ascii_uppercase)?;
    path[1..].strip_prefix(":\\").map(|rest| (drive, rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::HostOs;

    fn windows() -> HostPlatform {
        HostPlatform::new(HostOs::Windows)
    }

    #[test]
    fn unix_paths_pass_through() {
        let linux = HostPlatform::new(HostOs::Linux);
        assert_eq!(
            to_runtime_path("/home/dev/project", RuntimeKind::DockerNative, &linux),
            "/home/dev/project"
        );
    }

    #[test]
    fn toolbox_uses_shared_drive_folders() {
        assert_eq!(
            to_runtime_path("C:\\project", RuntimeKind::DockerToolbox, &windows()),
            "/C_DRIVE/project"
        );
        assert_eq!(
            to_runtime_path("D:\\src\\app\\cache", RuntimeKind::DockerToolbox, &windows()),
            "/D_DRIVE/src/app/cache"
        );
    }

    #[test]
    fn native_runtime_uses_drive_directory() {
        assert_eq!(
            to_runtime_path("C:\\Users\\dev\\project", RuntimeKind::DockerNative, &windows()),
            "/C/Users/dev/project"
        );
        assert_eq!(
            to_runtime_path("E:\\work", RuntimeKind::Podman, &windows()),
            "/E/work"
        );
    }

    #[test]
    fn toolbox_outside_windows_does_not_use_shares() {
        let darwin = HostPlatform::new(HostOs::Darwin);
        assert_eq!(
            to_runtime_path("/Users/dev", RuntimeKind::DockerToolbox, &darwin),
            "/Users/dev"
        );
    }

    #[test]
    fn lower_case_drive_is_not_rewritten() {
        assert_eq!(
            to_runtime_path("c:\\x", RuntimeKind::DockerNative, &windows()),
            "c:/x"
        );
    }

    #[test]
    fn mingw_gets_escaped_leading_slash() {
        let mingw = windows().with_mingw(true);
        assert_eq!(
            to_runtime_path("C:\\project", RuntimeKind::DockerNative, &mingw),
            "//C/project"
        );
        assert_eq!(
            to_runtime_path("//var/run/docker.sock", RuntimeKind::DockerNative, &mingw),
            "//var/run/docker.sock"
        );
        assert_eq!(
            to_runtime_path("relative\\dir", RuntimeKind::DockerNative, &mingw),
            "relative/dir"
        );
    }

    #[test]
    fn translation_is_idempotent() {
        let platforms = [
            HostPlatform::new(HostOs::Linux),
            HostPlatform::new(HostOs::Darwin),
            windows(),
            windows().with_mingw(true),
        ];
        let runtimes = [
            RuntimeKind::Podman,
            RuntimeKind::DockerNative,
            RuntimeKind::DockerToolbox,
        ];
        let inputs = [
            "C:\\project",
            "Z:\\a\\b\\c",
            "/root",
            "relative\\dir",
            "//var/run/docker.sock",
            "",
        ];

        for platform in &platforms {
            for runtime in runtimes {
                for input in inputs {
                    let once = to_runtime_path(input, runtime, platform);
                    let twice = to_runtime_path(&once, runtime, platform);
                    assert_eq!(
                        once, twice,
                        "not idempotent for {input:?} on {platform:?} / {runtime}"
                    );
                }
            }
        }
    }
}
