//! Host facts resolved once per process and threaded through the pipeline.

use std::env;
use std::fmt;

pub const DEFAULT_MACHINE_NAME: &str = "envctl";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Linux,
    Darwin,
    Windows,
}

impl HostOs {
    pub fn current() -> Self {
        if cfg!(windows) {
            HostOs::Windows
        } else if cfg!(target_os = "macos") {
            HostOs::Darwin
        } else {
            HostOs::Linux
        }
    }
}

impl fmt::Display for HostOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HostOs::Linux => "linux",
            HostOs::Darwin => "darwin",
            HostOs::Windows => "windows",
        };
        f.write_str(name)
    }
}

/// Operating system plus the POSIX-emulation quirks of the invoking shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostPlatform {
    pub os: HostOs,
    /// Invoked from a MinGW shell such as Git Bash (`MSYSTEM=MINGW64`).
    pub is_mingw: bool,
    /// Stdout is a Cygwin/MSYS pseudo terminal rather than a Windows console.
    pub is_cygwin_tty: bool,
}

impl HostPlatform {
    pub fn new(os: HostOs) -> Self {
        Self {
            os,
            is_mingw: false,
            is_cygwin_tty: false,
        }
    }

    pub fn with_mingw(mut self, is_mingw: bool) -> Self {
        self.is_mingw = is_mingw;
        self
    }

    pub fn with_cygwin_tty(mut self, is_cygwin_tty: bool) -> Self {
        self.is_cygwin_tty = is_cygwin_tty;
        self
    }

    pub fn is_windows(&self) -> bool {
        self.os == HostOs::Windows
    }

    /// Derive the platform from an environment lookup and the stdout terminal state.
    pub fn from_lookup<F>(os: HostOs, stdout_tty: bool, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let msystem = lookup("MSYSTEM").unwrap_or_default();
        let is_mingw = msystem.to_ascii_uppercase().starts_with("MINGW");
        // mintty and friends report a terminal through atty's msys pipe check while
        // exporting TERM or MSYSTEM, which a plain Windows console does not.
        let is_cygwin_tty = os == HostOs::Windows
            && stdout_tty
            && (!msystem.is_empty() || lookup("TERM").is_some_and(|term| !term.is_empty()));

        Self {
            os,
            is_mingw,
            is_cygwin_tty,
        }
    }

    pub fn detect() -> Self {
        Self::from_lookup(HostOs::current(), stdout_is_terminal(), |key| {
            env::var(key).ok()
        })
    }
}

/// Everything the compiler needs to know about the calling process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostContext {
    pub platform: HostPlatform,
    /// The `CI` environment variable is present.
    pub ci: bool,
    pub stdout_tty: bool,
    /// docker-machine VM hosting the Toolbox daemon.
    pub machine_name: String,
}

impl HostContext {
    pub fn new(platform: HostPlatform) -> Self {
        Self {
            platform,
            ci: false,
            stdout_tty: false,
            machine_name: DEFAULT_MACHINE_NAME.to_string(),
        }
    }

    pub fn with_ci(mut self, ci: bool) -> Self {
        self.ci = ci;
        self
    }

    pub fn with_stdout_tty(mut self, stdout_tty: bool) -> Self {
        self.stdout_tty = stdout_tty;
        self
    }

    pub fn with_machine_name(mut self, name: impl Into<String>) -> Self {
        self.machine_name = name.into();
        self
    }

    pub fn detect(machine_name: impl Into<String>) -> Self {
        Self {
            platform: HostPlatform::detect(),
            ci: is_ci_environment(),
            stdout_tty: stdout_is_terminal(),
            machine_name: machine_name.into(),
        }
    }

    /// Whether `-ti` may be requested from the runtime.
    pub fn interactive(&self) -> bool {
        !self.ci && (self.stdout_tty || self.platform.is_cygwin_tty)
    }
}

pub fn is_ci_environment() -> bool {
    env::var_os("CI").is_some()
}

pub fn stdout_is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
