use std::env;
use std::ffi::OsString;

const SSH_VARS: &[&str] = &["SSH_CONNECTION", "SSH_CLIENT", "SSH_TTY"];
const DISPLAY_VARS: &[&str] = &["DISPLAY", "WAYLAND_DISPLAY"];

/// Where the login is running, which decides how the authorization URL and
/// code travel between the CLI and the user's browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvironmentMode {
    /// A browser can be opened on this machine.
    #[default]
    Local,
    /// Headless host (SSH session, VPS, container). The user authorizes in a
    /// browser on another machine and pastes the code back.
    Remote,
}

impl EnvironmentMode {
    pub fn detect() -> Self {
        Self::detect_with(|name| env::var_os(name))
    }

    pub fn detect_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let is_set = |name: &&str| lookup(*name).is_some_and(|value| !value.is_empty());

        if SSH_VARS.iter().any(is_set) {
            return Self::Remote;
        }

        if cfg!(target_os = "linux") && !DISPLAY_VARS.iter().any(is_set) {
            return Self::Remote;
        }

        Self::Local
    }

    pub fn is_remote(self) -> bool {
        matches!(self, Self::Remote)
    }
}
