/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::fmt;
use std::process::Command;

use log::debug;

/// Hands a URI to the host platform's generic "view this externally"
/// mechanism. Implementations must return promptly; the guard calls this
/// from the renderer's interception callback.
pub trait ExternalOpener: Send {
    fn open(&self, uri: &str) -> Result<(), OpenError>;
}

#[derive(Debug)]
pub enum OpenError {
    /// The platform opener could not be started, typically because none
    /// is installed.
    Unavailable(String),
}

impl fmt::Display for OpenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpenError::Unavailable(detail) => {
                write!(f, "platform opener unavailable: {detail}")
            }
        }
    }
}

/// Spawns the platform opener detached and never waits on it, so a slow
/// or missing handler cannot stall the signal-delivery thread.
pub struct SystemOpener;

impl ExternalOpener for SystemOpener {
    fn open(&self, uri: &str) -> Result<(), OpenError> {
        match opener_command(uri).spawn() {
            Ok(child) => {
                debug!("spawned platform opener (pid {}) for {uri}", child.id());
                Ok(())
            }
            Err(err) => Err(OpenError::Unavailable(err.to_string())),
        }
    }
}

#[cfg(target_os = "macos")]
fn opener_command(uri: &str) -> Command {
    let mut command = Command::new("open");
    command.arg(uri);
    command
}

#[cfg(target_os = "windows")]
fn opener_command(uri: &str) -> Command {
    let mut command = Command::new("cmd");
    // The empty string is the window title slot of `start`.
    command.args(["/C", "start", "", uri]);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener_command(uri: &str) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(uri);
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opener_command_targets_platform_opener() {
        let command = opener_command("mailto:crew@example.com");
        let program = command.get_program().to_string_lossy().into_owned();
        assert!(["xdg-open", "open", "cmd"].contains(&program.as_str()));
        assert!(
            command
                .get_args()
                .any(|arg| arg.to_string_lossy().contains("mailto:crew@example.com"))
        );
    }
}
