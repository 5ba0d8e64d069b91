//! # smsrelay-adapter-shell
//!
//! Shell adapter — implements the [`CommandRunner`] port by running each
//! command as `/bin/sh -c <command>` on its own tokio task.
//!
//! Dispatched tasks are detached: nothing awaits them, nothing bounds how
//! many run at once, and nothing times them out. When a command finishes
//! its exit status and combined output are written to the log; that is
//! the only trace it leaves.
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `smsrelay-app` only.

use std::process::{ExitStatus, Stdio};

use tokio::process::Command;
use tokio::runtime::Handle;

use smsrelay_app::ports::CommandRunner;

/// Shell used to interpret rule commands.
pub const SHELL: &str = "/bin/sh";

/// Result of a finished command.
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    /// Standard output followed by standard error, lossily decoded.
    pub output: String,
}

/// Run `command` through the shell and wait for it to finish.
///
/// Stdin is closed. Stdout and stderr are both captured.
///
/// # Errors
///
/// Returns the I/O error if the shell cannot be spawned.
pub async fn run_shell(command: &str) -> std::io::Result<CommandOutput> {
    let out = Command::new(SHELL)
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    let mut output = String::from_utf8_lossy(&out.stdout).into_owned();
    output.push_str(&String::from_utf8_lossy(&out.stderr));

    Ok(CommandOutput {
        status: out.status,
        output,
    })
}

/// [`CommandRunner`] spawning one detached task per command.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner;

impl ShellRunner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ShellRunner {
    fn dispatch(&self, command: &str) {
        let Ok(handle) = Handle::try_current() else {
            tracing::warn!(command, "no async runtime, command not started");
            return;
        };

        let command = command.to_string();
        handle.spawn(async move {
            match run_shell(&command).await {
                Ok(CommandOutput { status, output }) => {
                    tracing::info!(
                        command = %command,
                        status = %status,
                        "command finished, output:\n{output}"
                    );
                }
                Err(err) => {
                    tracing::warn!(command = %command, error = %err, "failed to start command");
                }
            }
        });
    }
}
