//! Display process lifecycle.
//!
//! The handle of the running display lives only in this process. It is never written
//! to the state file. When a terminal wrapper sits between us and the display, the
//! display's own pid comes from the [`pid_file`](crate::pid_file) sidecar instead.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tokio::process::{Child, Command};

use crate::config::{Config, SESSION_VAR};
use crate::pid_file;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Starts and stops the display process on behalf of the command service.
pub trait DisplayLauncher: Send {
    /// Terminate any tracked display (ignoring failures) and start a new one.
    /// Returns the new process id when the platform reports one.
    fn relaunch(&mut self) -> Result<Option<u32>, LaunchError>;

    /// Best-effort termination of the tracked display, if any.
    fn terminate(&mut self);
}

/// Program and arguments used to start the display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub env: Vec<(&'static str, String)>,
}

impl DisplayCommand {
    /// Wrap the display binary in the configured terminal prefix, if any.
    pub fn from_config(config: &Config) -> Self {
        let display = config.display_binary.display().to_string();
        let (program, args) = match config.terminal_command.split_first() {
            Some((terminal, rest)) => {
                let mut args = rest.to_vec();
                args.push(display);
                (PathBuf::from(terminal), args)
            }
            None => (config.display_binary.clone(), Vec::new()),
        };
        Self {
            program,
            args,
            env: config.child_env(),
        }
    }
}

/// Launches the display as an OS subprocess.
pub struct ProcessLauncher {
    command: DisplayCommand,
    child: Option<Child>,
    pid_file: Option<PathBuf>,
    /// Session token handed to the current display.
    session: Option<String>,
    launches: u64,
}

impl ProcessLauncher {
    pub fn new(command: DisplayCommand) -> Self {
        Self {
            command,
            child: None,
            pid_file: None,
            session: None,
            launches: 0,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(DisplayCommand::from_config(config)).with_pid_file(config.pid_file.clone())
    }

    /// Also stop the display recorded in `path` when terminating.
    pub fn with_pid_file(mut self, path: PathBuf) -> Self {
        self.pid_file = Some(path);
        self
    }

    /// Process id of the tracked display, if one was started.
    pub fn tracked_pid(&self) -> Option<u32> {
        self.child.as_ref().and_then(|child| child.id())
    }

    fn next_session(&mut self) -> String {
        self.launches += 1;
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        format!("{}-{}-{}", std::process::id(), nanos, self.launches)
    }

    fn spawn(&self, session: &str) -> Result<Child, LaunchError> {
        tracing::info!(
            session,
            "Launching display: {} {}",
            self.command.program.display(),
            self.command.args.join(" ")
        );

        // stdout carries the MCP protocol, so the display must not inherit it.
        Command::new(&self.command.program)
            .args(&self.command.args)
            .envs(self.command.env.iter().map(|(k, v)| (*k, v.as_str())))
            .env(SESSION_VAR, session)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                program: self.command.program.display().to_string(),
                source,
            })
    }

    /// Signal the display named in the pid file, but only one we launched.
    fn stop_recorded_display(&self, session: &str) {
        let Some(path) = &self.pid_file else {
            return;
        };
        let Some(record) = pid_file::read(path) else {
            tracing::debug!("No display pid recorded");
            return;
        };
        if record.session.as_deref() != Some(session) {
            tracing::debug!(pid = record.pid, "Recorded display is not ours, leaving it");
            return;
        }
        match pid_file::terminate_process(record.pid) {
            Ok(()) => tracing::debug!(pid = record.pid, "Terminated previous display window"),
            Err(e) => tracing::debug!(pid = record.pid, "Previous display window already gone: {}", e),
        }
        pid_file::remove(path);
    }
}

impl DisplayLauncher for ProcessLauncher {
    fn relaunch(&mut self) -> Result<Option<u32>, LaunchError> {
        self.terminate();
        let session = self.next_session();
        let child = self.spawn(&session)?;
        let pid = child.id();
        tracing::info!(pid = ?pid, session = %session, "Display process started");
        self.child = Some(child);
        self.session = Some(session);
        Ok(pid)
    }

    fn terminate(&mut self) {
        if let Some(mut child) = self.child.take() {
            match child.start_kill() {
                Ok(()) => tracing::debug!(pid = ?child.id(), "Terminated previous display process"),
                Err(e) => tracing::debug!("Previous display process already gone: {}", e),
            }
        }
        if let Some(session) = self.session.take() {
            self.stop_recorded_display(&session);
        }
    }
}

impl Drop for ProcessLauncher {
    fn drop(&mut self) {
        self.terminate();
    }
}
