//! Sidecar file naming the running display process.
//!
//! The server usually starts the display through a terminal wrapper (`cmd /C start`,
//! `gnome-terminal`, ...) that hands the display off and exits, so the pid of the
//! spawned child says nothing about the window. The display writes its own pid here
//! instead, next to the state file and never inside it, and the launcher signals that
//! pid when a new session replaces the window.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Contents of the pid file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRecord {
    pub pid: u32,

    /// Session token the server gave this display; `None` when started by hand.
    #[serde(default)]
    pub session: Option<String>,
}

/// Read the record, treating a missing or unreadable file as "no display".
pub fn read(path: &Path) -> Option<DisplayRecord> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!(path = %path.display(), "Failed to read display pid file: {}", e);
            return None;
        }
    };
    match serde_json::from_str(&contents) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(path = %path.display(), "Ignoring malformed display pid file: {}", e);
            None
        }
    }
}

pub fn write(path: &Path, record: &DisplayRecord) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let contents = serde_json::to_string(record)?;
    std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

pub fn remove(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        if e.kind() != io::ErrorKind::NotFound {
            tracing::debug!(path = %path.display(), "Failed to remove display pid file: {}", e);
        }
    }
}

/// Record of the current process, removed again on drop if it still names us.
pub struct PidFileGuard {
    path: PathBuf,
    pid: u32,
}

impl PidFileGuard {
    pub fn create(path: PathBuf, session: Option<String>) -> anyhow::Result<Self> {
        let pid = std::process::id();
        write(&path, &DisplayRecord { pid, session })?;
        tracing::debug!(pid, path = %path.display(), "Recorded display pid");
        Ok(Self { path, pid })
    }
}

impl Drop for PidFileGuard {
    fn drop(&mut self) {
        // A newer display may already have replaced the record.
        if read(&self.path).is_some_and(|record| record.pid == self.pid) {
            remove(&self.path);
        }
    }
}

/// Ask the process `pid` to exit.
#[cfg(unix)]
pub fn terminate_process(pid: u32) -> io::Result<()> {
    let pid = libc::pid_t::try_from(pid)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"))?;
    if unsafe { libc::kill(pid, libc::SIGTERM) } == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(windows)]
pub fn terminate_process(pid: u32) -> io::Result<()> {
    let status = std::process::Command::new("taskkill")
        .args(["/PID", &pid.to_string(), "/T", "/F"])
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()?;
    if status.success() {
        Ok(())
    } else {
        Err(io::Error::other(format!("taskkill exited with {}", status)))
    }
}

#[cfg(not(any(unix, windows)))]
pub fn terminate_process(_pid: u32) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "process termination is not supported on this platform",
    ))
}
