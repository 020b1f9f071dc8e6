// tcset (timecode setter for the resolve media pool)
// Copyright (C) 2025 Andrew Nissen

use crate::config::TcsetConfig;
use serde::Deserialize;
use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use thiserror::Error;

pub const FILE_NAME_PROPERTY: &str = "File Name";
pub const START_TC_PROPERTY: &str = "Start TC";

const BRIDGE_SCRIPT: &str = "resolve_bridge.py";

#[derive(Debug, Error)]
pub enum HostError {
    /// The host application or its scripting entry point cannot be reached.
    #[error("{message}")]
    Unavailable { message: String },
    /// The host is running but no project is open.
    #[error("no project is currently open")]
    NoProject,
    /// The bridge produced output this side cannot make sense of.
    #[error("unexpected reply from the scripting bridge: {message}")]
    Protocol { message: String },
    /// A single property call raised inside the host.
    #[error("{message}")]
    Call { message: String },
}

/// Index into the host's selection list. Handles are borrowed from the
/// host for the duration of one run and never persist across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipId(pub usize);

/// The two capabilities this tool consumes from the host: list the
/// externally-selected clips, and get/set a named string property on one
/// of them. `set_clip_property` keeps the host's three-way outcome:
/// `Ok(true)` applied, `Ok(false)` rejected by the host, `Err` raised.
pub trait ClipStore {
    fn selected_clips(&mut self) -> Result<Vec<ClipId>, HostError>;
    fn clip_property(&mut self, clip: ClipId, name: &str) -> Result<String, HostError>;
    fn set_clip_property(
        &mut self,
        clip: ClipId,
        name: &str,
        value: &str,
    ) -> Result<bool, HostError>;
}

#[derive(Debug, Deserialize)]
struct BridgeReply {
    ok: bool,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    count: Option<usize>,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    applied: Option<bool>,
}

/// A live scripting session with the running host, backed by the embedded
/// Python bridge running as a sidecar subprocess. One request line in,
/// one reply line out, strictly in order.
pub struct ResolveSession {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    script_path: PathBuf,
}

impl ResolveSession {
    pub fn connect(cfg: &TcsetConfig) -> Result<Self, HostError> {
        let python = find_python(cfg)?;
        let script_path = write_bridge_script()?;

        let mut command = Command::new(&python);
        command
            .arg(&script_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        if !cfg.scripting_module_path.is_empty() {
            command.arg(&cfg.scripting_module_path);
        }

        let mut child = command.spawn().map_err(|e| {
            let _ = std::fs::remove_file(&script_path);
            HostError::Unavailable {
                message: format!("failed to start {}: {}", python.display(), e),
            }
        })?;

        let stdin = child.stdin.take().ok_or_else(|| HostError::Protocol {
            message: "bridge stdin was not piped".to_string(),
        })?;
        let stdout = child.stdout.take().ok_or_else(|| HostError::Protocol {
            message: "bridge stdout was not piped".to_string(),
        })?;

        let mut session = Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            script_path,
        };

        session.request(json!({"op": "connect"}))?;
        Ok(session)
    }

    fn request(&mut self, payload: serde_json::Value) -> Result<BridgeReply, HostError> {
        let line = serde_json::to_string(&payload).map_err(|e| HostError::Protocol {
            message: e.to_string(),
        })?;
        writeln!(self.stdin, "{}", line).map_err(|e| HostError::Unavailable {
            message: format!("lost the scripting bridge: {}", e),
        })?;
        self.stdin.flush().map_err(|e| HostError::Unavailable {
            message: format!("lost the scripting bridge: {}", e),
        })?;

        let mut reply_line = String::new();
        let read = self
            .stdout
            .read_line(&mut reply_line)
            .map_err(|e| HostError::Unavailable {
                message: format!("lost the scripting bridge: {}", e),
            })?;
        if read == 0 {
            return Err(HostError::Unavailable {
                message: "the scripting bridge exited before replying".to_string(),
            });
        }

        let reply: BridgeReply =
            serde_json::from_str(reply_line.trim()).map_err(|_| HostError::Protocol {
                message: reply_line.trim().to_string(),
            })?;

        if reply.ok {
            Ok(reply)
        } else {
            Err(reply_error(reply.kind.as_deref(), reply.message))
        }
    }
}

fn reply_error(kind: Option<&str>, message: Option<String>) -> HostError {
    let message = message.unwrap_or_else(|| "unknown host error".to_string());
    match kind {
        Some("no_host") => HostError::Unavailable { message },
        Some("no_project") => HostError::NoProject,
        Some("call") => HostError::Call { message },
        _ => HostError::Protocol { message },
    }
}

impl ClipStore for ResolveSession {
    fn selected_clips(&mut self) -> Result<Vec<ClipId>, HostError> {
        let reply = self.request(json!({"op": "selection"}))?;
        let count = reply.count.ok_or_else(|| HostError::Protocol {
            message: "selection reply carried no count".to_string(),
        })?;
        Ok((0..count).map(ClipId).collect())
    }

    fn clip_property(&mut self, clip: ClipId, name: &str) -> Result<String, HostError> {
        let reply = self.request(json!({"op": "get", "clip": clip.0, "name": name}))?;
        reply.value.ok_or_else(|| HostError::Protocol {
            message: "get reply carried no value".to_string(),
        })
    }

    fn set_clip_property(
        &mut self,
        clip: ClipId,
        name: &str,
        value: &str,
    ) -> Result<bool, HostError> {
        let reply =
            self.request(json!({"op": "set", "clip": clip.0, "name": name, "value": value}))?;
        Ok(reply.applied.unwrap_or(false))
    }
}

impl Drop for ResolveSession {
    fn drop(&mut self) {
        let _ = writeln!(self.stdin, "{}", json!({"op": "quit"}));
        let _ = self.stdin.flush();
        let _ = self.child.wait();
        let _ = std::fs::remove_file(&self.script_path);
    }
}

fn find_python(cfg: &TcsetConfig) -> Result<PathBuf, HostError> {
    if !cfg.python_path.is_empty() {
        return Ok(PathBuf::from(&cfg.python_path));
    }

    for candidate in ["python3", "python"] {
        if let Ok(path) = which::which(candidate) {
            return Ok(path);
        }
    }

    Err(HostError::Unavailable {
        message: "no python 3 interpreter found. Please run 'tcset config set python_path /path/to/python3'"
            .to_string(),
    })
}

fn write_bridge_script() -> Result<PathBuf, HostError> {
    let asset = crate::Asset::get(BRIDGE_SCRIPT).ok_or_else(|| HostError::Unavailable {
        message: "the scripting bridge is missing from this build".to_string(),
    })?;

    let path = std::env::temp_dir().join(format!("tcset_bridge_{}.py", std::process::id()));
    std::fs::write(&path, asset.data.as_ref()).map_err(|e| HostError::Unavailable {
        message: format!("could not write {}: {}", path.display(), e),
    })?;

    Ok(path)
}
