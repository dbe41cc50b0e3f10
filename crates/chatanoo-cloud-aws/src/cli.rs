//! aws CLI wrapper
//!
//! Every call runs `aws <service> <command> ... --output json` with the
//! environment's credentials injected through the process environment, so
//! no profile on the host is read or written.

use crate::error::{AwsError, Result};
use chatanoo_cloud::Credentials;
use serde_json::Value;
use std::process::Stdio;
use tokio::process::Command;

const DEFAULT_BINARY: &str = "aws";

/// aws CLI wrapper
#[derive(Debug, Clone)]
pub struct AwsCli {
    binary: String,
    credentials: Credentials,
}

impl AwsCli {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            binary: DEFAULT_BINARY.to_string(),
            credentials,
        }
    }

    /// Use a different executable, e.g. a pinned install
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn region(&self) -> &str {
        &self.credentials.region
    }

    /// Run a command and return stdout
    pub async fn run_command(&self, service: &str, command: &str, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg(service).arg(command);
        cmd.args(args);
        cmd.args(["--output", "json"]);
        cmd.env("AWS_ACCESS_KEY_ID", &self.credentials.access_key_id);
        cmd.env("AWS_SECRET_ACCESS_KEY", &self.credentials.secret_access_key);
        cmd.env("AWS_DEFAULT_REGION", &self.credentials.region);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!("Running: {} {} {} {}", self.binary, service, command, args.join(" "));

        let output = cmd.output().await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AwsError::CliNotFound,
            _ => AwsError::IoError(e),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AwsError::CommandFailed {
                command: format!("{} {}", service, command),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Run a command and parse its JSON output; commands without output give `Null`
    pub async fn run_json(&self, service: &str, command: &str, args: &[&str]) -> Result<Value> {
        let output = self.run_command(service, command, args).await?;
        if output.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&output)?)
    }
}

/// String at `pointer` in a CLI response
pub(crate) fn string_at(response: &Value, pointer: &str, command: &str) -> Result<String> {
    response
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| AwsError::UnexpectedResponse {
            command: command.to_string(),
            message: format!("missing {}", pointer),
        })
}

/// Object at `pointer` in a CLI response
pub(crate) fn value_at(response: &Value, pointer: &str, command: &str) -> Result<Value> {
    response
        .pointer(pointer)
        .cloned()
        .ok_or_else(|| AwsError::UnexpectedResponse {
            command: command.to_string(),
            message: format!("missing {}", pointer),
        })
}
