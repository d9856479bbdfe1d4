//! Worker completion messages
//!
//! Wire form: `<Role>-<workerId>-<wallSeconds>-<cpuSeconds>`, one line, sent as
//! the worker's final write on its private pipe.

use super::error::ProtocolError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which kind of worker finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    SplitterDone,
    BuilderDone,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SplitterDone => "SplitterDone",
            Role::BuilderDone => "BuilderDone",
        }
    }

    /// Human name of the worker kind, for logs
    pub fn worker_kind(&self) -> &'static str {
        match self {
            Role::SplitterDone => "splitter",
            Role::BuilderDone => "builder",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SplitterDone" => Ok(Role::SplitterDone),
            "BuilderDone" => Ok(Role::BuilderDone),
            other => Err(ProtocolError::UnknownRole(other.to_string())),
        }
    }
}

/// Elapsed time reported by a worker
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkerTiming {
    pub wall_secs: f64,
    pub cpu_secs: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionMessage {
    pub role: Role,
    pub worker_id: usize,
    pub timing: WorkerTiming,
}

impl CompletionMessage {
    pub fn new(role: Role, worker_id: usize, timing: WorkerTiming) -> Self {
        Self {
            role,
            worker_id,
            timing,
        }
    }

    /// Encode the message as one newline-terminated line
    pub fn encode(&self) -> String {
        format!(
            "{}-{}-{:.6}-{:.6}\n",
            self.role, self.worker_id, self.timing.wall_secs, self.timing.cpu_secs
        )
    }

    /// Decode a message body, ignoring surrounding whitespace and NUL padding
    pub fn decode(body: &str) -> Result<Self, ProtocolError> {
        let body = body.trim_matches(|c: char| c.is_whitespace() || c == '\0');
        if body.is_empty() {
            return Err(ProtocolError::EmptyMessage);
        }

        let fields: Vec<&str> = body.split('-').collect();
        let [role, id, wall, cpu] = fields.as_slice() else {
            return Err(ProtocolError::FieldCount(body.to_string()));
        };

        let invalid = |field: &'static str| ProtocolError::InvalidField {
            message: body.to_string(),
            field,
        };

        let role = role.parse::<Role>()?;
        let worker_id = id.parse::<usize>().map_err(|_| invalid("worker id"))?;
        let wall_secs = parse_seconds(wall).ok_or_else(|| invalid("wall time"))?;
        let cpu_secs = parse_seconds(cpu).ok_or_else(|| invalid("cpu time"))?;

        Ok(Self::new(
            role,
            worker_id,
            WorkerTiming {
                wall_secs,
                cpu_secs,
            },
        ))
    }
}

fn parse_seconds(field: &str) -> Option<f64> {
    field
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
}
