//! The result envelope: the single JSON object the worker prints.
//!
//! ```text
//! {"status":"completed","url":"https://{bucket}.s3.amazonaws.com/processed/{job_id}.docx"}
//! {"status":"error","error":"<message>"}
//! ```

use crate::error::WorkerError;
use serde::{Deserialize, Serialize};
use std::process::ExitCode;

/// Outcome of one job, in its wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ResultEnvelope {
    Completed { url: String },
    Error { error: String },
}

impl ResultEnvelope {
    pub fn is_success(&self) -> bool {
        matches!(self, ResultEnvelope::Completed { .. })
    }

    /// Numeric exit status: 0 on success, 1 on any error.
    pub fn exit_status(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }

    /// Single-line JSON rendering.
    pub fn to_json(&self) -> String {
        // Two string-only variants cannot fail to serialise.
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"status":"error","error":"failed to serialise result"}"#.to_string()
        })
    }
}

impl From<Result<String, WorkerError>> for ResultEnvelope {
    fn from(result: Result<String, WorkerError>) -> Self {
        match result {
            Ok(url) => ResultEnvelope::Completed { url },
            Err(e) => ResultEnvelope::Error {
                error: e.to_string(),
            },
        }
    }
}
