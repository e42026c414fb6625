//! Job descriptors: what one invocation of the worker is asked to do.
//!
//! The wire shape is deliberately loose (`tool` is a free string, `files`
//! may carry extra entries) because it is produced by other services. It is
//! parsed into [`JobDescriptor`] first and then validated into a [`Job`],
//! whose fields are the only ones the pipeline ever sees.

use crate::error::WorkerError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// The requested conversion kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tool {
    #[serde(rename = "pdf-to-word")]
    PdfToWord,
    #[serde(rename = "pdf-to-excel")]
    PdfToExcel,
    #[serde(rename = "pdf-to-ppt")]
    PdfToPpt,
}

impl Tool {
    pub const ALL: [Tool; 3] = [Tool::PdfToWord, Tool::PdfToExcel, Tool::PdfToPpt];

    /// Wire name, e.g. `pdf-to-word`.
    pub fn as_str(self) -> &'static str {
        match self {
            Tool::PdfToWord => "pdf-to-word",
            Tool::PdfToExcel => "pdf-to-excel",
            Tool::PdfToPpt => "pdf-to-ppt",
        }
    }

    /// Extension of the produced file, including the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Tool::PdfToWord => ".docx",
            Tool::PdfToExcel => ".xlsx",
            Tool::PdfToPpt => ".pptx",
        }
    }

    /// MIME type sent with the upload.
    pub fn content_type(self) -> &'static str {
        match self {
            Tool::PdfToWord => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Tool::PdfToExcel => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Tool::PdfToPpt => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tool {
    type Err = WorkerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tool::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| WorkerError::UnsupportedTool {
                tool: s.to_string(),
            })
    }
}

/// The job as it arrives on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct JobDescriptor {
    pub tool: String,
    #[serde(alias = "id")]
    pub job_id: String,
    /// Only the first entry is read; it must be a string URL.
    pub files: Vec<Value>,
    /// Free-form producer options; `null` is the same as absent.
    #[serde(default)]
    pub options: Option<HashMap<String, Value>>,
}

/// A validated job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub tool: Tool,
    pub job_id: String,
    /// URL of the source PDF (`files[0]` of the descriptor).
    pub source_url: String,
    /// User password for encrypted PDFs (`options.password`).
    pub password: Option<String>,
}

impl Job {
    /// Parse and validate a JSON job descriptor.
    pub fn from_json(input: &str) -> Result<Self, WorkerError> {
        let descriptor: JobDescriptor =
            serde_json::from_str(input).map_err(|e| WorkerError::MalformedJob(e.to_string()))?;
        Self::try_from(descriptor)
    }
}

impl TryFrom<JobDescriptor> for Job {
    type Error = WorkerError;

    fn try_from(d: JobDescriptor) -> Result<Self, Self::Error> {
        if d.job_id.is_empty() {
            return Err(WorkerError::MalformedJob("job_id must not be empty".into()));
        }
        if d.job_id.contains('/') {
            return Err(WorkerError::MalformedJob(format!(
                "job_id must not contain '/', got '{}'",
                d.job_id
            )));
        }

        let tool: Tool = d.tool.parse()?;

        let mut files = d.files.into_iter();
        let source_url = match files.next() {
            Some(Value::String(url)) => url,
            Some(other) => {
                return Err(WorkerError::MalformedJob(format!(
                    "files[0] must be a URL string, got {}",
                    other
                )))
            }
            None => {
                return Err(WorkerError::MalformedJob(
                    "files must contain at least one URL".into(),
                ))
            }
        };
        let ignored = files.count();
        if ignored > 0 {
            debug!("Ignoring {} additional file(s) in job {}", ignored, d.job_id);
        }

        let password = d
            .options
            .as_ref()
            .and_then(|opts| opts.get("password"))
            .and_then(Value::as_str)
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        Ok(Job {
            tool,
            job_id: d.job_id,
            source_url,
            password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_end_to_end_example() {
        let job = Job::from_json(
            r#"{"tool":"pdf-to-word","job_id":"job1","files":["https://pdf-master-storage.s3.amazonaws.com/in1.pdf"]}"#,
        )
        .unwrap();
        assert_eq!(job.tool, Tool::PdfToWord);
        assert_eq!(job.job_id, "job1");
        assert_eq!(
            job.source_url,
            "https://pdf-master-storage.s3.amazonaws.com/in1.pdf"
        );
        assert_eq!(job.password, None);
    }

    #[test]
    fn only_first_file_is_used() {
        let job = Job::from_json(r#"{"tool":"pdf-to-ppt","job_id":"j","files":["a","b","c"]}"#)
            .unwrap();
        assert_eq!(job.source_url, "a");
    }

    #[test]
    fn accepts_id_alias_and_password_option() {
        let job = Job::from_json(
            r#"{"tool":"pdf-to-excel","id":"q-7","files":["x"],"options":{"password":"s3cret","dpi":"300"}}"#,
        )
        .unwrap();
        assert_eq!(job.job_id, "q-7");
        assert_eq!(job.password.as_deref(), Some("s3cret"));
    }

    #[test]
    fn null_options_are_ignored() {
        let job = Job::from_json(
            r#"{"tool":"pdf-to-word","job_id":"j","files":["x"],"options":null}"#,
        )
        .unwrap();
        assert_eq!(job.password, None);
    }

    #[test]
    fn non_string_options_are_tolerated() {
        let job = Job::from_json(
            r#"{"tool":"pdf-to-ppt","job_id":"j","files":["x"],"options":{"dpi":90,"password":"pw"}}"#,
        )
        .unwrap();
        assert_eq!(job.password.as_deref(), Some("pw"));

        let job = Job::from_json(
            r#"{"tool":"pdf-to-ppt","job_id":"j","files":["x"],"options":{"password":1234}}"#,
        )
        .unwrap();
        assert_eq!(job.password, None);
    }

    #[test]
    fn extra_files_may_be_any_json() {
        let job = Job::from_json(
            r#"{"tool":"pdf-to-excel","job_id":"j","files":["x",{"key":"y"},7,null]}"#,
        )
        .unwrap();
        assert_eq!(job.source_url, "x");
    }

    #[test]
    fn first_file_must_be_a_string() {
        let err = Job::from_json(r#"{"tool":"pdf-to-word","job_id":"j","files":[{"key":"x"}]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("files[0]"), "got: {err}");
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = Job::from_json("{not json").unwrap_err();
        assert!(matches!(err, WorkerError::MalformedJob(_)), "got {err:?}");
    }

    #[test]
    fn missing_field_is_malformed() {
        let err = Job::from_json(r#"{"tool":"pdf-to-word","files":["x"]}"#).unwrap_err();
        assert!(err.to_string().contains("job_id"), "got: {err}");
    }

    #[test]
    fn empty_files_is_malformed() {
        let err = Job::from_json(r#"{"tool":"pdf-to-word","job_id":"j","files":[]}"#).unwrap_err();
        assert!(matches!(err, WorkerError::MalformedJob(_)));
    }

    #[test]
    fn job_id_with_slash_is_rejected() {
        let err =
            Job::from_json(r#"{"tool":"pdf-to-word","job_id":"../x","files":["f"]}"#).unwrap_err();
        assert!(matches!(err, WorkerError::MalformedJob(_)));
    }

    #[test]
    fn unknown_tool_is_unsupported() {
        let err = Job::from_json(r#"{"tool":"pdf-to-csv","job_id":"j","files":["f"]}"#)
            .unwrap_err();
        assert!(
            matches!(err, WorkerError::UnsupportedTool { ref tool } if tool == "pdf-to-csv"),
            "got {err:?}"
        );
    }

    #[test]
    fn tool_extensions_and_names() {
        for tool in Tool::ALL {
            assert_eq!(tool.as_str().parse::<Tool>().unwrap(), tool);
            assert!(tool.extension().starts_with('.'));
            assert!(tool.content_type().starts_with("application/vnd.openxmlformats"));
        }
        assert_eq!(Tool::PdfToExcel.extension(), ".xlsx");
    }
}
