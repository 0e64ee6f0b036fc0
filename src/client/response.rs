//! Stream load result document
//!
//! The endpoint answers every accepted request with a flat JSON object. Only
//! `Status` is required; the rest is diagnostics kept verbatim for the caller.

use crate::error::LoadError;
use serde_json::{Map, Value};

const STATUS_KEY: &str = "Status";

/// Value of the `Status` field in a load result
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    Success,
    PublishTimeout,
    LabelAlreadyExists,
    Fail,
    /// Anything the server sends that is not one of the above
    Other(String),
}

impl LoadStatus {
    pub fn is_fail(&self) -> bool {
        matches!(self, Self::Fail)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "Success",
            Self::PublishTimeout => "Publish Timeout",
            Self::LabelAlreadyExists => "Label Already Exists",
            Self::Fail => "Fail",
            Self::Other(status) => status,
        }
    }
}

impl From<&str> for LoadStatus {
    fn from(s: &str) -> Self {
        match s {
            "Success" => Self::Success,
            "Publish Timeout" => Self::PublishTimeout,
            "Label Already Exists" => Self::LabelAlreadyExists,
            "Fail" => Self::Fail,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed response of one stream load request
#[derive(Clone, Debug, PartialEq)]
pub struct LoadResult {
    status: LoadStatus,
    document: Map<String, Value>,
}

impl LoadResult {
    /// Parse a response body.
    ///
    /// # Errors
    /// Returns [`LoadError::MalformedResult`] if the body is not a JSON object
    /// or has no `Status` field.
    pub fn parse(body: &str) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_str(body).map_err(|e| LoadError::MalformedResult {
            reason: format!("response is not valid JSON: {}", e),
        })?;

        let Value::Object(document) = value else {
            return Err(LoadError::MalformedResult {
                reason: "response is not a JSON object".to_string(),
            });
        };

        let status = match document.get(STATUS_KEY) {
            Some(Value::String(status)) => LoadStatus::from(status.as_str()),
            Some(other) => LoadStatus::Other(other.to_string()),
            None => {
                return Err(LoadError::MalformedResult {
                    reason: "unknown result status".to_string(),
                });
            }
        };

        Ok(Self { status, document })
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// The complete response object as sent by the server
    pub fn document(&self) -> &Map<String, Value> {
        &self.document
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.document.get(key)
    }

    pub fn label(&self) -> Option<&str> {
        self.get_str("Label")
    }

    pub fn message(&self) -> Option<&str> {
        self.get_str("Message")
    }

    pub fn error_url(&self) -> Option<&str> {
        self.get_str("ErrorURL")
    }

    pub fn txn_id(&self) -> Option<i64> {
        self.get_i64("TxnId")
    }

    pub fn total_rows(&self) -> Option<u64> {
        self.get_u64("NumberTotalRows")
    }

    pub fn loaded_rows(&self) -> Option<u64> {
        self.get_u64("NumberLoadedRows")
    }

    pub fn filtered_rows(&self) -> Option<u64> {
        self.get_u64("NumberFilteredRows")
    }

    pub fn load_bytes(&self) -> Option<u64> {
        self.get_u64("LoadBytes")
    }

    pub fn load_time_ms(&self) -> Option<u64> {
        self.get_u64("LoadTimeMs")
    }

    pub fn to_json(&self) -> String {
        Value::Object(self.document.clone()).to_string()
    }

    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.document).unwrap_or_else(|_| self.to_json())
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(Value::as_u64)
    }
}
