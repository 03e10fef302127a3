use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::types::Decimal;

/// Body of a `convert` response.
///
/// The service answers HTTP 200 even when it refuses a lookup; `success` tells the two apart.
#[derive(Debug, Clone, Deserialize)]
#[non_exhaustive]
pub struct ConvertResponse {
    pub success: bool,
    #[serde(default)]
    pub result: Option<Decimal>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

/// Error object attached to an unsuccessful response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[non_exhaustive]
pub struct ApiError {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub info: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.info, &self.kind, self.code) {
            (Some(info), _, _) => f.write_str(info),
            (None, Some(kind), Some(code)) => write!(f, "{kind} ({code})"),
            (None, Some(kind), None) => f.write_str(kind),
            (None, None, Some(code)) => write!(f, "error code {code}"),
            (None, None, None) => write!(f, "{}", Value::Object(self.extra.clone())),
        }
    }
}
