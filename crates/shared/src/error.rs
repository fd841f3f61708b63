use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error body returned by the backend on any non-success status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ApiErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(Value::String(detail.into())),
        }
    }

    /// A string `detail` verbatim; any other `detail` as compact JSON.
    /// Empty, null, `false` and zero details carry no message.
    pub fn detail_message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::Null | Value::Bool(false) => None,
            Value::String(detail) if detail.is_empty() => None,
            Value::Number(number) if number.as_f64() == Some(0.0) => None,
            Value::String(detail) => Some(detail.clone()),
            other => Some(other.to_string()),
        }
    }
}
