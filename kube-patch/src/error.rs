use thiserror::Error;

/// Errors produced while computing, rendering or applying a patch.
#[derive(Debug, Error)]
pub enum Error {
    /// A value in the desired map is not a string.
    #[error("value for key '{key}' must be a string, got {found}")]
    InvalidValueType { key: String, found: &'static str },

    #[error("could not serialize patch: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("could not apply patch: {0}")]
    Apply(#[from] json_patch::PatchError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Name of the JSON type of `value`, for error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
