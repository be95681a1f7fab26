use thiserror::Error;

/// Malformed input handed to the adapters or the hint parser.
/// The engine itself never fails; only reading its input can.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Input data must be a JSON array of objects")]
    NotAnArray,
    #[error("Item {index} in the input array is not an object")]
    NotAnObject { index: usize },
    #[error("Unsupported nested value for field '{field}' in item {index}")]
    NestedValue { index: usize, field: String },
    #[error("Failed to read CSV input: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to parse JSON input: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Hint parse error near '{remaining}'")]
    HintSyntax { remaining: String },
}
