use thiserror::Error;

/// Reasons a passive tree definition is rejected at load time.
#[derive(Debug, Error)]
pub enum TreeError {
    /// JSON parsing failed
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// Definition file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Tree has an empty id")]
    EmptyTreeId,
    #[error("Tree '{tree}' defines node '{node}' more than once")]
    DuplicateNode { tree: String, node: String },
    #[error("Node '{node}' has invalid prerequisite '{prerequisite}'")]
    InvalidPrerequisite { node: String, prerequisite: String },
    #[error("Circular dependency detected involving node '{node}'")]
    CircularDependency { node: String },
    #[error("Node '{node}' is invalid: {reason}")]
    InvalidNode { node: String, reason: String },
}

/// Errors raised while reading an engine configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
