use thiserror::Error;

/// Fatal failures. Any of these aborts the batch.
#[derive(Error, Debug)]
pub enum PlacementError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Invalid scene document: {0}")]
    InvalidScene(String),

    #[error("Registry parse error: {0}")]
    Registry(#[source] serde_yaml::Error),

    #[error("Duplicate anchor type in registry: {type_id}")]
    DuplicateAnchor { type_id: String },

    #[error("Config parse error: {0}")]
    Config(#[source] serde_yaml::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Sink write failed: {0}")]
    SinkWrite(#[source] std::io::Error),

    #[error("Authoring error: {0}")]
    Authoring(#[from] AuthoringError),
}

/// Problems with a single scene record. The record is skipped, the batch goes on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("missing attribute '{attr}'")]
    MissingAttribute { attr: &'static str },

    #[error("attribute '{attr}' has non-numeric component '{value}'")]
    InvalidNumber { attr: &'static str, value: String },

    #[error("attribute '{attr}' needs 3 components, found {found}")]
    ComponentCount { attr: &'static str, found: usize },
}

/// Operator input that the authoring protocol could not accept.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthoringError {
    #[error("expected '<x, y, z>' in: {0}")]
    MissingVector(String),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("expected 3 components, found {0}")]
    ComponentCount(usize),

    #[error("expected 'Config-Type: name' in: {0}")]
    MissingName(String),

    #[error("protocol already complete")]
    Complete,

    #[error("protocol incomplete, still waiting on: {0}")]
    Incomplete(String),
}

impl PlacementError {
    /// Whether the error came from the output side rather than the input.
    pub fn is_sink_failure(&self) -> bool {
        matches!(
            self,
            PlacementError::SinkWrite(_) | PlacementError::Serialization(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PlacementError>;
