use thiserror::Error;

#[derive(Error, Debug)]
pub enum SandboxError {
    #[error("Target index {index} out of range for {context} ({count} entries)")]
    TargetOutOfRange {
        index: usize,
        count: usize,
        context: &'static str,
    },

    #[error("No {0} structure is active at the current scale")]
    NoActiveStructure(&'static str),

    #[error("Unknown quality preset: {0}")]
    UnknownPreset(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SandboxError>;
