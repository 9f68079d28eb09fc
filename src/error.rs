use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShieldError {
    /// A spam pattern (built-in or custom) failed to compile.
    #[error("Invalid spam pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Missing config value: {0}")]
    MissingConfig(String),

    /// The verification request could not complete (DNS, connect, timeout, read).
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ureq::Error> for ShieldError {
    fn from(e: ureq::Error) -> Self {
        ShieldError::Transport(e.to_string())
    }
}

pub type ShieldResult<T> = Result<T, ShieldError>;
