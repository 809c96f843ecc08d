use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No processable sections: {0}")]
    NoProcessableSections(String),
}

pub type Result<T> = std::result::Result<T, ProcessorError>;
