use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaprenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Ambiguous input: {0}")]
    Ambiguous(String),

    #[error("External tool failed: {0}")]
    Tool(String),

    #[error("Composition source in unexpected shape: {0}")]
    ConfigShape(String),
}

pub type Result<T> = std::result::Result<T, CaprenderError>;
