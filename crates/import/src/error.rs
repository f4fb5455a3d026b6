use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
    #[error("Unknown unified column in sheet profile: {0}")]
    UnknownColumn(String),
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}
