use thiserror::Error;

#[derive(Error, Debug)]
pub enum PresenceError {
    #[error("unknown flight type: {0:?}")]
    UnknownFlightType(String),
    #[error("flight {flight}: invalid timestamp {value:?}")]
    InvalidTimestamp { flight: String, value: String },
    #[error("invalid model configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to parse model configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to draw chart: {0}")]
    Chart(String),
}

pub type Result<T> = std::result::Result<T, PresenceError>;
