//! Error types for the astro_core library.

use std::io;
use std::path::PathBuf;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for astro_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A user-supplied field failed to parse or validate
    #[error("Input error: {0}")]
    InputValidation(#[from] ValidationError),

    /// The store file could not be parsed and was moved aside
    #[error("Data file {path:?} was corrupted ({reason}); backup created at {backup:?}")]
    DataCorruption {
        path: PathBuf,
        backup: PathBuf,
        reason: String,
    },

    /// An operation needed an active user and none was selected
    #[error("No user selected. Please enter a name first.")]
    NoActiveUser,

    /// The nutrition service could not provide an answer
    #[error("Nutrition lookup unavailable: {0}")]
    LookupUnavailable(LookupFailure),

    /// The nutrition service answered with something we could not read
    #[error("Could not parse nutrition response: {0}")]
    LookupParse(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// HTTP client construction error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Reasons a single input field is rejected.
///
/// Every variant carries the user-facing field label so the message can be
/// shown as-is.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} cannot be empty.")]
    Empty { field: &'static str },

    #[error("Invalid input for {field}: {value:?} is not a number.")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} must be a positive number.")]
    NotPositive { field: &'static str },

    #[error("{field} must be zero or more.")]
    Negative { field: &'static str },

    #[error("Microgravity duration ({microgravity}) cannot exceed total duration ({duration}).")]
    MicrogravityExceedsDuration { microgravity: f64, duration: f64 },

    #[error("{field} is too large to calculate calories.")]
    OutOfRange { field: &'static str },

    #[error("Unknown exercise {0:?}. Use the catalog names or log it as \"Other\".")]
    UnknownExercise(String),

    #[error("Unknown {activity} speed {label:?}.")]
    UnknownSpeed { activity: String, label: String },

    #[error("Unknown activity {0:?}. Expected Walking or Jogging.")]
    UnknownActivity(String),

    #[error("Date format should be YYYY-MM-DD (got {0:?}).")]
    InvalidDate(String),

    #[error("Please enter a name.")]
    EmptyUserName,
}

/// Distinct ways the nutrition service can be unavailable
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupFailure {
    #[error("API usage limit has been reached. Please enter nutrition info manually.")]
    RateLimited,

    #[error("nutrition API keys are not set")]
    MissingCredentials,

    #[error("service returned HTTP {0}")]
    Status(u16),

    #[error("network failure: {0}")]
    Network(String),

    #[error("no food matched the query")]
    NoMatch,
}

impl From<LookupFailure> for Error {
    fn from(failure: LookupFailure) -> Self {
        Error::LookupUnavailable(failure)
    }
}
