use std::fmt;

#[derive(Debug)]
pub enum MigrationError {
    FileNotFound(String),
    CsvError(csv::Error),
    IoError(std::io::Error),
    MissingConfig(String),
    InvalidConfig {
        key: String,
        value: String,
    },
    HttpError(reqwest::Error),
    ApiError {
        status: u16,
        message: String,
    },
    DecodeError(String),
    Unresolved {
        kind: &'static str,
        name: String,
    },
}

impl fmt::Display for MigrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationError::FileNotFound(path) => write!(f, "File not found: {}", path),
            MigrationError::CsvError(e) => write!(f, "CSV error: {}", e),
            MigrationError::IoError(e) => write!(f, "I/O error: {}", e),
            MigrationError::MissingConfig(key) => {
                write!(f, "Missing configuration value: {}", key)
            }
            MigrationError::InvalidConfig { key, value } => {
                write!(f, "Invalid configuration value for {}: {:?}", key, value)
            }
            MigrationError::HttpError(e) => write!(f, "HTTP error: {}", e),
            MigrationError::ApiError { status, message } => {
                write!(f, "API error ({}): {}", status, message)
            }
            MigrationError::DecodeError(msg) => write!(f, "Malformed response: {}", msg),
            MigrationError::Unresolved { kind, name } => {
                write!(f, "Could not resolve id for {} {:?}", kind, name)
            }
        }
    }
}

impl std::error::Error for MigrationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MigrationError::CsvError(e) => Some(e),
            MigrationError::IoError(e) => Some(e),
            MigrationError::HttpError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<csv::Error> for MigrationError {
    fn from(err: csv::Error) -> Self {
        MigrationError::CsvError(err)
    }
}

impl From<std::io::Error> for MigrationError {
    fn from(err: std::io::Error) -> Self {
        MigrationError::IoError(err)
    }
}

impl From<reqwest::Error> for MigrationError {
    fn from(err: reqwest::Error) -> Self {
        MigrationError::HttpError(err)
    }
}

impl From<serde_json::Error> for MigrationError {
    fn from(err: serde_json::Error) -> Self {
        MigrationError::DecodeError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MigrationError>;
