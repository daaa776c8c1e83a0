use std::path::PathBuf;

use thiserror::Error;

/// Failures while deriving invoice data from invocation inputs.
#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error("invalid reference date '{input}': expected YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDate { input: String },
}

/// Failures of the page-drawing backend.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures while building or sending the invoice email. Logged, never fatal.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("email is not configured: {0}")]
    NotConfigured(&'static str),
    #[error("invalid email address '{address}': {reason}")]
    Address { address: String, reason: String },
    #[error("could not read attachment {path}: {source}")]
    Attachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to build email: {0}")]
    Message(String),
    #[error("SMTP transport error: {0}")]
    Transport(String),
    #[error("email task did not complete: {0}")]
    Task(String),
}

/// Failures while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{var} must be a non-negative number, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
    #[error("hourly rate is not configured (set `rate` in the config file or RATE)")]
    MissingRate,
}

/// Fatal failures of a single invoicing run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Invoice(#[from] InvoiceError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("adjustment must be a finite number, got {0}")]
    InvalidAdjustment(f64),
    #[error("adjustment must not be negative, got {0}")]
    NegativeAdjustment(f64),
    #[error("adjustment {adjust} exceeds the gross amount {gross}")]
    NegativeTotal { adjust: f64, gross: f64 },
}
