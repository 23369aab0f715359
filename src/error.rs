use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors raised while fetching a document and walking its keys.
#[derive(Debug, Error)]
pub enum JsonUrlError {
    #[error("USAGE: {program} URL [KEY...]")]
    Usage { program: String },

    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse JSON from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("'{0}' was not found")]
    KeyNotFound(String),

    #[error("'{key}' was not found (value is {kind})")]
    NotAnObject { key: String, kind: &'static str },
}

/// Errors raised by the push-and-close pipeline.
#[derive(Debug, Error)]
pub enum PushError {
    #[error("Please run this script from {expected} branch")]
    WrongBranch { expected: String, actual: String },

    #[error("No new commits found to push")]
    NothingToPush,

    #[error("Invalid ReviewBoard URL: '{0}'")]
    InvalidReviewUrl(String),

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("`{command}` exited with {status}")]
    CommandExited { command: String, status: ExitStatus },

    #[error("Unable to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid review pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl PushError {
    /// Every failure terminates with status 1.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

impl JsonUrlError {
    pub fn exit_code(&self) -> i32 {
        1
    }
}
