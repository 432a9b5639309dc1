use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop a run. None of these are retried.
#[derive(Debug, Error)]
pub enum Error {
    /// The home directory normalized to something we refuse to write under.
    #[error("Unable to determine home directory; refusing to use {0:?}")]
    InvalidHomeDirectory(PathBuf),

    #[error("Failed to load Docker config file {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: LoadFailure,
    },

    #[error("Failed to write Docker config file {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to determine AWS identity: {0}")]
    Identity(#[from] IdentityError),

    #[error("Failed to determine AWS region")]
    MissingRegion,

    #[error("Failed to determine AWS account")]
    MissingAccount,
}

/// Why an existing config file could not be used.
#[derive(Debug, Error)]
pub enum LoadFailure {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("cannot run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("`{program} {args}` exited with {status}: {stderr}")]
    Command {
        program: String,
        args: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("unexpected caller identity output: {0}")]
    Output(#[from] serde_json::Error),
}
