// Copyright 2026 Oxide Computer Company

//! Error types for running the resource.

use camino::Utf8PathBuf;
use deploy_marker::{CommitHashParseError, ValidationError};
use std::{ffi::OsString, io};
use thiserror::Error;

// ---- Git errors ----

/// An error from reading the git binary path from the environment.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GitEnvError {
    /// The environment variable is set but is not valid UTF-8.
    #[error("${var} environment variable is not valid UTF-8: {value:?}")]
    NonUtf8 {
        /// The environment variable name.
        var: &'static str,
        /// The non-UTF-8 value.
        value: OsString,
    },
}

/// An error that occurs while reading the revision to report.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExtractError {
    /// The source directory does not exist.
    #[error("git source directory {dir} does not exist")]
    PathNotFound {
        /// The directory that was provided.
        dir: Utf8PathBuf,
    },

    /// The source directory is not a directory.
    #[error("git source directory {dir} is not a directory")]
    NotADirectory {
        /// The path that was provided.
        dir: Utf8PathBuf,
    },

    /// An I/O error occurred while probing the source directory.
    #[error("I/O error while checking git source directory {dir}")]
    Io {
        /// The directory being checked.
        dir: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to spawn git.
    #[error("failed to run git at {binary_path:?} in {dir}")]
    SpawnFailed {
        /// The path to the git executable.
        binary_path: String,
        /// The working directory where the command was run.
        dir: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A git command exited unsuccessfully.
    #[error("`git {args}` failed in {dir} ({exit_status}): {stderr}")]
    GitFailed {
        /// The arguments git was run with, space-separated.
        args: String,
        /// The working directory where the command was run.
        dir: Utf8PathBuf,
        /// A human-readable description of the exit status (e.g.,
        /// "exit status: 128").
        exit_status: String,
        /// The stderr output from git.
        stderr: String,
    },

    /// `git rev-parse HEAD` printed something that isn't a commit hash.
    #[error("git returned an invalid commit hash {stdout:?} in {dir}")]
    InvalidCommitHash {
        /// The working directory where the command was run.
        dir: Utf8PathBuf,
        /// The trimmed stdout of git.
        stdout: String,
        /// Why the output was rejected.
        #[source]
        error: CommitHashParseError,
    },
}

// ---- Reporting errors ----

/// An error that occurs while posting a deployment marker.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    /// The request could not be sent or no response was received.
    #[error("failed to send deployment marker to {url}")]
    Send {
        /// The deployments endpoint.
        url: String,
        /// The underlying transport error.
        #[source]
        error: reqwest::Error,
    },

    /// The API answered with a non-success status.
    #[error("deployments endpoint {url} returned {status}: {body}")]
    Status {
        /// The deployments endpoint.
        url: String,
        /// The HTTP status.
        status: reqwest::StatusCode,
        /// The response body, as text.
        body: String,
    },

    /// The response body could not be read.
    #[error("failed to read response from {url}")]
    ReadBody {
        /// The deployments endpoint.
        url: String,
        /// The underlying transport error.
        #[source]
        error: reqwest::Error,
    },

    /// The response body was not JSON.
    #[error("response from {url} is not valid JSON")]
    InvalidBody {
        /// The deployments endpoint.
        url: String,
        /// The parse error.
        #[source]
        error: serde_json::Error,
    },
}

// ---- Resource step errors ----

/// Errors from running the `out` step end to end.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OutError {
    /// Failed to read the request from stdin.
    #[error("failed to read request")]
    ReadRequest(#[source] io::Error),

    /// The request is not valid JSON, or has the wrong shape.
    #[error("failed to parse request")]
    ParseRequest(#[source] serde_json::Error),

    /// The request is incomplete.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// `$GIT` could not be read.
    #[error(transparent)]
    GitEnv(#[from] GitEnvError),

    /// The revision could not be read from the repository.
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// The deployment marker could not be posted.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Failed to write the result to stdout.
    #[error("failed to write output")]
    WriteOutput(#[source] io::Error),
}

/// Errors from the `in` and `check` steps.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StepError {
    /// Failed to read the request from stdin.
    #[error("failed to read request")]
    ReadRequest(#[source] io::Error),

    /// The request is not valid JSON, or has the wrong shape.
    #[error("failed to parse request")]
    ParseRequest(#[source] serde_json::Error),

    /// Failed to write the result to stdout.
    #[error("failed to write output")]
    WriteOutput(#[source] io::Error),
}
