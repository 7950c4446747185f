// Copyright 2026 Oxide Computer Company

//! Error types for deployment marker requests.

use crate::{PutParams, SourceConfig};
use thiserror::Error;

/// An error that occurs while parsing a
/// [`CommitHash`](crate::CommitHash).
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum CommitHashParseError {
    /// The commit hash has an invalid length.
    #[error(
        "invalid length: expected 40 (SHA-1) or 64 (SHA-256) hex characters, \
         got {0}"
    )]
    InvalidLength(usize),

    /// The commit hash is not valid hexadecimal.
    #[error("invalid hexadecimal")]
    InvalidHex(hex::FromHexError),
}

/// A request that failed [`validate`](crate::validate).
///
/// The `Display` output of each variant is the diagnostic shown to the
/// pipeline author, so the wording is part of the resource's interface.
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum ValidationError {
    /// `source` was absent, `null`, or an empty mapping.
    #[error("Configuration for assets cannot be empty")]
    EmptySource,

    /// `source` is missing `api_key` or `user`.
    #[error("Missing mandatory source parameters:\n {supplied}")]
    MissingSourceParams {
        /// The source mapping as it was supplied.
        supplied: SourceConfig,
    },

    /// `params` was absent, `null`, or an empty mapping.
    #[error("Params for assets cannot be empty in put step")]
    EmptyParams,

    /// `params` is missing `git_src_directory`.
    #[error("Missing mandatory parameters in put step:\n {supplied}")]
    MissingParams {
        /// The params mapping as it was supplied.
        supplied: PutParams,
    },

    /// `params` contains neither `app_id` nor `api_url`.
    #[error(
        "Please provide one of the parameters in put step:\n \
         {{app_id, api_url}}"
    )]
    MissingEitherParam,
}
