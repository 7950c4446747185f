// Copyright 2026 Oxide Computer Company

//! Request, validation and output types for a New Relic deployment marker
//! resource.
//!
//! A Concourse *put* step hands the resource a JSON request made of the
//! resource's `source` configuration and the step's `params`. This crate
//! turns that request into a checked [`PutConfig`], describes the marker
//! that gets posted ([`DeploymentPayload`], [`DeploymentTarget`]), and shapes
//! the API response into the document Concourse expects back
//! ([`ResourceOutput`]).
//!
//! Nothing here performs I/O. Running git and talking to the API is the job
//! of [`deploy-marker-resource`](https://crates.io/crates/deploy-marker-resource).
//!
//! # Examples
//!
//! ```
//! use deploy_marker::{Request, validate};
//!
//! let request: Request = serde_json::from_str(
//!     r#"{
//!         "source": {"api_key": "key", "user": "ci@example.com"},
//!         "params": {"git_src_directory": "repo", "app_id": "123"}
//!     }"#,
//! )
//! .unwrap();
//!
//! let config =
//!     validate(request.source.as_ref(), request.params.as_ref()).unwrap();
//! assert_eq!(
//!     config.target.url(),
//!     "https://api.newrelic.com/v2/applications/123/deployments.json",
//! );
//! ```

#![deny(missing_docs)]

mod deployment;
mod errors;
mod hash;
mod output;
mod request;
mod validate;

pub use deployment::{
    DeploymentBody, DeploymentPayload, DeploymentTarget, NEW_RELIC_API_BASE,
};
pub use errors::{CommitHashParseError, ValidationError};
pub use hash::CommitHash;
pub use output::{MISSING_REF, ResourceOutput, Version, build_output};
pub use request::{AppId, PutParams, Request, SourceConfig};
pub use validate::{PutConfig, validate};
