// Copyright 2026 Oxide Computer Company

//! A Concourse resource that records deployments in New Relic.
//!
//! The put step (`out`) reads the commit at HEAD of a checked-out
//! repository and posts it as a deployment marker:
//!
//! ```yaml
//! resource_types:
//! - name: newrelic-deployment
//!   type: registry-image
//!   source: {repository: example/newrelic-deployment-resource}
//!
//! resources:
//! - name: newrelic
//!   type: newrelic-deployment
//!   source:
//!     api_key: ((newrelic-api-key))
//!     user: concourse
//!
//! jobs:
//! - name: deploy
//!   plan:
//!   - get: app-src
//!   - put: newrelic
//!     params:
//!       git_src_directory: app-src
//!       app_id: "123456"
//! ```
//!
//! Instead of `app_id`, `api_url` may name the deployments endpoint
//! directly; if both are given, `api_url` is used.
//!
//! The check and get steps exist only because Concourse requires them:
//! `check` never reports versions, and `in` echoes back the version created
//! by the put.
//!
//! Request validation and the output format live in the
//! [`deploy_marker`] crate. This crate runs git, talks to the API, and
//! provides the `deploy-marker` binary.

#![deny(missing_docs)]

mod errors;
mod logging;
mod reporter;
mod steps;
mod vcs;

pub use errors::{
    ExtractError, GitEnvError, OutError, ReportError, StepError,
};
pub use logging::{LOG_ENV, init_logging};
pub use reporter::{API_KEY_HEADER, Reporter};
pub use steps::{
    InOutput, read_put_config, run_check, run_in, run_out, write_json,
};
pub use vcs::{Git, Revision};
