// Copyright 2026 Oxide Computer Company

//! The three Concourse resource scripts.

use crate::{Git, OutError, Reporter, StepError};
use camino::Utf8Path;
use deploy_marker::{
    DeploymentPayload, PutConfig, Request, ResourceOutput, build_output,
    validate,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{Read, Write};

/// Reads the put request from `input` and validates it.
///
/// This is the first half of the put step and needs nothing from the
/// environment, so a bad request is always reported as such.
pub fn read_put_config(input: &mut dyn Read) -> Result<PutConfig, OutError> {
    let request: Request = read_request(input).map_err(|error| match error {
        ReadError::Io(error) => OutError::ReadRequest(error),
        ReadError::Json(error) => OutError::ParseRequest(error),
    })?;

    Ok(validate(request.source.as_ref(), request.params.as_ref())?)
}

/// Runs the rest of the put step for a validated request.
///
/// Reads HEAD from `git_src_directory` (relative paths are resolved against
/// `build_dir`), posts the deployment marker and returns the output
/// document. Progress lines go to `progress`.
pub fn run_out(
    build_dir: &Utf8Path,
    config: PutConfig,
    git: &Git,
    reporter: &Reporter,
    progress: &mut dyn Write,
) -> Result<ResourceOutput, OutError> {
    let repo = build_dir.join(&config.git_src_directory);
    let revision = git.extract_revision(&repo)?;

    let url = config.target.url();
    tracing::debug!(%url, %repo, "resolved deployment target");

    let payload = DeploymentPayload {
        revision: revision.commit,
        description: revision.description,
        user: config.user,
    };
    let response = reporter.report(&config.api_key, &payload, &url, progress)?;

    Ok(build_output(&response))
}

/// Runs the check step.
///
/// Markers are only ever created by puts, so there is never a version to
/// discover: the result is always an empty list.
pub fn run_check(input: &mut dyn Read) -> Result<Vec<Value>, StepError> {
    // The request still has to be well-formed JSON.
    let _: Value = read_request(input).map_err(StepError::from)?;
    Ok(Vec::new())
}

/// The request passed to the get step.
#[derive(Debug, Deserialize)]
struct InRequest {
    version: Value,
}

/// What the get step prints.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InOutput {
    /// The version that was fetched, echoed back.
    pub version: Value,
    /// Always empty; the metadata was reported by the put.
    pub metadata: Vec<Value>,
}

/// Runs the get step that Concourse performs after every put.
///
/// There is nothing to download; the requested version is echoed back.
pub fn run_in(
    dest_dir: &Utf8Path,
    input: &mut dyn Read,
) -> Result<InOutput, StepError> {
    let request: InRequest = read_request(input).map_err(StepError::from)?;
    tracing::debug!(%dest_dir, version = %request.version, "nothing to fetch");
    Ok(InOutput { version: request.version, metadata: Vec::new() })
}

/// Writes `value` to `out` as a single line of JSON.
pub fn write_json<T: Serialize>(
    out: &mut dyn Write,
    value: &T,
) -> std::io::Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    out.flush()
}

enum ReadError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl From<ReadError> for StepError {
    fn from(error: ReadError) -> Self {
        match error {
            ReadError::Io(error) => StepError::ReadRequest(error),
            ReadError::Json(error) => StepError::ParseRequest(error),
        }
    }
}

fn read_request<T: for<'de> Deserialize<'de>>(
    input: &mut dyn Read,
) -> Result<T, ReadError> {
    let mut raw = String::new();
    input.read_to_string(&mut raw).map_err(ReadError::Io)?;
    serde_json::from_str(&raw).map_err(ReadError::Json)
}
