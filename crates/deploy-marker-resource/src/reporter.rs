// Copyright 2026 Oxide Computer Company

//! Posting deployment markers.

use crate::ReportError;
use deploy_marker::DeploymentPayload;
use serde_json::Value;
use std::{fmt, io::Write, time::Duration};

/// Header carrying the New Relic REST API key.
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Posts deployment markers over HTTP.
#[derive(Debug, Clone)]
pub struct Reporter {
    client: reqwest::blocking::Client,
}

impl Reporter {
    /// Creates a reporter whose requests give up after `timeout`.
    ///
    /// With `None`, a request waits for as long as the server takes.
    pub fn new(timeout: Option<Duration>) -> Result<Self, ReportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(ReportError::Client)?;
        Ok(Reporter { client })
    }

    /// Creates a reporter that sends requests through `client`.
    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Reporter { client }
    }

    /// Posts `payload` to `url` and returns the decoded response body.
    ///
    /// Progress lines are written to `progress` before and after the
    /// request. Any non-2xx status is an error. An empty body decodes to
    /// [`Value::Null`].
    pub fn report(
        &self,
        api_key: &str,
        payload: &DeploymentPayload,
        url: &str,
        progress: &mut dyn Write,
    ) -> Result<Value, ReportError> {
        write_progress(
            progress,
            format_args!("✅ adding deployment marker to {url}"),
        );

        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, api_key)
            .json(&payload.to_body())
            .send()
            .map_err(|error| ReportError::Send { url: url.to_owned(), error })?;

        let status = response.status();
        tracing::debug!(%url, %status, "deployments endpoint responded");

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ReportError::Status {
                url: url.to_owned(),
                status,
                body: body.trim().to_owned(),
            });
        }

        let body = response.text().map_err(|error| ReportError::ReadBody {
            url: url.to_owned(),
            error,
        })?;

        write_progress(
            progress,
            format_args!(
                "✅ Deployment marker added successfully: {}",
                status.as_u16()
            ),
        );

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|error| ReportError::InvalidBody {
            url: url.to_owned(),
            error,
        })
    }
}

/// Writes one progress line. Progress output never fails the step.
fn write_progress(progress: &mut dyn Write, line: fmt::Arguments<'_>) {
    if let Err(error) = writeln!(progress, "{line}") {
        tracing::warn!(%error, "failed to write progress line: {line}");
    }
}
