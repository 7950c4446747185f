// Copyright 2026 Oxide Computer Company

//! Where a deployment marker is sent, and what is sent there.

use crate::{AppId, CommitHash};
use serde::Serialize;

/// Base URL of the New Relic REST API (v2).
pub const NEW_RELIC_API_BASE: &str = "https://api.newrelic.com/v2";

/// The endpoint a deployment marker is posted to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeploymentTarget {
    /// An explicit endpoint, used verbatim.
    ApiUrl(String),
    /// The deployments endpoint of a New Relic application.
    AppId(AppId),
}

impl DeploymentTarget {
    /// Picks the target from the two optional params.
    ///
    /// `api_url` takes precedence when both are present. Returns `None` if
    /// neither is.
    pub fn from_params(
        app_id: Option<&AppId>,
        api_url: Option<&str>,
    ) -> Option<Self> {
        match (api_url, app_id) {
            (Some(url), _) => Some(DeploymentTarget::ApiUrl(url.to_owned())),
            (None, Some(id)) => Some(DeploymentTarget::AppId(id.clone())),
            (None, None) => None,
        }
    }

    /// Returns the URL to POST to.
    ///
    /// ```
    /// use deploy_marker::{AppId, DeploymentTarget};
    ///
    /// let target = DeploymentTarget::AppId(AppId::new("123"));
    /// assert_eq!(
    ///     target.url(),
    ///     "https://api.newrelic.com/v2/applications/123/deployments.json",
    /// );
    /// ```
    pub fn url(&self) -> String {
        match self {
            DeploymentTarget::ApiUrl(url) => url.clone(),
            DeploymentTarget::AppId(id) => {
                format!("{NEW_RELIC_API_BASE}/applications/{id}/deployments.json")
            }
        }
    }
}

/// A deployment marker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeploymentPayload {
    /// The deployed commit.
    pub revision: CommitHash,
    /// The commit message of the deployed commit.
    pub description: String,
    /// Who deployed it.
    pub user: String,
}

impl DeploymentPayload {
    /// Returns the request body expected by the deployments endpoint:
    /// the payload wrapped in a `deployment` object.
    pub fn to_body(&self) -> DeploymentBody<'_> {
        DeploymentBody { deployment: self }
    }
}

/// The JSON body of a deployments POST.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct DeploymentBody<'a> {
    /// The wrapped payload.
    pub deployment: &'a DeploymentPayload,
}
