// Copyright 2026 Oxide Computer Company

//! The JSON request Concourse sends to the `out` script.

use camino::Utf8PathBuf;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A put request: the resource's `source` configuration plus the step's
/// `params`.
///
/// Either half may be missing or `null`; that is reported by
/// [`validate`](crate::validate), not by deserialization.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Request {
    /// The resource's `source` block.
    #[serde(default)]
    pub source: Option<SourceConfig>,
    /// The put step's `params` block.
    #[serde(default)]
    pub params: Option<PutParams>,
}

/// The resource's `source` block.
///
/// Keys other than `api_key` and `user` are kept in [`extra`](Self::extra)
/// so that diagnostics can show the mapping the pipeline author wrote.
///
/// Known keys are doubly optional: the outer `Option` records whether the
/// key was written at all, the inner one whether its value was `null`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct SourceConfig {
    /// The New Relic REST API key.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub api_key: Option<Option<String>>,
    /// Recorded as the author of each deployment.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub user: Option<Option<String>>,
    /// Unrecognized keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SourceConfig {
    /// Returns true if the mapping has no keys at all.
    ///
    /// A key written with a `null` value still counts.
    pub fn is_empty(&self) -> bool {
        self.api_key.is_none() && self.user.is_none() && self.extra.is_empty()
    }

    /// Returns the API key, if it was given a non-null value.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref()?.as_deref()
    }

    /// Returns the user, if it was given a non-null value.
    pub fn user(&self) -> Option<&str> {
        self.user.as_ref()?.as_deref()
    }
}

impl fmt::Display for SourceConfig {
    /// Renders the mapping as compact JSON, exactly as supplied.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_json(self, f)
    }
}

/// The put step's `params` block.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct PutParams {
    /// Path to the checked-out repository whose HEAD is being deployed.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub git_src_directory: Option<Option<Utf8PathBuf>>,
    /// The New Relic application to attach the marker to.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub app_id: Option<Option<AppId>>,
    /// A full deployments endpoint, used instead of the one derived from
    /// `app_id` (for example an EU-region URL).
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub api_url: Option<Option<String>>,
    /// Unrecognized keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PutParams {
    /// Returns true if the mapping has no keys at all.
    ///
    /// A key written with a `null` value still counts.
    pub fn is_empty(&self) -> bool {
        self.git_src_directory.is_none()
            && self.app_id.is_none()
            && self.api_url.is_none()
            && self.extra.is_empty()
    }

    /// Returns the repository path, if it was given a non-null value.
    pub fn git_src_directory(&self) -> Option<&Utf8PathBuf> {
        self.git_src_directory.as_ref()?.as_ref()
    }

    /// Returns the application id, if it was given a non-null value.
    pub fn app_id(&self) -> Option<&AppId> {
        self.app_id.as_ref()?.as_ref()
    }

    /// Returns the endpoint override, if it was given a non-null value.
    pub fn api_url(&self) -> Option<&str> {
        self.api_url.as_ref()?.as_deref()
    }
}

impl fmt::Display for PutParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_json(self, f)
    }
}

/// Maps a key that is present to `Some`, even when its value is `null`.
///
/// Used with `#[serde(default)]`, so a missing key stays `None`.
fn deserialize_present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn write_json<T: Serialize>(value: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let json = serde_json::to_string(value).map_err(|_| fmt::Error)?;
    f.write_str(&json)
}

/// A New Relic application id.
///
/// Pipelines write it either as a string (`app_id: "123"`) or as a bare
/// number (`app_id: 123`); both are accepted and kept in textual form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AppId(String);

impl AppId {
    /// Creates an application id from its textual form.
    pub fn new(id: impl Into<String>) -> Self {
        AppId(id.into())
    }

    /// Returns the id as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for AppId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => AppId(text),
            Raw::Number(number) => AppId(number.to_string()),
        })
    }
}
