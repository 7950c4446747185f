// Copyright 2026 Oxide Computer Company

//! Validation of put requests.

use crate::{DeploymentTarget, PutParams, SourceConfig, ValidationError};
use camino::Utf8PathBuf;

/// A put request that passed [`validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PutConfig {
    /// The New Relic REST API key.
    pub api_key: String,
    /// Recorded as the author of the deployment.
    pub user: String,
    /// The repository whose HEAD is reported.
    pub git_src_directory: Utf8PathBuf,
    /// Where the marker is posted.
    pub target: DeploymentTarget,
}

/// Checks a put request before anything is run.
///
/// The rules are applied in order and the first one that fails is
/// returned:
///
/// 1. `source` must be present and non-empty.
/// 2. `source` must contain `api_key` and `user`.
/// 3. `params` must be present and non-empty.
/// 4. `params` must contain `git_src_directory`.
/// 5. `params` must contain at least one of `app_id` and `api_url`.
///
/// A key written as `null` makes its mapping non-empty, but does not count
/// as containing that key. Keys not named above are ignored. This function
/// has no side effects.
///
/// # Examples
///
/// ```
/// use deploy_marker::{PutParams, SourceConfig, ValidationError, validate};
///
/// let source = SourceConfig {
///     api_key: Some(Some("key".into())),
///     user: Some(Some("ci".into())),
///     ..Default::default()
/// };
/// let params = PutParams {
///     git_src_directory: Some(Some("/repo".into())),
///     ..Default::default()
/// };
///
/// let err = validate(Some(&source), Some(&params)).unwrap_err();
/// assert_eq!(err, ValidationError::MissingEitherParam);
/// ```
pub fn validate(
    source: Option<&SourceConfig>,
    params: Option<&PutParams>,
) -> Result<PutConfig, ValidationError> {
    let source = match source {
        Some(source) if !source.is_empty() => source,
        _ => return Err(ValidationError::EmptySource),
    };

    let (Some(api_key), Some(user)) = (source.api_key(), source.user()) else {
        return Err(ValidationError::MissingSourceParams {
            supplied: source.clone(),
        });
    };

    let params = match params {
        Some(params) if !params.is_empty() => params,
        _ => return Err(ValidationError::EmptyParams),
    };

    let Some(git_src_directory) = params.git_src_directory() else {
        return Err(ValidationError::MissingParams { supplied: params.clone() });
    };

    let target = DeploymentTarget::from_params(params.app_id(), params.api_url())
        .ok_or(ValidationError::MissingEitherParam)?;

    Ok(PutConfig {
        api_key: api_key.to_owned(),
        user: user.to_owned(),
        git_src_directory: git_src_directory.clone(),
        target,
    })
}
