// Copyright 2026 Oxide Computer Company

//! Reading the deployed revision out of a git checkout.

use crate::{ExtractError, GitEnvError};
use camino::Utf8Path;
use deploy_marker::CommitHash;
use fs_err as fs;
use std::{io, process::Command};

/// Reads a binary path from an environment variable, falling back to
/// `default` if the variable is unset or empty.
///
/// The value is trimmed of leading and trailing whitespace.
fn read_binary_env(
    var: &'static str,
    default: &str,
) -> Result<String, GitEnvError> {
    match std::env::var(var) {
        Ok(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Ok(_) | Err(std::env::VarError::NotPresent) => Ok(default.to_string()),
        Err(std::env::VarError::NotUnicode(value)) => {
            Err(GitEnvError::NonUtf8 { var, value })
        }
    }
}

/// The revision a deployment marker reports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Revision {
    /// The commit at HEAD.
    pub commit: CommitHash,
    /// The full message of that commit, trimmed.
    pub description: String,
}

/// A git executable.
///
/// Every command runs with its working directory set on the child process;
/// the current directory of this process is never changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Git {
    binary: String,
}

impl Git {
    /// Uses the `$GIT` environment variable, or `"git"` if it is unset or
    /// empty.
    ///
    /// Returns an error if `$GIT` is set but is not valid UTF-8.
    pub fn from_env() -> Result<Self, GitEnvError> {
        Ok(Git { binary: read_binary_env("GIT", "git")? })
    }

    /// Uses the given git executable.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Git { binary: binary.into() }
    }

    /// Returns the path to the git binary.
    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Reads HEAD's commit hash and commit message from the repository at
    /// `dir`.
    ///
    /// Runs `git rev-parse HEAD` and `git log -1 --pretty=%B`. Fails if
    /// `dir` is not an existing directory, if either command fails (for
    /// example because `dir` is not a repository or has no commits), or if
    /// the hash is malformed.
    pub fn extract_revision(
        &self,
        dir: &Utf8Path,
    ) -> Result<Revision, ExtractError> {
        // Check up front: spawning with a missing current_dir reports the
        // same ENOENT as a missing git binary.
        match fs::metadata(dir) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(ExtractError::NotADirectory { dir: dir.to_owned() });
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(ExtractError::PathNotFound { dir: dir.to_owned() });
            }
            Err(err) => {
                return Err(ExtractError::Io { dir: dir.to_owned(), source: err });
            }
        }

        let stdout = self.run(dir, &["rev-parse", "HEAD"])?;
        let commit = stdout.parse::<CommitHash>().map_err(|error| {
            ExtractError::InvalidCommitHash {
                dir: dir.to_owned(),
                stdout: stdout.clone(),
                error,
            }
        })?;

        let description = self.run(dir, &["log", "-1", "--pretty=%B"])?;

        tracing::debug!(%dir, %commit, "read revision");
        Ok(Revision { commit, description })
    }

    /// Runs git in `dir` and returns its trimmed stdout.
    fn run(&self, dir: &Utf8Path, args: &[&str]) -> Result<String, ExtractError> {
        tracing::debug!(binary = %self.binary, %dir, ?args, "running git");

        let output = Command::new(&self.binary)
            .current_dir(dir)
            .args(args)
            .output()
            .map_err(|source| ExtractError::SpawnFailed {
                binary_path: self.binary.clone(),
                dir: dir.to_owned(),
                source,
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(ExtractError::GitFailed {
                args: args.join(" "),
                dir: dir.to_owned(),
                exit_status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            })
        }
    }
}
