// Copyright 2026 Oxide Computer Company

//! End-to-end tests running the `deploy-marker` binary.

use crate::helpers::{MockApi, PROXY_VARS, setup_git_repo};
use anyhow::Result;
use camino::Utf8Path;
use serde_json::{Value, json};
use std::{
    ffi::OsStr,
    io::Write,
    process::{Command, Output, Stdio},
};

/// Runs `deploy-marker <args>` in `cwd` with `stdin` as its input.
fn run(cwd: &Utf8Path, args: &[&str], stdin: &str) -> Result<Output> {
    run_with_env(cwd, args, stdin, &[])
}

/// Like [`run`], with extra environment variables set.
fn run_with_env(
    cwd: &Utf8Path,
    args: &[&str],
    stdin: &str,
    envs: &[(&str, &OsStr)],
) -> Result<Output> {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_deploy-marker"));
    cmd.args(args)
        .current_dir(cwd)
        .env_remove("DEPLOY_MARKER_LOG")
        .envs(envs.iter().copied())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for var in PROXY_VARS {
        cmd.env_remove(var);
    }

    let mut child = cmd.spawn()?;
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())?;
    Ok(child.wait_with_output()?)
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_out_reports_head() -> Result<()> {
    let (temp, hash) = setup_git_repo("fix bug")?;
    let api = MockApi::respond_once(201, r#"{"deployment": {"id": 99}}"#)?;
    let request = json!({
        "source": {"api_key": "k", "user": "u"},
        "params": {
            "git_src_directory": temp.path().join("repo").as_str(),
            "app_id": "123",
            "api_url": api.url(),
        },
    });

    let output = run(temp.path(), &["out", temp.path().as_str()], &request.to_string())?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8(output.stdout.clone())?;
    assert_eq!(stdout.lines().count(), 1, "a single line: {stdout:?}");
    assert_eq!(
        serde_json::from_str::<Value>(&stdout)?,
        json!({"version": {"ref": "99"}, "metadata": [{"deployment": {"id": 99}}]})
    );

    let stderr = stderr(&output);
    assert!(
        stderr.contains(&format!("adding deployment marker to {}", api.url())),
        "stderr: {stderr}"
    );
    assert!(
        stderr.contains("Deployment marker added successfully: 201"),
        "stderr: {stderr}"
    );

    let recorded = api.finish()?;
    assert_eq!(recorded.header("x-api-key"), Some("k"));
    assert_eq!(
        recorded.json()?,
        json!({"deployment": {"revision": hash, "description": "fix bug", "user": "u"}})
    );
    Ok(())
}

#[test]
fn test_out_resolves_relative_directory_against_build_dir() -> Result<()> {
    let (temp, hash) = setup_git_repo("relative")?;
    let api = MockApi::respond_once(201, r#"{"deployment": {"id": "abc"}}"#)?;
    let request = json!({
        "source": {"api_key": "k", "user": "u"},
        "params": {"git_src_directory": "repo", "api_url": api.url()},
    });

    // Run from somewhere other than the build directory.
    let elsewhere = temp.path().join("repo");
    let output = run(&elsewhere, &["out", temp.path().as_str()], &request.to_string())?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let stdout: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(stdout["version"], json!({"ref": "abc"}));

    let recorded = api.finish()?;
    assert_eq!(recorded.json()?["deployment"]["revision"], json!(hash));
    Ok(())
}

#[test]
fn test_out_empty_response() -> Result<()> {
    let (temp, _) = setup_git_repo("empty")?;
    let api = MockApi::respond_once(200, "{}")?;
    let request = json!({
        "source": {"api_key": "k", "user": "u"},
        "params": {"git_src_directory": "repo", "api_url": api.url()},
    });

    let output = run(temp.path(), &["out", temp.path().as_str()], &request.to_string())?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        serde_json::from_slice::<Value>(&output.stdout)?,
        json!({"version": {"ref": "None"}, "metadata": []})
    );
    api.finish()?;
    Ok(())
}

#[test]
fn test_out_validation_failure() -> Result<()> {
    let temp = camino_tempfile::Utf8TempDir::with_prefix("deploy-marker-")?;
    let request = json!({
        "source": null,
        "params": {"git_src_directory": "repo", "app_id": "123"},
    });

    let output = run(temp.path(), &["out", temp.path().as_str()], &request.to_string())?;
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty(), "nothing on stdout");

    let stderr = stderr(&output);
    assert!(
        stderr.contains("Configuration for assets cannot be empty"),
        "stderr: {stderr}"
    );
    assert!(!stderr.contains("unexpected error"), "stderr: {stderr}");
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_out_validation_failure_with_unusable_git_env() -> Result<()> {
    use std::os::unix::ffi::OsStrExt;

    let temp = camino_tempfile::Utf8TempDir::with_prefix("deploy-marker-")?;
    let request = json!({"source": {"api_key": null}});

    // $GIT is never looked at for a request that does not validate.
    let output = run_with_env(
        temp.path(),
        &["out", temp.path().as_str()],
        &request.to_string(),
        &[("GIT", OsStr::from_bytes(b"/usr/bin/\xff-git"))],
    )?;
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty(), "nothing on stdout");

    let stderr = stderr(&output);
    assert!(
        stderr.contains("Missing mandatory source parameters:\n {\"api_key\":null}"),
        "stderr: {stderr}"
    );
    assert!(!stderr.contains("unexpected error"), "stderr: {stderr}");
    Ok(())
}

#[test]
fn test_out_missing_either_param() -> Result<()> {
    let temp = camino_tempfile::Utf8TempDir::with_prefix("deploy-marker-")?;
    let request = json!({
        "source": {"api_key": "k", "user": "u"},
        "params": {"git_src_directory": "repo"},
    });

    let output = run(temp.path(), &["out", temp.path().as_str()], &request.to_string())?;
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(
        stderr(&output).contains("Please provide one of the parameters in put step"),
        "stderr: {}",
        stderr(&output)
    );
    Ok(())
}

#[test]
fn test_out_server_error() -> Result<()> {
    let (temp, _) = setup_git_repo("fix bug")?;
    let api = MockApi::respond_once(500, r#"{"error": "down"}"#)?;
    let request = json!({
        "source": {"api_key": "k", "user": "u"},
        "params": {"git_src_directory": "repo", "api_url": api.url()},
    });

    let output = run(temp.path(), &["out", temp.path().as_str()], &request.to_string())?;
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty(), "nothing on stdout");

    let stderr = stderr(&output);
    assert!(stderr.contains("unexpected error occurred, "), "stderr: {stderr}");
    assert!(stderr.contains("500"), "stderr: {stderr}");
    assert!(!stderr.contains("added successfully"), "stderr: {stderr}");
    api.finish()?;
    Ok(())
}

#[test]
fn test_out_git_failure() -> Result<()> {
    let temp = camino_tempfile::Utf8TempDir::with_prefix("deploy-marker-")?;
    let request = json!({
        "source": {"api_key": "k", "user": "u"},
        "params": {"git_src_directory": "does-not-exist", "app_id": "123"},
    });

    let output = run(temp.path(), &["out", temp.path().as_str()], &request.to_string())?;
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());

    let stderr = stderr(&output);
    assert!(stderr.contains("unexpected error occurred, "), "stderr: {stderr}");
    assert!(stderr.contains("does-not-exist"), "stderr: {stderr}");
    assert!(
        !stderr.contains("adding deployment marker"),
        "nothing is posted: {stderr}"
    );
    Ok(())
}

#[test]
fn test_out_malformed_request() -> Result<()> {
    let temp = camino_tempfile::Utf8TempDir::with_prefix("deploy-marker-")?;

    let output = run(temp.path(), &["out", temp.path().as_str()], "{\"source\": ")?;
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(
        stderr(&output).contains("unexpected error occurred, failed to parse request"),
        "stderr: {}",
        stderr(&output)
    );
    Ok(())
}

#[test]
fn test_out_requires_build_dir() -> Result<()> {
    let temp = camino_tempfile::Utf8TempDir::with_prefix("deploy-marker-")?;

    let output = run(temp.path(), &["out"], "{}")?;
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    Ok(())
}

#[test]
fn test_check_and_in() -> Result<()> {
    let temp = camino_tempfile::Utf8TempDir::with_prefix("deploy-marker-")?;

    let output = run(
        temp.path(),
        &["check"],
        r#"{"source": {"api_key": "k", "user": "u"}}"#,
    )?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(serde_json::from_slice::<Value>(&output.stdout)?, json!([]));

    let output = run(
        temp.path(),
        &["in", temp.path().as_str()],
        r#"{"source": {"api_key": "k", "user": "u"}, "version": {"ref": "99"}}"#,
    )?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        serde_json::from_slice::<Value>(&output.stdout)?,
        json!({"version": {"ref": "99"}, "metadata": []})
    );
    Ok(())
}
