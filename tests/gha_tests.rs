#![allow(clippy::unwrap_used)] // Tests use unwrap for simplicity
#![cfg(unix)]

//! `wt gha` against a stand-in `gh` executable placed first on PATH

use anyhow::Result;
use assert_fs::prelude::*;
use predicates::prelude::*;

use test_support::{CliTestEnvironment, write_hook};

/// Runs `wt gha` with a fake `gh` whose body is `script`
fn run_gha(env: &CliTestEnvironment, script: &str) -> Result<assert_cmd::assert::Assert> {
    let bin_dir = env.outside_dir.child("bin");
    bin_dir.create_dir_all()?;
    write_hook(&bin_dir, "gh", script)?;

    let path = format!(
        "{}:{}",
        bin_dir.path().display(),
        std::env::var("PATH").unwrap_or_default()
    );

    Ok(env.run_command(&["gha"])?.env("PATH", path).assert())
}

#[test]
fn test_gha_all_checks_passed() -> Result<()> {
    let env = CliTestEnvironment::new()?;
    let json = r#"{"number":12,"state":"OPEN","statusCheckRollup":[
        {"__typename":"CheckRun","name":"build","status":"COMPLETED","conclusion":"SUCCESS"},
        {"__typename":"CheckRun","name":"lint","status":"COMPLETED","conclusion":"SKIPPED"},
        {"__typename":"StatusContext","context":"ci/deploy","state":"SUCCESS"}]}"#;

    run_gha(&env, &format!("cat <<'JSON'\n{}\nJSON", json))?
        .success()
        .stdout(predicate::str::starts_with(
            "Monitoring GitHub Actions for current branch's PR...\n",
        ))
        .stdout(predicate::str::contains(
            "\rChecks: 3/3 completed (3 passed, 0 failed, 0 pending)",
        ))
        .stdout(predicate::str::ends_with("\nAll checks passed!\n"));

    Ok(())
}

#[test]
fn test_gha_failed_checks() -> Result<()> {
    let env = CliTestEnvironment::new()?;
    let json = r#"{"number":12,"state":"OPEN","statusCheckRollup":[
        {"__typename":"CheckRun","name":"build","status":"COMPLETED","conclusion":"SUCCESS"},
        {"__typename":"CheckRun","name":"test","status":"COMPLETED","conclusion":"FAILURE"}]}"#;

    run_gha(&env, &format!("cat <<'JSON'\n{}\nJSON", json))?
        .code(1)
        .stdout(predicate::str::contains("Some checks failed!"))
        .stdout(predicate::str::contains("  [+] build: SUCCESS\n"))
        .stdout(predicate::str::contains("  [x] test: FAILURE\n"))
        .stderr("error: checks failed\n");

    Ok(())
}

#[test]
fn test_gha_without_pull_request() -> Result<()> {
    let env = CliTestEnvironment::new()?;

    run_gha(
        &env,
        "echo 'no pull requests found for branch \"main\"' >&2\nexit 1",
    )?
    .code(1)
    .stderr("error: no PR found for current branch\n");

    Ok(())
}

#[test]
fn test_gha_other_gh_failure() -> Result<()> {
    let env = CliTestEnvironment::new()?;

    run_gha(&env, "echo 'HTTP 502: bad gateway' >&2\nexit 1")?
        .code(1)
        .stderr("error: failed to get PR status: HTTP 502: bad gateway\n");

    Ok(())
}

#[test]
fn test_gha_malformed_output() -> Result<()> {
    let env = CliTestEnvironment::new()?;

    run_gha(&env, "echo 'not json'")?
        .code(1)
        .stderr(predicate::str::starts_with("error: failed to parse PR status"));

    Ok(())
}
