//! Commit automation for the output directory.

use std::path::Path;

use anyhow::Context;
use tokio::process::Command;

/// Stage and commit the contents of `dir`, initializing a repository there on
/// first use.
pub async fn commit_snapshot(dir: &Path, message: &str) -> anyhow::Result<()> {
    if !dir.join(".git").exists() {
        run_git(dir, &["init"]).await?;
    }
    run_git(dir, &["add", "-A"]).await?;
    run_git(dir, &["commit", "-m", message]).await?;
    tracing::info!(dir = %dir.display(), "committed harvest snapshot");
    Ok(())
}

async fn run_git(dir: &Path, args: &[&str]) -> anyhow::Result<()> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .await
        .with_context(|| format!("failed to run git {}", args.join(" ")))?;
    if !output.status.success() {
        anyhow::bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(())
}
