use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::{
    download::download_source,
    github::{GitHubApi, RepoRef},
    project::{ProjectKind, detect_projects},
    runtime::Runtime,
};

use super::config::Config;

/// Download and unpack the source of `repo`, then print how to set it up.
#[tracing::instrument(skip(config))]
pub async fn fetch_source<R: Runtime, G: GitHubApi>(
    config: &Config<R, G>,
    repo: &RepoRef,
    target: &Path,
) -> Result<PathBuf> {
    println!("Downloading source of {}...", repo);

    let dir = download_source(
        &config.runtime,
        &config.http_client,
        &config.github,
        repo,
        target,
    )
    .await?;

    println!("Source of {} unpacked into {}", repo, dir.display());

    for line in setup_lines(&config.runtime, &dir) {
        println!("{}", line);
    }

    Ok(dir)
}

fn setup_lines<R: Runtime>(runtime: &R, dir: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    for kind in detect_projects(runtime, dir) {
        if kind == ProjectKind::Unknown {
            continue;
        }
        lines.push(format!("Detected a {} project. To set it up, run:", kind));
        lines.extend(
            kind.setup_commands(runtime, dir)
                .into_iter()
                .map(|cmd| format!("  {}", cmd)),
        );
    }

    if !lines.is_empty() {
        lines.insert(0, format!("cd \"{}\"", dir.display()));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;

    #[test]
    fn test_setup_lines_for_node_and_docker() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|p| {
            p.ends_with("package.json") || p.ends_with("Dockerfile")
        });

        let lines = setup_lines(&runtime, Path::new("/work/app"));

        assert_eq!(
            lines,
            vec![
                "cd \"/work/app\"",
                "Detected a Node.js project. To set it up, run:",
                "  npm install",
                "Detected a Docker project. To set it up, run:",
                "  docker build -t project .",
            ]
        );
    }

    #[test]
    fn test_setup_lines_for_unknown_project() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| false);

        assert!(setup_lines(&runtime, Path::new("/work/app")).is_empty());
    }
}
