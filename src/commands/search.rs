use anyhow::{Result, bail};
use std::path::Path;

use crate::{
    github::{GitHubApi, RepoMatch, search_with_releases},
    runtime::{Choice, Runtime},
};

use super::config::Config;
use super::package::download_package;
use super::source::fetch_source;

/// What to download from a repository that publishes releases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadChoice {
    Package,
    Source,
    Both,
}

impl DownloadChoice {
    const ALL: [DownloadChoice; 3] = [
        DownloadChoice::Package,
        DownloadChoice::Source,
        DownloadChoice::Both,
    ];

    fn label(&self) -> &'static str {
        match self {
            DownloadChoice::Package => "Download package/binary",
            DownloadChoice::Source => "Download source code",
            DownloadChoice::Both => "Download both package and source",
        }
    }

    fn wants_package(&self) -> bool {
        matches!(self, DownloadChoice::Package | DownloadChoice::Both)
    }

    fn wants_source(&self) -> bool {
        matches!(self, DownloadChoice::Source | DownloadChoice::Both)
    }
}

/// Search repositories by name, let the user pick one and download from it
/// into `cwd`.
#[tracing::instrument(skip(config))]
pub async fn search_and_download<R: Runtime, G: GitHubApi>(
    config: &Config<R, G>,
    query: &str,
    cwd: &Path,
) -> Result<()> {
    println!("Searching GitHub for '{}'...", query);

    let matches = search_with_releases(
        &config.github,
        query,
        &config.search_options,
        &config.platform,
    )
    .await?;

    if matches.is_empty() {
        bail!("No repositories found for '{}'", query);
    }

    let choices: Vec<Choice> = matches.iter().map(|m| Choice::option(repo_label(m))).collect();
    let picked = config
        .runtime
        .select("Select a repository to download:", &choices)?;
    let Some(selected) = matches.get(picked) else {
        bail!("Selection {} is out of range", picked);
    };

    let choice = if selected.has_releases {
        let choices: Vec<Choice> = DownloadChoice::ALL
            .iter()
            .map(|c| Choice::option(c.label()))
            .collect();
        let picked = config.runtime.select(
            "This repository has downloadable packages. What would you like to do?",
            &choices,
        )?;
        DownloadChoice::ALL
            .get(picked)
            .copied()
            .unwrap_or(DownloadChoice::Source)
    } else {
        DownloadChoice::Source
    };

    if choice.wants_package() {
        download_package(config, &selected.all_releases, cwd).await?;
    }

    if choice.wants_source() {
        let repo = selected.repo.repo_ref();
        fetch_source(config, &repo, &cwd.join(&repo.name)).await?;
    }

    Ok(())
}

/// One line per search hit: name, description, stars, language and packages.
fn repo_label(m: &RepoMatch) -> String {
    let repo = &m.repo;
    let mut label = format!(
        "{} - {} (★ {} | {})",
        repo.full_name,
        repo.description.as_deref().unwrap_or("No description"),
        repo.stargazers_count,
        repo.language.as_deref().unwrap_or("Unknown"),
    );

    let badge = m.package_badge();
    if !badge.is_empty() {
        label.push_str(" - ");
        label.push_str(badge);
    }
    label
}
