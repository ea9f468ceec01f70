//! Repository lookup on GitHub
//!
//! Resolves user input into repositories, searches by name, and fetches the
//! releases that the classifier works on.

mod client;
mod repo;
mod types;

pub use client::{DEFAULT_API_URL, GitHub, GitHubApi};
#[cfg(test)]
pub use client::MockGitHubApi;
pub use repo::RepoRef;
pub use types::{Owner, RepoSummary, SearchOptions, SearchResponse};

use anyhow::Result;
use futures_util::future::try_join_all;
use log::{debug, warn};

use crate::http::is_rate_limit;
use crate::release::{
    ClassifiedRelease, PlatformDescriptor, classify_releases, filter_by_platform,
};

/// A search hit together with its classified releases
#[derive(Debug, Clone)]
pub struct RepoMatch {
    pub repo: RepoSummary,
    pub has_releases: bool,
    /// Releases usable on the host platform
    pub compatible_releases: Vec<ClassifiedRelease>,
    pub all_releases: Vec<ClassifiedRelease>,
}

impl RepoMatch {
    pub fn has_compatible_releases(&self) -> bool {
        !self.compatible_releases.is_empty()
    }

    /// Short note on downloadable packages, empty when there are none
    pub fn package_badge(&self) -> &'static str {
        if self.has_compatible_releases() {
            "Packages available"
        } else if self.has_releases {
            "Packages (other platforms)"
        } else {
            ""
        }
    }
}

/// Search repositories and attach classified releases to every hit.
///
/// Releases of all hits are fetched concurrently. A hit whose releases cannot
/// be fetched is kept without releases, except when the API rate limit is hit,
/// which aborts the search.
#[tracing::instrument(skip(github, options, platform))]
pub async fn search_with_releases<G: GitHubApi>(
    github: &G,
    query: &str,
    options: &SearchOptions,
    platform: &PlatformDescriptor,
) -> Result<Vec<RepoMatch>> {
    let repos = github.search_repositories(query, options).await?;

    try_join_all(repos.into_iter().map(|repo| async move {
        let releases = match github.get_releases(&repo.repo_ref()).await {
            Ok(releases) => releases,
            Err(e) if is_rate_limit(&e) => return Err(e),
            Err(e) => {
                warn!("Could not fetch releases of {}: {}", repo.full_name, e);
                Vec::new()
            }
        };

        let all_releases = classify_releases(&releases);
        let compatible_releases = filter_by_platform(&all_releases, platform);
        debug!(
            "{}: {} releases, {} compatible with {}",
            repo.full_name,
            releases.len(),
            compatible_releases.len(),
            platform
        );

        Ok(RepoMatch {
            repo,
            has_releases: !releases.is_empty(),
            compatible_releases,
            all_releases,
        })
    }))
    .await
}
