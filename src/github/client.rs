use anyhow::Result;
use async_trait::async_trait;
use log::debug;

use crate::http::HttpClient;
use crate::release::Release;

use super::repo::RepoRef;
use super::types::{RepoSummary, SearchOptions, SearchResponse};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Releases fetched per page, and the page limit.
const RELEASES_PER_PAGE: usize = 100;
const MAX_RELEASE_PAGES: usize = 10;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitHubApi: Send + Sync {
    async fn search_repositories(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<RepoSummary>>;
    async fn get_releases(&self, repo: &RepoRef) -> Result<Vec<Release>>;
    fn tarball_url(&self, repo: &RepoRef, branch: &str) -> String;
}

pub struct GitHub {
    pub http_client: HttpClient,
    pub api_url: String,
}

impl GitHub {
    pub fn new(http_client: HttpClient, api_url: Option<String>) -> Self {
        let api_url = api_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self {
            http_client,
            api_url,
        }
    }
}

#[async_trait]
impl GitHubApi for GitHub {
    #[tracing::instrument(skip(self, options))]
    async fn search_repositories(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<RepoSummary>> {
        let url = format!("{}/search/repositories", self.api_url);
        let q = format!("{} in:name", query);
        let per_page = options.per_page.to_string();

        debug!("Searching repositories matching '{}'...", query);

        let response: SearchResponse = self
            .http_client
            .get_json_with_query(
                &url,
                &[
                    ("q", q.as_str()),
                    ("sort", options.sort.as_str()),
                    ("order", options.order.as_str()),
                    ("per_page", per_page.as_str()),
                ],
            )
            .await?;

        debug!("Search returned {} repositories", response.items.len());
        Ok(response.items)
    }

    #[tracing::instrument(skip(self))]
    async fn get_releases(&self, repo: &RepoRef) -> Result<Vec<Release>> {
        let url = format!("{}/repos/{}/{}/releases", self.api_url, repo.owner, repo.name);
        let per_page = RELEASES_PER_PAGE.to_string();
        let mut releases = Vec::new();

        for page in 1..=MAX_RELEASE_PAGES {
            debug!("Fetching releases page {} from {}...", page, url);

            let page_str = page.to_string();
            let parsed: Vec<Release> = self
                .http_client
                .get_json_with_query(
                    &url,
                    &[("per_page", per_page.as_str()), ("page", page_str.as_str())],
                )
                .await?;

            let len = parsed.len();
            releases.extend(parsed);

            if len < RELEASES_PER_PAGE {
                break;
            }
        }

        Ok(releases)
    }

    fn tarball_url(&self, repo: &RepoRef, branch: &str) -> String {
        format!(
            "{}/repos/{}/{}/tarball/{}",
            self.api_url, repo.owner, repo.name, branch
        )
    }
}
