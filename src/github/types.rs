use serde::{Deserialize, Serialize};

use super::RepoRef;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Owner {
    pub login: String,
}

/// A repository as listed by the search endpoint
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RepoSummary {
    pub name: String,
    pub full_name: String,
    pub owner: Owner,
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub stargazers_count: u64,
    pub language: Option<String>,
    pub default_branch: Option<String>,
}

impl RepoSummary {
    pub fn repo_ref(&self) -> RepoRef {
        RepoRef {
            owner: self.owner.login.clone(),
            name: self.name.clone(),
            branch: self.default_branch.clone(),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<RepoSummary>,
}

/// Query options for repository search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    pub per_page: u32,
    pub sort: String,
    pub order: String,
}

impl SearchOptions {
    pub const DEFAULT_RESULTS_PER_PAGE: u32 = 10;
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            per_page: Self::DEFAULT_RESULTS_PER_PAGE,
            sort: "stars".to_string(),
            order: "desc".to_string(),
        }
    }
}
