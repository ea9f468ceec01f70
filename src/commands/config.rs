use anyhow::Result;
use log::debug;
use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};

use crate::{
    github::{GitHub, GitHubApi, SearchOptions},
    http::HttpClient,
    menu::DEFAULT_RELEASE_LIMIT,
    release::{PlatformDescriptor, detect_platform},
    runtime::Runtime,
};

const USER_AGENT: &str = "git0-cli";

/// Everything a command needs to talk to GitHub and the local system
pub struct Config<R: Runtime, G: GitHubApi> {
    pub runtime: R,
    pub github: G,
    pub http_client: HttpClient,
    pub platform: PlatformDescriptor,
    pub search_options: SearchOptions,
    /// Releases listed in the package menu
    pub release_limit: usize,
}

impl<R: Runtime> Config<R, GitHub> {
    pub fn new(runtime: R, api_url: Option<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Ok(token) = runtime.env_var("GITHUB_TOKEN") {
            let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token))?;
            auth_value.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth_value);
            debug!(
                "Using GITHUB_TOKEN for authentication: {}",
                mask_token(&token)
            );
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        let http_client = HttpClient::new(client);
        let github = GitHub::new(http_client.clone(), api_url);

        Ok(Self {
            runtime,
            github,
            http_client,
            platform: detect_platform(),
            search_options: SearchOptions::default(),
            release_limit: DEFAULT_RELEASE_LIMIT,
        })
    }
}

impl<R: Runtime, G: GitHubApi> Config<R, G> {
    pub fn with_results_per_page(mut self, per_page: u32) -> Self {
        self.search_options.per_page = per_page;
        self
    }

    pub fn with_release_limit(mut self, limit: usize) -> Self {
        self.release_limit = limit;
        self
    }
}

fn mask_token(token: &str) -> String {
    if token.len() < 12 || !token.is_ascii() {
        return "*********".to_string();
    }
    format!("{}*********{}", &token[..8], &token[token.len() - 4..])
}
