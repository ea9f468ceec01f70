use anyhow::{Result, bail};
use log::debug;
use std::path::PathBuf;

use crate::{
    github::{GitHubApi, RepoRef},
    runtime::Runtime,
};

pub mod config;
mod package;
mod search;
mod source;

use config::Config;

pub use package::download_package;
pub use search::{DownloadChoice, search_and_download};
pub use source::fetch_source;

/// Command-line settings that shape a run
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub api_url: Option<String>,
    pub results_per_page: u32,
    pub release_limit: usize,
}

/// Entry point of the CLI: resolve `words` and download what the user picks.
#[tracing::instrument(skip(runtime, options))]
pub async fn run<R: Runtime>(runtime: R, words: &[String], options: RunOptions) -> Result<()> {
    let config = Config::new(runtime, options.api_url)?
        .with_results_per_page(options.results_per_page)
        .with_release_limit(options.release_limit);
    execute(&config, words).await
}

/// Download the repository named by the first word, or search for `words`.
///
/// A repository reference may be followed by the name of the directory to
/// unpack the source into; it defaults to the repository name.
#[tracing::instrument(skip(config))]
pub async fn execute<R: Runtime, G: GitHubApi>(
    config: &Config<R, G>,
    words: &[String],
) -> Result<()> {
    if words.is_empty() {
        bail!("Nothing to search for");
    }

    let cwd = config.runtime.current_dir()?;

    if let Some(repo) = RepoRef::parse(&words[0]) {
        debug!("'{}' names the repository {}", words[0], repo);
        let target: PathBuf = match words.get(1) {
            Some(dir) => cwd.join(dir),
            None => cwd.join(&repo.name),
        };
        fetch_source(config, &repo, &target).await?;
        return Ok(());
    }

    search_and_download(config, &words.join(" "), &cwd).await
}
