use anyhow::Result;
use clap::Parser;
use git0::commands::{RunOptions, run};
use git0::github::SearchOptions;
use git0::menu::DEFAULT_RELEASE_LIMIT;

/// git0 - grab a GitHub repository or one of its release packages
///
/// Pass a repository URL or owner/repo to download and unpack its source,
/// optionally followed by the directory to unpack into. Anything else is
/// searched for by repository name.
///
/// If the GITHUB_TOKEN environment variable is set, it will be used for
/// authentication. This avoids the low rate limit of anonymous requests.
///
/// Examples:
///   git0 sharkdp/fd              # Download the source of sharkdp/fd into ./fd
///   git0 sharkdp/fd fd-src       # ... into ./fd-src
///   git0 terminal file manager   # Search and pick a repository
#[derive(Parser, Debug)]
#[command(author, version = env!("GIT0_VERSION"), about)]
struct Cli {
    /// Repository URL, owner/repo, or search words
    #[arg(value_name = "QUERY", required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// GitHub API URL (defaults to https://api.github.com)
    #[arg(long = "api-url", env = "GIT0_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// Number of repositories listed for a search
    #[arg(long = "per-page", value_name = "N", default_value_t = SearchOptions::DEFAULT_RESULTS_PER_PAGE)]
    pub per_page: u32,

    /// Number of releases listed in the package menu
    #[arg(long = "releases", value_name = "N", default_value_t = DEFAULT_RELEASE_LIMIT)]
    pub releases: usize,
}

impl Cli {
    fn run_options(&self) -> RunOptions {
        RunOptions {
            api_url: self.api_url.clone(),
            results_per_page: self.per_page,
            release_limit: self.releases,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = git0::runtime::RealRuntime;

    run(runtime, &cli.query, cli.run_options()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_repo_parsing() {
        let cli = Cli::try_parse_from(["git0", "owner/repo"]).unwrap();
        assert_eq!(cli.query, vec!["owner/repo"]);
        assert_eq!(cli.per_page, 10);
        assert_eq!(cli.releases, 2);
    }

    #[test]
    fn test_cli_search_words_parsing() {
        let cli = Cli::try_parse_from(["git0", "terminal", "file", "manager"]).unwrap();
        assert_eq!(cli.query, vec!["terminal", "file", "manager"]);
    }

    #[test]
    fn test_cli_options_parsing() {
        let cli = Cli::try_parse_from([
            "git0",
            "--api-url",
            "http://localhost:8080",
            "--per-page",
            "5",
            "--releases",
            "3",
            "fd",
        ])
        .unwrap();

        assert_eq!(
            cli.run_options(),
            RunOptions {
                api_url: Some("http://localhost:8080".into()),
                results_per_page: 5,
                release_limit: 3,
            }
        );
    }

    #[test]
    fn test_cli_no_query_fails() {
        let result = Cli::try_parse_from(["git0"]);
        assert!(result.is_err());
    }
}
