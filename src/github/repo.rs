use anyhow::{Result, anyhow};
use std::str::FromStr;

/// A GitHub repository, optionally pinned to a branch
#[derive(Debug, PartialEq, Clone)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
    pub branch: Option<String>,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            branch: None,
        }
    }

    /// Parse a repository URL or `owner/repo` shorthand.
    ///
    /// Accepted forms:
    /// - `https://github.com/owner/repo`, optionally with `.git` or `/tree/<branch>`
    /// - `git@github.com:owner/repo.git`
    /// - `git://github.com/owner/repo.git`
    /// - any `https://host/.../owner/repo` URL
    /// - `owner/repo`
    ///
    /// Returns `None` for anything else, such as free-text search words.
    pub fn parse(query: &str) -> Option<Self> {
        let query = query.trim();

        if let Some(rest) = query.strip_prefix("git@") {
            let (_, path) = rest.split_once(':')?;
            return Self::from_path_segments(&segments(path), false);
        }

        if let Some((_, rest)) = query.split_once("://") {
            let (host, path) = rest.split_once('/')?;
            return Self::from_path_segments(&segments(path), is_github_host(host));
        }

        if query.contains("github.com") {
            let (host, path) = query.split_once('/')?;
            return Self::from_path_segments(&segments(path), is_github_host(host));
        }

        let (owner, name) = query.split_once('/')?;
        if is_valid_owner(owner) && is_valid_name(name) {
            Some(Self::new(owner, name))
        } else {
            None
        }
    }

    fn from_path_segments(segments: &[&str], github: bool) -> Option<Self> {
        let (owner, name, rest) = if github {
            match segments {
                [owner, name, rest @ ..] => (*owner, *name, rest),
                _ => return None,
            }
        } else {
            // Hosts with nested groups: the repository is the last segment
            // and its owner the one before.
            match segments {
                [.., owner, name] => (*owner, *name, &[][..]),
                _ => return None,
            }
        };

        let name = name.strip_suffix(".git").unwrap_or(name);
        if !is_valid_owner(owner) || !is_valid_name(name) {
            return None;
        }

        let branch = match rest {
            ["tree", branch @ ..] if !branch.is_empty() => Some(branch.join("/")),
            _ => None,
        };

        Some(Self {
            owner: owner.to_string(),
            name: name.to_string(),
            branch,
        })
    }
}

fn segments(path: &str) -> Vec<&str> {
    path.split(['/', '?', '#'])
        .take_while(|s| !s.contains('='))
        .filter(|s| !s.is_empty())
        .collect()
}

fn is_github_host(host: &str) -> bool {
    let host = host.rsplit('@').next().unwrap_or(host);
    host == "github.com" || host == "www.github.com"
}

fn is_valid_owner(owner: &str) -> bool {
    !owner.is_empty()
        && owner
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoRef {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RepoRef::parse(s).ok_or_else(|| {
            anyhow!(
                "Invalid repository '{}'. Expected a GitHub URL or 'owner/repo'.",
                s
            )
        })
    }
}
