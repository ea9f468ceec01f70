use anyhow::{Result, bail};
use std::path::{Path, PathBuf};

use crate::{
    download::{download_asset, installation_hint},
    github::GitHubApi,
    menu::{MenuEntry, build_package_menu},
    release::ClassifiedRelease,
    runtime::{Choice, Runtime},
};

use super::config::Config;

/// Let the user pick a release asset and download it into `dir`.
///
/// Returns `None` when the releases offer nothing to download.
#[tracing::instrument(skip(config, releases))]
pub async fn download_package<R: Runtime, G: GitHubApi>(
    config: &Config<R, G>,
    releases: &[ClassifiedRelease],
    dir: &Path,
) -> Result<Option<PathBuf>> {
    let entries = build_package_menu(releases, &config.platform.os, config.release_limit);

    if !entries.iter().any(MenuEntry::is_selectable) {
        println!("No packages found for download.");
        return Ok(None);
    }

    let choices: Vec<Choice> = entries.iter().map(MenuEntry::to_choice).collect();
    let picked = config
        .runtime
        .select("Select a package to download:", &choices)?;

    let Some(MenuEntry::Asset { tag, asset }) = entries.get(picked) else {
        bail!("Selection {} is not a package", picked);
    };

    println!("Downloading {} ({})...", asset.name(), tag);
    let path = download_asset(&config.runtime, &config.http_client, &asset.asset, dir).await?;
    println!("Downloaded {}", path.display());

    for line in installation_hint(&config.platform.os, asset.name(), &path) {
        println!("  {}", line);
    }

    Ok(Some(path))
}
