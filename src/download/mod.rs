//! Downloads of release assets and repository sources.

use crate::archive::{TarGzExtractor, available_directory};
use crate::github::{GitHubApi, RepoRef};
use crate::http::{HttpClient, is_rate_limit};
use crate::release::Asset;
use crate::runtime::Runtime;
use anyhow::{Context, Result, anyhow};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// Branches tried, in order, when the repository's branch is unknown
const FALLBACK_BRANCHES: [&str; 2] = ["master", "main"];

/// Streams a URL into `path` through the runtime.
#[tracing::instrument(skip(runtime, http_client))]
pub async fn download_file<R: Runtime>(
    runtime: &R,
    url: &str,
    path: &Path,
    http_client: &HttpClient,
) -> Result<u64> {
    info!("Downloading file from {}...", url);

    let created = AtomicBool::new(false);
    let result = http_client
        .download_file(url, || {
            let writer = runtime
                .create_file(path)
                .with_context(|| format!("Failed to create file at {:?}", path))?;
            created.store(true, Ordering::Relaxed);
            Ok(writer)
        })
        .await;

    match result {
        Ok(bytes) => {
            info!("Download complete.");
            Ok(bytes)
        }
        Err(e) => {
            // Leave no truncated file behind
            if created.load(Ordering::Relaxed)
                && let Err(remove_err) = runtime.remove_file(path)
            {
                debug!("Failed to remove partial download {:?}: {}", path, remove_err);
            }
            Err(e)
        }
    }
}

/// Download a release asset into `dir`, returning the written path.
///
/// On Unix, extension-less files and native executables are made executable.
#[tracing::instrument(skip(runtime, http_client, asset), fields(asset = %asset.name))]
pub async fn download_asset<R: Runtime>(
    runtime: &R,
    http_client: &HttpClient,
    asset: &Asset,
    dir: &Path,
) -> Result<PathBuf> {
    let path = dir.join(&asset.name);

    download_file(runtime, &asset.download_url, &path, http_client)
        .await
        .with_context(|| format!("Failed to download {}", asset.name))?;

    if should_be_executable(runtime, &path, &asset.name) {
        debug!("Setting executable permission on {:?}", path);
        if let Err(e) = runtime.set_permissions(&path, 0o755) {
            warn!("Could not make {} executable: {}", asset.name, e);
        }
    }

    Ok(path)
}

#[cfg(unix)]
fn should_be_executable<R: Runtime>(runtime: &R, path: &Path, file_name: &str) -> bool {
    !file_name.contains('.') || is_native_executable(runtime, path)
}

#[cfg(not(unix))]
fn should_be_executable<R: Runtime>(_runtime: &R, _path: &Path, _file_name: &str) -> bool {
    false
}

/// True for ELF files on Linux and Mach-O files (including fat binaries) on macOS.
#[cfg(unix)]
fn is_native_executable<R: Runtime>(runtime: &R, path: &Path) -> bool {
    use std::io::Read;

    let mut file = match runtime.open(path) {
        Ok(f) => f,
        Err(_) => return false,
    };

    let mut buffer = Vec::new();
    if file.read_to_end(&mut buffer).is_err() {
        return false;
    }

    match goblin::Object::parse(&buffer) {
        #[cfg(target_os = "linux")]
        Ok(goblin::Object::Elf(_)) => true,
        #[cfg(target_os = "macos")]
        Ok(goblin::Object::Mach(_)) => true,
        _ => false,
    }
}

/// Lines telling the user how to install a downloaded file on `os`.
///
/// Each description line is followed by the command to run. Files that need
/// no particular handling yield no lines.
pub fn installation_hint(os: &str, file_name: &str, path: &Path) -> Vec<String> {
    let path = path.display();
    let hint = |pairs: &[(&str, String)]| -> Vec<String> {
        pairs
            .iter()
            .flat_map(|(what, cmd)| [format!("{}:", what), format!("  {}", cmd)])
            .collect()
    };

    match os {
        "windows" if file_name.ends_with(".exe") => {
            hint(&[("Run the executable", path.to_string())])
        }
        "windows" if file_name.ends_with(".msi") => {
            hint(&[("Install the MSI package", format!("msiexec /i \"{}\"", path))])
        }
        "windows" => Vec::new(),
        "macos" if file_name.ends_with(".dmg") => {
            hint(&[("Mount and install the DMG", format!("open \"{}\"", path))])
        }
        "macos" if file_name.ends_with(".pkg") => hint(&[(
            "Install the package",
            format!("sudo installer -pkg \"{}\" -target /", path),
        )]),
        "macos" => Vec::new(),
        _ if file_name.ends_with(".deb") => {
            hint(&[("Install the DEB package", format!("sudo dpkg -i \"{}\"", path))])
        }
        _ if file_name.ends_with(".rpm") => {
            hint(&[("Install the RPM package", format!("sudo rpm -i \"{}\"", path))])
        }
        _ if file_name.ends_with(".AppImage") => hint(&[(
            "Run the AppImage",
            format!("chmod +x \"{0}\" && \"{0}\"", path),
        )]),
        _ if !file_name.contains('.') => hint(&[
            ("Binary is ready to use", format!("\"{}\"", path)),
            (
                "Consider moving to PATH",
                format!("sudo mv \"{}\" /usr/local/bin/", path),
            ),
        ]),
        _ => Vec::new(),
    }
}

/// Download the source tarball of `repo` and unpack it.
///
/// The sources land in `target`, or in the first free `target-N` sibling when
/// `target` already exists. Without a known branch, `master` and then `main`
/// are tried. Returns the directory the sources were unpacked into.
#[tracing::instrument(skip(runtime, http_client, github))]
pub async fn download_source<R: Runtime, G: GitHubApi>(
    runtime: &R,
    http_client: &HttpClient,
    github: &G,
    repo: &RepoRef,
    target: &Path,
) -> Result<PathBuf> {
    let dest = available_directory(runtime, target);
    let archive_path = runtime
        .temp_dir()
        .join(format!("git0-{}-{}.tar.gz", repo.owner, repo.name));

    let branches: Vec<&str> = match &repo.branch {
        Some(branch) => vec![branch.as_str()],
        None => FALLBACK_BRANCHES.to_vec(),
    };

    let mut last_error = None;
    for branch in branches {
        let url = github.tarball_url(repo, branch);
        match download_file(runtime, &url, &archive_path, http_client).await {
            Ok(_) => {
                last_error = None;
                break;
            }
            Err(e) if is_rate_limit(&e) => return Err(e),
            Err(e) => {
                debug!("No tarball for branch '{}' of {}: {}", branch, repo, e);
                last_error = Some(e);
            }
        }
    }

    if let Some(e) = last_error {
        return Err(e.context(format!("Failed to download the source of {}", repo)));
    }

    let extracted = TarGzExtractor.extract_stripped(runtime, &archive_path, &dest);

    if let Err(e) = runtime.remove_file(&archive_path) {
        debug!("Failed to remove temporary archive {:?}: {}", archive_path, e);
    }

    let files = extracted.with_context(|| format!("Failed to unpack the source of {}", repo))?;
    if files == 0 {
        return Err(anyhow!("The source archive of {} is empty", repo));
    }

    info!("Unpacked {} files of {} into {:?}", files, repo, dest);
    Ok(dest)
}
