use crate::runtime::Runtime;
use anyhow::{Context, Result, bail};
use flate2::read::GzDecoder;
use log::debug;
use std::path::{Component, Path, PathBuf};
use tar::{Archive, EntryType};

/// Extractor for .tar.gz / .tgz archives
pub struct TarGzExtractor;

impl TarGzExtractor {
    /// Extract `archive_path` into `extract_to`, dropping the first path
    /// component of every entry.
    ///
    /// Returns the number of files written.
    #[tracing::instrument(skip(self, runtime))]
    pub fn extract_stripped<R: Runtime>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<usize> {
        debug!("Extracting {:?} to {:?}...", archive_path, extract_to);

        let file = runtime
            .open(archive_path)
            .with_context(|| format!("Failed to open archive at {:?}", archive_path))?;
        let mut archive = Archive::new(GzDecoder::new(file));

        runtime.create_dir_all(extract_to)?;

        let mut files = 0;
        for entry in archive
            .entries()
            .with_context(|| format!("Failed to read archive {:?}", archive_path))?
        {
            let mut entry = entry.context("Failed to read archive entry")?;
            let entry_path = entry.path().context("Invalid entry path")?.into_owned();

            let Some(relative) = strip_first_component(&entry_path)? else {
                continue;
            };
            let full_path = extract_to.join(&relative);

            match entry.header().entry_type() {
                EntryType::Directory => runtime.create_dir_all(&full_path)?,
                EntryType::Regular | EntryType::Continuous => {
                    if let Some(parent) = full_path.parent() {
                        runtime.create_dir_all(parent)?;
                    }
                    let mut dest = runtime.create_file(&full_path)?;
                    std::io::copy(&mut entry, &mut dest)
                        .with_context(|| format!("Failed to extract file {:?}", full_path))?;
                    drop(dest);

                    #[cfg(unix)]
                    if let Ok(mode) = entry.header().mode()
                        && let Err(e) = runtime.set_permissions(&full_path, mode & 0o777)
                    {
                        debug!("Failed to set permissions on {:?}: {}", full_path, e);
                    }

                    files += 1;
                }
                other => debug!("Skipping {:?} entry {:?}", other, entry_path),
            }
        }

        debug!("Extracted {} files", files);
        Ok(files)
    }
}

/// Drop the leading directory of an archive path.
///
/// Returns `None` for the leading directory itself, and an error for paths
/// that would escape the destination.
fn strip_first_component(path: &Path) -> Result<Option<PathBuf>> {
    let mut components = path.components();
    components.next();

    let mut stripped = PathBuf::new();
    for component in components {
        match component {
            Component::Normal(part) => stripped.push(part),
            Component::CurDir => {}
            _ => bail!("Refusing to extract unsafe path {:?}", path),
        }
    }

    Ok((!stripped.as_os_str().is_empty()).then_some(stripped))
}
