//! Source archive handling
//!
//! GitHub serves repository sources as `.tar.gz` tarballs whose entries all
//! live under one `owner-repo-<sha>/` directory. The extractor drops that
//! directory so the sources land directly in the destination.

mod tar_gz;

use crate::runtime::Runtime;
use std::path::{Path, PathBuf};

pub use tar_gz::TarGzExtractor;

/// Returns `base` if nothing exists there, otherwise the first free
/// `base-2`, `base-3`, ... sibling.
pub fn available_directory<R: Runtime>(runtime: &R, base: &Path) -> PathBuf {
    if !runtime.exists(base) {
        return base.to_path_buf();
    }

    let mut counter = 2;
    loop {
        let mut name = base.as_os_str().to_owned();
        name.push(format!("-{}", counter));
        let candidate = PathBuf::from(name);
        if !runtime.exists(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}
