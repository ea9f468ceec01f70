//! Release classification module
//!
//! This module groups the assets of GitHub releases by the operating system
//! they target and annotates each asset with the CPU architecture guessed
//! from its file name. It also filters classified releases down to those
//! usable on a given platform.

mod classify;
mod filter;
mod platform;

pub use classify::{classify_asset, classify_release, classify_releases, detect_arch};
pub use filter::{compatible_releases, filter_by_platform};
pub use platform::{PlatformDescriptor, detect_platform};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A downloadable file attached to a release
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Asset {
    pub name: String,
    #[serde(rename = "browser_download_url")]
    pub download_url: String,
    #[serde(default)]
    pub size: u64,
}

/// A published release as returned by the "list releases" endpoint
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub tarball_url: Option<String>,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// Platform group an asset is filed under
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKey {
    Windows,
    Macos,
    Linux,
    Universal,
}

impl PlatformKey {
    /// All groups, in presentation order.
    pub const ALL: [PlatformKey; 4] = [
        PlatformKey::Windows,
        PlatformKey::Macos,
        PlatformKey::Linux,
        PlatformKey::Universal,
    ];

    /// Map a normalized OS name onto its group.
    ///
    /// Returns `None` for operating systems without a dedicated group; the
    /// `universal` bucket is not an OS.
    pub fn from_os(os: &str) -> Option<Self> {
        match os {
            "windows" => Some(PlatformKey::Windows),
            "macos" => Some(PlatformKey::Macos),
            "linux" => Some(PlatformKey::Linux),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformKey::Windows => "windows",
            PlatformKey::Macos => "macos",
            PlatformKey::Linux => "linux",
            PlatformKey::Universal => "universal",
        }
    }

    /// Human readable name used in menus
    pub fn label(&self) -> &'static str {
        match self {
            PlatformKey::Windows => "Windows",
            PlatformKey::Macos => "macOS",
            PlatformKey::Linux => "Linux",
            PlatformKey::Universal => "Universal",
        }
    }
}

impl fmt::Display for PlatformKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CPU architecture guessed from an asset name
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    #[serde(rename = "x86_64")]
    X86_64,
    Arm64,
    Arm,
    I386,
    Unknown,
    Universal,
}

impl Arch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::X86_64 => "x86_64",
            Arch::Arm64 => "arm64",
            Arch::Arm => "arm",
            Arch::I386 => "i386",
            Arch::Unknown => "unknown",
            Arch::Universal => "universal",
        }
    }

    /// Whether the architecture says anything about the target CPU
    pub fn is_specific(&self) -> bool {
        !matches!(self, Arch::Unknown | Arch::Universal)
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An annotated copy of an [`Asset`], filed under one platform group
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ClassifiedAsset {
    #[serde(flatten)]
    pub asset: Asset,
    pub detected_arch: Arch,
    pub platform: PlatformKey,
}

impl ClassifiedAsset {
    pub fn name(&self) -> &str {
        &self.asset.name
    }

    pub fn size_mb(&self) -> f64 {
        self.asset.size as f64 / (1024.0 * 1024.0)
    }
}

/// Assets of one release grouped by platform.
///
/// Within a group, assets keep the order of the release's asset list.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct PlatformAssets {
    pub windows: Vec<ClassifiedAsset>,
    pub macos: Vec<ClassifiedAsset>,
    pub linux: Vec<ClassifiedAsset>,
    pub universal: Vec<ClassifiedAsset>,
}

impl PlatformAssets {
    pub fn get(&self, key: PlatformKey) -> &[ClassifiedAsset] {
        match key {
            PlatformKey::Windows => &self.windows,
            PlatformKey::Macos => &self.macos,
            PlatformKey::Linux => &self.linux,
            PlatformKey::Universal => &self.universal,
        }
    }

    pub(crate) fn get_mut(&mut self, key: PlatformKey) -> &mut Vec<ClassifiedAsset> {
        match key {
            PlatformKey::Windows => &mut self.windows,
            PlatformKey::Macos => &mut self.macos,
            PlatformKey::Linux => &mut self.linux,
            PlatformKey::Universal => &mut self.universal,
        }
    }

    /// Iterate over the groups in presentation order, empty ones included.
    pub fn iter(&self) -> impl Iterator<Item = (PlatformKey, &[ClassifiedAsset])> {
        PlatformKey::ALL.into_iter().map(move |key| (key, self.get(key)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, assets)| assets.is_empty())
    }
}

/// A release together with its platform grouping
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ClassifiedRelease {
    #[serde(flatten)]
    pub release: Release,
    pub platform_assets: PlatformAssets,
}

impl ClassifiedRelease {
    pub fn tag_name(&self) -> &str {
        &self.release.tag_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_deserialize_github_payload() {
        let json = r#"{
            "tag_name": "v1.2.0",
            "prerelease": false,
            "tarball_url": "https://api.github.com/repos/o/r/tarball/v1.2.0",
            "assets": [
                {"name": "app-linux.tar.gz", "browser_download_url": "https://example.com/a", "size": 2048}
            ]
        }"#;

        let release: Release = serde_json::from_str(json).unwrap();

        assert_eq!(release.tag_name, "v1.2.0");
        assert_eq!(release.assets.len(), 1);
        assert_eq!(release.assets[0].download_url, "https://example.com/a");
        assert_eq!(release.assets[0].size, 2048);
    }

    #[test]
    fn test_release_missing_assets_is_empty() {
        let release: Release = serde_json::from_str(r#"{"tag_name": "v1"}"#).unwrap();
        assert!(release.assets.is_empty());
    }

    #[test]
    fn test_asset_without_name_fails_fast() {
        let json = r#"{"tag_name": "v1", "assets": [{"browser_download_url": "u", "size": 1}]}"#;
        let err = serde_json::from_str::<Release>(json).unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn test_platform_key_from_os() {
        assert_eq!(PlatformKey::from_os("windows"), Some(PlatformKey::Windows));
        assert_eq!(PlatformKey::from_os("macos"), Some(PlatformKey::Macos));
        assert_eq!(PlatformKey::from_os("linux"), Some(PlatformKey::Linux));
        assert_eq!(PlatformKey::from_os("universal"), None);
        assert_eq!(PlatformKey::from_os("freebsd"), None);
    }

    #[test]
    fn test_platform_assets_iter_order() {
        let keys: Vec<_> = PlatformAssets::default().iter().map(|(k, _)| k).collect();
        assert_eq!(keys, PlatformKey::ALL.to_vec());
        assert!(PlatformAssets::default().is_empty());
    }

    #[test]
    fn test_arch_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Arch::X86_64).unwrap(), "\"x86_64\"");
        assert_eq!(serde_json::to_string(&Arch::Arm64).unwrap(), "\"arm64\"");
        assert!(!Arch::Unknown.is_specific());
        assert!(Arch::I386.is_specific());
    }
}
