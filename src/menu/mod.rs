//! Platform-grouped package menu.
//!
//! Builds the entries of the package selection prompt from classified
//! releases. Rendering and input handling live in the runtime.

use crate::release::{ClassifiedAsset, ClassifiedRelease, PlatformKey};
use crate::runtime::Choice;

/// Releases shown in the package menu unless told otherwise
pub const DEFAULT_RELEASE_LIMIT: usize = 2;

const SEPARATOR: &str = "────────────────────────────────";

#[derive(Debug, Clone, PartialEq)]
pub enum MenuEntry {
    Separator,
    Header {
        tag: String,
        platform: PlatformKey,
        current: bool,
    },
    Asset {
        tag: String,
        asset: ClassifiedAsset,
    },
}

impl MenuEntry {
    pub fn label(&self) -> String {
        match self {
            MenuEntry::Separator => SEPARATOR.to_string(),
            MenuEntry::Header {
                tag,
                platform,
                current,
            } => {
                if *current {
                    format!("{} - {} (Your Platform)", tag, platform.label())
                } else {
                    format!("{} - {}", tag, platform.label())
                }
            }
            MenuEntry::Asset { asset, .. } => asset_label(asset),
        }
    }

    pub fn is_selectable(&self) -> bool {
        matches!(self, MenuEntry::Asset { .. })
    }

    pub fn to_choice(&self) -> Choice {
        if self.is_selectable() {
            Choice::option(self.label())
        } else {
            Choice::heading(self.label())
        }
    }
}

/// `name [arch] (size MB)`, the arch tag left out when it says nothing.
pub fn asset_label(asset: &ClassifiedAsset) -> String {
    if asset.detected_arch.is_specific() {
        format!(
            "{} [{}] ({:.2} MB)",
            asset.name(),
            asset.detected_arch,
            asset.size_mb()
        )
    } else {
        format!("{} ({:.2} MB)", asset.name(), asset.size_mb())
    }
}

/// Menu entries for the first `limit` releases.
///
/// Each non-empty platform group gets a header, preceded by a separator
/// unless it opens the menu, followed by one entry per asset. The host's
/// platform and the universal group are marked as the user's platform.
pub fn build_package_menu(
    releases: &[ClassifiedRelease],
    current_os: &str,
    limit: usize,
) -> Vec<MenuEntry> {
    let current = PlatformKey::from_os(current_os);
    let mut entries = Vec::new();

    for release in releases.iter().take(limit) {
        for (platform, assets) in release.platform_assets.iter() {
            if assets.is_empty() {
                continue;
            }

            if !entries.is_empty() {
                entries.push(MenuEntry::Separator);
            }

            entries.push(MenuEntry::Header {
                tag: release.tag_name().to_string(),
                platform,
                current: platform == PlatformKey::Universal || Some(platform) == current,
            });

            entries.extend(assets.iter().map(|asset| MenuEntry::Asset {
                tag: release.tag_name().to_string(),
                asset: asset.clone(),
            }));
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::{Arch, Asset, Release, classify_releases};

    fn release(tag: &str, assets: &[(&str, u64)]) -> Release {
        Release {
            tag_name: tag.to_string(),
            assets: assets
                .iter()
                .map(|(name, size)| Asset {
                    name: name.to_string(),
                    download_url: format!("https://example.com/{}", name),
                    size: *size,
                })
                .collect(),
            ..Default::default()
        }
    }

    fn labels(entries: &[MenuEntry]) -> Vec<String> {
        entries.iter().map(MenuEntry::label).collect()
    }

    #[test]
    fn test_build_package_menu_layout() {
        let releases = classify_releases(&[release(
            "v1.2.0",
            &[
                ("tool-windows-x64.exe", 2 * 1024 * 1024),
                ("tool-linux-arm64.tar.gz", 1536 * 1024),
                ("tool.zip", 1024 * 1024),
            ],
        )]);

        let entries = build_package_menu(&releases, "linux", DEFAULT_RELEASE_LIMIT);

        assert_eq!(
            labels(&entries),
            vec![
                "v1.2.0 - Windows",
                "tool-windows-x64.exe [x86_64] (2.00 MB)",
                SEPARATOR,
                "v1.2.0 - Linux (Your Platform)",
                "tool-linux-arm64.tar.gz [arm64] (1.50 MB)",
                SEPARATOR,
                "v1.2.0 - Universal (Your Platform)",
                "tool.zip (1.00 MB)",
            ]
        );
    }

    #[test]
    fn test_build_package_menu_respects_limit() {
        let releases = classify_releases(&[
            release("v3", &[("a-linux.deb", 1)]),
            release("v2", &[("a-linux.deb", 1)]),
            release("v1", &[("a-linux.deb", 1)]),
        ]);

        let entries = build_package_menu(&releases, "linux", 2);
        let headers: Vec<_> = entries
            .iter()
            .filter(|e| matches!(e, MenuEntry::Header { .. }))
            .collect();

        assert_eq!(headers.len(), 2);
        assert_eq!(entries.last().unwrap().label(), "a-linux.deb (0.00 MB)");
    }

    #[test]
    fn test_build_package_menu_unknown_os() {
        let releases = classify_releases(&[release("v1", &[("a-macos.dmg", 0)])]);

        let entries = build_package_menu(&releases, "freebsd", 2);

        assert_eq!(labels(&entries), vec!["v1 - macOS", "a-macos.dmg (0.00 MB)"]);
    }

    #[test]
    fn test_entries_to_choices() {
        let releases = classify_releases(&[release("v1", &[("a-darwin-arm64.tar.gz", 0)])]);

        let entries = build_package_menu(&releases, "macos", 2);
        let choices: Vec<Choice> = entries.iter().map(MenuEntry::to_choice).collect();

        // darwin also contains "win"
        assert_eq!(
            choices.iter().filter(|c| c.selectable).count(),
            3,
            "{:?}",
            choices
        );
        assert!(!choices[0].selectable);
        assert_eq!(choices[0].label, "v1 - Windows");
    }

    #[test]
    fn test_asset_label_hides_uninformative_arch() {
        let asset = ClassifiedAsset {
            asset: Asset {
                name: "x".into(),
                download_url: String::new(),
                size: 0,
            },
            detected_arch: Arch::Universal,
            platform: PlatformKey::Universal,
        };
        assert_eq!(asset_label(&asset), "x (0.00 MB)");
    }
}
