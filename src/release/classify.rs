use log::debug;

use super::{Arch, Asset, ClassifiedAsset, ClassifiedRelease, PlatformAssets, PlatformKey, Release};

/// Substrings that tie a file name to an operating system, in test order.
const PLATFORM_KEYWORDS: [(PlatformKey, &[&str]); 3] = [
    (
        PlatformKey::Windows,
        &["win", "windows", "win32", "win64", ".exe", ".msi"],
    ),
    (
        PlatformKey::Macos,
        &["mac", "macos", "darwin", "osx", ".dmg", ".pkg"],
    ),
    (
        PlatformKey::Linux,
        &[
            "linux",
            "ubuntu",
            "debian",
            ".deb",
            ".rpm",
            ".tar.gz",
            ".appimage",
        ],
    ),
];

/// Architecture tokens in priority order; the first group with a hit wins.
///
/// Named tokens come before the bare bitness markers so that `arm64` is not
/// read as `arm` and `x86_64` is not read as `x86`.
const ARCH_KEYWORDS: [(Arch, &[&str]); 6] = [
    (Arch::Arm64, &["arm64", "aarch64"]),
    (Arch::X86_64, &["x86_64", "x64", "amd64"]),
    (Arch::I386, &["i386", "x86"]),
    (Arch::Arm, &["armv7", "arm"]),
    (Arch::X86_64, &["64"]),
    (Arch::I386, &["32"]),
];

fn contains_any(name: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| name.contains(keyword))
}

/// Guess the CPU architecture from a lower-cased asset name.
pub fn detect_arch(name: &str) -> Arch {
    let name = name.to_lowercase();
    ARCH_KEYWORDS
        .iter()
        .find(|(_, keywords)| contains_any(&name, keywords))
        .map(|(arch, _)| *arch)
        .unwrap_or(Arch::Unknown)
}

/// Classify one asset.
///
/// Returns one annotated copy per platform group the asset belongs to. A name
/// that matches the keywords of several platforms yields several copies, e.g.
/// `darwin` also contains `win`.
pub fn classify_asset(asset: &Asset) -> Vec<ClassifiedAsset> {
    let name = asset.name.to_lowercase();

    let matched: Vec<ClassifiedAsset> = PLATFORM_KEYWORDS
        .iter()
        .filter(|(_, keywords)| contains_any(&name, keywords))
        .map(|(platform, _)| ClassifiedAsset {
            asset: asset.clone(),
            detected_arch: detect_arch(&name),
            platform: *platform,
        })
        .collect();

    if !matched.is_empty() {
        return matched;
    }

    // No OS marker (`win`, `mac` and `linux` are keywords above), so the
    // file is platform independent.
    vec![ClassifiedAsset {
        asset: asset.clone(),
        detected_arch: Arch::Universal,
        platform: PlatformKey::Universal,
    }]
}

/// Group the assets of a release by platform.
///
/// Returns `None` when no asset landed in any group.
pub fn classify_release(release: &Release) -> Option<ClassifiedRelease> {
    let mut platform_assets = PlatformAssets::default();

    for asset in &release.assets {
        for classified in classify_asset(asset) {
            platform_assets.get_mut(classified.platform).push(classified);
        }
    }

    if platform_assets.is_empty() {
        debug!("Dropping release {} without assets", release.tag_name);
        return None;
    }

    Some(ClassifiedRelease {
        release: release.clone(),
        platform_assets,
    })
}

/// Classify every release, dropping those without any asset.
///
/// Release order is preserved.
pub fn classify_releases(releases: &[Release]) -> Vec<ClassifiedRelease> {
    releases.iter().filter_map(classify_release).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper function to create a release from asset names
    fn make_release(tag: &str, names: &[&str]) -> Release {
        Release {
            tag_name: tag.to_string(),
            assets: names
                .iter()
                .map(|name| Asset {
                    name: name.to_string(),
                    download_url: format!("https://example.com/{}", name),
                    size: 1024,
                })
                .collect(),
            ..Default::default()
        }
    }

    fn names(assets: &[ClassifiedAsset]) -> Vec<&str> {
        assets.iter().map(|a| a.name()).collect()
    }

    #[test]
    fn test_windows_x64_exe() {
        let classified = classify_asset(&make_release("v1", &["app-windows-x64.exe"]).assets[0]);

        assert_eq!(classified.len(), 1);
        assert_eq!(classified[0].platform, PlatformKey::Windows);
        assert_eq!(classified[0].detected_arch, Arch::X86_64);
    }

    #[test]
    fn test_linux_arm64_tarball() {
        let classified = classify_asset(&make_release("v1", &["app-linux-arm64.tar.gz"]).assets[0]);

        assert_eq!(classified.len(), 1);
        assert_eq!(classified[0].platform, PlatformKey::Linux);
        assert_eq!(classified[0].detected_arch, Arch::Arm64);
    }

    #[test]
    fn test_plain_zip_is_universal() {
        let classified = classify_asset(&make_release("v1", &["app.zip"]).assets[0]);

        assert_eq!(classified.len(), 1);
        assert_eq!(classified[0].platform, PlatformKey::Universal);
        assert_eq!(classified[0].detected_arch, Arch::Universal);
    }

    #[test]
    fn test_darwin_lands_in_windows_and_macos() {
        // "darwin" contains "win"
        let classified = classify_asset(&make_release("v1", &["tool-darwin-amd64.dmg"]).assets[0]);

        let platforms: Vec<_> = classified.iter().map(|a| a.platform).collect();
        assert_eq!(platforms, vec![PlatformKey::Windows, PlatformKey::Macos]);
        assert!(classified.iter().all(|a| a.detected_arch == Arch::X86_64));
    }

    #[test]
    fn test_detect_arch_priority() {
        assert_eq!(detect_arch("tool-aarch64-unknown-linux-gnu"), Arch::Arm64);
        assert_eq!(detect_arch("tool-x86_64-linux"), Arch::X86_64);
        assert_eq!(detect_arch("tool_amd64.deb"), Arch::X86_64);
        assert_eq!(detect_arch("tool-i386.rpm"), Arch::I386);
        assert_eq!(detect_arch("tool-x86-windows.exe"), Arch::I386);
        assert_eq!(detect_arch("tool-armv7.tar.gz"), Arch::Arm);
        assert_eq!(detect_arch("tool-linux-arm.tar.gz"), Arch::Arm);
        assert_eq!(detect_arch("tool-win64.zip"), Arch::X86_64);
        assert_eq!(detect_arch("tool-win32.zip"), Arch::I386);
        assert_eq!(detect_arch("tool-linux.tar.gz"), Arch::Unknown);
    }

    #[test]
    fn test_detect_arch_is_case_insensitive() {
        assert_eq!(detect_arch("Tool-Linux-AARCH64.AppImage"), Arch::Arm64);
    }

    #[test]
    fn test_release_without_assets_is_dropped() {
        let releases = vec![
            make_release("v2", &[]),
            make_release("v1", &["app-linux.tar.gz"]),
        ];

        let classified = classify_releases(&releases);

        assert_eq!(classified.len(), 1);
        assert_eq!(classified[0].tag_name(), "v1");
    }

    #[test]
    fn test_release_order_preserved() {
        let releases = vec![
            make_release("v3", &["a.zip"]),
            make_release("v2", &["b.zip"]),
            make_release("v1", &["c.zip"]),
        ];

        let tags: Vec<_> = classify_releases(&releases)
            .iter()
            .map(|r| r.tag_name().to_string())
            .collect();

        assert_eq!(tags, vec!["v3", "v2", "v1"]);
    }

    #[test]
    fn test_group_order_follows_asset_list() {
        let release = make_release(
            "v1",
            &[
                "b-linux-x86_64.tar.gz",
                "setup.msi",
                "a-linux-arm64.tar.gz",
                "checksums.txt",
                "c.deb",
            ],
        );

        let classified = classify_release(&release).unwrap();

        assert_eq!(
            names(&classified.platform_assets.linux),
            vec!["b-linux-x86_64.tar.gz", "a-linux-arm64.tar.gz", "c.deb"]
        );
        assert_eq!(names(&classified.platform_assets.windows), vec!["setup.msi"]);
        assert_eq!(
            names(&classified.platform_assets.universal),
            vec!["checksums.txt"]
        );
        assert!(classified.platform_assets.macos.is_empty());
    }

    #[test]
    fn test_source_release_is_kept_unchanged() {
        let release = make_release("v1", &["App-Linux.AppImage"]);

        let classified = classify_release(&release).unwrap();

        assert_eq!(classified.release, release);
        assert_eq!(classified.platform_assets.linux[0].asset, release.assets[0]);
    }

    #[test]
    fn test_reclassifying_raw_assets_is_stable() {
        let releases = vec![make_release(
            "v1",
            &["x-darwin-arm64.tar.gz", "x-windows-386.exe", "x.jar"],
        )];

        let first = classify_releases(&releases);
        let raw: Vec<Release> = first.iter().map(|r| r.release.clone()).collect();
        let second = classify_releases(&raw);

        assert_eq!(first, second);
    }
}
