use super::{ClassifiedRelease, PlatformDescriptor, PlatformKey, Release, classify_releases};

/// Keep the releases that ship something usable on `platform`.
///
/// A release qualifies when it has assets for the platform's OS or any
/// universal asset. Architecture is not considered.
pub fn filter_by_platform(
    releases: &[ClassifiedRelease],
    platform: &PlatformDescriptor,
) -> Vec<ClassifiedRelease> {
    let os_key = PlatformKey::from_os(&platform.os);

    releases
        .iter()
        .filter(|release| {
            let assets = &release.platform_assets;
            let has_os_assets = os_key.is_some_and(|key| !assets.get(key).is_empty());
            has_os_assets || !assets.universal.is_empty()
        })
        .cloned()
        .collect()
}

/// Classify raw releases and keep those compatible with `platform`.
pub fn compatible_releases(
    releases: &[Release],
    platform: &PlatformDescriptor,
) -> Vec<ClassifiedRelease> {
    filter_by_platform(&classify_releases(releases), platform)
}
