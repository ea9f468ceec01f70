use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// Normalized description of the host the classifier runs on
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PlatformDescriptor {
    pub os: String,
    pub arch: String,
}

impl PlatformDescriptor {
    /// Normalize raw OS and architecture names.
    ///
    /// Values missing from the lookup tables pass through unchanged.
    pub fn from_raw(os: &str, arch: &str) -> Self {
        Self {
            os: normalize_os(os).to_string(),
            arch: normalize_arch(arch).to_string(),
        }
    }
}

impl fmt::Display for PlatformDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.os, self.arch)
    }
}

fn normalize_os(os: &str) -> &str {
    match os {
        "win32" | "windows" => "windows",
        "darwin" | "macos" => "macos",
        "linux" => "linux",
        other => other,
    }
}

fn normalize_arch(arch: &str) -> &str {
    match arch {
        "x64" | "x86_64" => "x86_64",
        "arm64" | "aarch64" => "arm64",
        "arm" => "arm",
        "ia32" | "x86" | "i686" => "i386",
        other => other,
    }
}

/// Detect the current platform.
///
/// The host cannot change while the process runs, so the first answer is
/// cached.
pub fn detect_platform() -> PlatformDescriptor {
    static PLATFORM: OnceLock<PlatformDescriptor> = OnceLock::new();
    PLATFORM
        .get_or_init(|| {
            PlatformDescriptor::from_raw(std::env::consts::OS, std::env::consts::ARCH)
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_platform() {
        let platform = detect_platform();

        assert!(!platform.os.is_empty());
        assert!(!platform.arch.is_empty());

        #[cfg(target_os = "macos")]
        assert_eq!(platform.os, "macos");

        #[cfg(target_os = "linux")]
        assert_eq!(platform.os, "linux");

        #[cfg(target_os = "windows")]
        assert_eq!(platform.os, "windows");

        #[cfg(target_arch = "x86_64")]
        assert_eq!(platform.arch, "x86_64");

        #[cfg(target_arch = "aarch64")]
        assert_eq!(platform.arch, "arm64");
    }

    #[test]
    fn test_detect_platform_is_stable() {
        assert_eq!(detect_platform(), detect_platform());
    }

    #[test]
    fn test_from_raw_lookup_table() {
        assert_eq!(
            PlatformDescriptor::from_raw("win32", "x64"),
            PlatformDescriptor {
                os: "windows".into(),
                arch: "x86_64".into()
            }
        );
        assert_eq!(
            PlatformDescriptor::from_raw("darwin", "arm64"),
            PlatformDescriptor {
                os: "macos".into(),
                arch: "arm64".into()
            }
        );
        assert_eq!(PlatformDescriptor::from_raw("linux", "ia32").arch, "i386");
        assert_eq!(PlatformDescriptor::from_raw("linux", "arm").arch, "arm");
    }

    #[test]
    fn test_from_raw_passes_unknown_values_through() {
        let platform = PlatformDescriptor::from_raw("freebsd", "riscv64");
        assert_eq!(platform.os, "freebsd");
        assert_eq!(platform.arch, "riscv64");
    }
}
