//! Project type detection for unpacked sources.
//!
//! Detection only inspects marker files. The setup commands are suggestions
//! for the user and are never executed.

use crate::runtime::Runtime;
use log::debug;
use serde::Serialize;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    Node,
    Docker,
    Python,
    Rust,
    Go,
    Unknown,
}

impl ProjectKind {
    pub fn label(&self) -> &'static str {
        match self {
            ProjectKind::Node => "Node.js",
            ProjectKind::Docker => "Docker",
            ProjectKind::Python => "Python",
            ProjectKind::Rust => "Rust",
            ProjectKind::Go => "Go",
            ProjectKind::Unknown => "Unknown",
        }
    }

    /// Commands that set up a project of this kind in `dir`.
    pub fn setup_commands<R: Runtime>(&self, runtime: &R, dir: &Path) -> Vec<String> {
        let has = |file: &str| runtime.exists(&dir.join(file));

        let commands: Vec<&str> = match self {
            ProjectKind::Node => vec!["npm install"],
            ProjectKind::Docker if has("docker-compose.yml") => vec!["docker-compose up -d"],
            ProjectKind::Docker => vec!["docker build -t project ."],
            ProjectKind::Python => {
                let mut commands = vec!["python -m venv .venv", "source .venv/bin/activate"];
                if has("requirements.txt") {
                    commands.push("pip install -r requirements.txt");
                }
                if has("setup.py") {
                    commands.push("pip install -e .");
                }
                commands
            }
            ProjectKind::Rust => vec!["cargo build"],
            ProjectKind::Go => vec!["go mod tidy"],
            ProjectKind::Unknown => Vec::new(),
        };

        commands.into_iter().map(String::from).collect()
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Recognizes one kind of project in a directory
pub trait ProjectDetector {
    fn kind(&self) -> ProjectKind;
    fn matches(&self, runtime: &dyn Runtime, dir: &Path) -> bool;
}

/// Detects a project by the presence of any of its marker files
pub struct MarkerFileDetector {
    pub kind: ProjectKind,
    pub markers: &'static [&'static str],
}

impl ProjectDetector for MarkerFileDetector {
    fn kind(&self) -> ProjectKind {
        self.kind
    }

    fn matches(&self, runtime: &dyn Runtime, dir: &Path) -> bool {
        self.markers.iter().any(|m| runtime.exists(&dir.join(m)))
    }
}

const DEFAULT_DETECTORS: [MarkerFileDetector; 5] = [
    MarkerFileDetector {
        kind: ProjectKind::Node,
        markers: &["package.json"],
    },
    MarkerFileDetector {
        kind: ProjectKind::Docker,
        markers: &["Dockerfile"],
    },
    MarkerFileDetector {
        kind: ProjectKind::Python,
        markers: &["requirements.txt", "setup.py"],
    },
    MarkerFileDetector {
        kind: ProjectKind::Rust,
        markers: &["Cargo.toml"],
    },
    MarkerFileDetector {
        kind: ProjectKind::Go,
        markers: &["go.mod"],
    },
];

/// Every kind of project found in `dir`, or `[Unknown]`.
pub fn detect_projects<R: Runtime>(runtime: &R, dir: &Path) -> Vec<ProjectKind> {
    detect_with(&DEFAULT_DETECTORS, runtime, dir)
}

pub fn detect_with<D: ProjectDetector, R: Runtime>(
    detectors: &[D],
    runtime: &R,
    dir: &Path,
) -> Vec<ProjectKind> {
    let kinds: Vec<ProjectKind> = detectors
        .iter()
        .filter(|d| d.matches(runtime, dir))
        .map(|d| d.kind())
        .collect();

    debug!("Detected project kinds in {:?}: {:?}", dir, kinds);

    if kinds.is_empty() {
        vec![ProjectKind::Unknown]
    } else {
        kinds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{MockRuntime, RealRuntime};
    use std::fs;
    use tempfile::tempdir;

    fn runtime_with(files: &'static [&'static str]) -> MockRuntime {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(move |path| {
            files
                .iter()
                .any(|f| path == Path::new("/src").join(f).as_path())
        });
        runtime
    }

    #[test]
    fn test_detect_projects_in_order() {
        let runtime = runtime_with(&["Cargo.toml", "Dockerfile", "package.json"]);

        let kinds = detect_projects(&runtime, Path::new("/src"));

        assert_eq!(
            kinds,
            vec![ProjectKind::Node, ProjectKind::Docker, ProjectKind::Rust]
        );
    }

    #[test]
    fn test_detect_projects_unknown() {
        let runtime = runtime_with(&["README.md"]);
        assert_eq!(
            detect_projects(&runtime, Path::new("/src")),
            vec![ProjectKind::Unknown]
        );
    }

    #[test]
    fn test_detect_python_by_either_marker() {
        let runtime = runtime_with(&["setup.py"]);
        assert_eq!(
            detect_projects(&runtime, Path::new("/src")),
            vec![ProjectKind::Python]
        );
    }

    #[test]
    fn test_detect_on_disk() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("go.mod"), "module example.com/x").unwrap();

        assert_eq!(
            detect_projects(&RealRuntime, dir.path()),
            vec![ProjectKind::Go]
        );
    }

    #[test]
    fn test_custom_detector() {
        let detectors = [MarkerFileDetector {
            kind: ProjectKind::Rust,
            markers: &["rust-toolchain.toml"],
        }];
        let runtime = runtime_with(&["rust-toolchain.toml"]);

        assert_eq!(
            detect_with(&detectors, &runtime, Path::new("/src")),
            vec![ProjectKind::Rust]
        );
    }

    #[test]
    fn test_setup_commands_docker() {
        let runtime = runtime_with(&["Dockerfile", "docker-compose.yml"]);
        assert_eq!(
            ProjectKind::Docker.setup_commands(&runtime, Path::new("/src")),
            vec!["docker-compose up -d"]
        );

        let runtime = runtime_with(&["Dockerfile"]);
        assert_eq!(
            ProjectKind::Docker.setup_commands(&runtime, Path::new("/src")),
            vec!["docker build -t project ."]
        );
    }

    #[test]
    fn test_setup_commands_python() {
        let runtime = runtime_with(&["requirements.txt", "setup.py"]);
        assert_eq!(
            ProjectKind::Python.setup_commands(&runtime, Path::new("/src")),
            vec![
                "python -m venv .venv",
                "source .venv/bin/activate",
                "pip install -r requirements.txt",
                "pip install -e .",
            ]
        );
    }

    #[test]
    fn test_setup_commands_simple_kinds() {
        let runtime = runtime_with(&[]);
        let dir = Path::new("/src");
        assert_eq!(ProjectKind::Node.setup_commands(&runtime, dir), vec!["npm install"]);
        assert_eq!(ProjectKind::Rust.setup_commands(&runtime, dir), vec!["cargo build"]);
        assert_eq!(ProjectKind::Go.setup_commands(&runtime, dir), vec!["go mod tidy"]);
        assert!(ProjectKind::Unknown.setup_commands(&runtime, dir).is_empty());
    }
}
