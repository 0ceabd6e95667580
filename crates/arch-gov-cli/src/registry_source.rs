//! Registry file discovery and multi-file loading.
//!
//! Resolves the registry location in a deterministic priority order:
//!
//! 1. `--registry` flag (explicit file or directory)
//! 2. `{cwd}/arch-gov.yaml` or `.arch-gov.yaml`
//! 3. `{cwd}/.arch-gov/` directory of YAML files
//!
//! A directory source merges every `*.yaml`/`*.yml` file it contains;
//! an id defined in two files is a load error.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use arch_gov_core::registry::dto::RegistryDto;
use arch_gov_core::{load_registry_from_dtos, Registry};

/// Where the registry was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrySource {
    /// Explicitly specified via `--registry`.
    Explicit(PathBuf),
    /// A registry file found in the project directory.
    Project(PathBuf),
    /// A registry directory found in the project directory.
    Directory(PathBuf),
}

impl RegistrySource {
    /// Returns the resolved path.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Directory(p) => p,
        }
    }
}

/// Project-level registry file names, checked in order.
const PROJECT_REGISTRY_NAMES: &[&str] = &["arch-gov.yaml", ".arch-gov.yaml"];

/// Project-level registry directory name.
const PROJECT_REGISTRY_DIR: &str = ".arch-gov";

/// Locates the registry for the current invocation.
///
/// # Errors
///
/// Fails when no registry can be found.
pub fn locate(project_dir: &Path, explicit: Option<&Path>) -> Result<RegistrySource> {
    if let Some(p) = explicit {
        return Ok(RegistrySource::Explicit(p.to_path_buf()));
    }

    for name in PROJECT_REGISTRY_NAMES {
        let candidate = project_dir.join(name);
        if candidate.is_file() {
            tracing::debug!("Found project registry: {}", candidate.display());
            return Ok(RegistrySource::Project(candidate));
        }
    }

    let dir = project_dir.join(PROJECT_REGISTRY_DIR);
    if dir.is_dir() {
        tracing::debug!("Found registry directory: {}", dir.display());
        return Ok(RegistrySource::Directory(dir));
    }

    bail!(
        "no registry found: expected arch-gov.yaml, .arch-gov.yaml or .arch-gov/ \
         in {} (or pass --registry)",
        project_dir.display()
    )
}

/// Loads the registry from a located source.
///
/// # Errors
///
/// Fails on unreadable files, YAML errors, duplicate ids across files,
/// or validation errors.
pub fn load(source: &RegistrySource) -> Result<Registry> {
    let path = source.path();
    if path.is_dir() {
        load_directory(path)
    } else {
        load_file(path)
    }
}

fn load_file(path: &Path) -> Result<Registry> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read registry file: {}", path.display()))?;
    arch_gov_core::load_registry_from_yaml(&content)
        .with_context(|| format!("invalid registry: {}", path.display()))
}

fn load_directory(dir: &Path) -> Result<Registry> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("yaml" | "yml")
            )
        })
        .collect();
    // Deterministic merge order regardless of filesystem enumeration.
    files.sort();

    if files.is_empty() {
        bail!("registry directory contains no YAML files: {}", dir.display());
    }

    let mut dtos = Vec::with_capacity(files.len());
    for file in &files {
        let content = std::fs::read_to_string(file)
            .with_context(|| format!("failed to read registry file: {}", file.display()))?;
        let dto: RegistryDto = serde_yaml::from_str(&content)
            .with_context(|| format!("invalid registry YAML: {}", file.display()))?;
        dtos.push(dto);
    }

    tracing::info!("Merging {} registry file(s) from {}", dtos.len(), dir.display());
    load_registry_from_dtos(dtos).with_context(|| format!("invalid registry: {}", dir.display()))
}

/// Locates and loads in one step, starting from the current directory.
///
/// # Errors
///
/// Combines the failure modes of [`locate`] and [`load`].
pub fn locate_and_load(explicit: Option<&Path>) -> Result<Registry> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let source = locate(&cwd, explicit)?;
    load(&source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn explicit_takes_priority() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("arch-gov.yaml"), "").unwrap();
        let explicit = tmp.path().join("other.yaml");

        let source = locate(tmp.path(), Some(&explicit)).unwrap();
        assert_eq!(source, RegistrySource::Explicit(explicit));
    }

    #[test]
    fn project_file_preferred_over_dot_prefix() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("arch-gov.yaml"), "").unwrap();
        fs::write(tmp.path().join(".arch-gov.yaml"), "").unwrap();

        let source = locate(tmp.path(), None).unwrap();
        assert_eq!(
            source,
            RegistrySource::Project(tmp.path().join("arch-gov.yaml"))
        );
    }

    #[test]
    fn directory_fallback() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join(".arch-gov")).unwrap();

        let source = locate(tmp.path(), None).unwrap();
        assert_eq!(
            source,
            RegistrySource::Directory(tmp.path().join(".arch-gov"))
        );
    }

    #[test]
    fn nothing_found_is_an_error() {
        let tmp = TempDir::new().unwrap();
        assert!(locate(tmp.path(), None).is_err());
    }

    #[test]
    fn loads_single_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("arch-gov.yaml");
        fs::write(&file, "architectures:\n  svc:\n    rationale: r\n").unwrap();

        let registry = load(&RegistrySource::Explicit(file)).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn merges_directory_files() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(".arch-gov");
        fs::create_dir(&dir).unwrap();
        fs::write(
            dir.join("domain.yaml"),
            "architectures:\n  domain.base:\n    rationale: r\n",
        )
        .unwrap();
        fs::write(dir.join("mixins.yml"), "mixins:\n  logging: {}\n").unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let registry = load(&RegistrySource::Directory(dir)).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.mixins().count(), 1);
    }

    #[test]
    fn duplicate_id_across_files_fails() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(".arch-gov");
        fs::create_dir(&dir).unwrap();
        fs::write(
            dir.join("a.yaml"),
            "architectures:\n  svc:\n    rationale: r\n",
        )
        .unwrap();
        fs::write(
            dir.join("b.yaml"),
            "architectures:\n  svc:\n    rationale: other\n",
        )
        .unwrap();

        let err = load(&RegistrySource::Directory(dir)).unwrap_err();
        assert!(format!("{err:#}").contains("duplicate"));
    }

    #[test]
    fn empty_directory_fails() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(".arch-gov");
        fs::create_dir(&dir).unwrap();
        assert!(load(&RegistrySource::Directory(dir)).is_err());
    }
}
