//! Registry ingestion: YAML → DTO → validated domain model.
//!
//! ```text
//! YAML text
//!   ↓ serde (DTO layer)
//! dto::RegistryDto
//!   ↓ validate + convert
//! model::Registry (pure domain model)
//!   ↓ resolve()
//! ResolutionResult
//! ```

pub mod dto;
pub mod loader;
pub mod model;

/// Errors from parsing YAML and loading the registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// YAML deserialization failed.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Registry validation failed.
    #[error("{0}")]
    Load(#[from] loader::LoadError),

    /// The same id was defined in two merged files.
    #[error("{0}")]
    Duplicate(#[from] dto::DuplicateIdError),
}

/// Parses YAML content into a validated [`model::Registry`].
///
/// # Errors
///
/// Returns an error if YAML parsing or validation fails.
pub fn load_registry_from_yaml(content: &str) -> Result<model::Registry, RegistryError> {
    let dto: dto::RegistryDto = serde_yaml::from_str(content)?;
    Ok(loader::load(dto)?)
}

/// Merges several registry file DTOs and loads the combined registry.
///
/// Used when a registry is split over a directory of YAML files.
///
/// # Errors
///
/// Returns an error on duplicate ids across files or validation failure.
pub fn load_registry_from_dtos(
    dtos: impl IntoIterator<Item = dto::RegistryDto>,
) -> Result<model::Registry, RegistryError> {
    let mut merged = dto::RegistryDto::default();
    for piece in dtos {
        merged.merge(piece)?;
    }
    Ok(loader::load(merged)?)
}
